use thiserror::Error;

/// Failure to retrieve a single JSON resource.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("fetch failed {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("resource not found: {url}")]
    NotFound { url: String },

    #[error("invalid JSON in {url}: {message}")]
    Decode { url: String, message: String },

    #[error("failed to read {url}: {message}")]
    Io { url: String, message: String },
}

impl FetchError {
    /// Whether retrying the same request could succeed.
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            Self::NotFound { .. } | Self::Decode { .. } | Self::Io { .. } => false,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Network { url, .. }
            | Self::Status { url, .. }
            | Self::NotFound { url }
            | Self::Decode { url, .. }
            | Self::Io { url, .. } => url,
        }
    }
}

/// Failure of a whole chart load. Reference datasets never produce one of
/// these; only the chart-entry file is mandatory.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Error loading {} data.", .code.to_uppercase())]
    Entries {
        code: String,
        #[source]
        source: FetchError,
    },
}

impl LoadError {
    /// Message shown in place of the list.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
