use charts_core::DEFAULT_COVER;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LOG_FILTER: &str = "charts_core=info,charts_tui=info";
const DEBUG_LOG_FILTER: &str = "charts_core=debug,charts_tui=debug";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a whole number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Runtime settings, read from `.env` and the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `http(s)://` base URL or a directory.
    pub source: String,
    pub default_cover: String,
    pub rotate_interval: Duration,
    pub retries: u32,
    pub timeout: Duration,
    pub log_filter: String,
    pub log_file: PathBuf,
}

impl AppConfig {
    /// Loads `.env` (if any) and reads the `CHARTS_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let debug = value("CHARTS_DEBUG").is_some_and(|flag| flag != "0");
        let log_filter = value("CHARTS_LOG").unwrap_or_else(|| {
            let filter = if debug {
                DEBUG_LOG_FILTER
            } else {
                DEFAULT_LOG_FILTER
            };
            filter.to_string()
        });

        let retries = number("CHARTS_RETRIES", value("CHARTS_RETRIES"), 2)?;

        Ok(Self {
            source: value("CHARTS_SOURCE").unwrap_or_else(|| ".".to_string()),
            default_cover: value("CHARTS_DEFAULT_COVER")
                .unwrap_or_else(|| DEFAULT_COVER.to_string()),
            rotate_interval: Duration::from_secs(number(
                "CHARTS_ROTATE_SECS",
                value("CHARTS_ROTATE_SECS"),
                10,
            )?),
            retries: u32::try_from(retries).unwrap_or(u32::MAX),
            timeout: Duration::from_secs(number(
                "CHARTS_TIMEOUT_SECS",
                value("CHARTS_TIMEOUT_SECS"),
                15,
            )?),
            log_filter,
            log_file: value("CHARTS_LOG_FILE")
                .map_or_else(|| PathBuf::from("charts-tui.log"), PathBuf::from),
        })
    }

    /// Whether datasets are downloaded rather than read from disk.
    pub fn is_remote(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }
}

fn number(name: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    raw.map_or(Ok(default), |value| {
        value
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value })
    })
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<HashMap<_, _>>();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config(&[]).unwrap();

        assert_eq!(config.source, ".");
        assert_eq!(config.default_cover, "images/backgroundlogo.png");
        assert_eq!(config.rotate_interval, Duration::from_secs(10));
        assert_eq!(config.retries, 2);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.log_filter, "charts_core=info,charts_tui=info");
        assert_eq!(config.log_file, PathBuf::from("charts-tui.log"));
        assert!(!config.is_remote());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = config(&[
            ("CHARTS_SOURCE", "https://charts.example"),
            ("CHARTS_ROTATE_SECS", "3"),
            ("CHARTS_DEBUG", "1"),
        ])
        .unwrap();

        assert!(config.is_remote());
        assert_eq!(config.rotate_interval, Duration::from_secs(3));
        assert_eq!(config.log_filter, "charts_core=debug,charts_tui=debug");
    }

    #[test]
    fn bad_numbers_are_reported() {
        let error = config(&[("CHARTS_RETRIES", "many")]).unwrap_err();

        assert_eq!(
            error,
            ConfigError::InvalidNumber {
                name: "CHARTS_RETRIES",
                value: "many".to_string()
            }
        );
    }
}
