//! Fetch/cache layer.
//!
//! [`JsonSource`] is the transport seam: the terminal client reads over HTTP
//! or from disk, the browser client uses `window.fetch`. [`FetchCache`] sits
//! in front of a source for the lifetime of a session and makes sure shared
//! reference files are requested once.

use crate::error::FetchError;
use crate::platform::ReferenceSource;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::OnceCell;

/// Something that can resolve a dataset URL to parsed JSON.
#[allow(async_fn_in_trait)]
pub trait JsonSource {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError>;
}

impl<T: JsonSource + ?Sized> JsonSource for Arc<T> {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        (**self).fetch_json(url).await
    }
}

type Slot = Arc<OnceCell<Arc<Value>>>;

/// URL-keyed memo of fetched documents.
///
/// Entries are never evicted. Concurrent requests for one URL share a single
/// in-flight fetch; failed fetches are not remembered, so the next request
/// tries again.
#[derive(Debug)]
pub struct FetchCache<S> {
    source: S,
    slots: Mutex<HashMap<String, Slot>>,
    issued: AtomicUsize,
}

impl<S: JsonSource> FetchCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            slots: Mutex::new(HashMap::new()),
            issued: AtomicUsize::new(0),
        }
    }

    pub async fn get(&self, url: &str) -> Result<Arc<Value>, FetchError> {
        let slot = {
            let mut slots = lock(&self.slots);
            Arc::clone(slots.entry(url.to_string()).or_default())
        };

        if let Some(value) = slot.get() {
            tracing::debug!(url, "cache hit");
            return Ok(Arc::clone(value));
        }

        let value = slot
            .get_or_try_init(|| async {
                self.issued.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(url, "fetching");
                self.source.fetch_json(url).await.map(Arc::new)
            })
            .await?;

        Ok(Arc::clone(value))
    }

    /// Tries `source.primary`, then `source.fallback`, then gives up with an
    /// empty dataset. Never fails; a [`Dataset`] built from the empty
    /// stand-in is marked `degraded`.
    pub async fn get_with_fallback(&self, source: ReferenceSource) -> Dataset {
        let error = match self.get(source.primary).await {
            Ok(value) => return Dataset::fetched(value),
            Err(error) => error,
        };

        let Some(fallback) = source.fallback else {
            tracing::warn!(%error, "reference dataset unavailable; using empty data");
            return Dataset::empty();
        };

        tracing::warn!(%error, fallback, "[FALLBACK] primary dataset unavailable");
        match self.get(fallback).await {
            Ok(value) => Dataset::fetched(value),
            Err(error) => {
                tracing::warn!(%error, "[FALLBACK FAILED] using empty data");
                Dataset::empty()
            }
        }
    }

    /// Number of requests that actually reached the source.
    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::Relaxed)
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

/// A reference dataset as handed to the index builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub value: Arc<Value>,
    /// Every source failed and `value` is the empty stand-in.
    pub degraded: bool,
}

impl Dataset {
    fn fetched(value: Arc<Value>) -> Self {
        Self {
            value,
            degraded: false,
        }
    }

    fn empty() -> Self {
        Self {
            value: Arc::new(Value::Array(Vec::new())),
            degraded: true,
        }
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Serves documents from memory. Unknown URLs answer 404, and individual
/// URLs can be made to answer any status.
#[derive(Debug, Default)]
pub struct MemorySource {
    documents: HashMap<String, Value>,
    statuses: HashMap<String, u16>,
    requests: Mutex<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, url: impl Into<String>, document: Value) -> Self {
        self.documents.insert(url.into(), document);
        self
    }

    #[must_use]
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.statuses.insert(url.into(), status);
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }
}

impl JsonSource for MemorySource {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        lock(&self.requests).push(url.to_string());

        if let Some(status) = self.statuses.get(url) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            });
        }

        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}
