//! Dataset sources for the terminal client.

use charts_core::{FetchError, JsonSource};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::AppConfig;

const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Downloads datasets relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http_client: reqwest::Client,
    base_url: String,
    retries: u32,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration, retries: u32) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("charts-tui/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retries,
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn fetch_once(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .http_client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

impl JsonSource for HttpSource {
    async fn fetch_json(&self, path: &str) -> Result<Value, FetchError> {
        let url = self.url_for(path);
        let mut attempt = 0;

        loop {
            match self.fetch_once(&url).await {
                Err(error) if error.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(%error, attempt, "retrying dataset download");
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                result => return result,
            }
        }
    }
}

/// Reads datasets from a local checkout of the site.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl JsonSource for DirSource {
    async fn fetch_json(&self, path: &str) -> Result<Value, FetchError> {
        let file = self.root.join(path.trim_start_matches('/'));
        let bytes = tokio::fs::read(&file).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                FetchError::NotFound {
                    url: path.to_string(),
                }
            } else {
                FetchError::Io {
                    url: path.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode {
            url: path.to_string(),
            message: e.to_string(),
        })
    }
}

/// Whichever source the configuration points at.
#[derive(Debug, Clone)]
pub enum DataSource {
    Http(HttpSource),
    Dir(DirSource),
}

impl DataSource {
    pub fn from_config(config: &AppConfig) -> color_eyre::Result<Self> {
        if config.is_remote() {
            let source = HttpSource::new(&config.source, config.timeout, config.retries)?;
            return Ok(Self::Http(source));
        }
        Ok(Self::Dir(DirSource::new(&config.source)))
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Http(source) => source.base_url.clone(),
            Self::Dir(source) => source.root.display().to_string(),
        }
    }
}

impl JsonSource for DataSource {
    async fn fetch_json(&self, path: &str) -> Result<Value, FetchError> {
        match self {
            Self::Http(source) => source.fetch_json(path).await,
            Self::Dir(source) => source.fetch_json(path).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DirSource, HttpSource};
    use charts_core::{FetchError, JsonSource};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves `replies` in order, one per connection, and counts requests.
    async fn serve(replies: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            let mut replies = replies.into_iter();
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                if request.is_empty() {
                    continue;
                }
                counter.fetch_add(1, Ordering::SeqCst);

                let (status, body) = replies.next().unwrap_or((500, "[]"));
                let reply = format!(
                    "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(reply.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (base_url, hits)
    }

    #[tokio::test]
    async fn server_error_is_retried_until_success() {
        let (base_url, hits) = serve(vec![(503, "[]"), (200, r#"[{"SongID": 1}]"#)]).await;
        let source = HttpSource::new(&base_url, Duration::from_secs(5), 2).unwrap();

        let value = source.fetch_json("SI.json").await.unwrap();

        assert_eq!(value, json!([{"SongID": 1}]));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn not_found_is_requested_once() {
        let (base_url, hits) = serve(vec![(404, "[]"), (200, "[]")]).await;
        let source = HttpSource::new(&base_url, Duration::from_secs(5), 3).unwrap();

        let error = source.fetch_json("SI.json").await.unwrap_err();

        assert_eq!(
            error,
            FetchError::Status {
                url: format!("{base_url}/SI.json"),
                status: 404
            }
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_stop_at_the_configured_limit() {
        let (base_url, hits) = serve(vec![(503, "[]"), (502, "[]"), (200, "[]")]).await;
        let source = HttpSource::new(&base_url, Duration::from_secs(5), 1).unwrap();

        let error = source.fetch_json("SI.json").await.unwrap_err();

        assert!(matches!(error, FetchError::Status { status: 502, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn dir_source_reads_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("DATABASES/ALL_JSON");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("SI.json"), r#"[{"SongID": 1}]"#).unwrap();

        let source = DirSource::new(dir.path());
        let value = source.fetch_json("DATABASES/ALL_JSON/SI.json").await.unwrap();

        assert_eq!(value, json!([{"SongID": 1}]));
    }

    #[tokio::test]
    async fn dir_source_maps_missing_and_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "[{").unwrap();
        let source = DirSource::new(dir.path());

        let missing = source.fetch_json("missing.json").await.unwrap_err();
        let broken = source.fetch_json("broken.json").await.unwrap_err();

        assert_eq!(
            missing,
            FetchError::NotFound {
                url: "missing.json".to_string()
            }
        );
        assert!(matches!(broken, FetchError::Decode { .. }));
    }

    #[test]
    fn http_source_joins_base_and_path() {
        let source = HttpSource::new("https://charts.example/site/", Duration::from_secs(1), 0).unwrap();

        assert_eq!(
            source.url_for("DATABASES/ALL_JSON/SI.json"),
            "https://charts.example/site/DATABASES/ALL_JSON/SI.json"
        );
    }
}
