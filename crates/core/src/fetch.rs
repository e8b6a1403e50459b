use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::SalesNode;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid sales json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Somewhere a sales hierarchy can be loaded from.
#[async_trait]
pub trait SalesSource: Send + Sync {
    async fn load(&self) -> Result<SalesNode, FetchError>;

    fn describe(&self) -> String;
}

/// Issues a single GET and parses the body. No timeout, no retry.
pub async fn fetch_sales(client: &reqwest::Client, url: &str) -> Result<SalesNode, FetchError> {
    info!(%url, "fetching sales data");
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }
    let bytes = response.bytes().await?;
    let root: SalesNode = serde_json::from_slice(&bytes)?;
    debug!(categories = root.children().len(), "sales data parsed");
    Ok(root)
}

pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl SalesSource for HttpSource {
    async fn load(&self) -> Result<SalesNode, FetchError> {
        fetch_sales(&self.client, &self.url).await
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the same JSON shape from disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SalesSource for FileSource {
    async fn load(&self) -> Result<SalesNode, FetchError> {
        info!(path = %self.path.display(), "reading sales data");
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use super::*;

    /// Answers the first request on a local port with `response`, then hangs up.
    fn serve_once(response: &'static str) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/data.json")
    }

    #[tokio::test]
    async fn file_source_parses_hierarchy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.json");
        std::fs::write(
            &path,
            concat!(
                r#"{"name":"root","children":[{"name":"A","children":["#,
                r#"{"name":"x","category":"A","value":"10"}]}]}"#,
            ),
        )
        .unwrap();
        let root = FileSource::new(&path).load().await.unwrap();
        assert_eq!(root.children()[0].children()[0].value, Some(10.0));
    }

    #[tokio::test]
    async fn file_source_rejects_non_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.json");
        std::fs::write(&path, "<html>not found</html>").unwrap();
        let err = FileSource::new(&path).load().await.unwrap_err();
        assert!(matches!(err, FetchError::Json(_)));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = FileSource::new("/definitely/not/here.json")
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_http_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let err = HttpSource::new("http://127.0.0.1:9/sales.json")
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }

    #[tokio::test]
    async fn not_found_is_status_error() {
        let url = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\nConnection: close\r\n\r\nnot found",
        );
        let err = fetch_sales(&reqwest::Client::new(), &url)
            .await
            .unwrap_err();
        match err {
            FetchError::Status { status, url: failed } => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
                assert_eq!(failed, url);
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn html_body_is_json_error() {
        let url = serve_once(concat!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n",
            "Content-Length: 22\r\nConnection: close\r\n\r\n",
            "<html>not found</html>",
        ));
        let err = HttpSource::new(url).load().await.unwrap_err();
        assert!(matches!(err, FetchError::Json(_)), "{err:?}");
    }
}
