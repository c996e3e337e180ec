// SPDX-License-Identifier: GPL-3.0-only
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

const USER_AGENT: &str = concat!("ShelfProxyDaemon/", env!("CARGO_PKG_VERSION"));

#[derive(thiserror::Error, Debug)]
pub enum DownloadError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{url} responded with {status}")]
    Status { url: String, status: StatusCode },

    #[error("{0} returned an empty body")]
    EmptyBody(String),

    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),
}

/// Outbound HTTP shared by every provider, with one timeout for all requests
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    /// Check that `url` answers with a success status without reading the body
    pub async fn probe(&self, url: &str) -> Result<(), DownloadError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status { url: url.to_string(), status });
        }

        debug!(url = %url, status = %status, "Probe succeeded");
        Ok(())
    }

    /// Stream `url` into `output_path`, replacing any existing file.
    ///
    /// The body is written to a uniquely named `.part` sibling first and renamed
    /// into place, so a failed transfer never leaves a truncated file at
    /// `output_path` and concurrent downloads of the same file never share one.
    pub async fn download_to(&self, url: &str, output_path: &Path) -> Result<u64, DownloadError> {
        let partial = partial_path(output_path);

        let result = match self.stream_to(url, &partial).await {
            Ok(written) => tokio::fs::rename(&partial, output_path)
                .await
                .map(|_| written)
                .map_err(DownloadError::from),
            Err(e) => Err(e),
        };

        if result.is_err() {
            if let Err(e) = tokio::fs::remove_file(&partial).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %partial.display(), error = %e, "Failed to remove partial download");
                }
            }
        }

        result
    }

    async fn stream_to(&self, url: &str, path: &Path) -> Result<u64, DownloadError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status { url: url.to_string(), status });
        }

        let mut file = tokio::fs::File::create(path).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        if written == 0 {
            return Err(DownloadError::EmptyBody(url.to_string()));
        }

        debug!(url = %url, path = %path.display(), bytes = written, "Download completed");
        Ok(written)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{}.part", Uuid::new_v4()));
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::ServerGuard;
    use tempfile::TempDir;

    async fn setup_mock_server() -> (ServerGuard, String) {
        let server = mockito::Server::new_async().await;
        let base_url = server.url();
        (server, base_url)
    }

    fn client() -> HttpClient {
        HttpClient::new(Duration::from_secs(5)).unwrap()
    }

    fn dir_entries(dir: &TempDir) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_download_to_success() {
        let (mut server, base_url) = setup_mock_server().await;
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("620.jpg");

        let mock = server.mock("GET", "/cover.jpg")
            .with_status(200)
            .with_header("content-type", "image/jpeg")
            .with_body("jpeg bytes")
            .create_async()
            .await;

        let written = client()
            .download_to(&format!("{}/cover.jpg", base_url), &output)
            .await
            .unwrap();

        assert_eq!(written, 10);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "jpeg bytes");
        assert_eq!(dir_entries(&temp_dir), vec!["620.jpg".to_string()]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_download_to_overwrites_existing_file() {
        let (mut server, base_url) = setup_mock_server().await;
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("620.jpg");
        std::fs::write(&output, "old cover").unwrap();

        let _mock = server.mock("GET", "/cover.jpg")
            .with_status(200)
            .with_body("new")
            .create_async()
            .await;

        client().download_to(&format!("{}/cover.jpg", base_url), &output).await.unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_download_to_error_status_leaves_no_file() {
        let (mut server, base_url) = setup_mock_server().await;
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("620.jpg");

        let mock = server.mock("GET", "/missing.jpg")
            .with_status(404)
            .create_async()
            .await;

        let result = client().download_to(&format!("{}/missing.jpg", base_url), &output).await;

        assert!(matches!(result, Err(DownloadError::Status { status, .. }) if status == StatusCode::NOT_FOUND));
        assert!(dir_entries(&temp_dir).is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_download_to_empty_body_is_failure() {
        let (mut server, base_url) = setup_mock_server().await;
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("620.jpg");

        let _mock = server.mock("GET", "/empty.jpg")
            .with_status(200)
            .create_async()
            .await;

        let result = client().download_to(&format!("{}/empty.jpg", base_url), &output).await;
        assert!(matches!(result, Err(DownloadError::EmptyBody(_))));
        assert!(dir_entries(&temp_dir).is_empty());
    }

    #[tokio::test]
    async fn test_download_to_missing_directory_is_io_error() {
        let (mut server, base_url) = setup_mock_server().await;
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("no-such-dir").join("620.jpg");

        let _mock = server.mock("GET", "/cover.jpg")
            .with_status(200)
            .with_body("bytes")
            .create_async()
            .await;

        let result = client().download_to(&format!("{}/cover.jpg", base_url), &output).await;
        assert!(matches!(result, Err(DownloadError::Io(_))));
    }

    #[tokio::test]
    async fn test_concurrent_downloads_to_same_file() {
        let (mut server, base_url) = setup_mock_server().await;
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("620.jpg");

        let body_a = vec![b'A'; 1024 * 1024];
        let body_b = vec![b'B'; 1024 * 1024];
        let _a = server.mock("GET", "/a.jpg")
            .with_status(200)
            .with_body(&body_a)
            .expect_at_least(1)
            .create_async()
            .await;
        let _b = server.mock("GET", "/b.jpg")
            .with_status(200)
            .with_body(&body_b)
            .expect_at_least(1)
            .create_async()
            .await;

        let http = client();
        let url_a = format!("{}/a.jpg", base_url);
        let url_b = format!("{}/b.jpg", base_url);

        for _ in 0..5 {
            let (a, b) = tokio::join!(
                http.download_to(&url_a, &output),
                http.download_to(&url_b, &output)
            );
            assert_eq!(a.unwrap(), body_a.len() as u64);
            assert_eq!(b.unwrap(), body_b.len() as u64);

            let stored = std::fs::read(&output).unwrap();
            assert!(stored == body_a || stored == body_b, "stored cover mixes both bodies");
            assert_eq!(dir_entries(&temp_dir), vec!["620.jpg".to_string()]);
        }
    }

    #[tokio::test]
    async fn test_probe() {
        let (mut server, base_url) = setup_mock_server().await;

        let _ok = server.mock("GET", "/ok.jpg").with_status(200).with_body("x").create_async().await;
        let _gone = server.mock("GET", "/gone.jpg").with_status(410).create_async().await;

        assert!(client().probe(&format!("{}/ok.jpg", base_url)).await.is_ok());
        assert!(client().probe(&format!("{}/gone.jpg", base_url)).await.is_err());
    }

    #[test]
    fn test_partial_path_is_unique_sibling() {
        let first = partial_path(Path::new("/a/b/620.jpg"));
        let second = partial_path(Path::new("/a/b/620.jpg"));

        assert_ne!(first, second);
        assert_eq!(first.parent(), Some(Path::new("/a/b")));
        let name = first.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("620.jpg."));
        assert!(name.ends_with(".part"));
    }
}
