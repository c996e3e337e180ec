// SPDX-License-Identifier: GPL-3.0-only
use std::path::PathBuf;
use tracing::debug;

use crate::downloader::HttpClient;
use crate::images::error::ImageError;

/// Directory of downloaded covers, one `<app_id>.jpg` per game
#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
    url_prefix: String,
}

impl AssetStore {
    pub fn new(dir: PathBuf, url_prefix: &str) -> Self {
        Self {
            dir,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn image_path(&self, app_id: u64) -> PathBuf {
        self.dir.join(format!("{}.jpg", app_id))
    }

    /// Reference written to `imageUrl` for a stored cover
    pub fn reference(&self, app_id: u64) -> String {
        format!("{}/{}.jpg", self.url_prefix, app_id)
    }

    /// Create the assets directory; succeeds if it already exists
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Download `url` as the cover for `app_id` and return its local reference
    pub async fn save(&self, http: &HttpClient, url: &str, app_id: u64) -> Result<String, ImageError> {
        self.ensure_dir().await?;

        let path = self.image_path(app_id);
        let bytes = http.download_to(url, &path).await?;

        debug!(app_id, path = %path.display(), bytes, "Stored cover image");
        Ok(self.reference(app_id))
    }
}
