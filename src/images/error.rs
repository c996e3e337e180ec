// SPDX-License-Identifier: GPL-3.0-only
use crate::downloader::DownloadError;
use crate::providers::ProviderError;

/// Why one resolution tier could not supply an image
#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("Rejected image URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Assets directory unavailable: {0}")]
    Io(#[from] std::io::Error),
}

impl ImageError {
    /// Short label used in logs: provider trouble or local storage trouble
    pub fn kind(&self) -> &'static str {
        match self {
            ImageError::Download(DownloadError::Io(_)) | ImageError::Io(_) => "persistence_failure",
            _ => "provider_unavailable",
        }
    }
}
