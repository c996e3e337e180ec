// SPDX-License-Identifier: GPL-3.0-only
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::ImageMode;
use crate::downloader::HttpClient;
use crate::images::error::ImageError;
use crate::images::store::AssetStore;
use crate::images::traits::ImageSource;
use crate::utils::validate_url;

/// Where a record's cover ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tier", rename_all = "lowercase")]
pub enum ResolvedImage {
    /// Downloaded into the assets directory
    Local { source: &'static str, url: String },
    /// Referenced at the provider
    Remote { source: &'static str, url: String },
    /// No source could supply a cover
    Placeholder { url: String },
}

impl ResolvedImage {
    pub fn tier(&self) -> &'static str {
        match self {
            ResolvedImage::Local { .. } => "local",
            ResolvedImage::Remote { .. } => "remote",
            ResolvedImage::Placeholder { .. } => "placeholder",
        }
    }

    pub fn url(&self) -> &str {
        match self {
            ResolvedImage::Local { url, .. }
            | ResolvedImage::Remote { url, .. }
            | ResolvedImage::Placeholder { url } => url,
        }
    }

    pub fn into_url(self) -> String {
        match self {
            ResolvedImage::Local { url, .. }
            | ResolvedImage::Remote { url, .. }
            | ResolvedImage::Placeholder { url } => url,
        }
    }
}

/// Tries each image source in order and settles on the first that delivers.
///
/// Resolution never fails: when every source is exhausted the configured
/// placeholder is returned.
pub struct ImageResolver {
    http: HttpClient,
    sources: Vec<Arc<dyn ImageSource>>,
    store: AssetStore,
    placeholder_url: String,
}

impl ImageResolver {
    pub fn new(
        http: HttpClient,
        sources: Vec<Arc<dyn ImageSource>>,
        store: AssetStore,
        placeholder_url: String,
    ) -> Self {
        Self {
            http,
            sources,
            store,
            placeholder_url,
        }
    }

    pub async fn resolve(&self, app_id: u64, mode: ImageMode) -> ResolvedImage {
        if app_id == 0 {
            warn!(app_id, "Record has no usable app id, using placeholder");
            return self.placeholder();
        }

        for source in &self.sources {
            match self.try_source(source.as_ref(), app_id, mode).await {
                Ok(image) => {
                    debug!(app_id, source = source.name(), tier = image.tier(), url = %image.url(), "Cover resolved");
                    return image;
                }
                Err(e) => {
                    warn!(
                        app_id,
                        source = source.name(),
                        kind = e.kind(),
                        error = %e,
                        "Image source failed, trying next"
                    );
                }
            }
        }

        warn!(app_id, "No image source succeeded, using placeholder");
        self.placeholder()
    }

    async fn try_source(
        &self,
        source: &dyn ImageSource,
        app_id: u64,
        mode: ImageMode,
    ) -> Result<ResolvedImage, ImageError> {
        let candidate = source.locate(app_id).await?;

        validate_url(&candidate.url).map_err(|e| ImageError::InvalidUrl {
            url: candidate.url.clone(),
            reason: e.to_string(),
        })?;

        match mode {
            ImageMode::Local => {
                let url = self.store.save(&self.http, &candidate.url, app_id).await?;
                Ok(ResolvedImage::Local { source: source.name(), url })
            }
            ImageMode::Remote => {
                if !candidate.verified {
                    self.http.probe(&candidate.url).await?;
                }
                Ok(ResolvedImage::Remote { source: source.name(), url: candidate.url })
            }
        }
    }

    fn placeholder(&self) -> ResolvedImage {
        ResolvedImage::Placeholder { url: self.placeholder_url.clone() }
    }
}
