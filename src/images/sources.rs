// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;

use crate::images::error::ImageError;
use crate::images::traits::{ImageCandidate, ImageSource};
use crate::providers::SteamGridDbClient;

/// Steam's own library capsule, at a URL derived from the app id
#[derive(Debug, Clone)]
pub struct SteamCdnSource {
    base_url: String,
}

impl SteamCdnSource {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn capsule_url(&self, app_id: u64) -> String {
        format!("{}/steam/apps/{}/library_600x900.jpg", self.base_url, app_id)
    }
}

#[async_trait]
impl ImageSource for SteamCdnSource {
    fn name(&self) -> &'static str {
        "steam_cdn"
    }

    async fn locate(&self, app_id: u64) -> Result<ImageCandidate, ImageError> {
        Ok(ImageCandidate {
            url: self.capsule_url(app_id),
            verified: false,
        })
    }
}

/// First community grid listed by SteamGridDB
#[derive(Debug, Clone)]
pub struct SteamGridDbSource {
    client: SteamGridDbClient,
}

impl SteamGridDbSource {
    pub fn new(client: SteamGridDbClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageSource for SteamGridDbSource {
    fn name(&self) -> &'static str {
        "steamgriddb"
    }

    async fn locate(&self, app_id: u64) -> Result<ImageCandidate, ImageError> {
        let grid = self.client.first_grid(app_id).await?;
        Ok(ImageCandidate {
            url: grid.url,
            verified: true,
        })
    }
}
