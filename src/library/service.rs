// SPDX-License-Identifier: GPL-3.0-only
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::ImageMode;
use crate::images::{ImageResolver, ResolvedImage};
use crate::library::models::{GameRecord, SyncResult};
use crate::library::store::{LibraryStore, StoreError};
use crate::providers::{LibraryFetcher, SteamError};

#[derive(thiserror::Error, Debug)]
pub enum SyncError {
    #[error("Steam ID is required")]
    MissingSteamId,

    #[error(transparent)]
    Upstream(#[from] SteamError),

    #[error("Failed to save user library: {0}")]
    Persistence(#[from] StoreError),
}

/// How many records landed on each resolution tier during one batch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TierCounts {
    pub local: usize,
    pub remote: usize,
    pub placeholder: usize,
}

impl TierCounts {
    fn record(&mut self, image: &ResolvedImage) {
        match image {
            ResolvedImage::Local { .. } => self.local += 1,
            ResolvedImage::Remote { .. } => self.remote += 1,
            ResolvedImage::Placeholder { .. } => self.placeholder += 1,
        }
    }
}

/// Fetches a user's library, resolves a cover for every game and saves the result
pub struct LibrarySyncService {
    fetcher: Arc<dyn LibraryFetcher>,
    resolver: Arc<ImageResolver>,
    store: LibraryStore,
    mode: ImageMode,
}

impl LibrarySyncService {
    pub fn new(
        fetcher: Arc<dyn LibraryFetcher>,
        resolver: Arc<ImageResolver>,
        store: LibraryStore,
        mode: ImageMode,
    ) -> Self {
        Self {
            fetcher,
            resolver,
            store,
            mode,
        }
    }

    pub fn mode(&self) -> ImageMode {
        self.mode
    }

    /// Run one full sync. Failures are reported in the result, never raised.
    pub async fn sync_library(&self, steam_id: &str) -> SyncResult {
        match self.run_sync(steam_id.trim()).await {
            Ok(count) => {
                info!(steam_id = %steam_id, count, "User library synced");
                SyncResult::ok("User library synced successfully")
            }
            Err(e) => {
                error!(steam_id = %steam_id, error = %e, "Library sync failed");
                SyncResult::failure(e.to_string())
            }
        }
    }

    async fn run_sync(&self, steam_id: &str) -> Result<usize, SyncError> {
        if steam_id.is_empty() {
            return Err(SyncError::MissingSteamId);
        }

        info!(steam_id = %steam_id, mode = %self.mode, "Syncing library");

        let mut games = self.fetcher.fetch_owned_games(steam_id).await?;
        let counts = self.resolve_covers(&mut games).await;

        self.store.write(&games).await?;

        info!(
            steam_id = %steam_id,
            local = counts.local,
            remote = counts.remote,
            placeholder = counts.placeholder,
            "Cover resolution summary"
        );
        Ok(games.len())
    }

    /// Resolve covers one record at a time, in library order
    async fn resolve_covers(&self, games: &mut [GameRecord]) -> TierCounts {
        let mut counts = TierCounts::default();

        for game in games.iter_mut() {
            let image = self.resolver.resolve(game.appid, self.mode).await;
            debug!(
                app_id = game.appid,
                name = game.name().unwrap_or_default(),
                tier = image.tier(),
                "Record resolved"
            );
            counts.record(&image);
            game.image_url = Some(image.into_url());
        }

        counts
    }

    /// Resolve the cover of a single app without touching the library document
    pub async fn resolve_image(&self, app_id: u64, mode: ImageMode) -> ResolvedImage {
        self.resolver.resolve(app_id, mode).await
    }

    pub async fn load_library(&self) -> Result<Option<Vec<GameRecord>>, StoreError> {
        self.store.load().await
    }
}
