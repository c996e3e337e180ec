// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;

use crate::library::models::GameRecord;
use crate::providers::error::SteamError;

#[async_trait]
pub trait LibraryFetcher: Send + Sync {
    /// Fetch the owned games of a user, in the order the platform returns them.
    /// An empty library is reported as `SteamError::NoGames`.
    async fn fetch_owned_games(&self, steam_id: &str) -> Result<Vec<GameRecord>, SteamError>;
}
