// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use crate::downloader::HttpClient;
use crate::library::models::GameRecord;
use crate::providers::error::SteamError;
use crate::providers::traits::LibraryFetcher;

#[derive(Debug, Deserialize)]
struct OwnedGamesEnvelope {
    #[serde(default)]
    response: Option<OwnedGames>,
}

#[derive(Debug, Deserialize)]
struct OwnedGames {
    #[serde(default)]
    games: Option<Vec<GameRecord>>,
}

/// Client for the Steam Web API and store API
#[derive(Debug, Clone)]
pub struct SteamApiClient {
    http: HttpClient,
    api_url: String,
    store_url: String,
    api_key: Option<String>,
}

impl SteamApiClient {
    pub fn new(http: HttpClient, api_url: String, store_url: String, api_key: Option<String>) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            store_url: store_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Store details for one app, passed through untouched
    pub async fn app_details(&self, app_id: u64) -> Result<Value, SteamError> {
        let url = format!("{}/api/appdetails", self.store_url);
        info!(app_id, "Fetching app details from Steam store");

        let response = self
            .http
            .client()
            .get(&url)
            .query(&[("appids", app_id.to_string()), ("l", "en".to_string())])
            .send()
            .await
            .map_err(|e| SteamError::Request(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            error!(app_id, status = %status, "Steam store request failed");
            return Err(SteamError::Status(status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SteamError::Request(e.without_url()))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl LibraryFetcher for SteamApiClient {
    async fn fetch_owned_games(&self, steam_id: &str) -> Result<Vec<GameRecord>, SteamError> {
        let api_key = self.api_key.as_deref().ok_or(SteamError::MissingApiKey)?;
        let url = format!("{}/IPlayerService/GetOwnedGames/v1/", self.api_url);

        info!(steam_id = %steam_id, "Fetching owned games from Steam API");

        let response = self
            .http
            .client()
            .get(&url)
            .query(&[
                ("key", api_key),
                ("steamid", steam_id),
                ("include_appinfo", "true"),
                ("include_played_free_games", "true"),
            ])
            .send()
            .await
            // The request URL carries the API key
            .map_err(|e| SteamError::Request(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            error!(steam_id = %steam_id, status = %status, "Owned games request failed");
            return Err(SteamError::Status(status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SteamError::Request(e.without_url()))?;
        let envelope: OwnedGamesEnvelope = serde_json::from_slice(&body)?;

        let games = envelope
            .response
            .and_then(|r| r.games)
            .filter(|games| !games.is_empty())
            .ok_or(SteamError::NoGames)?;

        info!(steam_id = %steam_id, count = games.len(), "Fetched owned games");
        Ok(games)
    }
}
