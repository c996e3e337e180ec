// SPDX-License-Identifier: GPL-3.0-only
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::{Config, ImageMode};
use crate::downloader::HttpClient;
use crate::images::{AssetStore, ImageResolver, ImageSource, SteamCdnSource, SteamGridDbSource};
use crate::library::{GameRecord, LibraryStore, LibrarySyncService, SyncResult};
use crate::providers::{IgdbClient, ProviderError, SteamApiClient, SteamGridDbClient};
use crate::utils::parse_app_id;

#[derive(Debug, Deserialize)]
pub struct SyncQuery {
    pub steamid: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AppQuery {
    pub appid: Option<String>,
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Error half of every handler result: a status plus a JSON message
pub type ApiFailure = (StatusCode, Json<ApiResponse<()>>);

fn failure(status: StatusCode, message: impl Into<String>) -> ApiFailure {
    (status, Json(ApiResponse::<()>::error(message.into())))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUrlResponse {
    pub image_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedImageResponse {
    pub app_id: u64,
    pub image_url: String,
    pub tier: String,
}

pub struct ApiHandlers {
    sync: Arc<LibrarySyncService>,
    steam: SteamApiClient,
    griddb: SteamGridDbClient,
    igdb: IgdbClient,
    default_steam_id: Option<String>,
}

impl ApiHandlers {
    pub fn new(
        sync: Arc<LibrarySyncService>,
        steam: SteamApiClient,
        griddb: SteamGridDbClient,
        igdb: IgdbClient,
        default_steam_id: Option<String>,
    ) -> Self {
        Self {
            sync,
            steam,
            griddb,
            igdb,
            default_steam_id,
        }
    }

    /// Wire every provider, the resolver chain and the sync service from configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = HttpClient::new(config.request_timeout())?;

        let steam = SteamApiClient::new(
            http.clone(),
            config.steam_api_url.clone(),
            config.steam_store_url.clone(),
            config.steam_api_key.clone(),
        );
        let griddb = SteamGridDbClient::new(
            http.clone(),
            config.steamgriddb_api_url.clone(),
            config.steamgriddb_api_key.clone(),
        );
        let igdb = IgdbClient::new(
            http.clone(),
            config.igdb_api_url.clone(),
            config.igdb_client_id.clone(),
            config.igdb_access_token.clone(),
        );

        // Steam's own capsule first, community grids second
        let sources: Vec<Arc<dyn ImageSource>> = vec![
            Arc::new(SteamCdnSource::new(config.steam_cdn_url.clone())),
            Arc::new(SteamGridDbSource::new(griddb.clone())),
        ];
        let resolver = ImageResolver::new(
            http,
            sources,
            AssetStore::new(config.assets_dir.clone(), &config.assets_url_prefix),
            config.placeholder_url.clone(),
        );

        let sync = LibrarySyncService::new(
            Arc::new(steam.clone()),
            Arc::new(resolver),
            LibraryStore::new(config.output_path.clone()),
            config.image_mode,
        );

        Ok(Self::new(
            Arc::new(sync),
            steam,
            griddb,
            igdb,
            config.default_steam_id.clone(),
        ))
    }
}

impl ApiHandlers {
    pub async fn health() -> Json<ApiResponse<&'static str>> {
        Json(ApiResponse::success("ok"))
    }

    pub async fn sync_library(&self, query: SyncQuery) -> (StatusCode, Json<SyncResult>) {
        let steam_id = query
            .steamid
            .filter(|id| !id.trim().is_empty())
            .or_else(|| self.default_steam_id.clone());

        let Some(steam_id) = steam_id else {
            return (StatusCode::BAD_REQUEST, Json(SyncResult::failure("Steam ID is required")));
        };

        info!(steam_id = %steam_id, "Sync library request received");

        let result = self.sync.sync_library(&steam_id).await;
        let status = if result.success {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(result))
    }

    pub async fn get_library(&self) -> Result<Json<ApiResponse<Vec<GameRecord>>>, ApiFailure> {
        match self.sync.load_library().await {
            Ok(Some(games)) => Ok(Json(ApiResponse::success(games))),
            Ok(None) => Err(failure(StatusCode::NOT_FOUND, "Library has not been synced yet")),
            Err(e) => {
                error!(error = %e, "Failed to read library document");
                Err(failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read user library"))
            }
        }
    }

    pub async fn resolve_image(
        &self,
        query: AppQuery,
    ) -> Result<Json<ApiResponse<ResolvedImageResponse>>, ApiFailure> {
        let app_id = required_app_id(query.appid.as_deref())?;
        let mode = match query.mode.as_deref() {
            Some(raw) => raw
                .parse::<ImageMode>()
                .map_err(|e| failure(StatusCode::BAD_REQUEST, e.to_string()))?,
            None => self.sync.mode(),
        };

        let image = self.sync.resolve_image(app_id, mode).await;
        let tier = image.tier().to_string();

        Ok(Json(ApiResponse::success(ResolvedImageResponse {
            app_id,
            image_url: image.into_url(),
            tier,
        })))
    }

    pub async fn steamgriddb_image(&self, query: AppQuery) -> Result<Json<ImageUrlResponse>, ApiFailure> {
        let app_id = required_app_id(query.appid.as_deref())?;

        match self.griddb.first_grid(app_id).await {
            Ok(grid) => Ok(Json(ImageUrlResponse { image_url: grid.url })),
            Err(e) => {
                warn!(app_id, error = %e, "SteamGridDB image lookup failed");
                Err(provider_failure(&e))
            }
        }
    }

    pub async fn game_details(&self, query: AppQuery) -> Result<Json<Value>, ApiFailure> {
        let app_id = required_app_id(query.appid.as_deref())?;

        self.steam.app_details(app_id).await.map(Json).map_err(|e| {
            error!(app_id, error = %e, "Error fetching from Steam API");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching game data")
        })
    }

    pub async fn search(&self, query: SearchQuery) -> Result<Json<Value>, ApiFailure> {
        let Some(q) = query.q.filter(|q| !q.trim().is_empty()) else {
            return Err(failure(StatusCode::BAD_REQUEST, "Search query is required"));
        };

        self.igdb.search(q.trim()).await.map(Json).map_err(|e| {
            error!(error = %e, "IGDB search failed");
            provider_failure(&e)
        })
    }
}

fn required_app_id(raw: Option<&str>) -> Result<u64, ApiFailure> {
    parse_app_id(raw.unwrap_or_default()).map_err(|e| failure(StatusCode::BAD_REQUEST, e.to_string()))
}

fn provider_failure(e: &ProviderError) -> ApiFailure {
    let status = e.upstream_status().unwrap_or(match e {
        ProviderError::NoResults(_) => StatusCode::NOT_FOUND,
        ProviderError::MissingCredential(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    });
    failure(status, e.to_string())
}
