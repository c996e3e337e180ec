// SPDX-License-Identifier: GPL-3.0-only
use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::{
    ApiFailure, ApiHandlers, ApiResponse, AppQuery, ImageUrlResponse, ResolvedImageResponse,
    SearchQuery, SyncQuery,
};
use crate::config::Config;
use crate::library::{GameRecord, SyncResult};

pub struct HttpServer {
    handlers: Arc<ApiHandlers>,
    addr: SocketAddr,
    assets_dir: PathBuf,
    assets_url_prefix: String,
}

impl HttpServer {
    pub fn new(handlers: ApiHandlers, config: &Config) -> Self {
        Self {
            handlers: Arc::new(handlers),
            addr: config.local_api_bind,
            assets_dir: config.assets_dir.clone(),
            assets_url_prefix: config.assets_url_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers(Any);

        Router::new()
            .route("/api/health", get(health_handler))
            .route("/api/syncLibrary", get(sync_library_handler))
            .route("/api/library", get(library_handler))
            .route("/api/resolveImage", get(resolve_image_handler))
            .route("/api/getSteamGridDbImage", get(steamgriddb_image_handler))
            .route("/api/getGameDetails", get(game_details_handler))
            .route("/api/search", get(search_handler))
            .nest_service(&self.assets_url_prefix, ServeDir::new(&self.assets_dir))
            .with_state(self.handlers.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let app = self.router();

        info!(addr = %self.addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn health_handler() -> Json<ApiResponse<&'static str>> {
    ApiHandlers::health().await
}

async fn sync_library_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    Query(query): Query<SyncQuery>,
) -> (StatusCode, Json<SyncResult>) {
    handlers.sync_library(query).await
}

async fn library_handler(
    State(handlers): State<Arc<ApiHandlers>>,
) -> Result<Json<ApiResponse<Vec<GameRecord>>>, ApiFailure> {
    handlers.get_library().await
}

async fn resolve_image_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    Query(query): Query<AppQuery>,
) -> Result<Json<ApiResponse<ResolvedImageResponse>>, ApiFailure> {
    handlers.resolve_image(query).await
}

async fn steamgriddb_image_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    Query(query): Query<AppQuery>,
) -> Result<Json<ImageUrlResponse>, ApiFailure> {
    handlers.steamgriddb_image(query).await
}

async fn game_details_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    Query(query): Query<AppQuery>,
) -> Result<Json<Value>, ApiFailure> {
    handlers.game_details(query).await
}

async fn search_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, ApiFailure> {
    handlers.search(query).await
}
