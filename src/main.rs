// SPDX-License-Identifier: GPL-3.0-only
mod api;
mod config;
mod downloader;
mod images;
mod library;
mod logging;
mod providers;
mod utils;

#[cfg(test)]
mod test_helpers;

use tokio::signal;
use tracing::{error, info, warn};

use api::{ApiHandlers, HttpServer};
use config::Config;
use logging::setup_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;
    config.validate()?;

    // Initialize logging
    setup_logging(&config.log_level, config.log_format)?;

    info!("Starting ShelfProxyDaemon v{}", env!("CARGO_PKG_VERSION"));

    if config.steam_api_key.is_none() {
        warn!("No Steam API key configured, library sync will fail");
    }
    if config.steamgriddb_api_key.is_none() {
        warn!("No SteamGridDB API key configured, covers fall back to the placeholder when Steam has none");
    }

    info!(
        output = %config.output_path.display(),
        assets = %config.assets_dir.display(),
        mode = %config.image_mode,
        "Library storage configured"
    );

    // Start HTTP server
    let handlers = ApiHandlers::from_config(&config)?;
    let http_server = HttpServer::new(handlers, &config);
    let http_task = tokio::spawn(async move {
        if let Err(e) = http_server.serve().await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("All services started. Waiting for shutdown signal...");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received shutdown signal (Ctrl+C)");
        }
        Err(err) => {
            error!(error = %err, "Unable to listen for shutdown signal");
        }
    }

    info!("Initiating graceful shutdown...");
    http_task.abort();

    info!("Shutdown complete");
    Ok(())
}
