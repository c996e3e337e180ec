// SPDX-License-Identifier: GPL-3.0-only
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use crate::config::{Config, ImageMode, LogFormat};

/// Create a test configuration pointing every remote API at `mock_url`
/// and every local path under `root`
pub fn create_test_config(mock_url: &str, root: &Path) -> Config {
    Config {
        steam_api_key: Some("test-steam-key".to_string()),
        steamgriddb_api_key: Some("test-grid-key".to_string()),
        igdb_client_id: Some("test-client-id".to_string()),
        igdb_access_token: Some("test-token".to_string()),
        default_steam_id: None,
        output_path: root.join("api").join("userLibrary.json"),
        assets_dir: root.join("api").join("assets"),
        assets_url_prefix: "/api/assets".to_string(),
        image_mode: ImageMode::Local,
        placeholder_url: "https://placehold.co/600x900".to_string(),
        steam_api_url: mock_url.to_string(),
        steam_store_url: mock_url.to_string(),
        steam_cdn_url: mock_url.to_string(),
        steamgriddb_api_url: mock_url.to_string(),
        igdb_api_url: mock_url.to_string(),
        request_timeout_secs: 5,
        local_api_bind: SocketAddr::from((Ipv4Addr::LOCALHOST, 0)), // Use port 0 to auto-assign
        log_level: "error".to_string(), // Reduce log noise in tests
        log_format: LogFormat::Pretty,
    }
}

/// Create a temporary directory for tests
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().expect("Failed to create temp directory")
}
