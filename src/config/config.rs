// SPDX-License-Identifier: GPL-3.0-only
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::{validate_base_url, validate_url};

/// How a resolved cover image is referenced from a library record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMode {
    /// Download the image into the assets directory and reference the local copy
    #[default]
    Local,
    /// Reference the provider URL directly, nothing is downloaded
    Remote,
}

impl FromStr for ImageMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(ImageMode::Local),
            "remote" => Ok(ImageMode::Remote),
            other => Err(anyhow::anyhow!("Unknown image mode: {} (expected local or remote)", other)),
        }
    }
}

impl fmt::Display for ImageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageMode::Local => f.write_str("local"),
            ImageMode::Remote => f.write_str("remote"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("Unknown log format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Steam Web API key used for the owned games lookup
    pub steam_api_key: Option<String>,

    /// SteamGridDB bearer token
    pub steamgriddb_api_key: Option<String>,

    /// IGDB (Twitch) client id
    pub igdb_client_id: Option<String>,

    /// IGDB (Twitch) app access token
    pub igdb_access_token: Option<String>,

    /// SteamID64 synced when a request does not name one
    pub default_steam_id: Option<String>,

    /// Where the enriched library document is written
    pub output_path: PathBuf,

    /// Directory holding downloaded cover images
    pub assets_dir: PathBuf,

    /// URL prefix under which `assets_dir` is served
    pub assets_url_prefix: String,

    /// Default image resolution mode
    pub image_mode: ImageMode,

    /// Image used when no provider has a cover
    pub placeholder_url: String,

    pub steam_api_url: String,
    pub steam_store_url: String,
    pub steam_cdn_url: String,
    pub steamgriddb_api_url: String,
    pub igdb_api_url: String,

    /// Timeout applied to every outbound request, in seconds
    pub request_timeout_secs: u64,

    /// Local API bind address (e.g., "127.0.0.1:3000")
    pub local_api_bind: SocketAddr,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from TOML file with environment variable overrides
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("SHELF_CONFIG")
            .unwrap_or_else(|_| "config.toml".to_string());

        let mut config: Config = if std::path::Path::new(&config_path).exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            toml::from_str(&contents)?
        } else {
            Config::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        let env = |key: &str| std::env::var(format!("SHELF_{}", key)).ok();

        if let Some(val) = env("STEAM_API_KEY") {
            self.steam_api_key = Some(val);
        }
        if let Some(val) = env("STEAMGRIDDB_API_KEY") {
            self.steamgriddb_api_key = Some(val);
        }
        if let Some(val) = env("IGDB_CLIENT_ID") {
            self.igdb_client_id = Some(val);
        }
        if let Some(val) = env("IGDB_ACCESS_TOKEN") {
            self.igdb_access_token = Some(val);
        }
        if let Some(val) = env("DEFAULT_STEAM_ID") {
            self.default_steam_id = Some(val);
        }
        if let Some(val) = env("OUTPUT_PATH") {
            self.output_path = PathBuf::from(val);
        }
        if let Some(val) = env("ASSETS_DIR") {
            self.assets_dir = PathBuf::from(val);
        }
        if let Some(val) = env("ASSETS_URL_PREFIX") {
            self.assets_url_prefix = val;
        }
        if let Some(val) = env("IMAGE_MODE") {
            self.image_mode = val.parse()?;
        }
        if let Some(val) = env("PLACEHOLDER_URL") {
            self.placeholder_url = val;
        }
        if let Some(val) = env("STEAM_API_URL") {
            self.steam_api_url = val;
        }
        if let Some(val) = env("STEAM_STORE_URL") {
            self.steam_store_url = val;
        }
        if let Some(val) = env("STEAM_CDN_URL") {
            self.steam_cdn_url = val;
        }
        if let Some(val) = env("STEAMGRIDDB_API_URL") {
            self.steamgriddb_api_url = val;
        }
        if let Some(val) = env("IGDB_API_URL") {
            self.igdb_api_url = val;
        }
        if let Some(val) = env("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = val.parse()?;
        }
        if let Some(val) = env("LOCAL_API_BIND") {
            self.local_api_bind = SocketAddr::from_str(&val)?;
        }
        if let Some(val) = env("LOG_LEVEL") {
            self.log_level = val;
        }
        if let Some(val) = env("LOG_FORMAT") {
            self.log_format = val.parse()?;
        }

        Ok(())
    }

    /// Reject settings that would only fail later, at request time
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, url) in [
            ("steam_api_url", &self.steam_api_url),
            ("steam_store_url", &self.steam_store_url),
            ("steam_cdn_url", &self.steam_cdn_url),
            ("steamgriddb_api_url", &self.steamgriddb_api_url),
            ("igdb_api_url", &self.igdb_api_url),
        ] {
            validate_base_url(url).with_context(|| format!("Invalid {}", name))?;
        }

        validate_url(&self.placeholder_url).context("Invalid placeholder_url")?;

        let prefix = self.assets_url_prefix.trim_end_matches('/');
        if !prefix.starts_with('/') || prefix.len() < 2 || prefix.contains(['*', '{', '}', ':']) {
            return Err(anyhow::anyhow!(
                "assets_url_prefix must be an absolute path such as /api/assets, got {:?}",
                self.assets_url_prefix
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("request_timeout_secs must be greater than zero"));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steam_api_key: None,
            steamgriddb_api_key: None,
            igdb_client_id: None,
            igdb_access_token: None,
            default_steam_id: None,
            output_path: PathBuf::from("api/userLibrary.json"),
            assets_dir: PathBuf::from("api/assets"),
            assets_url_prefix: String::from("/api/assets"),
            image_mode: ImageMode::Local,
            placeholder_url: String::from("https://placehold.co/600x900"),
            steam_api_url: String::from("https://api.steampowered.com"),
            steam_store_url: String::from("https://store.steampowered.com"),
            steam_cdn_url: String::from("https://cdn.cloudflare.steamstatic.com"),
            steamgriddb_api_url: String::from("https://www.steamgriddb.com/api/v2"),
            igdb_api_url: String::from("https://api.igdb.com/v4"),
            request_timeout_secs: 15,
            local_api_bind: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
            log_level: String::from("info"),
            log_format: LogFormat::Pretty,
        }
    }
}
