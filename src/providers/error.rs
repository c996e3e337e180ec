// SPDX-License-Identifier: GPL-3.0-only
use reqwest::StatusCode;

/// Failures talking to the Steam Web API or store
#[derive(thiserror::Error, Debug)]
pub enum SteamError {
    #[error("Steam API key is not configured")]
    MissingApiKey,

    #[error("Request to Steam failed: {0}")]
    Request(reqwest::Error),

    #[error("Steam responded with {0}")]
    Status(StatusCode),

    #[error("Invalid response from Steam: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("No games found or invalid response")]
    NoGames,
}

/// Failures talking to a third-party metadata provider (SteamGridDB, IGDB)
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("{0} credentials are not configured")]
    MissingCredential(&'static str),

    #[error("Request to {provider} failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} responded with {status}")]
    Status {
        provider: &'static str,
        status: StatusCode,
    },

    #[error("Invalid response from {provider}: {source}")]
    Malformed {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("No matching game found on {0}")]
    NoResults(&'static str),
}

impl ProviderError {
    /// Upstream status worth forwarding to an HTTP caller, if any
    pub fn upstream_status(&self) -> Option<StatusCode> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
