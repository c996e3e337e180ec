// SPDX-License-Identifier: GPL-3.0-only
use serde_json::Value;
use tracing::{info, warn};

use crate::downloader::HttpClient;
use crate::providers::error::ProviderError;

const PROVIDER: &str = "IGDB";
const SEARCH_FIELDS: &str = "name,cover.url";
const SEARCH_LIMIT: u32 = 10;

/// Catalog search against the IGDB v4 API
#[derive(Debug, Clone)]
pub struct IgdbClient {
    http: HttpClient,
    base_url: String,
    client_id: Option<String>,
    access_token: Option<String>,
}

impl IgdbClient {
    pub fn new(
        http: HttpClient,
        base_url: String,
        client_id: Option<String>,
        access_token: Option<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id,
            access_token,
        }
    }

    /// Search games by name, returning IGDB's JSON untouched
    pub async fn search(&self, query: &str) -> Result<Value, ProviderError> {
        let (Some(client_id), Some(token)) = (self.client_id.as_deref(), self.access_token.as_deref()) else {
            return Err(ProviderError::MissingCredential(PROVIDER));
        };

        info!(query = %query, "Searching IGDB");

        let response = self
            .http
            .client()
            .post(format!("{}/games", self.base_url))
            .header("Client-ID", client_id)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .body(search_body(query))
            .send()
            .await
            .map_err(|source| ProviderError::Request { provider: PROVIDER, source })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "IGDB search failed");
            return Err(ProviderError::Status { provider: PROVIDER, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ProviderError::Request { provider: PROVIDER, source })?;
        serde_json::from_slice(&body).map_err(|source| ProviderError::Malformed { provider: PROVIDER, source })
    }
}

/// Apicalypse query; the search term is a quoted string literal
fn search_body(query: &str) -> String {
    let escaped = query.replace('\\', "\\\\").replace('"', "\\\"");
    format!("search \"{}\"; fields {}; limit {};", escaped, SEARCH_FIELDS, SEARCH_LIMIT)
}
