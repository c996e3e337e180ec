// SPDX-License-Identifier: GPL-3.0-only
use serde::Deserialize;
use tracing::{debug, warn};

use crate::downloader::HttpClient;
use crate::providers::error::ProviderError;

const PROVIDER: &str = "SteamGridDB";

/// Portrait library capsule size, the only grid size requested
pub const GRID_DIMENSIONS: &str = "600x900";

/// One grid image as listed by SteamGridDB
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GridImage {
    pub id: i64,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct GridResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Vec<GridImage>,
}

#[derive(Debug, Clone)]
pub struct SteamGridDbClient {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl SteamGridDbClient {
    pub fn new(http: HttpClient, base_url: String, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// First 600x900 grid for a Steam app id
    pub async fn first_grid(&self, app_id: u64) -> Result<GridImage, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential(PROVIDER))?;
        let url = format!("{}/grids/steam/{}", self.base_url, app_id);

        let response = self
            .http
            .client()
            .get(&url)
            .bearer_auth(api_key)
            .query(&[("limit", "1"), ("dimensions", GRID_DIMENSIONS)])
            .send()
            .await
            .map_err(|source| ProviderError::Request { provider: PROVIDER, source })?;

        let status = response.status();
        if !status.is_success() {
            warn!(app_id, status = %status, "SteamGridDB lookup failed");
            return Err(ProviderError::Status { provider: PROVIDER, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ProviderError::Request { provider: PROVIDER, source })?;
        let grids: GridResponse = serde_json::from_slice(&body)
            .map_err(|source| ProviderError::Malformed { provider: PROVIDER, source })?;

        if !grids.success {
            return Err(ProviderError::NoResults(PROVIDER));
        }

        match grids.data.into_iter().next() {
            Some(grid) if grid.id > 0 && !grid.url.is_empty() => {
                debug!(app_id, grid_id = grid.id, url = %grid.url, "SteamGridDB grid found");
                Ok(grid)
            }
            _ => Err(ProviderError::NoResults(PROVIDER)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, ServerGuard};
    use std::time::Duration;

    async fn setup() -> (ServerGuard, SteamGridDbClient) {
        let server = mockito::Server::new_async().await;
        let http = HttpClient::new(Duration::from_secs(5)).unwrap();
        let client = SteamGridDbClient::new(http, server.url(), Some("grid-key".to_string()));
        (server, client)
    }

    #[tokio::test]
    async fn test_first_grid_success() {
        let (mut server, client) = setup().await;

        let mock = server.mock("GET", "/grids/steam/620")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "1".into()),
                Matcher::UrlEncoded("dimensions".into(), "600x900".into()),
            ]))
            .match_header("authorization", "Bearer grid-key")
            .with_status(200)
            .with_body(r#"{"success":true,"data":[
                {"id":42,"url":"https://cdn2.steamgriddb.com/grid/42.png","thumb":"https://cdn2.steamgriddb.com/thumb/42.png","width":600,"height":900}
            ]}"#)
            .create_async()
            .await;

        let grid = client.first_grid(620).await.unwrap();
        assert_eq!(grid.id, 42);
        assert_eq!(grid.url, "https://cdn2.steamgriddb.com/grid/42.png");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_first_grid_empty_results() {
        let (mut server, client) = setup().await;

        let _mock = server.mock("GET", "/grids/steam/620")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"success":true,"data":[]}"#)
            .create_async()
            .await;

        assert!(matches!(client.first_grid(620).await, Err(ProviderError::NoResults(_))));
    }

    #[tokio::test]
    async fn test_first_grid_unsuccessful_response() {
        let (mut server, client) = setup().await;

        let _mock = server.mock("GET", "/grids/steam/620")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"success":false,"errors":["Game not found"]}"#)
            .create_async()
            .await;

        assert!(matches!(client.first_grid(620).await, Err(ProviderError::NoResults(_))));
    }

    #[tokio::test]
    async fn test_first_grid_error_status_is_forwarded() {
        let (mut server, client) = setup().await;

        let _mock = server.mock("GET", "/grids/steam/620")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let err = client.first_grid(620).await.unwrap_err();
        assert_eq!(err.upstream_status().map(|s| s.as_u16()), Some(401));
    }

    #[tokio::test]
    async fn test_first_grid_without_key_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let http = HttpClient::new(Duration::from_secs(5)).unwrap();
        let client = SteamGridDbClient::new(http, server.url(), None);

        let mock = server.mock("GET", Matcher::Any).expect(0).create_async().await;

        assert!(matches!(client.first_grid(620).await, Err(ProviderError::MissingCredential(_))));
        mock.assert_async().await;
    }
}
