// SPDX-License-Identifier: GPL-3.0-only
use anyhow::{Context, Result};
use url::Url;

/// Maximum allowed URL length
const MAX_URL_LENGTH: usize = 2048;

/// Validate a URL before it is requested or handed to the front-end
///
/// Checks:
/// - Only allows http/https schemes
/// - Requires a host
/// - Validates URL length
pub fn validate_url(url_str: &str) -> Result<Url> {
    if url_str.len() > MAX_URL_LENGTH {
        return Err(anyhow::anyhow!("URL exceeds maximum length of {} characters", MAX_URL_LENGTH));
    }

    let url = Url::parse(url_str)
        .context("Invalid URL format")?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(anyhow::anyhow!(
                "Invalid URL scheme: {} (only http and https are allowed)",
                scheme
            ));
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(anyhow::anyhow!("URL must have a host"));
    }

    Ok(url)
}

/// Validate a configured API base URL; query strings and fragments are not allowed
pub fn validate_base_url(url_str: &str) -> Result<()> {
    let url = validate_url(url_str)?;

    if url.query().is_some() || url.fragment().is_some() {
        return Err(anyhow::anyhow!("Base URL must not carry a query or fragment: {}", url_str));
    }

    Ok(())
}
