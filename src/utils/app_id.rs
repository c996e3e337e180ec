// SPDX-License-Identifier: GPL-3.0-only
use anyhow::Result;

/// Parse a Steam app id from a query parameter
///
/// Steam app ids are positive integers; zero is never assigned.
pub fn parse_app_id(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow::anyhow!("App ID is required"));
    }

    let app_id: u64 = trimmed
        .parse()
        .map_err(|_| anyhow::anyhow!("App ID must be a positive integer: {}", trimmed))?;

    if app_id == 0 {
        return Err(anyhow::anyhow!("App ID must be a positive integer: 0"));
    }

    Ok(app_id)
}
