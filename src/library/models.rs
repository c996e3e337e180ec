// SPDX-License-Identifier: GPL-3.0-only
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One owned title as returned by the Steam owned-games endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Steam app id, the lookup key for every image provider
    pub appid: u64,

    /// Cover reference filled in by image resolution
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Every other platform field (name, playtime_forever, img_icon_url, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GameRecord {
    pub fn name(&self) -> Option<&str> {
        self.extra.get("name").and_then(Value::as_str)
    }
}

/// Outcome of one library sync, always returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub success: bool,
    pub message: String,
}

impl SyncResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
