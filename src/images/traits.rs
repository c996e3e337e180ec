// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;

use crate::images::error::ImageError;

/// An image URL offered by a source for one app id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub url: String,

    /// The provider already confirmed the image exists; templated URLs are not verified
    pub verified: bool,
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Name used in logs and in resolution results
    fn name(&self) -> &'static str;

    /// Find a candidate cover image for `app_id`
    async fn locate(&self, app_id: u64) -> Result<ImageCandidate, ImageError>;
}
