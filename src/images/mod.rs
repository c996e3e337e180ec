// SPDX-License-Identifier: GPL-3.0-only
pub mod error;
pub mod resolver;
pub mod sources;
pub mod store;
pub mod traits;

pub use resolver::{ImageResolver, ResolvedImage};
pub use sources::{SteamCdnSource, SteamGridDbSource};
pub use store::AssetStore;
pub use traits::ImageSource;
