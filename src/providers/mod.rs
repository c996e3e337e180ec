// SPDX-License-Identifier: GPL-3.0-only
pub mod error;
pub mod igdb;
pub mod steam;
pub mod steamgriddb;
pub mod traits;

pub use error::{ProviderError, SteamError};
pub use igdb::IgdbClient;
pub use steam::SteamApiClient;
pub use steamgriddb::SteamGridDbClient;
pub use traits::LibraryFetcher;
