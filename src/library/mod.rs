// SPDX-License-Identifier: GPL-3.0-only
pub mod models;
pub mod service;
pub mod store;

pub use models::{GameRecord, SyncResult};
pub use service::LibrarySyncService;
pub use store::LibraryStore;
