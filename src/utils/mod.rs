// SPDX-License-Identifier: GPL-3.0-only
pub mod app_id;
pub mod url_validator;

pub use app_id::parse_app_id;
pub use url_validator::{validate_base_url, validate_url};
