//! HTTP handlers for jotter-api.

pub mod healthcheck;
pub mod notes;

pub use healthcheck::healthcheck;
pub use notes::{create_note, delete_note, show_note, update_note};

use crate::error::ApiError;

/// Fallback for paths no route matches.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
