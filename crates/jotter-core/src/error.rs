//! Error types for jotter.

use thiserror::Error;

/// Result type alias using jotter's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for jotter operations.
///
/// `NotFound` and `EditConflict` are sentinel conditions: callers match on them
/// to pick a response, everything else is treated as an opaque failure.
#[derive(Error, Debug)]
pub enum Error {
    /// No record matches the requested identifier.
    #[error("record not found")]
    NotFound,

    /// The record changed since the caller last read it.
    #[error("edit conflict")]
    EditConflict,

    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
