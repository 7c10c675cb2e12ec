//! Core traits for jotter abstractions.
//!
//! These traits define the interfaces that concrete storage backends
//! must satisfy, keeping the HTTP layer independent of the database.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CreateNoteRequest, Note, NoteRevision};

// =============================================================================
// NOTE REPOSITORY TRAITS
// =============================================================================

/// Repository for note persistence.
///
/// Identifiers below 1 never reach the backing store; implementations
/// answer them with [`Error::NotFound`](crate::Error::NotFound) directly.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note. The store assigns id, timestamps and version 1.
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note>;

    /// Fetch a note by ID.
    async fn get(&self, id: i64) -> Result<Note>;

    /// Persist title, body, tags and archived for `note.id`.
    ///
    /// The write only applies if the stored version still equals
    /// `note.version`; otherwise [`Error::EditConflict`](crate::Error::EditConflict)
    /// is returned. On success the new version and refreshed `updated_at`
    /// are returned.
    async fn update(&self, note: &Note) -> Result<NoteRevision>;

    /// Permanently delete a note.
    async fn delete(&self, id: i64) -> Result<()>;
}
