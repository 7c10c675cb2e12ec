//! Note data model and validation rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validator::{unique, Validator};

/// Maximum title length in bytes.
pub const MAX_TITLE_BYTES: usize = 500;

/// A persisted note.
///
/// `created_at` is internal bookkeeping and never leaves the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    pub id: i64,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub archived: bool,
    pub version: i32,
}

impl Note {
    /// Replace the client-editable fields with a validated draft.
    ///
    /// Id, timestamps and version are left for the store to manage.
    pub fn apply(&mut self, draft: NoteDraft) {
        self.title = draft.title;
        self.body = draft.body;
        self.tags = draft.tags.unwrap_or_default();
        self.archived = draft.archived;
    }

    /// Adopt the version and timestamp the store assigned on update.
    pub fn set_revision(&mut self, revision: NoteRevision) {
        self.version = revision.version;
        self.updated_at = revision.updated_at;
    }
}

/// Store-managed fields produced by a successful update.
#[derive(Debug, Clone, Copy, PartialEq, sqlx::FromRow)]
pub struct NoteRevision {
    pub version: i32,
    pub updated_at: DateTime<Utc>,
}

/// Request for inserting a note.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateNoteRequest {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

/// Candidate note content as supplied by a client, before validation.
///
/// `tags` stays optional so a missing or `null` list can be reported instead
/// of silently becoming empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub body: String,
    pub tags: Option<Vec<String>>,
    pub archived: bool,
}

impl NoteDraft {
    /// Record every rule violation into `v`.
    pub fn validate(&self, v: &mut Validator) {
        validate_note(v, self);
    }

    /// Convert into an insert request. Only meaningful after validation.
    pub fn into_create_request(self) -> CreateNoteRequest {
        CreateNoteRequest {
            title: self.title,
            body: self.body,
            tags: self.tags.unwrap_or_default(),
        }
    }
}

/// Validation rules shared by create and update.
pub fn validate_note(v: &mut Validator, note: &NoteDraft) {
    v.check(!note.title.is_empty(), "title", "must be provided");
    v.check(
        note.title.len() <= MAX_TITLE_BYTES,
        "title",
        "must not be more than 500 bytes long",
    );

    v.check(!note.body.is_empty(), "body", "must be provided");

    v.check(note.tags.is_some(), "tags", "must be provided");
    if let Some(tags) = &note.tags {
        v.check(unique(tags), "tags", "must not contain duplicate values");
    }
}
