//! Note resource handlers.
//!
//! Each handler reads the raw request last so path and store checks run
//! before the body is decoded.

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use jotter_core::{Note, NoteDraft, Validator};

use crate::{
    error::ApiError,
    json::{read_json, write_json},
    AppState,
};

/// Body accepted by `POST /v1/notes`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateNoteInput {
    pub title: Option<String>,
    pub body: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl From<CreateNoteInput> for NoteDraft {
    fn from(input: CreateNoteInput) -> Self {
        NoteDraft {
            title: input.title.unwrap_or_default(),
            body: input.body.unwrap_or_default(),
            tags: input.tags,
            archived: false,
        }
    }
}

/// Body accepted by `PUT /v1/notes/:id`: the full representation.
///
/// `version`, when sent, must match the stored version.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateNoteInput {
    pub title: Option<String>,
    pub body: Option<String>,
    pub tags: Option<Vec<String>>,
    pub archived: Option<bool>,
    pub version: Option<i32>,
}

impl From<UpdateNoteInput> for NoteDraft {
    fn from(input: UpdateNoteInput) -> Self {
        NoteDraft {
            title: input.title.unwrap_or_default(),
            body: input.body.unwrap_or_default(),
            tags: input.tags,
            archived: input.archived.unwrap_or(false),
        }
    }
}

#[derive(Debug, Serialize)]
struct NoteEnvelope<'a> {
    note: &'a Note,
}

#[derive(Debug, Serialize)]
struct MessageEnvelope {
    message: &'static str,
}

/// Parse a path id. Anything that is not a positive base-10 integer is
/// treated as a missing resource.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::NotFound),
    }
}

fn validate(draft: &NoteDraft) -> Result<(), ApiError> {
    let mut v = Validator::new();
    draft.validate(&mut v);
    if v.valid() {
        Ok(())
    } else {
        Err(ApiError::FailedValidation(v.into_errors()))
    }
}

/// POST /v1/notes
pub async fn create_note(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ApiError> {
    let input: CreateNoteInput = read_json(request).await?;
    let draft = NoteDraft::from(input);
    validate(&draft)?;

    let note = state.notes.insert(draft.into_create_request()).await?;
    info!(
        subsystem = "api",
        component = "notes",
        op = "create",
        note_id = note.id,
        "Note created"
    );

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/v1/notes/{}", note.id))
        .map_err(|e| ApiError::Internal(jotter_core::Error::Internal(e.to_string())))?;
    headers.insert(header::LOCATION, location);

    Ok(write_json(
        StatusCode::CREATED,
        &NoteEnvelope { note: &note },
        Some(headers),
    )?)
}

/// GET /v1/notes/:id
pub async fn show_note(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&raw_id)?;
    let note = state.notes.get(id).await?;
    Ok(write_json(StatusCode::OK, &NoteEnvelope { note: &note }, None)?)
}

/// PUT /v1/notes/:id
///
/// Full replacement of title, body, tags and archived.
pub async fn update_note(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    let id = parse_id(&raw_id)?;
    let mut note = state.notes.get(id).await?;

    let input: UpdateNoteInput = read_json(request).await?;
    if let Some(expected) = input.version {
        if expected != note.version {
            return Err(ApiError::EditConflict);
        }
    }

    let draft = NoteDraft::from(input);
    validate(&draft)?;

    note.apply(draft);
    let revision = state.notes.update(&note).await?;
    note.set_revision(revision);
    info!(
        subsystem = "api",
        component = "notes",
        op = "update",
        note_id = note.id,
        version = note.version,
        "Note updated"
    );

    Ok(write_json(StatusCode::OK, &NoteEnvelope { note: &note }, None)?)
}

/// DELETE /v1/notes/:id
pub async fn delete_note(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&raw_id)?;
    state.notes.delete(id).await?;
    info!(
        subsystem = "api",
        component = "notes",
        op = "delete",
        note_id = id,
        "Note deleted"
    );

    Ok(write_json(
        StatusCode::OK,
        &MessageEnvelope {
            message: "note successfully deleted",
        },
        None,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("1").unwrap(), 1);
        assert_eq!(parse_id("9223372036854775807").unwrap(), i64::MAX);
        for raw in ["0", "-1", "abc", "1.5", "", " 1", "9223372036854775808"] {
            assert!(matches!(parse_id(raw), Err(ApiError::NotFound)), "{raw:?}");
        }
    }

    #[test]
    fn test_create_input_to_draft() {
        let input: CreateNoteInput =
            serde_json::from_str(r#"{"title":"t","body":"b","tags":null}"#).unwrap();
        let draft = NoteDraft::from(input);
        assert_eq!(draft.title, "t");
        assert_eq!(draft.tags, None);
        assert!(!draft.archived);
    }

    #[test]
    fn test_update_input_defaults() {
        let input: UpdateNoteInput = serde_json::from_str(r#"{"tags":[]}"#).unwrap();
        assert_eq!(input.version, None);
        let draft = NoteDraft::from(input);
        assert_eq!(draft.title, "");
        assert_eq!(draft.tags, Some(vec![]));
        assert!(!draft.archived);
    }

    #[test]
    fn test_inputs_reject_unknown_fields() {
        assert!(serde_json::from_str::<CreateNoteInput>(r#"{"archived":true}"#).is_err());
        assert!(serde_json::from_str::<UpdateNoteInput>(r#"{"id":3}"#).is_err());
    }
}
