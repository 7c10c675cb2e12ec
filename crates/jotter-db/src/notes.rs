//! Note repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use jotter_core::{CreateNoteRequest, Error, Note, NoteRepository, NoteRevision, Result};

/// PostgreSQL implementation of NoteRepository.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note> {
        let note = sqlx::query_as::<_, Note>(
            "INSERT INTO notes (title, body, tags)
             VALUES ($1, $2, $3)
             RETURNING id, created_at, updated_at, title, body, tags, archived, version",
        )
        .bind(&req.title)
        .bind(&req.body)
        .bind(&req.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "insert",
            note_id = note.id,
            "Note inserted"
        );
        Ok(note)
    }

    async fn get(&self, id: i64) -> Result<Note> {
        if id < 1 {
            return Err(Error::NotFound);
        }

        sqlx::query_as::<_, Note>(
            "SELECT id, created_at, updated_at, title, body, tags, archived, version
             FROM notes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::NotFound)
    }

    async fn update(&self, note: &Note) -> Result<NoteRevision> {
        let revision = sqlx::query_as::<_, NoteRevision>(
            "UPDATE notes
             SET title = $1, body = $2, tags = $3, archived = $4,
                 updated_at = NOW(), version = version + 1
             WHERE id = $5 AND version = $6
             RETURNING version, updated_at",
        )
        .bind(&note.title)
        .bind(&note.body)
        .bind(&note.tags)
        .bind(note.archived)
        .bind(note.id)
        .bind(note.version)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        match revision {
            Some(revision) => {
                debug!(
                    subsystem = "database",
                    component = "notes",
                    op = "update",
                    note_id = note.id,
                    version = revision.version,
                    "Note updated"
                );
                Ok(revision)
            }
            None => Err(Error::EditConflict),
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        if id < 1 {
            return Err(Error::NotFound);
        }

        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound);
        }

        debug!(
            subsystem = "database",
            component = "notes",
            op = "delete",
            note_id = id,
            "Note deleted"
        );
        Ok(())
    }
}
