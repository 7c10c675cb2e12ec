//! Process-local note repository.
//!
//! Mirrors the PostgreSQL repository's contract (id assignment, version
//! fencing, not-found sentinels) without a database. Used by the HTTP test
//! suite and for running the API without PostgreSQL.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use jotter_core::{CreateNoteRequest, Error, Note, NoteRepository, NoteRevision, Result};

/// In-memory implementation of NoteRepository.
#[derive(Debug)]
pub struct MemoryNoteRepository {
    notes: RwLock<BTreeMap<i64, Note>>,
    next_id: AtomicI64,
}

impl Default for MemoryNoteRepository {
    fn default() -> Self {
        Self {
            notes: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl MemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored notes.
    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            created_at: now,
            updated_at: now,
            title: req.title,
            body: req.body,
            tags: req.tags,
            archived: false,
            version: 1,
        };
        self.notes.write().await.insert(note.id, note.clone());
        Ok(note)
    }

    async fn get(&self, id: i64) -> Result<Note> {
        if id < 1 {
            return Err(Error::NotFound);
        }
        self.notes
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    async fn update(&self, note: &Note) -> Result<NoteRevision> {
        let mut notes = self.notes.write().await;
        let stored = match notes.get_mut(&note.id) {
            Some(stored) if stored.version == note.version => stored,
            _ => return Err(Error::EditConflict),
        };

        stored.title = note.title.clone();
        stored.body = note.body.clone();
        stored.tags = note.tags.clone();
        stored.archived = note.archived;
        stored.updated_at = Utc::now();
        stored.version += 1;
        Ok(NoteRevision {
            version: stored.version,
            updated_at: stored.updated_at,
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        if id < 1 {
            return Err(Error::NotFound);
        }
        match self.notes.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(Error::NotFound),
        }
    }
}
