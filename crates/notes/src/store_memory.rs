//! In-memory note store for tests and database-less embedding.

use std::sync::Mutex;

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    locknote_vault::EncryptedPayload,
};

use crate::{
    Error, Result,
    store::NoteStore,
    types::{NoteRecord, NoteSummary},
};

/// Store backed by a `Vec` in insertion order. No persistence.
#[derive(Default)]
pub struct InMemoryNoteStore {
    notes: Mutex<Vec<NoteRecord>>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn fetch_by_id(&self, id: &str) -> Result<NoteRecord> {
        let notes = self.notes.lock().unwrap_or_else(|e| e.into_inner());
        notes
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found(id))
    }

    async fn insert(&self, title: &str, payload: &EncryptedPayload) -> Result<String> {
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();
        let mut notes = self.notes.lock().unwrap_or_else(|e| e.into_inner());
        notes.push(NoteRecord {
            id: id.clone(),
            title: title.to_string(),
            payload: payload.clone(),
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn update(
        &self,
        id: &str,
        payload: &EncryptedPayload,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut notes = self.notes.lock().unwrap_or_else(|e| e.into_inner());
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Error::not_found(id))?;
        note.payload = payload.clone();
        note.updated_at = updated_at;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<NoteSummary>> {
        let notes = self.notes.lock().unwrap_or_else(|e| e.into_inner());
        let mut summaries: Vec<NoteSummary> = notes.iter().rev().map(NoteSummary::from).collect();
        // Stable sort keeps later inserts first on equal timestamps.
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }
}
