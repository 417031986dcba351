//! Persistence trait for encrypted notes.

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    locknote_vault::EncryptedPayload,
};

use crate::{
    Result,
    types::{NoteRecord, NoteSummary},
};

/// Note persistence backend.
///
/// Payload fields must round-trip byte for byte. Each `update` replaces the
/// previous payload; no history is kept.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Fetch a note, or [`Error::NotFound`](crate::Error::NotFound).
    async fn fetch_by_id(&self, id: &str) -> Result<NoteRecord>;
    /// Insert a new note and return its id.
    async fn insert(&self, title: &str, payload: &EncryptedPayload) -> Result<String>;
    /// Replace the payload of an existing note.
    async fn update(
        &self,
        id: &str,
        payload: &EncryptedPayload,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;
    /// All notes, newest first.
    async fn list(&self) -> Result<Vec<NoteSummary>>;
}
