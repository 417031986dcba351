use {
    chrono::{DateTime, Utc},
    locknote_vault::EncryptedPayload,
    serde::{Deserialize, Serialize},
};

/// A note as held by the store. The payload is opaque to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: String,
    pub title: String,
    pub payload: EncryptedPayload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing entry. Carries no payload fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSummary {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl From<&NoteRecord> for NoteSummary {
    fn from(record: &NoteRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            created_at: record.created_at,
        }
    }
}

/// Lock state of an open note view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteState {
    /// Content is encrypted; a password is needed.
    Locked,
    /// A decryption attempt is in flight.
    Unlocking,
    /// Plaintext is held in memory and the password is cached.
    Unlocked,
}
