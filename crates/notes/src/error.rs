use {locknote_vault::VaultError, thiserror::Error};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// The note store round-trip failed. Unlocked content stays in memory.
    #[error("{context}: {source}")]
    Persistence {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("note not found: {note_id}")]
    NotFound { note_id: String },

    #[error("note is not open: {note_id}")]
    NotOpen { note_id: String },

    #[error("note is locked: {note_id}")]
    Locked { note_id: String },

    #[error("password is required")]
    EmptyPassword,

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn persistence(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Persistence {
            context: context.into(),
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn not_found(note_id: impl Into<String>) -> Self {
        Self::NotFound {
            note_id: note_id.into(),
        }
    }

    #[must_use]
    pub fn not_open(note_id: impl Into<String>) -> Self {
        Self::NotOpen {
            note_id: note_id.into(),
        }
    }

    #[must_use]
    pub fn locked(note_id: impl Into<String>) -> Self {
        Self::Locked {
            note_id: note_id.into(),
        }
    }

    /// Whether the caller should re-prompt for a password.
    #[must_use]
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, Self::Vault(VaultError::DecryptionFailed))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
