//! Settings supplied by the embedding application.

use {
    locknote_vault::KdfParams,
    serde::{Deserialize, Serialize},
};

use crate::Result;

/// Note subsystem configuration.
///
/// ```toml
/// database_url = "sqlite://notes.db?mode=rwc"
///
/// [kdf]
/// iterations = 100000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// sqlx SQLite URL for [`SqliteNoteStore`](crate::store_sqlite::SqliteNoteStore).
    pub database_url: String,
    pub kdf: KdfParams,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            kdf: KdfParams::default(),
        }
    }
}

impl NotesConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.kdf.validate()?;
        Ok(config)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, crate::Error, locknote_vault::VaultError};

    #[test]
    fn empty_document_uses_defaults() {
        let config = NotesConfig::from_toml_str("").unwrap();
        assert_eq!(config, NotesConfig::default());
        assert_eq!(config.kdf.iterations, 100_000);
    }

    #[test]
    fn overrides_are_applied() {
        let config = NotesConfig::from_toml_str(
            r#"
            database_url = "sqlite://notes.db?mode=rwc"

            [kdf]
            iterations = 250000
            "#,
        )
        .unwrap();
        assert_eq!(config.database_url, "sqlite://notes.db?mode=rwc");
        assert_eq!(config.kdf.iterations, 250_000);
    }

    #[test]
    fn zero_iterations_rejected() {
        let result = NotesConfig::from_toml_str("[kdf]\niterations = 0\n");
        assert!(matches!(
            result,
            Err(Error::Vault(VaultError::InvalidParams(_)))
        ));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let result = NotesConfig::from_toml_str("database_url = [");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
