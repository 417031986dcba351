//! Vault error types.

/// Errors produced by vault operations.
///
/// Display strings never carry passwords or plaintext.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Secure randomness or the cipher primitive is unavailable. Not retryable.
    #[error("crypto environment unavailable: {0}")]
    Environment(String),

    /// Wrong password or a corrupted, tampered or malformed payload.
    ///
    /// Deliberately carries no detail about which of those applied.
    #[error("decryption failed")]
    DecryptionFailed,

    /// Key derivation parameters are unusable.
    #[error("invalid key derivation parameters: {0}")]
    InvalidParams(String),
}

impl VaultError {
    #[must_use]
    pub fn environment(message: impl Into<String>) -> Self {
        Self::Environment(message.into())
    }
}
