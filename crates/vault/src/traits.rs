//! Cipher trait for swappable authenticated encryption backends.

use crate::{error::VaultError, kdf::DerivedKey, payload::NONCE_LEN};

/// Authenticated encryption over a derived key and an explicit nonce.
///
/// The engine owns nonce generation so the nonce can be stored as its own
/// payload field. Implementations live in this crate because only they can
/// read a [`DerivedKey`].
pub trait Cipher: Send + Sync {
    /// Encrypt `plaintext`, returning `ciphertext || tag`.
    fn encrypt(
        &self,
        key: &DerivedKey,
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, VaultError>;

    /// Decrypt `ciphertext || tag` produced by [`encrypt`](Self::encrypt).
    ///
    /// Any authentication failure must surface as
    /// [`VaultError::DecryptionFailed`].
    fn decrypt(
        &self,
        key: &DerivedKey,
        nonce: &[u8; NONCE_LEN],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, VaultError>;
}
