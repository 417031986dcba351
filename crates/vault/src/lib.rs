//! Password-derived note encryption with AES-256-GCM.
//!
//! Every encryption draws a fresh salt and nonce, derives a key from the
//! password via PBKDF2-HMAC-SHA256, and emits an [`EncryptedPayload`] of three
//! base64 fields. Unlocked passwords live only in a [`SessionKeyCache`] owned
//! by the running session.
//! Trait-based [`Cipher`] design allows swapping the encryption backend.

pub mod aes256gcm;
pub mod engine;
pub mod error;
pub mod kdf;
pub mod key_cache;
pub mod payload;
mod random;
pub mod traits;

pub use {
    aes256gcm::Aes256GcmCipher,
    engine::NoteCipher,
    error::VaultError,
    kdf::KdfParams,
    key_cache::SessionKeyCache,
    payload::EncryptedPayload,
    traits::Cipher,
};
