//! AES-256-GCM implementation of the [`Cipher`] trait.

use aes_gcm::{Aes256Gcm, KeyInit, Nonce, aead::Aead};

use crate::{error::VaultError, kdf::DerivedKey, payload::NONCE_LEN, traits::Cipher};

/// AES-256-GCM AEAD cipher.
///
/// Output layout: `[ciphertext: N bytes][GCM tag: 16 bytes]`. The nonce is
/// supplied by the caller and stored separately.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aes256GcmCipher;

impl Aes256GcmCipher {
    fn init(key: &DerivedKey) -> Result<Aes256Gcm, VaultError> {
        Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| VaultError::environment(format!("failed to create cipher: {e}")))
    }
}

impl Cipher for Aes256GcmCipher {
    fn encrypt(
        &self,
        key: &DerivedKey,
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, VaultError> {
        let cipher = Self::init(key)?;
        cipher
            .encrypt(Nonce::from_slice(nonce), plaintext)
            .map_err(|e| VaultError::environment(format!("encryption failed: {e}")))
    }

    fn decrypt(
        &self,
        key: &DerivedKey,
        nonce: &[u8; NONCE_LEN],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, VaultError> {
        let cipher = Self::init(key)?;
        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| VaultError::DecryptionFailed)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::kdf::{KdfParams, derive_key},
    };

    fn key(password: &[u8]) -> DerivedKey {
        derive_key(password, b"fixed-salt-bytes", &KdfParams { iterations: 1 }).unwrap()
    }

    #[test]
    fn round_trip() {
        let cipher = Aes256GcmCipher;
        let key = key(b"k");
        let nonce = [7u8; NONCE_LEN];

        let encrypted = cipher.encrypt(&key, &nonce, b"hello note").unwrap();
        let decrypted = cipher.decrypt(&key, &nonce, &encrypted).unwrap();
        assert_eq!(decrypted, b"hello note");
    }

    #[test]
    fn output_is_plaintext_plus_tag() {
        let cipher = Aes256GcmCipher;
        let encrypted = cipher.encrypt(&key(b"k"), &[0u8; NONCE_LEN], b"12345").unwrap();
        assert_eq!(encrypted.len(), 5 + 16);
    }

    #[test]
    fn wrong_key_fails() {
        let cipher = Aes256GcmCipher;
        let nonce = [1u8; NONCE_LEN];

        let encrypted = cipher.encrypt(&key(b"one"), &nonce, b"secret").unwrap();
        let result = cipher.decrypt(&key(b"two"), &nonce, &encrypted);
        assert!(matches!(result, Err(VaultError::DecryptionFailed)));
    }

    #[test]
    fn wrong_nonce_fails() {
        let cipher = Aes256GcmCipher;
        let key = key(b"k");

        let encrypted = cipher.encrypt(&key, &[1u8; NONCE_LEN], b"secret").unwrap();
        let result = cipher.decrypt(&key, &[2u8; NONCE_LEN], &encrypted);
        assert!(matches!(result, Err(VaultError::DecryptionFailed)));
    }

    #[test]
    fn truncated_ciphertext_fails() {
        let cipher = Aes256GcmCipher;
        let result = cipher.decrypt(&key(b"k"), &[0u8; NONCE_LEN], &[0u8; 10]);
        assert!(matches!(result, Err(VaultError::DecryptionFailed)));
    }

    #[test]
    fn empty_plaintext_round_trip() {
        let cipher = Aes256GcmCipher;
        let key = key(b"k");
        let nonce = [3u8; NONCE_LEN];

        let encrypted = cipher.encrypt(&key, &nonce, b"").unwrap();
        assert_eq!(encrypted.len(), 16);
        assert!(cipher.decrypt(&key, &nonce, &encrypted).unwrap().is_empty());
    }
}
