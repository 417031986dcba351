//! Password-based note encryption: salt, derive, seal, encode.

#[cfg(feature = "metrics")]
use locknote_metrics::{counter, histogram, vault as vault_metrics};
use {
    secrecy::{ExposeSecret, Secret},
    zeroize::Zeroizing,
};

use crate::{
    aes256gcm::Aes256GcmCipher,
    error::VaultError,
    kdf::{self, DerivedKey, KdfParams, SALT_LEN},
    payload::{EncryptedPayload, NONCE_LEN, TAG_LEN},
    random,
    traits::Cipher,
};

/// Encrypts and decrypts note content with a per-call salt and nonce.
///
/// Generic over [`Cipher`] but defaults to [`Aes256GcmCipher`]. Holds no
/// mutable state, so one instance can serve any number of concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct NoteCipher<C: Cipher = Aes256GcmCipher> {
    cipher: C,
    params: KdfParams,
}

impl NoteCipher<Aes256GcmCipher> {
    /// AES-256-GCM with the default 100,000-iteration KDF.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// AES-256-GCM with custom KDF parameters.
    pub fn with_params(params: KdfParams) -> Result<Self, VaultError> {
        Self::with_cipher(Aes256GcmCipher, params)
    }
}

impl<C: Cipher> NoteCipher<C> {
    /// Build an engine around a custom cipher.
    pub fn with_cipher(cipher: C, params: KdfParams) -> Result<Self, VaultError> {
        params.validate()?;
        Ok(Self { cipher, params })
    }

    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Encrypt `plaintext` under `password`.
    ///
    /// Salt and iv are drawn fresh on every call, so encrypting the same text
    /// twice never yields the same payload.
    pub fn encrypt(&self, plaintext: &str, password: &str) -> Result<EncryptedPayload, VaultError> {
        let salt = kdf::generate_salt()?;
        let key = self.derive(password, &salt)?;
        let iv: [u8; NONCE_LEN] = random::random_array()?;

        let ciphertext = self.cipher.encrypt(&key, &iv, plaintext.as_bytes())?;

        #[cfg(feature = "metrics")]
        counter!(vault_metrics::ENCRYPTIONS_TOTAL).increment(1);

        Ok(EncryptedPayload::encode(&ciphertext, &salt, &iv))
    }

    /// Decrypt `payload` with `password`.
    ///
    /// Every failure (wrong password, tampering, malformed fields) returns
    /// [`VaultError::DecryptionFailed`]. Malformed payloads still run the KDF
    /// and a cipher pass so they cost the same as a wrong password.
    pub fn decrypt(&self, payload: &EncryptedPayload, password: &str) -> Result<String, VaultError> {
        #[cfg(feature = "metrics")]
        counter!(vault_metrics::DECRYPTIONS_TOTAL).increment(1);

        let result = self.try_decrypt(payload, password);

        #[cfg(feature = "metrics")]
        if matches!(result, Err(VaultError::DecryptionFailed)) {
            counter!(vault_metrics::DECRYPTION_FAILURES_TOTAL).increment(1);
        }

        result
    }

    fn try_decrypt(&self, payload: &EncryptedPayload, password: &str) -> Result<String, VaultError> {
        let decoded = payload.decode();
        let salt = decoded.as_ref().map_or([0u8; SALT_LEN], |d| d.salt);
        let key = self.derive(password, &salt)?;

        let Some(decoded) = decoded else {
            let _ = self
                .cipher
                .decrypt(&key, &[0u8; NONCE_LEN], &[0u8; TAG_LEN]);
            return Err(VaultError::DecryptionFailed);
        };

        let plaintext = Zeroizing::new(self.cipher.decrypt(&key, &decoded.iv, &decoded.ciphertext)?);
        String::from_utf8(plaintext.to_vec()).map_err(|_| VaultError::DecryptionFailed)
    }

    fn derive(&self, password: &str, salt: &[u8; SALT_LEN]) -> Result<DerivedKey, VaultError> {
        #[cfg(feature = "metrics")]
        let started = std::time::Instant::now();

        let key = kdf::derive_key(password.as_bytes(), salt, &self.params)?;

        #[cfg(feature = "metrics")]
        histogram!(vault_metrics::KDF_DURATION_SECONDS).record(started.elapsed().as_secs_f64());

        Ok(key)
    }
}

impl<C: Cipher + Clone + 'static> NoteCipher<C> {
    /// [`encrypt`](Self::encrypt) on the blocking pool.
    ///
    /// Runs to completion even if the returned future is dropped; the result
    /// is then discarded.
    pub async fn encrypt_async(
        &self,
        plaintext: Zeroizing<String>,
        password: Secret<String>,
    ) -> Result<EncryptedPayload, VaultError> {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || engine.encrypt(&plaintext, password.expose_secret()))
            .await
            .map_err(|e| VaultError::environment(format!("crypto worker failed: {e}")))?
    }

    /// [`decrypt`](Self::decrypt) on the blocking pool.
    pub async fn decrypt_async(
        &self,
        payload: EncryptedPayload,
        password: Secret<String>,
    ) -> Result<Zeroizing<String>, VaultError> {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || {
            engine
                .decrypt(&payload, password.expose_secret())
                .map(Zeroizing::new)
        })
        .await
        .map_err(|e| VaultError::environment(format!("crypto worker failed: {e}")))?
    }
}
