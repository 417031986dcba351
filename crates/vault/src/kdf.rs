//! PBKDF2-HMAC-SHA256 key derivation for password → note key.

use std::fmt;

use {sha2::Sha256, zeroize::Zeroizing};

use crate::{error::VaultError, random};

/// Salt length in bytes. Stored alongside every payload.
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// PBKDF2 parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct KdfParams {
    /// Number of HMAC-SHA256 iterations (default: 100,000).
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl KdfParams {
    /// Reject parameters that would make derivation meaningless.
    pub fn validate(&self) -> Result<(), VaultError> {
        if self.iterations == 0 {
            return Err(VaultError::InvalidParams(
                "iterations must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Opaque 256-bit key handle.
///
/// Only the cipher implementations in this crate can read the bytes. The
/// buffer is wiped on drop.
pub struct DerivedKey(Zeroizing<[u8; KEY_LEN]>);

impl DerivedKey {
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Derive a 256-bit key from a password and salt.
///
/// Deterministic: the same password, salt and params always yield the same key.
pub fn derive_key(
    password: &[u8],
    salt: &[u8; SALT_LEN],
    params: &KdfParams,
) -> Result<DerivedKey, VaultError> {
    params.validate()?;

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, params.iterations, &mut output[..]);

    Ok(DerivedKey(output))
}

/// Generate a fresh random salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN], VaultError> {
    random::random_array()
}
