//! Wire form of an encrypted note: three base64 text fields.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::kdf::SALT_LEN;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypted note content as stored and transported.
///
/// Each field is the standard base64 encoding of raw bytes. `salt` decodes to
/// 16 bytes, `iv` to 12 bytes, and `ciphertext` to the plaintext length plus
/// a 16-byte tag. A new payload is produced on every encryption and replaces
/// the previous one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EncryptedPayload {
    pub ciphertext: String,
    pub salt: String,
    pub iv: String,
}

/// Binary view of a well-formed payload.
pub(crate) struct DecodedPayload {
    pub ciphertext: Vec<u8>,
    pub salt: [u8; SALT_LEN],
    pub iv: [u8; NONCE_LEN],
}

impl EncryptedPayload {
    pub(crate) fn encode(ciphertext: &[u8], salt: &[u8; SALT_LEN], iv: &[u8; NONCE_LEN]) -> Self {
        Self {
            ciphertext: STANDARD.encode(ciphertext),
            salt: STANDARD.encode(salt),
            iv: STANDARD.encode(iv),
        }
    }

    /// Decode all three fields, or `None` if any is malformed or has the
    /// wrong length.
    pub(crate) fn decode(&self) -> Option<DecodedPayload> {
        let salt = STANDARD.decode(&self.salt).ok()?.try_into().ok()?;
        let iv = STANDARD.decode(&self.iv).ok()?.try_into().ok()?;
        let ciphertext = STANDARD.decode(&self.ciphertext).ok()?;
        if ciphertext.len() < TAG_LEN {
            return None;
        }
        Some(DecodedPayload {
            ciphertext,
            salt,
            iv,
        })
    }
}
