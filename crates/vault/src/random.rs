//! OS-backed randomness for salts and nonces.

use rand::{TryRngCore, rngs::OsRng};

use crate::error::VaultError;

/// Fill `buf` from the operating system CSPRNG.
///
/// Fails with [`VaultError::Environment`] instead of panicking when the
/// source is unavailable.
pub(crate) fn fill_random(buf: &mut [u8]) -> Result<(), VaultError> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| VaultError::environment(format!("secure random source unavailable: {e}")))
}

/// Return `N` fresh random bytes.
pub(crate) fn random_array<const N: usize>() -> Result<[u8; N], VaultError> {
    let mut out = [0u8; N];
    fill_random(&mut out)?;
    Ok(out)
}
