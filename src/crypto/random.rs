//! Access to the OS random source
//!
//! Every salt and nonce in the crate comes through here so that a broken
//! RNG surfaces as `RandomSourceUnavailable` instead of a panic.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;

use crate::error::{VaultError, VaultResult};

/// Fill `buf` with bytes from the OS CSPRNG
pub fn fill_random(buf: &mut [u8]) -> VaultResult<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| VaultError::RandomSourceUnavailable(e.to_string()))
}

/// Generate a fixed-size array of random bytes
pub fn random_bytes<const N: usize>() -> VaultResult<[u8; N]> {
    let mut out = [0u8; N];
    fill_random(&mut out)?;
    Ok(out)
}

/// Check the random source once.
///
/// Called at startup; nothing in the vault can work without it.
pub fn ensure_available() -> VaultResult<()> {
    let mut sample = [0u8; 16];
    fill_random(&mut sample)
}
