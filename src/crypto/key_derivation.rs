//! Key derivation using PBKDF2-HMAC-SHA256
//!
//! Derives a 256-bit AES key from the master password and a 16-byte salt.
//! The iteration count is the cost factor against offline guessing and is
//! intentionally not configurable.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{VaultError, VaultResult};

use super::random::random_bytes;

/// PBKDF2 rounds
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Salt length in bytes
pub const SALT_SIZE: usize = 16;

/// Derived key length in bytes (AES-256)
pub const KEY_SIZE: usize = 32;

/// A derived encryption key, wiped when dropped
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Generate a fresh random salt
pub fn generate_salt() -> VaultResult<[u8; SALT_SIZE]> {
    random_bytes()
}

/// Derive an encryption key from a password and salt
pub fn derive_key(password: &str, salt: &[u8]) -> VaultResult<DerivedKey> {
    if salt.len() != SALT_SIZE {
        return Err(VaultError::InvalidInput(format!(
            "Invalid salt size: expected {}, got {}",
            SALT_SIZE,
            salt.len()
        )));
    }

    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);

    Ok(DerivedKey { key })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key() {
        let salt = generate_salt().unwrap();
        let key = derive_key("test_passphrase", &salt).unwrap();
        assert_eq!(key.as_bytes().len(), KEY_SIZE);
    }

    #[test]
    fn test_same_inputs_same_key() {
        let salt = generate_salt().unwrap();
        let key1 = derive_key("test_passphrase", &salt).unwrap();
        let key2 = derive_key("test_passphrase", &salt).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_password_different_key() {
        let salt = generate_salt().unwrap();
        let key1 = derive_key("passphrase1", &salt).unwrap();
        let key2 = derive_key("passphrase2", &salt).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = derive_key("same_passphrase", &generate_salt().unwrap()).unwrap();
        let key2 = derive_key("same_passphrase", &generate_salt().unwrap()).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_round_count_is_pinned() {
        let salt = [7u8; SALT_SIZE];
        let key = derive_key("password", &salt).unwrap();

        let mut expected = [0u8; KEY_SIZE];
        pbkdf2_hmac::<Sha256>(b"password", &salt, 100_000, &mut expected);
        assert_eq!(key.as_bytes(), &expected);
    }

    #[test]
    fn test_empty_password_allowed() {
        let salt = generate_salt().unwrap();
        assert!(derive_key("", &salt).is_ok());
    }

    #[test]
    fn test_bad_salt_length() {
        let err = derive_key("pw", &[0u8; 8]).unwrap_err();
        assert!(matches!(err, VaultError::InvalidInput(_)));
    }

    #[test]
    fn test_debug_redacts() {
        let key = derive_key("pw", &[1u8; SALT_SIZE]).unwrap();
        assert_eq!(format!("{:?}", key), "DerivedKey([REDACTED])");
    }
}
