//! AES-256-GCM encryption/decryption
//!
//! Provides authenticated encryption for vault records using AES-256-GCM.
//! Each encryption operation generates a unique nonce.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};

use crate::error::{VaultError, VaultResult};

use super::random::random_bytes;
use super::DerivedKey;

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag appended to every ciphertext
pub const TAG_SIZE: usize = 16;

/// Raw output of one encryption: ciphertext (with tag) and its nonce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedData {
    pub ciphertext: Vec<u8>,
    pub iv: [u8; NONCE_SIZE],
}

fn cipher_for(key: &DerivedKey) -> VaultResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::InvalidInput(format!("Failed to create cipher: {}", e)))
}

/// Encrypt plaintext data using AES-256-GCM
///
/// Generates a random nonce for each encryption operation.
pub fn encrypt(plaintext: &[u8], key: &DerivedKey) -> VaultResult<SealedData> {
    let cipher = cipher_for(key)?;

    let iv: [u8; NONCE_SIZE] = random_bytes()?;
    let nonce = Nonce::from_slice(&iv);

    // Only fails for plaintexts beyond GCM's length limit
    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| VaultError::InvalidInput("Plaintext too long to encrypt".to_string()))?;

    Ok(SealedData { ciphertext, iv })
}

/// Decrypt ciphertext using AES-256-GCM
pub fn decrypt(ciphertext: &[u8], iv: &[u8], key: &DerivedKey) -> VaultResult<Vec<u8>> {
    if iv.len() != NONCE_SIZE {
        return Err(VaultError::InvalidInput(format!(
            "Invalid nonce size: expected {}, got {}",
            NONCE_SIZE,
            iv.len()
        )));
    }
    if ciphertext.len() < TAG_SIZE {
        return Err(VaultError::InvalidInput(format!(
            "Ciphertext too short: {} bytes",
            ciphertext.len()
        )));
    }

    let cipher = cipher_for(key)?;
    let nonce = Nonce::from_slice(iv);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| VaultError::DecryptionFailed)
}
