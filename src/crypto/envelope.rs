//! Password envelopes
//!
//! An [`Envelope`] is the `{ciphertext, iv, salt}` triple that leaves the
//! client. Each field is standard base64 so it survives JSON transport and
//! document storage unchanged.
//!
//! Every call to [`envelope_encrypt`] draws a new salt and therefore derives
//! a new key, so nonce reuse under one key cannot happen even though the
//! nonce is only 96 random bits. The price is one PBKDF2 run per operation.

use serde::{Deserialize, Serialize};

use crate::error::{VaultError, VaultResult};
use crate::models::VaultRecord;

use super::encoding::{from_text, to_text};
use super::encryption::{self, NONCE_SIZE};
use super::key_cache::KeyCache;
use super::key_derivation::{derive_key, generate_salt, DerivedKey, SALT_SIZE};

/// Encrypted vault payload as it is stored and transported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// AES-GCM ciphertext with tag (base64)
    #[serde(default)]
    pub ciphertext: String,
    /// 12-byte nonce (base64)
    #[serde(default)]
    pub iv: String,
    /// 16-byte PBKDF2 salt (base64)
    #[serde(default)]
    pub salt: String,
}

/// Binary form of an envelope after base64 decoding and length checks
struct DecodedEnvelope {
    ciphertext: Vec<u8>,
    iv: Vec<u8>,
    salt: Vec<u8>,
}

impl Envelope {
    fn decode(&self) -> VaultResult<DecodedEnvelope> {
        let ciphertext = decode_field("ciphertext", &self.ciphertext)?;
        let iv = decode_field("iv", &self.iv)?;
        let salt = decode_field("salt", &self.salt)?;

        if salt.len() != SALT_SIZE {
            return Err(VaultError::InvalidInput(format!(
                "Invalid salt size: expected {}, got {}",
                SALT_SIZE,
                salt.len()
            )));
        }
        if iv.len() != NONCE_SIZE {
            return Err(VaultError::InvalidInput(format!(
                "Invalid nonce size: expected {}, got {}",
                NONCE_SIZE,
                iv.len()
            )));
        }

        Ok(DecodedEnvelope {
            ciphertext,
            iv,
            salt,
        })
    }
}

fn decode_field(name: &str, value: &str) -> VaultResult<Vec<u8>> {
    if value.is_empty() {
        return Err(VaultError::MalformedEnvelope(format!(
            "Missing field: {}",
            name
        )));
    }
    from_text(value)
        .map_err(|_| VaultError::MalformedEnvelope(format!("Field '{}' is not valid base64", name)))
}

fn into_utf8(plaintext: Vec<u8>) -> VaultResult<String> {
    // Authentic envelopes always hold UTF-8; anything else is corruption
    String::from_utf8(plaintext).map_err(|_| VaultError::DecryptionFailed)
}

/// Encrypt a string under a password, producing a fresh envelope
pub fn envelope_encrypt(password: &str, plaintext: &str) -> VaultResult<Envelope> {
    let salt = generate_salt()?;
    let key = derive_key(password, &salt)?;
    let sealed = encryption::encrypt(plaintext.as_bytes(), &key)?;

    Ok(Envelope {
        ciphertext: to_text(&sealed.ciphertext),
        iv: to_text(&sealed.iv),
        salt: to_text(&salt),
    })
}

/// Decrypt an envelope with a password
pub fn envelope_decrypt(password: &str, envelope: &Envelope) -> VaultResult<String> {
    let decoded = envelope.decode()?;
    let key = derive_key(password, &decoded.salt)?;
    open_with_key(&decoded, &key)
}

/// Decrypt an envelope, reusing keys already derived in this session
pub fn envelope_decrypt_cached(
    password: &str,
    envelope: &Envelope,
    cache: &mut KeyCache,
) -> VaultResult<String> {
    let decoded = envelope.decode()?;
    let key = cache.get_or_derive(password, &decoded.salt)?;
    open_with_key(&decoded, key)
}

fn open_with_key(decoded: &DecodedEnvelope, key: &DerivedKey) -> VaultResult<String> {
    let plaintext = encryption::decrypt(&decoded.ciphertext, &decoded.iv, key)?;
    into_utf8(plaintext)
}

/// Serialize and encrypt a whole vault record
pub fn seal_record(password: &str, record: &VaultRecord) -> VaultResult<Envelope> {
    let plaintext = zeroize::Zeroizing::new(record.to_canonical_json()?);
    envelope_encrypt(password, &plaintext)
}

/// Decrypt and parse a vault record
pub fn open_record(password: &str, envelope: &Envelope) -> VaultResult<VaultRecord> {
    let plaintext = zeroize::Zeroizing::new(envelope_decrypt(password, envelope)?);
    VaultRecord::from_json(&plaintext)
}

/// [`open_record`] through a session key cache
pub fn open_record_cached(
    password: &str,
    envelope: &Envelope,
    cache: &mut KeyCache,
) -> VaultResult<VaultRecord> {
    let plaintext = zeroize::Zeroizing::new(envelope_decrypt_cached(password, envelope, cache)?);
    VaultRecord::from_json(&plaintext)
}
