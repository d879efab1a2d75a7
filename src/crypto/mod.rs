//! Cryptographic core for passvault
//!
//! PBKDF2-HMAC-SHA256 key derivation feeding AES-256-GCM, wrapped into
//! base64 envelopes. The storage layer only ever sees envelopes.

pub mod encoding;
pub mod encryption;
pub mod envelope;
pub mod key_cache;
pub mod key_derivation;
pub mod random;
pub mod secure_memory;

pub use encoding::{from_text, to_text};
pub use encryption::{decrypt, encrypt, SealedData};
pub use envelope::{
    envelope_decrypt, envelope_decrypt_cached, envelope_encrypt, open_record, open_record_cached,
    seal_record, Envelope,
};
pub use key_cache::KeyCache;
pub use key_derivation::{derive_key, generate_salt, DerivedKey, PBKDF2_ITERATIONS};
pub use secure_memory::MasterPassword;
