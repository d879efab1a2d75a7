//! passvault - encrypted password vault for the terminal
//!
//! Every stored item is sealed in an envelope: a key is derived from the
//! master password with PBKDF2-HMAC-SHA256 over a fresh random salt, and the
//! record is encrypted with AES-256-GCM under a fresh random nonce. The
//! envelope carries ciphertext, nonce and salt as base64 text. Nothing but
//! envelopes reaches disk, and the master password itself is never stored.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `crypto`: Key derivation, authenticated encryption, envelopes
//! - `models`: Vault items and the records sealed inside them
//! - `generator`: Random password generation
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `export`: Encrypted backups and CSV export
//! - `display`: Terminal formatting
//! - `clipboard`: Clipboard copy with automatic clear
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust
//! use passvault::crypto::{envelope_decrypt, envelope_encrypt};
//!
//! let envelope = envelope_encrypt("hunter2", "{\"title\":\"Gmail\"}").unwrap();
//! assert_eq!(
//!     envelope_decrypt("hunter2", &envelope).unwrap(),
//!     "{\"title\":\"Gmail\"}"
//! );
//! assert!(envelope_decrypt("hunter3", &envelope).is_err());
//! ```

pub mod audit;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod export;
pub mod generator;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{VaultError, VaultResult};
