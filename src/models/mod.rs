//! Core data models for passvault
//!
//! `VaultRecord` is the plaintext a user edits; `VaultItem` is the encrypted
//! form that storage persists.

pub mod ids;
pub mod item;
pub mod record;

pub use ids::VaultItemId;
pub use item::VaultItem;
pub use record::VaultRecord;
