//! Service layer for passvault
//!
//! The service layer provides business logic on top of the storage layer:
//! validation, sealing and opening records, and audit logging.

pub mod vault;

pub use vault::{RestoreSummary, UnlockedEntry, UnlockedVault, VaultService};
