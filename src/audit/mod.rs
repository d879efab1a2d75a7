//! Audit logging for passvault
//!
//! Records item create, update and delete operations plus vault-wide rekeys
//! and exports in an append-only JSONL log. Entries name items by id only;
//! no record contents or envelope fields are ever written.
//!
//! # Example
//!
//! ```rust,ignore
//! use passvault::audit::{AuditEntry, AuditLogger};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(item.id))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
