//! Storage layer for passvault
//!
//! JSON file storage with atomic writes. Only encrypted items reach disk.

pub mod file_io;
pub mod items;

pub use file_io::{read_json, write_json_atomic};
pub use items::ItemRepository;

use tracing::warn;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::VaultPaths;
use crate::error::VaultError;

/// Main storage coordinator
pub struct Storage {
    paths: VaultPaths,
    pub items: ItemRepository,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Create a new Storage instance with audit logging on
    pub fn new(paths: VaultPaths) -> Result<Self, VaultError> {
        paths.ensure_directories()?;

        Ok(Self {
            items: ItemRepository::new(paths.vault_file()),
            audit: Some(AuditLogger::new(paths.audit_log())),
            paths,
        })
    }

    /// Turn audit logging on or off
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit = enabled.then(|| AuditLogger::new(self.paths.audit_log()));
        self
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &VaultPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), VaultError> {
        self.items.load()
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), VaultError> {
        self.items.save()
    }

    /// Record an audit entry if auditing is enabled
    pub fn log(&self, entry: &AuditEntry) -> Result<(), VaultError> {
        match &self.audit {
            Some(logger) => logger.log(entry),
            None => Ok(()),
        }
    }

    /// Record an audit entry for a change that is already on disk.
    ///
    /// The change cannot be rolled back at this point, so a failed audit
    /// write is logged and does not fail the operation.
    pub fn record(&self, entry: &AuditEntry) {
        if let Err(err) = self.log(entry) {
            warn!(error = %err, operation = %entry.operation, "failed to write audit entry");
        }
    }

    /// Check if the vault has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
