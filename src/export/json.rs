//! JSON backup export
//!
//! Writes every stored item exactly as it sits on disk, envelopes and all.
//! The backup can be restored by anyone holding the master password and by
//! no one else.

use crate::error::{VaultError, VaultResult};
use crate::models::VaultItem;
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Encrypted vault backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultBackup {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// All items, still encrypted
    pub items: Vec<VaultItem>,
}

impl VaultBackup {
    /// Snapshot the current storage
    pub fn from_storage(storage: &Storage) -> VaultResult<Self> {
        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            items: storage.items.get_all()?,
        })
    }
}

/// Export the encrypted vault as pretty JSON
pub fn export_backup_json<W: Write>(storage: &Storage, writer: &mut W) -> VaultResult<usize> {
    let backup = VaultBackup::from_storage(storage)?;

    serde_json::to_writer_pretty(&mut *writer, &backup)
        .map_err(|e| VaultError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| VaultError::Export(e.to_string()))?;

    Ok(backup.items.len())
}

/// Parse a JSON backup
pub fn parse_backup_json(json_str: &str) -> VaultResult<VaultBackup> {
    serde_json::from_str(json_str).map_err(|e| VaultError::Export(e.to_string()))
}
