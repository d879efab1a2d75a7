//! YAML backup export
//!
//! Same content as the JSON backup, in a format that diffs well.

use crate::error::{VaultError, VaultResult};
use crate::export::json::VaultBackup;
use crate::storage::Storage;
use std::io::Write;

/// Export the encrypted vault as YAML
pub fn export_backup_yaml<W: Write>(storage: &Storage, writer: &mut W) -> VaultResult<usize> {
    let backup = VaultBackup::from_storage(storage)?;

    writeln!(writer, "# passvault encrypted backup")
        .map_err(|e| VaultError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", backup.exported_at)
        .map_err(|e| VaultError::Export(e.to_string()))?;
    writeln!(writer, "# Items can only be opened with the master password.")
        .map_err(|e| VaultError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| VaultError::Export(e.to_string()))?;

    serde_yaml::to_writer(&mut *writer, &backup).map_err(|e| VaultError::Export(e.to_string()))?;

    Ok(backup.items.len())
}

/// Parse a YAML backup
pub fn parse_backup_yaml(yaml_str: &str) -> VaultResult<VaultBackup> {
    serde_yaml::from_str(yaml_str).map_err(|e| VaultError::Export(e.to_string()))
}
