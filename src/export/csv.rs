//! CSV export of decrypted records
//!
//! The output is plaintext. Callers are expected to warn the user.

use crate::error::{VaultError, VaultResult};
use crate::services::UnlockedVault;
use std::io::Write;

/// Write decrypted records as CSV (`title,username,password,url,notes`)
pub fn export_records_csv<W: Write>(vault: &UnlockedVault, writer: W) -> VaultResult<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["title", "username", "password", "url", "notes"])
        .map_err(|e| VaultError::Export(e.to_string()))?;

    for entry in &vault.entries {
        let record = &entry.record;
        csv_writer
            .write_record([
                record.title.as_str(),
                record.username.as_str(),
                record.password.as_str(),
                record.url.as_deref().unwrap_or(""),
                record.notes.as_deref().unwrap_or(""),
            ])
            .map_err(|e| VaultError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| VaultError::Export(e.to_string()))?;

    Ok(vault.entries.len())
}
