//! Vault-wide CLI commands
//!
//! Init, rekey, export, import, audit history and configuration display.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use super::item::vault_service;
use super::prompt::PasswordSource;
use crate::audit::{AuditEntry, AuditLogger};
use crate::config::{Settings, VaultPaths};
use crate::crypto::PBKDF2_ITERATIONS;
use crate::error::{VaultError, VaultResult};
use crate::export::{
    export_backup_json, export_backup_yaml, export_records_csv, read_backup, ExportFormat,
};
use crate::storage::Storage;

/// Handle `passvault init`
pub fn handle_init(storage: &Storage, settings: &Settings) -> VaultResult<()> {
    let paths = storage.paths();

    if paths.is_initialized() {
        println!("Vault already initialized at: {}", paths.base_dir().display());
        return Ok(());
    }

    println!("Initializing passvault at: {}", paths.base_dir().display());
    paths.ensure_directories()?;
    storage.save_all()?;
    settings.save(paths)?;

    println!("Initialization complete!");
    println!();
    println!("There is no account to create: the master password you type when");
    println!("adding your first item is the only key to the vault. It cannot be");
    println!("recovered if lost.");
    println!();
    println!("Run 'passvault add <title>' to store your first item.");
    Ok(())
}

/// Handle `passvault rekey`
pub fn handle_rekey(
    storage: &Storage,
    settings: &Settings,
    passwords: &PasswordSource,
) -> VaultResult<()> {
    let service = vault_service(storage, settings);

    let old = passwords.master()?;
    service.verify_password(&old)?;
    let new = passwords.new_master()?;
    if new.is_empty() {
        return Err(VaultError::InvalidInput(
            "New master password cannot be empty".into(),
        ));
    }

    let count = service.rekey(&old, &new)?;
    info!(count, "rekey complete");
    println!("Re-encrypted {} item(s) under the new master password.", count);
    Ok(())
}

/// Handle `passvault export`
pub fn handle_export(
    storage: &Storage,
    settings: &Settings,
    passwords: &PasswordSource,
    format: &str,
    output: Option<PathBuf>,
    force: bool,
) -> VaultResult<()> {
    let format: ExportFormat = format.parse()?;

    // Decrypt before touching the output so a wrong password leaves no file
    let unlocked = if format.is_plaintext() {
        let master = passwords.master()?;
        let vault = vault_service(storage, settings).unlock_all(&master)?;

        if !vault.is_complete() {
            eprintln!(
                "Warning: {} item(s) could not be decrypted with this password",
                vault.failed.len()
            );
            if !force {
                return Err(VaultError::Export(format!(
                    "{} item(s) would be missing from the CSV; re-run with --force to export the rest",
                    vault.failed.len()
                )));
            }
        }
        Some(vault)
    } else {
        None
    };

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(create_output(path, format)?)),
        None => Box::new(io::stdout().lock()),
    };

    let count = match (&unlocked, format) {
        (Some(vault), _) => export_records_csv(vault, &mut writer)?,
        (None, ExportFormat::Yaml) => export_backup_yaml(storage, &mut writer)?,
        (None, _) => export_backup_json(storage, &mut writer)?,
    };
    writer
        .flush()
        .map_err(|e| VaultError::Export(e.to_string()))?;

    storage.record(&AuditEntry::export(format.as_str(), count));

    if format.is_plaintext() {
        eprintln!("Warning: the CSV export contains every password in plaintext.");
        eprintln!("Store it somewhere safe and delete it when you are done.");
    }
    if let Some(path) = output {
        println!(
            "Exported {} item(s) as {} to: {}",
            count,
            format.as_str(),
            path.display()
        );
    }
    Ok(())
}

fn create_output(path: &Path, format: ExportFormat) -> VaultResult<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if format.is_plaintext() {
            options.mode(0o600);
        }
    }
    #[cfg(not(unix))]
    let _ = format;

    options.open(path).map_err(|e| {
        VaultError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })
}

/// Handle `passvault import`
pub fn handle_import(
    storage: &Storage,
    settings: &Settings,
    passwords: &PasswordSource,
    file: &Path,
) -> VaultResult<()> {
    let backup = read_backup(file)?;
    if backup.items.is_empty() {
        println!("Backup contains no items.");
        return Ok(());
    }

    let service = vault_service(storage, settings);
    let master = passwords.master()?;
    service.verify_password(&master)?;

    let summary = service.restore(&master, backup.items)?;
    info!(?summary, file = %file.display(), "import complete");
    println!("Imported from: {}", file.display());
    println!("  Added:    {}", summary.added);
    println!("  Replaced: {}", summary.replaced);
    println!("  Skipped:  {}", summary.skipped);
    Ok(())
}

/// Handle `passvault audit`
pub fn handle_audit(paths: &VaultPaths, limit: usize) -> VaultResult<()> {
    let logger = AuditLogger::new(paths.audit_log());
    let entries = logger.read_recent(limit)?;

    if entries.is_empty() {
        println!("No audit entries found.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}

/// Handle `passvault config`
pub fn handle_config(paths: &VaultPaths, settings: &Settings) -> VaultResult<()> {
    println!("passvault Configuration");
    println!("=======================");
    println!("Base directory: {}", paths.base_dir().display());
    println!("Vault file:     {}", paths.vault_file().display());
    println!("Settings file:  {}", paths.settings_file().display());
    println!("Audit log:      {}", paths.audit_log().display());
    println!();
    println!("Settings:");
    println!("  Audit logging:    {}", settings.audit_enabled);
    println!(
        "  Key cache:        {} (capacity {})",
        settings.key_cache.enabled, settings.key_cache.capacity
    );
    println!("  Generator length: {}", settings.generator.length);
    println!("  Clipboard clear:  {}s", settings.clipboard_clear_secs);
    println!();
    println!("Crypto: PBKDF2-HMAC-SHA256 ({} rounds) + AES-256-GCM", PBKDF2_ITERATIONS);
    Ok(())
}
