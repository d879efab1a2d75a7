//! Reading encrypted backups back in
//!
//! Accepts the JSON and YAML backups written by `passvault export`. The
//! format is chosen from the file extension (`.yaml`/`.yml`, anything else
//! is JSON). Merging the items into the vault is the vault service's job.

use std::fs;
use std::path::Path;

use crate::error::{VaultError, VaultResult};

use super::json::{parse_backup_json, VaultBackup, EXPORT_SCHEMA_VERSION};
use super::yaml::parse_backup_yaml;

/// Read and validate a backup file
pub fn read_backup(path: &Path) -> VaultResult<VaultBackup> {
    let contents = fs::read_to_string(path)
        .map_err(|e| VaultError::Io(format!("Failed to read backup file: {}", e)))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    let backup = if is_yaml {
        parse_backup_yaml(&contents)?
    } else {
        parse_backup_json(&contents)?
    };

    check_schema(&backup)?;
    Ok(backup)
}

/// Reject backups written by an incompatible schema version
pub fn check_schema(backup: &VaultBackup) -> VaultResult<()> {
    let major = |version: &str| version.split('.').next().map(str::to_owned);

    if major(&backup.schema_version) != major(EXPORT_SCHEMA_VERSION) {
        return Err(VaultError::Export(format!(
            "Unsupported backup schema version {} (expected {}.x)",
            backup.schema_version,
            major(EXPORT_SCHEMA_VERSION).unwrap_or_default()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::VaultPaths;
    use crate::crypto::MasterPassword;
    use crate::export::{export_backup_json, export_backup_yaml};
    use crate::models::VaultRecord;
    use crate::services::VaultService;
    use crate::storage::Storage;
    use tempfile::TempDir;

    fn storage_with_item(temp_dir: &TempDir) -> Storage {
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        VaultService::new(&storage)
            .add(&MasterPassword::new("pw"), &VaultRecord::new("Gmail", "me", "Secr3t!"))
            .unwrap();
        storage
    }

    #[test]
    fn test_reads_json_and_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let storage = storage_with_item(&temp_dir);

        let json_path = temp_dir.path().join("backup.json");
        let mut json = Vec::new();
        export_backup_json(&storage, &mut json).unwrap();
        fs::write(&json_path, json).unwrap();

        let yaml_path = temp_dir.path().join("backup.YML");
        let mut yaml = Vec::new();
        export_backup_yaml(&storage, &mut yaml).unwrap();
        fs::write(&yaml_path, yaml).unwrap();

        let from_json = read_backup(&json_path).unwrap();
        let from_yaml = read_backup(&yaml_path).unwrap();
        assert_eq!(from_json.items, from_yaml.items);
        assert_eq!(from_json.items.len(), 1);
    }

    #[test]
    fn test_rejects_future_schema() {
        let temp_dir = TempDir::new().unwrap();
        let storage = storage_with_item(&temp_dir);

        let mut backup = VaultBackup::from_storage(&storage).unwrap();
        assert!(check_schema(&backup).is_ok());

        backup.schema_version = "1.4.0".into();
        assert!(check_schema(&backup).is_ok());

        backup.schema_version = "2.0.0".into();
        assert!(matches!(check_schema(&backup), Err(VaultError::Export(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_backup(&temp_dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, VaultError::Io(_)));
    }

    #[test]
    fn test_garbage_is_export_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("backup.json");
        fs::write(&path, "not a backup").unwrap();

        assert!(matches!(read_backup(&path), Err(VaultError::Export(_))));
    }
}
