//! Path management for passvault
//!
//! ## Path Resolution Order
//!
//! 1. `PASSVAULT_DATA_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (`~/.config/passvault` on Linux, `~/Library/Application Support/passvault`
//!    on macOS, `%APPDATA%\passvault\config` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::VaultError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "PASSVAULT_DATA_DIR";

/// Manages all paths used by passvault
#[derive(Debug, Clone)]
pub struct VaultPaths {
    /// Base directory for all passvault data
    base_dir: PathBuf,
}

impl VaultPaths {
    /// Resolve the base directory from the environment or platform defaults
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, VaultError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create VaultPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to vault.json (encrypted items)
    pub fn vault_file(&self) -> PathBuf {
        self.data_dir().join("vault.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), VaultError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| VaultError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| VaultError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if passvault has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, VaultError> {
    ProjectDirs::from("", "", "passvault")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| VaultError::Config("Could not determine home directory".into()))
}
