//! User settings for passvault
//!
//! Generator defaults, the optional derived-key cache, audit logging and the
//! clipboard clear timeout.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::VaultPaths;
use crate::error::VaultError;
use crate::generator::GeneratorOptions;

/// Derived-key cache settings
///
/// Caching trades the one-PBKDF2-per-item cost of listing for keeping
/// derived keys in memory for the rest of the command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyCacheSettings {
    #[serde(default)]
    pub enabled: bool,

    /// Maximum number of keys held at once
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

fn default_cache_capacity() -> usize {
    256
}

impl Default for KeyCacheSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            capacity: default_cache_capacity(),
        }
    }
}

/// User settings for passvault
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Defaults for `passvault generate`
    #[serde(default)]
    pub generator: GeneratorOptions,

    #[serde(default)]
    pub key_cache: KeyCacheSettings,

    /// Whether item operations are written to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,

    /// Seconds before a copied secret is cleared from the clipboard (0 keeps it)
    #[serde(default = "default_clipboard_clear_secs")]
    pub clipboard_clear_secs: u64,
}

fn default_schema_version() -> u32 {
    1
}

fn default_audit_enabled() -> bool {
    true
}

fn default_clipboard_clear_secs() -> u64 {
    15
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            generator: GeneratorOptions::default(),
            key_cache: KeyCacheSettings::default(),
            audit_enabled: default_audit_enabled(),
            clipboard_clear_secs: default_clipboard_clear_secs(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &VaultPaths) -> Result<Self, VaultError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| VaultError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                VaultError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// How long a copied secret stays on the clipboard
    pub fn clipboard_clear_after(&self) -> Duration {
        Duration::from_secs(self.clipboard_clear_secs)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &VaultPaths) -> Result<(), VaultError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| VaultError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| VaultError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
