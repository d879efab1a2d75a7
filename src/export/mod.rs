//! Export functionality for passvault
//!
//! - **JSON / YAML**: encrypted backup of every stored item
//! - **CSV**: decrypted records, for moving to another password manager
//!
//! JSON and YAML backups are read back with [`read_backup`].

pub mod csv;
pub mod json;
pub mod restore;
pub mod yaml;

pub use self::csv::export_records_csv;
pub use json::{export_backup_json, parse_backup_json, VaultBackup, EXPORT_SCHEMA_VERSION};
pub use restore::{check_schema, read_backup};
pub use yaml::{export_backup_yaml, parse_backup_yaml};

use std::str::FromStr;

use crate::error::VaultError;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
    Csv,
}

impl ExportFormat {
    /// Whether the output contains plaintext secrets
    pub fn is_plaintext(&self) -> bool {
        matches!(self, Self::Csv)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "csv" => Ok(Self::Csv),
            other => Err(VaultError::Export(format!(
                "Unknown export format '{}'. Use json, yaml or csv",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("yml".parse::<ExportFormat>().unwrap(), ExportFormat::Yaml);
        assert!("csv".parse::<ExportFormat>().unwrap().is_plaintext());
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
