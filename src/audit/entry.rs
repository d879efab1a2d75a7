//! Audit entry data structures
//!
//! Entries identify *what* happened to *which* item. They never carry
//! record contents or envelope fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::VaultItemId;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Item was created
    Create,
    /// Item was re-encrypted with new contents
    Update,
    /// Item was deleted
    Delete,
    /// Every item was re-encrypted under a new master password
    Rekey,
    /// Vault contents were exported
    Export,
    /// Items were restored from a backup
    Import,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Rekey => write!(f, "REKEY"),
            Operation::Export => write!(f, "EXPORT"),
            Operation::Import => write!(f, "IMPORT"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Type of operation performed
    pub operation: Operation,

    /// Affected item, absent for vault-wide operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<VaultItemId>,

    /// Short non-secret note (e.g. "12 items", "format=csv")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AuditEntry {
    fn new(operation: Operation, item_id: Option<VaultItemId>, detail: Option<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            item_id,
            detail,
        }
    }

    /// Entry for a newly created item
    pub fn create(item_id: VaultItemId) -> Self {
        Self::new(Operation::Create, Some(item_id), None)
    }

    /// Entry for an updated item
    pub fn update(item_id: VaultItemId) -> Self {
        Self::new(Operation::Update, Some(item_id), None)
    }

    /// Entry for a deleted item
    pub fn delete(item_id: VaultItemId) -> Self {
        Self::new(Operation::Delete, Some(item_id), None)
    }

    /// Entry for a vault-wide rekey
    pub fn rekey(item_count: usize) -> Self {
        Self::new(Operation::Rekey, None, Some(format!("{} items", item_count)))
    }

    /// Entry for an export
    pub fn export(format: &str, item_count: usize) -> Self {
        Self::new(
            Operation::Export,
            None,
            Some(format!("format={} items={}", format, item_count)),
        )
    }

    /// Entry for a backup restore
    pub fn import(added: usize, replaced: usize, skipped: usize) -> Self {
        Self::new(
            Operation::Import,
            None,
            Some(format!(
                "added={} replaced={} skipped={}",
                added, replaced, skipped
            )),
        )
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation
        );

        if let Some(id) = &self.item_id {
            output.push_str(&format!(" {}", id));
        }

        if let Some(detail) = &self.detail {
            output.push_str(&format!(" ({})", detail));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Rekey.to_string(), "REKEY");
    }

    #[test]
    fn test_create_entry() {
        let id = VaultItemId::new();
        let entry = AuditEntry::create(id);

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.item_id, Some(id));
        assert!(entry.detail.is_none());
    }

    #[test]
    fn test_serialization_shape() {
        let entry = AuditEntry::rekey(3);
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["operation"], "rekey");
        assert_eq!(value["detail"], "3 items");
        assert!(value.get("item_id").is_none());
    }

    #[test]
    fn test_import_entry() {
        let entry = AuditEntry::import(2, 1, 0);
        assert_eq!(entry.operation, Operation::Import);
        assert_eq!(
            entry.format_human_readable().split_once("] ").unwrap().1,
            "IMPORT (added=2 replaced=1 skipped=0)"
        );
    }

    #[test]
    fn test_human_readable_format() {
        let id = VaultItemId::new();
        let formatted = AuditEntry::delete(id).format_human_readable();

        assert!(formatted.contains("DELETE"));
        assert!(formatted.contains(&id.to_string()));
    }
}
