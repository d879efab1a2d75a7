//! Vault item repository for JSON storage
//!
//! Manages loading and saving encrypted items to vault.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::debug;

use crate::error::VaultError;
use crate::models::{VaultItem, VaultItemId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable vault file structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct VaultData {
    items: Vec<VaultItem>,
}

/// Repository for vault item persistence
pub struct ItemRepository {
    path: PathBuf,
    data: RwLock<HashMap<VaultItemId, VaultItem>>,
}

impl ItemRepository {
    /// Create a new item repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load items from disk
    pub fn load(&self) -> Result<(), VaultError> {
        let file_data: VaultData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for item in file_data.items {
            data.insert(item.id, item);
        }

        debug!(path = %self.path.display(), count = data.len(), "loaded vault items");
        Ok(())
    }

    /// Save items to disk
    pub fn save(&self) -> Result<(), VaultError> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut items: Vec<_> = data.values().cloned().collect();
        items.sort_by_key(|i| i.created_at);

        debug!(path = %self.path.display(), count = items.len(), "saving vault items");
        write_json_atomic(&self.path, &VaultData { items })
    }

    /// Get an item by ID
    pub fn get(&self, id: VaultItemId) -> Result<Option<VaultItem>, VaultError> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all items, oldest first
    pub fn get_all(&self) -> Result<Vec<VaultItem>, VaultError> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut items: Vec<_> = data.values().cloned().collect();
        items.sort_by_key(|i| i.created_at);
        Ok(items)
    }

    /// Resolve a full UUID or short `itm-xxxxxxxx` reference to one item.
    ///
    /// An ambiguous prefix is a validation error rather than a guess.
    pub fn resolve(&self, query: &str) -> Result<VaultItem, VaultError> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let matches: Vec<&VaultItem> = data.values().filter(|item| item.id.matches(query)).collect();
        match matches.as_slice() {
            [item] => Ok((*item).clone()),
            [] => Err(VaultError::item_not_found(query)),
            _ => Err(VaultError::Validation(format!(
                "'{}' matches more than one item",
                query
            ))),
        }
    }

    /// Insert or update an item
    pub fn upsert(&self, item: VaultItem) -> Result<(), VaultError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(item.id, item);
        Ok(())
    }

    /// Delete an item, returning whether it existed
    pub fn delete(&self, id: VaultItemId) -> Result<bool, VaultError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id).is_some())
    }

    /// Number of stored items
    pub fn count(&self) -> Result<usize, VaultError> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
