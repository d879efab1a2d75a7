//! Vault service
//!
//! Business logic for vault items: sealing records on the way in, opening
//! them on the way out, and keeping the audit log in step. The master
//! password is passed to every call and never stored here.

use std::cell::RefCell;

use tracing::{debug, warn};

use crate::audit::AuditEntry;
use crate::crypto::{open_record, open_record_cached, seal_record, KeyCache, MasterPassword};
use crate::error::{VaultError, VaultResult};
use crate::models::{VaultItem, VaultItemId, VaultRecord};
use crate::storage::Storage;

/// A stored item together with its decrypted record
#[derive(Debug, Clone)]
pub struct UnlockedEntry {
    pub item: VaultItem,
    pub record: VaultRecord,
}

/// Result of decrypting the whole vault
#[derive(Debug, Default)]
pub struct UnlockedVault {
    /// Items that decrypted, oldest first
    pub entries: Vec<UnlockedEntry>,
    /// Items that did not open with the supplied password
    pub failed: Vec<VaultItemId>,
}

impl UnlockedVault {
    /// Whether every stored item opened
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of restoring items from a backup
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RestoreSummary {
    /// Items not present in the vault
    pub added: usize,
    /// Existing items replaced by a newer backup copy
    pub replaced: usize,
    /// Existing items at least as new as the backup copy
    pub skipped: usize,
}

/// Service for vault item management
pub struct VaultService<'a> {
    storage: &'a Storage,
    cache: RefCell<Option<KeyCache>>,
}

impl<'a> VaultService<'a> {
    /// Create a new vault service that derives a key for every operation
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            cache: RefCell::new(None),
        }
    }

    /// Keep derived keys for decryption for the lifetime of this service
    pub fn with_key_cache(self, capacity: usize) -> Self {
        *self.cache.borrow_mut() = Some(KeyCache::new(capacity));
        self
    }

    fn open(&self, password: &MasterPassword, item: &VaultItem) -> VaultResult<VaultRecord> {
        match self.cache.borrow_mut().as_mut() {
            Some(cache) => open_record_cached(password, &item.envelope, cache),
            None => open_record(password, &item.envelope),
        }
    }

    fn clear_cache(&self) {
        if let Some(cache) = self.cache.borrow_mut().as_mut() {
            cache.clear();
        }
    }

    /// Encrypt and store a new record
    pub fn add(&self, password: &MasterPassword, record: &VaultRecord) -> VaultResult<VaultItem> {
        record.validate()?;

        let item = VaultItem::new(seal_record(password, record)?);

        self.storage.items.upsert(item.clone())?;
        self.storage.items.save()?;
        self.storage.record(&AuditEntry::create(item.id));

        debug!(item = %item.id, "added vault item");
        Ok(item)
    }

    /// Decrypt every item.
    ///
    /// Items that fail to open are reported in `failed`. If the vault is
    /// non-empty and nothing opens, the password is wrong and the call fails.
    pub fn unlock_all(&self, password: &MasterPassword) -> VaultResult<UnlockedVault> {
        let items = self.storage.items.get_all()?;
        let total = items.len();
        let mut unlocked = UnlockedVault::default();

        for item in items {
            match self.open(password, &item) {
                Ok(record) => unlocked.entries.push(UnlockedEntry { item, record }),
                Err(err) => {
                    warn!(item = %item.id, error = %err, "could not decrypt vault item");
                    unlocked.failed.push(item.id);
                }
            }
        }

        if total > 0 && unlocked.entries.is_empty() {
            return Err(VaultError::DecryptionFailed);
        }

        debug!(
            opened = unlocked.entries.len(),
            failed = unlocked.failed.len(),
            "unlocked vault"
        );
        Ok(unlocked)
    }

    /// Decrypt the vault and keep entries whose title or username matches
    pub fn search(&self, password: &MasterPassword, query: &str) -> VaultResult<UnlockedVault> {
        let mut unlocked = self.unlock_all(password)?;
        unlocked.entries.retain(|e| e.record.matches(query));
        Ok(unlocked)
    }

    /// Find an item by full or short id
    pub fn find(&self, reference: &str) -> VaultResult<VaultItem> {
        self.storage.items.resolve(reference)
    }

    /// Find and decrypt one item
    pub fn get(&self, password: &MasterPassword, reference: &str) -> VaultResult<UnlockedEntry> {
        let item = self.find(reference)?;
        let record = self.open(password, &item)?;
        Ok(UnlockedEntry { item, record })
    }

    /// Replace an item's record.
    ///
    /// The current envelope must open with `password`; the new one gets a
    /// fresh salt and nonce.
    pub fn update(
        &self,
        password: &MasterPassword,
        id: VaultItemId,
        record: &VaultRecord,
    ) -> VaultResult<VaultItem> {
        record.validate()?;

        let mut item = self
            .storage
            .items
            .get(id)?
            .ok_or_else(|| VaultError::item_not_found(id.to_string()))?;

        // Refuse to overwrite an item the caller cannot read
        self.open(password, &item)?;

        item.replace_envelope(seal_record(password, record)?);

        self.storage.items.upsert(item.clone())?;
        self.storage.items.save()?;
        self.storage.record(&AuditEntry::update(item.id));

        debug!(item = %item.id, "updated vault item");
        Ok(item)
    }

    /// Delete an item
    pub fn delete(&self, id: VaultItemId) -> VaultResult<()> {
        if !self.storage.items.delete(id)? {
            return Err(VaultError::item_not_found(id.to_string()));
        }

        self.storage.items.save()?;
        self.storage.record(&AuditEntry::delete(id));

        debug!(item = %id, "deleted vault item");
        Ok(())
    }

    /// Re-encrypt every item under a new master password.
    ///
    /// All items must open with `old` before anything is written, so a
    /// partially rekeyed vault cannot happen. Returns the number of items.
    pub fn rekey(&self, old: &MasterPassword, new: &MasterPassword) -> VaultResult<usize> {
        let unlocked = self.unlock_all(old)?;
        if let Some(id) = unlocked.failed.first() {
            warn!(item = %id, "rekey aborted, item does not open with current password");
            return Err(VaultError::DecryptionFailed);
        }

        let mut resealed = Vec::with_capacity(unlocked.entries.len());
        for entry in &unlocked.entries {
            let mut item = entry.item.clone();
            item.replace_envelope(seal_record(new, &entry.record)?);
            resealed.push(item);
        }

        let count = resealed.len();
        for item in resealed {
            self.storage.items.upsert(item)?;
        }
        self.storage.items.save()?;
        self.storage.record(&AuditEntry::rekey(count));
        self.clear_cache();

        debug!(count, "rekeyed vault");
        Ok(count)
    }

    /// Merge items from a backup into the vault.
    ///
    /// Every backup item must open with `password`, otherwise nothing is
    /// written and the vault stays under a single master password. An item
    /// whose id already exists is replaced only when the backup copy was
    /// updated later.
    pub fn restore(
        &self,
        password: &MasterPassword,
        items: Vec<VaultItem>,
    ) -> VaultResult<RestoreSummary> {
        for item in &items {
            if let Err(err) = self.open(password, item) {
                warn!(item = %item.id, error = %err, "restore aborted, backup item does not open");
                return Err(err);
            }
        }

        let mut summary = RestoreSummary::default();
        for item in items {
            match self.storage.items.get(item.id)? {
                Some(existing) if existing.updated_at >= item.updated_at => summary.skipped += 1,
                Some(_) => {
                    self.storage.items.upsert(item)?;
                    summary.replaced += 1;
                }
                None => {
                    self.storage.items.upsert(item)?;
                    summary.added += 1;
                }
            }
        }

        if summary.added + summary.replaced > 0 {
            self.storage.items.save()?;
        }
        self.storage.record(&AuditEntry::import(
            summary.added,
            summary.replaced,
            summary.skipped,
        ));

        debug!(?summary, "restored backup");
        Ok(summary)
    }

    /// Check that `password` opens the most recent item.
    ///
    /// Succeeds trivially on an empty vault. Used before writing so a
    /// mistyped password does not leave items nobody can read.
    pub fn verify_password(&self, password: &MasterPassword) -> VaultResult<()> {
        let latest = self
            .storage
            .items
            .get_all()?
            .into_iter()
            .max_by_key(|item| item.created_at);

        match latest {
            Some(item) => self.open(password, &item).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Number of stored items
    pub fn count(&self) -> VaultResult<usize> {
        self.storage.items.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditLogger, Operation};
    use crate::config::paths::VaultPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn pw(s: &str) -> MasterPassword {
        MasterPassword::new(s)
    }

    fn gmail() -> VaultRecord {
        VaultRecord::new("Gmail", "me@x.com", "Secr3t!")
            .with_url("https://gmail.com")
            .with_notes("")
    }

    #[test]
    fn test_add_and_get() {
        let (_temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage);

        let item = service.add(&pw("hunter2"), &gmail()).unwrap();
        let entry = service.get(&pw("hunter2"), &item.id.to_string()).unwrap();

        assert_eq!(entry.record, gmail());
        assert_eq!(service.count().unwrap(), 1);
    }

    #[test]
    fn test_add_rejects_empty_title() {
        let (_temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage);

        let err = service
            .add(&pw("pw"), &VaultRecord::new("", "u", "p"))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_wrong_password_on_get() {
        let (_temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage);

        let item = service.add(&pw("hunter2"), &gmail()).unwrap();
        let err = service.get(&pw("hunter3"), &item.id.to_string()).unwrap_err();

        assert!(err.is_decryption_failed());
    }

    #[test]
    fn test_unlock_all_reports_failures() {
        let (_temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage);

        service.add(&pw("right"), &gmail()).unwrap();
        let stray = service
            .add(&pw("other"), &VaultRecord::new("Bank", "me", "1234"))
            .unwrap();

        let unlocked = service.unlock_all(&pw("right")).unwrap();
        assert_eq!(unlocked.entries.len(), 1);
        assert_eq!(unlocked.failed, vec![stray.id]);
    }

    #[test]
    fn test_unlock_all_wrong_password_fails() {
        let (_temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage);

        service.add(&pw("right"), &gmail()).unwrap();

        let err = service.unlock_all(&pw("wrong")).unwrap_err();
        assert!(err.is_decryption_failed());
    }

    #[test]
    fn test_verify_password() {
        let (_temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage);

        assert!(service.verify_password(&pw("anything")).is_ok());

        service.add(&pw("hunter2"), &gmail()).unwrap();
        assert!(service.verify_password(&pw("hunter2")).is_ok());
        assert!(service
            .verify_password(&pw("hunter3"))
            .unwrap_err()
            .is_decryption_failed());
    }

    #[test]
    fn test_unlock_empty_vault() {
        let (_temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage);

        let unlocked = service.unlock_all(&pw("anything")).unwrap();
        assert!(unlocked.entries.is_empty());
        assert!(unlocked.failed.is_empty());
    }

    #[test]
    fn test_search() {
        let (_temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage);

        service.add(&pw("pw"), &gmail()).unwrap();
        service
            .add(&pw("pw"), &VaultRecord::new("GitHub", "octocat", "x"))
            .unwrap();

        let found = service.search(&pw("pw"), "octo").unwrap();
        assert_eq!(found.entries.len(), 1);
        assert_eq!(found.entries[0].record.title, "GitHub");
    }

    #[test]
    fn test_update_reseals() {
        let (_temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage);

        let item = service.add(&pw("pw"), &gmail()).unwrap();

        let mut changed = gmail();
        changed.password = "N3wSecr3t!".into();
        let updated = service.update(&pw("pw"), item.id, &changed).unwrap();

        assert_ne!(updated.envelope.salt, item.envelope.salt);
        assert_ne!(updated.envelope.iv, item.envelope.iv);
        assert_eq!(updated.created_at, item.created_at);

        let entry = service.get(&pw("pw"), &item.id.to_string()).unwrap();
        assert_eq!(entry.record.password, "N3wSecr3t!");
    }

    #[test]
    fn test_update_requires_current_password() {
        let (_temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage);

        let item = service.add(&pw("pw"), &gmail()).unwrap();
        let err = service.update(&pw("nope"), item.id, &gmail()).unwrap_err();

        assert!(err.is_decryption_failed());
        let stored = storage.items.get(item.id).unwrap().unwrap();
        assert_eq!(stored.envelope, item.envelope);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage);

        let item = service.add(&pw("pw"), &gmail()).unwrap();
        service.delete(item.id).unwrap();

        assert_eq!(service.count().unwrap(), 0);
        assert!(service.delete(item.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_rekey() {
        let (_temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage);

        service.add(&pw("old"), &gmail()).unwrap();
        service
            .add(&pw("old"), &VaultRecord::new("Bank", "me", "1234"))
            .unwrap();

        assert_eq!(service.rekey(&pw("old"), &pw("new")).unwrap(), 2);

        assert_eq!(service.unlock_all(&pw("new")).unwrap().entries.len(), 2);
        assert!(service.unlock_all(&pw("old")).is_err());
    }

    #[test]
    fn test_rekey_is_all_or_nothing() {
        let (_temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage);

        let good = service.add(&pw("old"), &gmail()).unwrap();
        service
            .add(&pw("stray"), &VaultRecord::new("Bank", "me", "1234"))
            .unwrap();

        let err = service.rekey(&pw("old"), &pw("new")).unwrap_err();
        assert!(err.is_decryption_failed());

        let stored = storage.items.get(good.id).unwrap().unwrap();
        assert_eq!(stored.envelope, good.envelope);
    }

    #[test]
    fn test_key_cache_gives_same_results() {
        let (_temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage).with_key_cache(8);

        service.add(&pw("pw"), &gmail()).unwrap();

        let first = service.unlock_all(&pw("pw")).unwrap();
        let second = service.unlock_all(&pw("pw")).unwrap();
        assert_eq!(first.entries[0].record, second.entries[0].record);

        // A cached key for one password must not open items for another
        assert!(service.unlock_all(&pw("other")).is_err());
    }

    #[test]
    fn test_mixed_passwords_leave_vault_incomplete() {
        let (_temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage);

        service.add(&pw("a"), &VaultRecord::new("One", "", "x")).unwrap();
        service.add(&pw("b"), &VaultRecord::new("Two", "", "y")).unwrap();

        let unlocked = service.unlock_all(&pw("a")).unwrap();
        assert!(!unlocked.is_complete());
        assert_eq!(unlocked.entries.len(), 1);
        assert_eq!(unlocked.failed.len(), 1);

        service.add(&pw("a"), &VaultRecord::new("Three", "", "z")).unwrap();
        assert!(!service.unlock_all(&pw("a")).unwrap().is_complete());
    }

    #[test]
    fn test_restore_adds_and_skips() {
        let (_source_dir, source) = create_test_storage();
        let source_service = VaultService::new(&source);
        let gmail_item = source_service.add(&pw("pw"), &gmail()).unwrap();
        source_service
            .add(&pw("pw"), &VaultRecord::new("Bank", "me", "1234"))
            .unwrap();
        let backup = source.items.get_all().unwrap();

        let (_temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage);

        let first = service.restore(&pw("pw"), backup.clone()).unwrap();
        assert_eq!(first, RestoreSummary { added: 2, replaced: 0, skipped: 0 });
        assert_eq!(service.get(&pw("pw"), &gmail_item.id.to_string()).unwrap().record, gmail());

        let second = service.restore(&pw("pw"), backup).unwrap();
        assert_eq!(second, RestoreSummary { added: 0, replaced: 0, skipped: 2 });
        assert_eq!(service.count().unwrap(), 2);
    }

    #[test]
    fn test_restore_replaces_older_copy() {
        let (_temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage);

        let item = service.add(&pw("pw"), &gmail()).unwrap();
        let stale = storage.items.get(item.id).unwrap().unwrap();
        let mut newer = stale.clone();
        newer.replace_envelope(
            crate::crypto::seal_record("pw", &VaultRecord::new("Gmail", "me", "N3wer!")).unwrap(),
        );
        newer.updated_at = stale.updated_at + chrono::Duration::seconds(60);

        let summary = service.restore(&pw("pw"), vec![newer]).unwrap();
        assert_eq!(summary.replaced, 1);
        assert_eq!(
            service.get(&pw("pw"), &item.id.to_string()).unwrap().record.password,
            "N3wer!"
        );
    }

    #[test]
    fn test_restore_is_all_or_nothing() {
        let (_source_dir, source) = create_test_storage();
        let source_service = VaultService::new(&source);
        source_service.add(&pw("pw"), &gmail()).unwrap();
        source_service
            .add(&pw("other"), &VaultRecord::new("Bank", "me", "1234"))
            .unwrap();

        let (_temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage);

        let err = service
            .restore(&pw("pw"), source.items.get_all().unwrap())
            .unwrap_err();
        assert!(err.is_decryption_failed());
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_unwritable_audit_log_does_not_fail_writes() {
        let (temp_dir, storage) = create_test_storage();
        std::fs::create_dir(temp_dir.path().join("audit.log")).unwrap();
        let service = VaultService::new(&storage);

        let item = service.add(&pw("pw"), &gmail()).unwrap();
        service.update(&pw("pw"), item.id, &gmail()).unwrap();
        service.delete(item.id).unwrap();
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_audit_entries_written() {
        let (temp_dir, storage) = create_test_storage();
        let service = VaultService::new(&storage);

        let item = service.add(&pw("pw"), &gmail()).unwrap();
        service.update(&pw("pw"), item.id, &gmail()).unwrap();
        service.delete(item.id).unwrap();

        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        let ops: Vec<_> = logger
            .read_all()
            .unwrap()
            .into_iter()
            .map(|e| e.operation)
            .collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Update, Operation::Delete]);

        let raw = std::fs::read_to_string(temp_dir.path().join("audit.log")).unwrap();
        assert!(!raw.contains("Secr3t!"));
        assert!(!raw.contains("Gmail"));
        assert!(!raw.contains(&item.envelope.ciphertext));
    }
}
