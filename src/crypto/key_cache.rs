//! Bounded cache of derived keys for one unlocked session
//!
//! Listing a vault of N items costs N PBKDF2 runs. With the cache enabled,
//! keys derived while decrypting are kept (per salt) until the cache is
//! dropped or cleared, so re-reading the same items is cheap. The cache is
//! only consulted for decryption; encryption always draws a new salt.
//!
//! Keys held here are the exposure window: anyone who can read process
//! memory while the cache lives can decrypt the cached items without the
//! password.

use std::collections::{HashMap, VecDeque};

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::{VaultError, VaultResult};

use super::key_derivation::{derive_key, DerivedKey, SALT_SIZE};

/// Salt-keyed cache of derived keys, bound to a single password
pub struct KeyCache {
    capacity: usize,
    keys: HashMap<[u8; SALT_SIZE], DerivedKey>,
    /// Insertion order for FIFO eviction
    order: VecDeque<[u8; SALT_SIZE]>,
    /// SHA-256 of the password the cached keys belong to
    owner: Option<Zeroizing<[u8; 32]>>,
}

impl KeyCache {
    /// Create a cache holding at most `capacity` keys (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            keys: HashMap::new(),
            order: VecDeque::new(),
            owner: None,
        }
    }

    /// Number of cached keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Drop every cached key
    pub fn clear(&mut self) {
        // DerivedKey zeroizes itself on drop
        self.keys.clear();
        self.order.clear();
        self.owner = None;
    }

    /// Return the key for `salt`, deriving and caching it on a miss.
    ///
    /// A different password than the one the cache was filled with empties
    /// the cache first.
    pub fn get_or_derive(&mut self, password: &str, salt: &[u8]) -> VaultResult<&DerivedKey> {
        let salt: [u8; SALT_SIZE] = salt.try_into().map_err(|_| {
            VaultError::InvalidInput(format!(
                "Invalid salt size: expected {}, got {}",
                SALT_SIZE,
                salt.len()
            ))
        })?;

        let fingerprint = fingerprint(password);
        if self.owner.as_ref().map(|o| **o != *fingerprint).unwrap_or(false) {
            self.clear();
        }
        self.owner = Some(fingerprint);

        if !self.keys.contains_key(&salt) {
            let key = derive_key(password, &salt)?;
            if self.keys.len() >= self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.keys.remove(&oldest);
                }
            }
            self.keys.insert(salt, key);
            self.order.push_back(salt);
        }

        self.keys
            .get(&salt)
            .ok_or_else(|| VaultError::InvalidInput("Key cache lookup failed".to_string()))
    }
}

fn fingerprint(password: &str) -> Zeroizing<[u8; 32]> {
    let digest = Sha256::digest(password.as_bytes());
    let mut out = Zeroizing::new([0u8; 32]);
    out.copy_from_slice(&digest);
    out
}

impl std::fmt::Debug for KeyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyCache")
            .field("capacity", &self.capacity)
            .field("len", &self.keys.len())
            .finish()
    }
}
