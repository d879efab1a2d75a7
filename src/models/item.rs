//! Stored vault item
//!
//! The persisted unit: an id, timestamps, and the envelope fields flattened
//! next to them. No plaintext metadata is stored; the whole record lives
//! inside the envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::Envelope;

use super::ids::VaultItemId;

/// An encrypted vault item as written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultItem {
    /// Unique identifier
    pub id: VaultItemId,

    /// Encrypted record
    #[serde(flatten)]
    pub envelope: Envelope,

    /// When the item was created
    pub created_at: DateTime<Utc>,

    /// When the envelope was last replaced
    pub updated_at: DateTime<Utc>,
}

impl VaultItem {
    /// Create a new item around an envelope
    pub fn new(envelope: Envelope) -> Self {
        let now = Utc::now();
        Self {
            id: VaultItemId::new(),
            envelope,
            created_at: now,
            updated_at: now,
        }
    }

    /// Swap in a freshly sealed envelope
    pub fn replace_envelope(&mut self, envelope: Envelope) {
        self.envelope = envelope;
        self.updated_at = Utc::now();
    }
}
