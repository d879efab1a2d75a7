//! Secure memory handling for the master password
//!
//! The master password is passed explicitly into every operation and wiped
//! as soon as the caller drops it. Nothing in the crate stores it.

use std::fmt;
use std::ops::Deref;

use zeroize::Zeroizing;

/// The user's master password, zeroed on drop
///
/// Debug and Display never print the contents.
#[derive(Clone)]
pub struct MasterPassword {
    inner: Zeroizing<String>,
}

impl MasterPassword {
    /// Wrap a password
    pub fn new(s: impl Into<String>) -> Self {
        Self {
            inner: Zeroizing::new(s.into()),
        }
    }

    /// Get the password contents
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Deref for MasterPassword {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for MasterPassword {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<String> for MasterPassword {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for MasterPassword {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl PartialEq for MasterPassword {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Debug for MasterPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterPassword")
            .field("len", &self.inner.len())
            .finish()
    }
}

impl fmt::Display for MasterPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED {} bytes]", self.inner.len())
    }
}
