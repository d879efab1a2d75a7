//! Plaintext vault record
//!
//! This is what the user sees and edits. It only exists in memory; it is
//! serialized to canonical JSON and encrypted as a whole before storage.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{VaultError, VaultResult};

/// A decrypted vault entry
///
/// Field order is the canonical serialization order. Optional fields are
/// omitted when absent, so an empty-but-present `notes` survives a round trip
/// as `""` while a missing one stays missing. Every field is wiped on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct VaultRecord {
    /// Display title (e.g. "Gmail")
    pub title: String,

    /// Login name
    pub username: String,

    /// The secret itself
    pub password: String,

    /// Site URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl VaultRecord {
    /// Create a record with the required fields
    pub fn new(
        title: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            username: username.into(),
            password: password.into(),
            url: None,
            notes: None,
        }
    }

    /// Set the URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Replace the password, wiping the old one
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password.zeroize();
        self.password = password.into();
    }

    /// Replace the notes (`None` or empty clears them), wiping the old ones
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes.zeroize();
        self.notes = notes.filter(|n| !n.is_empty());
    }

    /// Validate the record before it is sealed
    pub fn validate(&self) -> VaultResult<()> {
        if self.title.trim().is_empty() {
            return Err(VaultError::Validation("Title cannot be empty".into()));
        }
        Ok(())
    }

    /// Canonical text form that gets encrypted
    pub fn to_canonical_json(&self) -> VaultResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the decrypted text form
    pub fn from_json(json: &str) -> VaultResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| VaultError::MalformedEnvelope(format!("Decrypted record is not valid: {}", e)))
    }

    /// Case-insensitive match on title or username
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query) || self.username.to_lowercase().contains(&query)
    }
}

impl fmt::Debug for VaultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultRecord")
            .field("title", &self.title)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("url", &self.url)
            .field("notes", &self.notes.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_field_order() {
        let record = VaultRecord::new("Gmail", "me@x.com", "Secr3t!")
            .with_url("https://gmail.com")
            .with_notes("");

        assert_eq!(
            record.to_canonical_json().unwrap(),
            r#"{"title":"Gmail","username":"me@x.com","password":"Secr3t!","url":"https://gmail.com","notes":""}"#
        );
    }

    #[test]
    fn test_absent_optionals_omitted() {
        let record = VaultRecord::new("t", "u", "p");
        assert_eq!(
            record.to_canonical_json().unwrap(),
            r#"{"title":"t","username":"u","password":"p"}"#
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let record = VaultRecord::new("t", "u", "p").with_notes("n");
        let parsed = VaultRecord::from_json(&record.to_canonical_json().unwrap()).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_parse_failure_is_malformed() {
        let err = VaultRecord::from_json("not json").unwrap_err();
        assert!(matches!(err, VaultError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_validate_title() {
        assert!(VaultRecord::new("  ", "u", "p").validate().unwrap_err().is_validation());
        assert!(VaultRecord::new("x", "", "").validate().is_ok());
    }

    #[test]
    fn test_matches() {
        let record = VaultRecord::new("GitHub", "octocat", "p");
        assert!(record.matches("git"));
        assert!(record.matches("OCTO"));
        assert!(!record.matches("gitlab"));
    }

    #[test]
    fn test_set_password_and_notes() {
        let mut record = VaultRecord::new("t", "u", "old").with_notes("n");

        record.set_password("new");
        assert_eq!(record.password, "new");

        record.set_notes(Some(String::new()));
        assert_eq!(record.notes, None);
        record.set_notes(Some("pin".into()));
        assert_eq!(record.notes.as_deref(), Some("pin"));
    }

    #[test]
    fn test_zeroize_clears_secrets() {
        let mut record = VaultRecord::new("t", "u", "hunter2").with_notes("pin 1234");
        record.zeroize();

        assert!(record.password.is_empty());
        assert!(record.title.is_empty());
        assert_eq!(record.notes, None);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let record = VaultRecord::new("t", "u", "hunter2").with_notes("pin 1234");
        let debug = format!("{:?}", record);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("1234"));
    }
}
