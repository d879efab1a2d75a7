//! Custom error types for passvault
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for passvault operations
#[derive(Error, Debug)]
pub enum VaultError {
    /// Malformed salt/iv length or otherwise unusable crypto input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Authentication tag mismatch.
    ///
    /// Carries no detail. A wrong password and tampered ciphertext are
    /// indistinguishable to the caller.
    #[error("Decryption failed: wrong password or corrupted data")]
    DecryptionFailed,

    /// Envelope fields missing or not valid base64
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The OS random source could not be read
    #[error("Random source unavailable: {0}")]
    RandomSourceUnavailable(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Clipboard access errors
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl VaultError {
    /// Create a "not found" error for vault items
    pub fn item_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Vault item",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an authentication failure
    pub fn is_decryption_failed(&self) -> bool {
        matches!(self, Self::DecryptionFailed)
    }
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for passvault operations
pub type VaultResult<T> = Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VaultError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_decryption_failed_is_generic() {
        let err = VaultError::DecryptionFailed;
        assert_eq!(
            err.to_string(),
            "Decryption failed: wrong password or corrupted data"
        );
        assert!(err.is_decryption_failed());
    }

    #[test]
    fn test_not_found_error() {
        let err = VaultError::item_not_found("itm-1234abcd");
        assert_eq!(err.to_string(), "Vault item not found: itm-1234abcd");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let vault_err: VaultError = io_err.into();
        assert!(matches!(vault_err, VaultError::Io(_)));
    }
}
