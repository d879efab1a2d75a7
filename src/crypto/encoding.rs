//! Base64 text encoding for binary envelope fields

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{VaultError, VaultResult};

/// Encode bytes as standard (padded) base64
pub fn to_text(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard base64 text
pub fn from_text(text: &str) -> VaultResult<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|e| VaultError::MalformedEnvelope(format!("Invalid base64: {}", e)))
}
