//! Strongly-typed ID wrappers
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Display prefix of the short form
            pub const PREFIX: &'static str = $display_prefix;

            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse an ID from a full UUID string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }

            /// Whether `query` names this ID, either as a full UUID or as a
            /// (possibly prefixed) leading fragment such as `itm-1a2b3c4d`
            pub fn matches(&self, query: &str) -> bool {
                let query = query.trim();
                let fragment = query.strip_prefix(Self::PREFIX).unwrap_or(query);
                !fragment.is_empty() && self.0.to_string().starts_with(&fragment.to_lowercase())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", Self::PREFIX, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix(Self::PREFIX).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(VaultItemId, "itm-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = VaultItemId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("itm-"));
        assert_eq!(display.len(), 12); // "itm-" + 8 chars
    }

    #[test]
    fn test_id_serialization() {
        let id = VaultItemId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: VaultItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_id_parse() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id = VaultItemId::parse(uuid_str).unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);

        let prefixed: VaultItemId = format!("itm-{}", uuid_str).parse().unwrap();
        assert_eq!(prefixed, id);
    }

    #[test]
    fn test_matches_short_form() {
        let id = VaultItemId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert!(id.matches("itm-550e8400"));
        assert!(id.matches("550E84"));
        assert!(id.matches(&id.to_string()));
        assert!(!id.matches("itm-"));
        assert!(!id.matches("itm-deadbeef"));
    }

    #[test]
    fn test_prefix_drives_short_form() {
        let id = VaultItemId::new();
        let short = id.to_string();
        assert!(short.starts_with(VaultItemId::PREFIX));
        assert!(id.matches(&short[VaultItemId::PREFIX.len()..]));
    }
}
