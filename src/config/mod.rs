//! Configuration module for passvault
//!
//! - platform path resolution
//! - user settings persistence

pub mod paths;
pub mod settings;

pub use paths::VaultPaths;
pub use settings::{KeyCacheSettings, Settings};
