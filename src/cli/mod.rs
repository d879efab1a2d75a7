//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod generate;
pub mod item;
pub mod prompt;
pub mod vault;

pub use generate::{handle_generate_command, GenerateArgs};
pub use item::{handle_item_command, ItemCommands};
pub use prompt::PasswordSource;
pub use vault::{
    handle_audit, handle_config, handle_export, handle_import, handle_init, handle_rekey,
};
