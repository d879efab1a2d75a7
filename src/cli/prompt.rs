//! Master password input
//!
//! The password comes from `PASSVAULT_MASTER_PASSWORD` when set (scripts,
//! tests), otherwise from a hidden terminal prompt. Neither it nor an item
//! secret is ever accepted as a plain command-line argument.

use std::io::BufRead;

use zeroize::Zeroizing;

use crate::crypto::MasterPassword;
use crate::error::{VaultError, VaultResult};

/// Environment variable holding the master password
pub const MASTER_PASSWORD_ENV: &str = "PASSVAULT_MASTER_PASSWORD";

/// Environment variable holding the new master password for `rekey`
pub const NEW_MASTER_PASSWORD_ENV: &str = "PASSVAULT_NEW_MASTER_PASSWORD";

/// Where master passwords are read from
#[derive(Debug, Default)]
pub struct PasswordSource {
    preset: Option<MasterPassword>,
    preset_new: Option<MasterPassword>,
}

impl PasswordSource {
    /// Build from optional preset values (normally filled from the environment)
    pub fn new(preset: Option<String>, preset_new: Option<String>) -> Self {
        Self {
            preset: preset.map(MasterPassword::new),
            preset_new: preset_new.map(MasterPassword::new),
        }
    }

    /// Read the master password from the environment
    pub fn from_env() -> Self {
        Self::new(
            std::env::var(MASTER_PASSWORD_ENV).ok(),
            std::env::var(NEW_MASTER_PASSWORD_ENV).ok(),
        )
    }

    /// Whether a password is supplied without prompting
    pub fn is_preset(&self) -> bool {
        self.preset.is_some()
    }

    /// The current master password
    pub fn master(&self) -> VaultResult<MasterPassword> {
        match &self.preset {
            Some(password) => Ok(password.clone()),
            None => prompt("Master password: "),
        }
    }

    /// A new master password, confirmed when typed interactively
    pub fn new_master(&self) -> VaultResult<MasterPassword> {
        if let Some(password) = &self.preset_new {
            return Ok(password.clone());
        }

        loop {
            let first = prompt("New master password: ")?;
            if first.is_empty() {
                println!("Master password cannot be empty. Please try again.");
                continue;
            }

            let second = prompt("Confirm master password: ")?;
            if first != second {
                println!("Passwords do not match. Please try again.");
                continue;
            }

            return Ok(first);
        }
    }
}

/// Prompt for a secret without echo
pub fn prompt(message: &str) -> VaultResult<MasterPassword> {
    rpassword::prompt_password(message)
        .map(MasterPassword::new)
        .map_err(|e| VaultError::Io(format!("Failed to read password: {}", e)))
}

/// Prompt for an item secret without echo
pub fn prompt_secret(message: &str) -> VaultResult<Zeroizing<String>> {
    rpassword::prompt_password(message)
        .map(Zeroizing::new)
        .map_err(|e| VaultError::Io(format!("Failed to read password: {}", e)))
}

/// Read one secret line from `reader`, without the line ending
pub fn read_secret_line<R: BufRead>(mut reader: R) -> VaultResult<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    if reader.read_line(&mut line)? == 0 {
        return Err(VaultError::InvalidInput(
            "Expected a password on standard input".into(),
        ));
    }

    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(line)
}

/// Read one secret line from standard input
pub fn read_secret_stdin() -> VaultResult<Zeroizing<String>> {
    read_secret_line(std::io::stdin().lock())
}

/// Ask a yes/no question on stdin
pub fn confirm(message: &str) -> VaultResult<bool> {
    use std::io::Write;

    print!("{} (yes/no): ", message);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;

    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}
