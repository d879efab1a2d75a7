//! Random password generator
//!
//! Builds a character pool from the selected classes and draws each
//! character uniformly from the OS RNG. An RNG failure surfaces as
//! `RandomSourceUnavailable`, never as a panic.

use serde::{Deserialize, Serialize};

use crate::crypto::random::random_bytes;
use crate::error::{VaultError, VaultResult};

pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const NUMBERS: &str = "0123456789";
pub const SYMBOLS: &str = "!@#$%^&*()_+[]{}|;:,.<>?";
/// Characters easily confused with each other in many fonts
pub const LOOKALIKES: &str = "Il1O0";

pub const MIN_LENGTH: usize = 8;
pub const MAX_LENGTH: usize = 128;

/// Generator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorOptions {
    #[serde(default = "default_length")]
    pub length: usize,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_true")]
    pub uppercase: bool,
    #[serde(default = "default_true")]
    pub numbers: bool,
    #[serde(default = "default_true")]
    pub symbols: bool,
    #[serde(default)]
    pub exclude_lookalikes: bool,
}

fn default_length() -> usize {
    16
}

fn default_true() -> bool {
    true
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: default_length(),
            lowercase: true,
            uppercase: true,
            numbers: true,
            symbols: true,
            exclude_lookalikes: false,
        }
    }
}

impl GeneratorOptions {
    /// The characters a password may be drawn from
    pub fn charset(&self) -> Vec<char> {
        let mut chars = String::new();
        if self.lowercase {
            chars.push_str(LOWERCASE);
        }
        if self.uppercase {
            chars.push_str(UPPERCASE);
        }
        if self.numbers {
            chars.push_str(NUMBERS);
        }
        if self.symbols {
            chars.push_str(SYMBOLS);
        }

        chars
            .chars()
            .filter(|c| !(self.exclude_lookalikes && LOOKALIKES.contains(*c)))
            .collect()
    }

    /// Check length bounds and that at least one class is selected
    pub fn validate(&self) -> VaultResult<()> {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&self.length) {
            return Err(VaultError::Validation(format!(
                "Password length must be between {} and {}, got {}",
                MIN_LENGTH, MAX_LENGTH, self.length
            )));
        }
        if self.charset().is_empty() {
            return Err(VaultError::Validation(
                "Select at least one character class".into(),
            ));
        }
        Ok(())
    }
}

/// Generate a password
pub fn generate_password(options: &GeneratorOptions) -> VaultResult<String> {
    options.validate()?;

    let charset = options.charset();
    let mut password = String::with_capacity(options.length);
    for _ in 0..options.length {
        password.push(charset[random_index(charset.len())?]);
    }

    Ok(password)
}

/// Uniform index in `0..bound` by rejection sampling over 32-bit draws
fn random_index(bound: usize) -> VaultResult<usize> {
    if bound == 0 {
        return Err(VaultError::Validation(
            "Select at least one character class".into(),
        ));
    }

    let bound = bound as u64;
    let range = 1u64 << 32;
    // Largest multiple of `bound` that fits; draws at or above it are retried
    let zone = range - range % bound;

    loop {
        let draw = u64::from(u32::from_le_bytes(random_bytes()?));
        if draw < zone {
            return Ok((draw % bound) as usize);
        }
    }
}
