//! Password generator CLI command

use clap::Args;
use zeroize::Zeroizing;

use super::item::copy_secret;
use crate::config::Settings;
use crate::error::VaultResult;
use crate::generator::{generate_password, GeneratorOptions};

/// Generator flags, layered over the configured defaults
#[derive(Args, Debug, Default, Clone)]
pub struct GenerateArgs {
    /// Password length (8-128)
    #[arg(short, long)]
    pub length: Option<usize>,

    /// Leave out lowercase letters
    #[arg(long)]
    pub no_lowercase: bool,

    /// Leave out uppercase letters
    #[arg(long)]
    pub no_uppercase: bool,

    /// Leave out digits
    #[arg(long)]
    pub no_numbers: bool,

    /// Leave out symbols
    #[arg(long)]
    pub no_symbols: bool,

    /// Skip characters that look alike (I, l, 1, O, 0)
    #[arg(long)]
    pub exclude_lookalikes: bool,

    /// Copy the password to the clipboard instead of printing it
    #[arg(short, long)]
    pub copy: bool,
}

impl GenerateArgs {
    /// Apply the flags on top of `defaults`
    pub fn options(&self, defaults: &GeneratorOptions) -> GeneratorOptions {
        GeneratorOptions {
            length: self.length.unwrap_or(defaults.length),
            lowercase: defaults.lowercase && !self.no_lowercase,
            uppercase: defaults.uppercase && !self.no_uppercase,
            numbers: defaults.numbers && !self.no_numbers,
            symbols: defaults.symbols && !self.no_symbols,
            exclude_lookalikes: defaults.exclude_lookalikes || self.exclude_lookalikes,
        }
    }
}

/// Handle `passvault generate`
pub fn handle_generate_command(settings: &Settings, args: GenerateArgs) -> VaultResult<()> {
    let password = Zeroizing::new(generate_password(&args.options(&settings.generator))?);

    if args.copy {
        copy_secret(settings, "Generated password", &password)
    } else {
        println!("{}", password.as_str());
        Ok(())
    }
}
