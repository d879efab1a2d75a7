//! Vault item CLI commands
//!
//! Implements add, list, show, edit and delete.

use clap::Subcommand;
use tracing::info;
use zeroize::Zeroizing;

use super::generate::GenerateArgs;
use super::prompt::{self, PasswordSource};
use crate::clipboard::{copy_with_auto_clear, ClearOutcome, SystemClipboard};
use crate::config::Settings;
use crate::display::{format_item_details, format_item_list};
use crate::error::VaultResult;
use crate::generator::generate_password;
use crate::models::VaultRecord;
use crate::services::VaultService;
use crate::storage::Storage;

/// Item subcommands
#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// Add a new item
    Add {
        /// Display name, e.g. "Gmail"
        title: String,
        /// Login name
        #[arg(short, long, default_value = "")]
        username: String,
        /// Read the secret from the first line of standard input instead of prompting
        #[arg(long, conflicts_with = "generate")]
        password_stdin: bool,
        /// Generate the secret with the configured generator
        #[arg(short, long)]
        generate: bool,
        /// Site URL
        #[arg(long)]
        url: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List items
    List {
        /// Only show items whose title or username contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one item
    Show {
        /// Item ID (full or short)
        id: String,
        /// Print the password instead of a mask
        #[arg(short, long)]
        reveal: bool,
        /// Copy the password to the clipboard, cleared after the configured timeout
        #[arg(short, long)]
        copy: bool,
    },
    /// Edit an item
    Edit {
        /// Item ID (full or short)
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New username
        #[arg(short, long)]
        username: Option<String>,
        /// Prompt for a new password
        #[arg(short, long, conflicts_with_all = ["password_stdin", "generate"])]
        password: bool,
        /// Read the new password from the first line of standard input
        #[arg(long, conflicts_with = "generate")]
        password_stdin: bool,
        /// Replace the password with a generated one
        #[arg(short, long)]
        generate: bool,
        /// New URL (empty to clear)
        #[arg(long)]
        url: Option<String>,
        /// New notes (empty to clear)
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Delete an item
    Delete {
        /// Item ID (full or short)
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Build the vault service the settings ask for
pub(crate) fn vault_service<'a>(storage: &'a Storage, settings: &Settings) -> VaultService<'a> {
    let service = VaultService::new(storage);
    if settings.key_cache.enabled {
        service.with_key_cache(settings.key_cache.capacity)
    } else {
        service
    }
}

/// Copy a secret to the system clipboard and wait for the auto-clear
pub(crate) fn copy_secret(settings: &Settings, label: &str, secret: &str) -> VaultResult<()> {
    let mut clipboard = SystemClipboard::new()?;
    let clear_after = settings.clipboard_clear_after();

    println!("{} copied to the clipboard.", label);
    if !clear_after.is_zero() {
        println!("Clearing in {} second(s)...", clear_after.as_secs());
    }

    match copy_with_auto_clear(&mut clipboard, secret, clear_after)? {
        ClearOutcome::Cleared => println!("Clipboard cleared."),
        ClearOutcome::Replaced => println!("Clipboard changed since the copy; left untouched."),
        ClearOutcome::Kept => {}
    }
    Ok(())
}

fn generated_secret(settings: &Settings) -> VaultResult<Zeroizing<String>> {
    generate_password(&GenerateArgs::default().options(&settings.generator)).map(Zeroizing::new)
}

/// Handle an item command
pub fn handle_item_command(
    storage: &Storage,
    settings: &Settings,
    passwords: &PasswordSource,
    cmd: ItemCommands,
) -> VaultResult<()> {
    let service = vault_service(storage, settings);

    match cmd {
        ItemCommands::Add {
            title,
            username,
            password_stdin,
            generate,
            url,
            notes,
        } => {
            let secret = if password_stdin {
                prompt::read_secret_stdin()?
            } else if generate {
                generated_secret(settings)?
            } else {
                prompt::prompt_secret("Item password: ")?
            };

            let master = if service.count()? == 0 && !passwords.is_preset() {
                passwords.new_master()?
            } else {
                passwords.master()?
            };
            service.verify_password(&master)?;

            let mut record = VaultRecord::new(title, username, secret.as_str());
            record.url = url.filter(|u| !u.is_empty());
            record.set_notes(notes);

            let item = service.add(&master, &record)?;

            println!("Added item: {}", record.title);
            println!("  ID: {}", item.id);
            if generate {
                println!(
                    "  Password generated. Use 'passvault show {} --reveal' to see it.",
                    item.id
                );
            }
        }

        ItemCommands::List { search } => {
            if service.count()? == 0 {
                println!("No vault items found.");
                return Ok(());
            }

            let master = passwords.master()?;
            let unlocked = match search.as_deref() {
                Some(query) => service.search(&master, query)?,
                None => service.unlock_all(&master)?,
            };

            println!("{}", format_item_list(&unlocked.entries));
            if !unlocked.failed.is_empty() {
                eprintln!(
                    "Warning: {} item(s) could not be decrypted with this password",
                    unlocked.failed.len()
                );
            }
        }

        ItemCommands::Show { id, reveal, copy } => {
            let master = passwords.master()?;
            let entry = service.get(&master, &id)?;
            println!("{}", format_item_details(&entry, reveal));

            if copy {
                let label = format!("Password for {}", entry.record.title);
                copy_secret(settings, &label, &entry.record.password)?;
            }
        }

        ItemCommands::Edit {
            id,
            title,
            username,
            password,
            password_stdin,
            generate,
            url,
            notes,
        } => {
            if title.is_none()
                && username.is_none()
                && !password
                && !password_stdin
                && !generate
                && url.is_none()
                && notes.is_none()
            {
                println!("No changes specified. Use --title, --username, --password, --url or --notes.");
                return Ok(());
            }

            let secret = if password {
                Some(prompt::prompt_secret("New item password: ")?)
            } else if password_stdin {
                Some(prompt::read_secret_stdin()?)
            } else if generate {
                Some(generated_secret(settings)?)
            } else {
                None
            };

            let master = passwords.master()?;
            let mut entry = service.get(&master, &id)?;
            let record = &mut entry.record;

            if let Some(title) = title {
                record.title = title;
            }
            if let Some(username) = username {
                record.username = username;
            }
            if let Some(secret) = secret {
                record.set_password(secret.as_str());
            }
            if let Some(url) = url {
                record.url = Some(url).filter(|u| !u.is_empty());
            }
            if notes.is_some() {
                record.set_notes(notes);
            }

            let updated = service.update(&master, entry.item.id, record)?;
            println!("Updated item: {}", record.title);
            println!("  ID: {}", updated.id);
        }

        ItemCommands::Delete { id, force } => {
            let item = service.find(&id)?;

            if !force && !prompt::confirm(&format!("Delete item {}?", item.id))? {
                println!("Cancelled.");
                return Ok(());
            }

            service.delete(item.id)?;
            info!(item = %item.id, "deleted item");
            println!("Deleted item {}", item.id);
        }
    }

    Ok(())
}
