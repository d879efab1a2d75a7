use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use passvault::cli::{
    handle_audit, handle_config, handle_export, handle_generate_command, handle_import,
    handle_init, handle_item_command, handle_rekey, GenerateArgs, ItemCommands, PasswordSource,
};
use passvault::config::{Settings, VaultPaths};
use passvault::crypto::random;
use passvault::storage::Storage;

#[derive(Parser)]
#[command(
    name = "passvault",
    version,
    about = "Encrypted password vault for the terminal",
    long_about = "passvault keeps logins in a local vault. Every item is encrypted \
                  with AES-256-GCM under a key derived from your master password \
                  (PBKDF2-HMAC-SHA256, 100,000 rounds). The master password is \
                  never stored.\n\n\
                  Set PASSVAULT_MASTER_PASSWORD to skip the password prompt."
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Vault directory (defaults to the platform config directory)
    #[arg(long, env = "PASSVAULT_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new vault
    Init,

    /// Generate a random password
    Generate(GenerateArgs),

    #[command(flatten)]
    Item(ItemCommands),

    /// Re-encrypt every item under a new master password
    Rekey,

    /// Export the vault (json and yaml stay encrypted, csv is plaintext)
    Export {
        /// Export format: json, yaml or csv
        #[arg(default_value = "json")]
        format: String,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the CSV even when some items do not open with this password
        #[arg(short, long)]
        force: bool,
    },

    /// Restore items from a json or yaml backup
    Import {
        /// Backup file written by 'passvault export'
        file: PathBuf,
    },

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("passvault={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Fail before any vault state is touched
    random::ensure_available()?;

    // Initialize paths and settings
    let paths = match cli.data_dir {
        Some(dir) => VaultPaths::with_base_dir(dir),
        None => VaultPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?.with_audit(settings.audit_enabled);
    storage.load_all()?;

    let passwords = PasswordSource::from_env();

    match cli.command {
        Some(Commands::Init) => handle_init(&storage, &settings)?,
        Some(Commands::Generate(args)) => handle_generate_command(&settings, args)?,
        Some(Commands::Item(cmd)) => handle_item_command(&storage, &settings, &passwords, cmd)?,
        Some(Commands::Rekey) => handle_rekey(&storage, &settings, &passwords)?,
        Some(Commands::Export {
            format,
            output,
            force,
        }) => handle_export(&storage, &settings, &passwords, &format, output, force)?,
        Some(Commands::Import { file }) => handle_import(&storage, &settings, &passwords, &file)?,
        Some(Commands::Audit { limit }) => handle_audit(&paths, limit)?,
        Some(Commands::Config) => handle_config(&paths, &settings)?,
        None => {
            println!("passvault - encrypted password vault");
            println!();
            println!("Run 'passvault --help' for usage information.");
            println!("Run 'passvault init' to create a vault.");
        }
    }

    Ok(())
}
