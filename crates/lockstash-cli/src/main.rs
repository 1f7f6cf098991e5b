#![deny(unsafe_code)]

mod auth;
mod commands;
mod exit_code;
mod output;

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lockstash_core::crypto::CryptoError;
use lockstash_core::session::{Session, SessionError};
use lockstash_core::vault::{JsonEntryStore, JsonSettingsStore, Vault, VaultOperationError};

use crate::commands::{add, audit, edit, generate, init, ls, passwd, rm, show};

/// Command-line interface for the lockstash password vault
#[derive(Parser)]
#[command(name = "lockstash")]
#[command(author, version)]
#[command(propagate_version = true)]
#[command(after_help = "EXAMPLES:
    # Set up a new vault
    lockstash init

    # Add an entry, generating its password
    lockstash add example.com -u alice --generate

    # Show an entry (pipe master password from a secret manager)
    echo \"$SECRET\" | lockstash --password-stdin show example.com

    # List all entries
    lockstash ls

    # Audit stored passwords for weak or undecryptable entries
    lockstash audit
")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Vault directory (default: platform data dir)
    #[arg(long, env = "LOCKSTASH_VAULT_DIR", value_name = "DIR", global = true)]
    vault: Option<PathBuf>,

    /// Master password (insecure, prefer --password-stdin or LOCKSTASH_PASSWORD)
    #[arg(long, env = "LOCKSTASH_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Read the master password from stdin (single line)
    #[arg(long, conflicts_with = "password", global = true)]
    password_stdin: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Password options extracted from the CLI for vault commands
#[derive(Clone, Default)]
pub struct PasswordOptions {
    pub password: Option<String>,
    pub password_stdin: bool,
}

impl From<&Cli> for PasswordOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            password: cli.password.clone(),
            password_stdin: cli.password_stdin,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Set up a new vault with a master password
    Init(init::Args),

    /// Add a new entry
    Add(add::Args),

    /// Show one entry, decrypting its secret fields
    Show(show::Args),

    /// List entries (no decryption)
    Ls(ls::Args),

    /// Remove an entry
    Rm(rm::Args),

    /// Edit an entry (secret fields are re-encrypted under a fresh salt)
    Edit(edit::Args),

    /// Change the master password, re-encrypting every entry
    Passwd(passwd::Args),

    /// Audit stored passwords for weak or undecryptable entries
    Audit(audit::Args),

    /// Generate a random password (no vault needed)
    Generate(generate::Args),
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::from(exit_code::SUCCESS),
        Err(e) => {
            let code = categorize_error(&e);

            let args: Vec<String> = std::env::args().collect();
            let is_quiet = args.iter().any(|a| a == "-q" || a == "--quiet");
            if !is_quiet {
                eprintln!("Error: {e:#}");
            }

            ExitCode::from(code)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if !cli.quiet {
        setup_tracing(cli.verbose);
    }

    // Standalone: no vault, no master password.
    if let Commands::Generate(args) = &cli.command {
        return generate::execute(args);
    }

    let vault_dir = resolve_vault_dir(cli.vault.as_deref())?;
    let password_opts = PasswordOptions::from(&cli);

    match cli.command {
        Commands::Generate(_) => unreachable!("handled above"),

        // First-run setup: initializes instead of logging in.
        Commands::Init(args) => init::execute(&open_vault(&vault_dir)?, &vault_dir, &password_opts, &args),

        // Everything else requires an unlocked vault.
        Commands::Add(args) => with_unlocked_vault(&vault_dir, &password_opts, |v| add::execute(v, &args)),
        Commands::Show(args) => with_unlocked_vault(&vault_dir, &password_opts, |v| show::execute(v, &args)),
        Commands::Ls(args) => with_unlocked_vault(&vault_dir, &password_opts, |v| ls::execute(v, &args)),
        Commands::Rm(args) => with_unlocked_vault(&vault_dir, &password_opts, |v| rm::execute(v, &args)),
        Commands::Edit(args) => with_unlocked_vault(&vault_dir, &password_opts, |v| edit::execute(v, &args)),
        Commands::Passwd(args) => with_unlocked_vault(&vault_dir, &password_opts, |v| passwd::execute(v, &args)),
        Commands::Audit(args) => with_unlocked_vault(&vault_dir, &password_opts, |v| audit::execute(v, &args)),
    }
}

/// Open the vault stores without unlocking anything.
fn open_vault(vault_dir: &Path) -> Result<Vault> {
    let entries = JsonEntryStore::open(vault_dir.join("entries.json"))
        .with_context(|| format!("Failed to open vault at {}", vault_dir.display()))?;
    let settings = JsonSettingsStore::new(vault_dir.join("settings.json"));
    Ok(Vault::new(
        Box::new(entries),
        Box::new(settings),
        Arc::new(Session::new()),
    ))
}

/// Open the vault, verify the master password, run the command.
fn with_unlocked_vault<F>(vault_dir: &Path, password_opts: &PasswordOptions, f: F) -> Result<()>
where
    F: FnOnce(&Vault) -> Result<()>,
{
    let vault = open_vault(vault_dir)?;
    let passphrase = get_passphrase(password_opts)?;
    vault
        .login(&passphrase)
        .context("Failed to unlock vault - check your master password")?;
    f(&vault)
}

/// Resolve the vault directory: explicit flag/env first, platform data dir otherwise.
fn resolve_vault_dir(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }
    let dirs = directories::ProjectDirs::from("", "", "lockstash")
        .context("Could not determine a data directory for the vault; pass --vault")?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Get the master password using the priority chain:
/// 1. --password-stdin
/// 2. --password / LOCKSTASH_PASSWORD
/// 3. Interactive prompt
fn get_passphrase(opts: &PasswordOptions) -> Result<String> {
    if opts.password_stdin {
        read_password_from_stdin()
    } else if let Some(ref password) = opts.password {
        Ok(password.clone())
    } else {
        auth::prompt_passphrase()
    }
}

/// Read the master password from stdin (first line only)
fn read_password_from_stdin() -> Result<String> {
    if io::stdin().is_terminal() {
        anyhow::bail!(
            "--password-stdin requires the password to be piped in.\n\
             Example: echo \"$SECRET\" | lockstash --password-stdin ls"
        );
    }

    let mut password = String::new();
    io::stdin().read_line(&mut password)?;

    let password = password.trim_end_matches('\n').trim_end_matches('\r');
    if password.is_empty() {
        anyhow::bail!("Password from stdin is empty");
    }

    Ok(password.to_string())
}

/// Set up tracing/logging based on verbosity level
fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();
}

/// Categorize an error into an exit code using typed error downcasting
///
/// This approach is more robust than string matching because it doesn't depend
/// on error message wording, which could change between versions.
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(op_err) = cause.downcast_ref::<VaultOperationError>() {
            match op_err {
                VaultOperationError::IncorrectPassword => return exit_code::AUTH_FAILED,
                VaultOperationError::NotInitialized => return exit_code::NOT_INITIALIZED,
                VaultOperationError::AlreadyInitialized => return exit_code::GENERAL_ERROR,
                VaultOperationError::EntryNotFound(_) => return exit_code::NOT_FOUND,
                VaultOperationError::Session(_) => return exit_code::VAULT_LOCKED,
                VaultOperationError::Crypto(_) => return exit_code::DECRYPT_FAILED,
                _ => {}
            }
        }

        if let Some(crypto_err) = cause.downcast_ref::<CryptoError>() {
            if matches!(
                crypto_err,
                CryptoError::Authentication | CryptoError::MalformedEnvelope(_)
            ) {
                return exit_code::DECRYPT_FAILED;
            }
        }

        if cause.downcast_ref::<SessionError>().is_some() {
            return exit_code::VAULT_LOCKED;
        }

        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::PermissionDenied => return exit_code::PERMISSION_DENIED,
                io::ErrorKind::NotFound => return exit_code::NOT_FOUND,
                _ => {}
            }
        }
    }

    exit_code::GENERAL_ERROR
}
