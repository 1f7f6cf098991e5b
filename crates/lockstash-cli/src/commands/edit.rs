//! Edit command - rewrite an entry.
//!
//! Any edit re-encrypts the secret fields under a freshly generated salt,
//! even a metadata-only change.

use anyhow::Result;
use clap::Args as ClapArgs;
use secrecy::SecretString;
use tracing::instrument;
use uuid::Uuid;

use lockstash_core::vault::{EntryUpdate, Vault};

use super::resolve_entry;
use crate::auth;

#[derive(ClapArgs)]
pub struct Args {
    /// Service name to look up
    pub service: Option<String>,

    /// Select the entry by id instead
    #[arg(long, conflicts_with = "service")]
    pub id: Option<Uuid>,

    /// Rename the service
    #[arg(long, value_name = "NAME")]
    pub rename: Option<String>,

    /// Change the username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Change the entry password to this value
    #[arg(long, conflicts_with = "prompt_password")]
    pub entry_password: Option<String>,

    /// Prompt for a new entry password
    #[arg(long)]
    pub prompt_password: bool,

    /// Replace the notes
    #[arg(short, long, conflicts_with = "clear_notes")]
    pub notes: Option<String>,

    /// Remove the notes
    #[arg(long)]
    pub clear_notes: bool,
}

#[instrument(level = "info", name = "cmd::edit", skip_all)]
pub fn execute(vault: &Vault, args: &Args) -> Result<()> {
    let entry = resolve_entry(vault, args.service.as_deref(), args.id)?;

    let password = if args.prompt_password {
        Some(auth::prompt_secret(&format!(
            "New password for {}",
            entry.service_name
        ))?)
    } else {
        args.entry_password.clone()
    };

    let notes = if args.clear_notes {
        Some(None)
    } else {
        args.notes.clone().map(|n| Some(SecretString::from(n)))
    };

    let updated = vault.update_entry(
        entry.id,
        EntryUpdate {
            service_name: args.rename.clone(),
            username: args.username.clone(),
            password: password.map(SecretString::from),
            notes,
        },
    )?;

    println!("Updated entry {} ({})", updated.service_name, updated.id);
    Ok(())
}
