//! Add command - encrypt and store a new entry.

use anyhow::Result;
use clap::Args as ClapArgs;
use secrecy::SecretString;
use tracing::instrument;

use lockstash_core::generator;
use lockstash_core::vault::{NewEntry, Vault};

use crate::auth;

#[derive(ClapArgs)]
pub struct Args {
    /// Service name (e.g. "example.com")
    pub service: String,

    /// Username for the service
    #[arg(short, long, default_value = "")]
    pub username: String,

    /// Entry password (prompted when neither this nor --generate is given)
    #[arg(long, conflicts_with = "generate")]
    pub entry_password: Option<String>,

    /// Generate a random password of the given length
    #[arg(
        short,
        long,
        value_name = "LENGTH",
        num_args = 0..=1,
        default_missing_value = "16"
    )]
    pub generate: Option<usize>,

    /// Optional notes, stored encrypted
    #[arg(short, long)]
    pub notes: Option<String>,
}

#[instrument(level = "info", name = "cmd::add", skip_all, fields(service = %args.service))]
pub fn execute(vault: &Vault, args: &Args) -> Result<()> {
    let (password, generated) = match (&args.entry_password, args.generate) {
        (Some(password), _) => (password.clone(), false),
        (None, Some(length)) => (generator::generate(length)?, true),
        (None, None) => (
            auth::prompt_secret(&format!("Password for {}", args.service))?,
            false,
        ),
    };

    let entry = vault.add_entry(NewEntry {
        service_name: args.service.clone(),
        username: args.username.clone(),
        password: SecretString::from(password.clone()),
        notes: args.notes.clone().map(SecretString::from),
    })?;

    println!("Added entry {} for {}", entry.id, entry.service_name);
    if generated {
        println!("Generated password: {password}");
    }
    Ok(())
}
