//! Passwd command - change the master password.

use anyhow::Result;
use clap::Args as ClapArgs;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use lockstash_core::strength::{self, Strength};
use lockstash_core::vault::Vault;

use crate::auth;

#[derive(ClapArgs)]
pub struct Args {
    /// New master password (prompted with confirmation when omitted)
    #[arg(long)]
    pub new_password: Option<String>,
}

#[instrument(level = "info", name = "cmd::passwd", skip_all)]
pub fn execute(vault: &Vault, args: &Args) -> Result<()> {
    // The session already holds the verified current password; reuse it so
    // the user is not prompted twice.
    let current = vault
        .session()
        .with_password(|p| SecretString::from(p.to_owned()))?;

    let new = match &args.new_password {
        Some(password) => password.clone(),
        None => auth::prompt_new_passphrase()?,
    };

    if strength::evaluate(&new) == Strength::Weak {
        eprintln!(
            "Warning: weak master password ({})",
            Strength::Weak.advice()
        );
    }

    let entry_count = vault.entries()?.len();
    vault.change_master_password(current.expose_secret(), &new)?;
    println!("Master password changed; {entry_count} entries re-encrypted");
    Ok(())
}
