//! Init command - set up a new vault with a master password.

use std::path::Path;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use lockstash_core::strength::{self, Strength};
use lockstash_core::vault::Vault;

use crate::auth;
use crate::PasswordOptions;

#[derive(ClapArgs)]
pub struct Args {
    /// Enable biometric unlock at login (requires a platform sealed-password
    /// provider; without one, password login is still required)
    #[arg(long)]
    pub biometric: bool,
}

#[instrument(level = "info", name = "cmd::init", skip_all)]
pub fn execute(
    vault: &Vault,
    vault_dir: &Path,
    password_opts: &PasswordOptions,
    args: &Args,
) -> Result<()> {
    // Setup confirms the password when it is typed interactively; a password
    // supplied via flag/env/stdin is taken as-is.
    let password = if password_opts.password_stdin || password_opts.password.is_some() {
        crate::get_passphrase(password_opts)?
    } else {
        auth::prompt_new_passphrase()?
    };

    let strength = strength::evaluate(&password);
    if strength == Strength::Weak {
        eprintln!("Warning: weak master password ({})", strength.advice());
    }

    vault.initialize(&password)?;
    if args.biometric {
        vault.set_biometric_enabled(true)?;
    }

    println!("Vault initialized at {}", vault_dir.display());
    Ok(())
}
