//! Audit command - strength-check every stored password.
//!
//! One undecryptable entry is reported and skipped; it never aborts the
//! audit of the rest.

use anyhow::Result;
use clap::Args as ClapArgs;
use secrecy::ExposeSecret;
use tracing::instrument;

use lockstash_core::strength::{self, Strength};
use lockstash_core::vault::Vault;

use crate::output::create_table;

#[derive(ClapArgs)]
pub struct Args {
    /// Only report entries below this level (weak, medium, strong)
    #[arg(long, value_name = "LEVEL")]
    pub below: Option<String>,
}

#[instrument(level = "info", name = "cmd::audit", skip_all)]
pub fn execute(vault: &Vault, args: &Args) -> Result<()> {
    let threshold = match args.below.as_deref() {
        None => None,
        Some("weak") => Some(Strength::Weak),
        Some("medium") => Some(Strength::Medium),
        Some("strong") => Some(Strength::Strong),
        Some(other) => anyhow::bail!("Unknown strength level '{other}'"),
    };

    let revealed = vault.reveal_all()?;
    let total = revealed.len();

    let mut table = create_table(&["SERVICE", "USERNAME", "STATUS"]);
    let mut weak = 0usize;
    let mut failed = 0usize;

    for (entry, result) in revealed {
        match result {
            Ok(secret) => {
                let level = strength::evaluate(secret.password.expose_secret());
                if level == Strength::Weak {
                    weak += 1;
                }
                if let Some(threshold) = threshold {
                    if level >= threshold {
                        continue;
                    }
                }
                table.add_row(vec![
                    entry.service_name,
                    entry.username,
                    format!("{level}"),
                ]);
            }
            Err(_) => {
                failed += 1;
                table.add_row(vec![
                    entry.service_name,
                    entry.username,
                    "cannot decrypt".to_string(),
                ]);
            }
        }
    }

    println!("{table}");
    println!("{total} entries audited, {weak} weak, {failed} undecryptable");
    Ok(())
}
