//! Remove command - delete an entry.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;
use uuid::Uuid;

use lockstash_core::vault::Vault;

use super::resolve_entry;

#[derive(ClapArgs)]
pub struct Args {
    /// Service name to look up
    pub service: Option<String>,

    /// Select the entry by id instead
    #[arg(long, conflicts_with = "service")]
    pub id: Option<Uuid>,
}

#[instrument(level = "info", name = "cmd::rm", skip_all)]
pub fn execute(vault: &Vault, args: &Args) -> Result<()> {
    let entry = resolve_entry(vault, args.service.as_deref(), args.id)?;
    vault.delete_entry(entry.id)?;
    println!("Removed entry {} ({})", entry.service_name, entry.id);
    Ok(())
}
