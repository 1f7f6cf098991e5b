//! List command - print entry metadata, never secrets.

use anyhow::Result;
use clap::Args as ClapArgs;
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use lockstash_core::vault::Vault;

use crate::output::{create_table, format_timestamp};

#[derive(ClapArgs)]
pub struct Args {
    /// Only entries whose service name contains this (case-insensitive)
    pub filter: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct LsEntry {
    id: Uuid,
    service_name: String,
    username: String,
    last_updated: u64,
}

#[instrument(level = "info", name = "cmd::ls", skip_all)]
pub fn execute(vault: &Vault, args: &Args) -> Result<()> {
    let entries = match &args.filter {
        Some(filter) => vault.find_by_service(filter)?,
        None => vault.entries()?,
    };

    if args.json {
        let output: Vec<LsEntry> = entries
            .into_iter()
            .map(|e| LsEntry {
                id: e.id,
                service_name: e.service_name,
                username: e.username,
                last_updated: e.last_updated,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No entries");
        return Ok(());
    }

    let mut table = create_table(&["SERVICE", "USERNAME", "UPDATED", "ID"]);
    for entry in &entries {
        table.add_row(vec![
            entry.service_name.clone(),
            entry.username.clone(),
            format_timestamp(entry.last_updated),
            entry.id.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
