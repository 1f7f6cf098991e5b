//! Show command - decrypt and print one entry.

use anyhow::Result;
use clap::Args as ClapArgs;
use secrecy::ExposeSecret;
use serde::Serialize;
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

    /// Print only the password (script-friendly)
    #[arg(long)]
    pub password_only: bool,

    /// Output as JSON
    #[arg(long, conflicts_with = "password_only")]
    pub json: bool,
}

#[derive(Serialize)]
struct ShowOutput<'a> {
    id: Uuid,
    service_name: &'a str,
    username: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

#[instrument(level = "info", name = "cmd::show", skip_all)]
pub fn execute(vault: &Vault, args: &Args) -> Result<()> {
    let entry = resolve_entry(vault, args.service.as_deref(), args.id)?;
    let revealed = vault.reveal(entry.id)?;

    if args.password_only {
        println!("{}", revealed.password.expose_secret());
        return Ok(());
    }

    if args.json {
        let output = ShowOutput {
            id: revealed.id,
            service_name: &revealed.service_name,
            username: &revealed.username,
            password: revealed.password.expose_secret(),
            notes: revealed.notes.as_ref().map(|n| n.expose_secret()),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Service:  {}", revealed.service_name);
    println!("Username: {}", revealed.username);
    println!("Password: {}", revealed.password.expose_secret());
    if let Some(notes) = &revealed.notes {
        println!("Notes:    {}", notes.expose_secret());
    }
    Ok(())
}
