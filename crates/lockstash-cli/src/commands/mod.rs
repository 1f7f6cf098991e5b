//! CLI subcommands.

pub mod add;
pub mod audit;
pub mod edit;
pub mod generate;
pub mod init;
pub mod ls;
pub mod passwd;
pub mod rm;
pub mod show;

use anyhow::{Result, bail};
use lockstash_core::vault::{Vault, VaultEntry};
use uuid::Uuid;

/// Resolve one entry from a service-name query or an explicit id.
///
/// Service lookup is a case-insensitive substring match; it must land on
/// exactly one entry, otherwise the candidates are listed and the caller is
/// told to disambiguate with `--id`.
pub fn resolve_entry(vault: &Vault, service: Option<&str>, id: Option<Uuid>) -> Result<VaultEntry> {
    if let Some(id) = id {
        return Ok(vault.entry(id)?);
    }

    let Some(query) = service else {
        bail!("Pass a service name or --id to select an entry");
    };

    let mut matches = vault.find_by_service(query)?;
    if matches.is_empty() {
        bail!("No entry matches service '{query}'");
    }
    if matches.len() > 1 {
        let candidates: Vec<String> = matches
            .iter()
            .map(|e| format!("  {}  {} ({})", e.id, e.service_name, e.username))
            .collect();
        bail!(
            "Service '{query}' matches {} entries, disambiguate with --id:\n{}",
            candidates.len(),
            candidates.join("\n")
        );
    }
    Ok(matches.swap_remove(0))
}
