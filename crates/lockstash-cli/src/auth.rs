//! Interactive passphrase prompts.

use anyhow::{Context, Result, bail};

/// Prompt for the master password once (login).
pub fn prompt_passphrase() -> Result<String> {
    let password = rpassword::prompt_password("Master password: ")
        .context("Failed to read master password")?;
    if password.is_empty() {
        bail!("Master password must not be empty");
    }
    Ok(password)
}

/// Prompt for a new master password with confirmation (setup, passwd).
pub fn prompt_new_passphrase() -> Result<String> {
    let password = rpassword::prompt_password("New master password: ")
        .context("Failed to read master password")?;
    if password.is_empty() {
        bail!("Master password must not be empty");
    }
    let confirmation = rpassword::prompt_password("Confirm master password: ")
        .context("Failed to read confirmation")?;
    if password != confirmation {
        bail!("Passwords do not match");
    }
    Ok(password)
}

/// Prompt for an arbitrary secret value (entry passwords).
pub fn prompt_secret(label: &str) -> Result<String> {
    rpassword::prompt_password(format!("{label}: ")).context("Failed to read input")
}
