//! Generate command - print a random password.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use lockstash_core::generator;
use lockstash_core::strength;

#[derive(ClapArgs)]
pub struct Args {
    /// Password length
    #[arg(short, long, default_value_t = generator::DEFAULT_LENGTH)]
    pub length: usize,

    /// Suppress the strength line (password only)
    #[arg(long)]
    pub bare: bool,
}

#[instrument(level = "info", name = "cmd::generate", skip_all)]
pub fn execute(args: &Args) -> Result<()> {
    let password = generator::generate(args.length)?;
    println!("{password}");
    if !args.bare {
        eprintln!("Strength: {}", strength::evaluate(&password));
    }
    Ok(())
}
