//! Config command implementation

use anyhow::{Context, Result};
use clap::Args;

use crate::config::ResolverConfig;

/// Print the effective configuration as TOML
#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Show the normalized form the resolver works with
    #[arg(long)]
    pub normalized: bool,
}

impl ConfigCommand {
    pub fn execute(&self, config: &ResolverConfig) -> Result<()> {
        let config = if self.normalized {
            config.normalized()?
        } else {
            config.clone()
        };

        let rendered = toml::to_string_pretty(&config).context("Failed to serialize config")?;
        print!("{}", rendered);

        Ok(())
    }
}
