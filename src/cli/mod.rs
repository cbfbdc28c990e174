//! Command-line interface for noderesolve
//!
//! Provides the main CLI structure using clap with subcommands for:
//! - `resolve`: Resolve a specifier against a project directory
//! - `config`: Print the effective resolver configuration

mod config;
mod resolve;

use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;

use crate::config::ResolverConfig;

pub use config::ConfigCommand;
pub use resolve::ResolveCommand;

/// noderesolve - Node.js-compatible module specifier resolution
#[derive(Parser, Debug)]
#[command(name = "noderesolve")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to noderesolve.toml config file
    #[arg(short, long, global = true, default_value = "noderesolve.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a module specifier
    Resolve(ResolveCommand),

    /// Print the effective configuration
    Config(ConfigCommand),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        if self.verbose {
            print_banner();
        }

        let config = load_config(&self.config)?;

        match &self.command {
            Commands::Resolve(cmd) => cmd.execute(config).await,
            Commands::Config(cmd) => cmd.execute(&config),
        }
    }
}

/// Load the config file, or the defaults when it does not exist
fn load_config(path: &str) -> Result<ResolverConfig> {
    if Path::new(path).exists() {
        debug!("Loading configuration from {}", path);
        ResolverConfig::load(path)
    } else {
        debug!("No {} found, using defaults", path);
        Ok(ResolverConfig::default())
    }
}

/// Print the noderesolve banner
fn print_banner() {
    eprintln!(
        "\n{} {}\n",
        "noderesolve".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
