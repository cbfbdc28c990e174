//! Resolve command implementation

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::info;

use crate::config::ResolverConfig;
use crate::fs::{OsFs, TokioFs};
use crate::resolver::{ResolveOptions, Resolver};

/// Resolve a specifier as imported from a file in the project
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Specifier as written in the import statement
    pub specifier: String,

    /// Importing file, relative to the project root
    #[arg(short, long, default_value = "/index.js")]
    pub from: String,

    /// Project root, mapped to `/`
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// Use blocking file system access instead of tokio
    #[arg(long)]
    pub blocking: bool,

    /// Skip tsconfig.json/jsconfig.json path mapping
    #[arg(long)]
    pub skip_tsconfig: bool,
}

impl ResolveCommand {
    pub async fn execute(&self, mut config: ResolverConfig) -> Result<()> {
        let start = Instant::now();

        if !self.root.is_dir() {
            anyhow::bail!("Project root {} is not a directory", self.root.display());
        }

        config.skip_tsconfig |= self.skip_tsconfig;

        let from = if self.from.starts_with('/') {
            self.from.clone()
        } else {
            format!("/{}", self.from)
        };
        let options = ResolveOptions::new(from, Arc::new(config));

        info!(
            "Resolving {} from {} in {}",
            self.specifier,
            options.filename,
            self.root.display()
        );

        let resolved = if self.blocking {
            Resolver::blocking(OsFs::new(&self.root)).resolve_sync(&self.specifier, &options)
        } else {
            Resolver::new(TokioFs::new(&self.root))
                .resolve(&self.specifier, &options)
                .await
        };

        let resolved = resolved.with_context(|| {
            format!("{} '{}'", "Failed to resolve".red(), self.specifier)
        })?;

        println!("{}", resolved);

        info!(
            "Resolved in {:.2}ms",
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(())
    }
}
