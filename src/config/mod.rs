//! Resolver configuration
//!
//! Parses and normalizes the resolution policy, optionally loaded from a
//! `noderesolve.toml` file.

mod schema;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::resolver::ResolveError;

pub use schema::*;

/// Resolution policy shared by every request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Extensions to probe, in order (the bare path is always tried first)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names searched upward for bare specifiers
    #[serde(default = "default_module_directories")]
    pub module_directories: Vec<String>,

    /// package.json entry point fields
    #[serde(default = "default_main_fields")]
    pub main_fields: Vec<String>,

    /// package.json remapping fields
    #[serde(default = "default_alias_fields")]
    pub alias_fields: Vec<String>,

    /// Condition names used for `exports` and `imports`
    #[serde(default = "default_environment_keys")]
    pub environment_keys: Vec<String>,

    /// Never consult tsconfig.json/jsconfig.json
    #[serde(default)]
    pub skip_tsconfig: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            module_directories: default_module_directories(),
            main_fields: default_main_fields(),
            alias_fields: default_alias_fields(),
            environment_keys: default_environment_keys(),
            skip_tsconfig: false,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ResolverConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Replace the probed extensions
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), ResolveError> {
        if let Some(dir) = self
            .module_directories
            .iter()
            .find(|dir| dir.trim_matches('/').is_empty())
        {
            return Err(ResolveError::Config(format!(
                "module directory '{}' has no name",
                dir
            )));
        }

        Ok(())
    }

    /// Copy with the empty extension first, and module directories
    /// de-duplicated, stripped of a leading `/` and always including
    /// `node_modules`
    pub fn normalized(&self) -> std::result::Result<Self, ResolveError> {
        self.validate()?;

        let mut extensions = vec![String::new()];
        for extension in &self.extensions {
            if !extensions.contains(extension) {
                extensions.push(extension.clone());
            }
        }

        let mut module_directories: Vec<String> = Vec::new();
        let stripped = self
            .module_directories
            .iter()
            .map(|dir| dir.strip_prefix('/').unwrap_or(dir).to_string());
        for dir in stripped.chain(std::iter::once(NODE_MODULES.to_string())) {
            if !module_directories.contains(&dir) {
                module_directories.push(dir);
            }
        }

        Ok(Self {
            extensions,
            module_directories,
            ..self.clone()
        })
    }
}
