//! Resolution errors

use thiserror::Error;

/// Result type for resolution operations
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors that can occur while resolving a specifier
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Every strategy was exhausted
    #[error("Cannot find module '{specifier}' from '{origin}'")]
    ModuleNotFound {
        /// Specifier as written by the caller
        specifier: String,
        /// File the specifier was imported from
        origin: String,
    },

    /// Alias substitution or file expansion did not settle
    #[error("Could not resolve '{path}' due to a cyclic alias")]
    CyclicAlias {
        /// Path at which the bound was exceeded
        path: String,
    },

    /// An exports/imports node is not a string, array, object, null or false
    #[error("Unsupported exports type {shape} in {package}")]
    UnsupportedExportShape {
        /// Root directory of the offending package
        package: String,
        /// JSON type of the offending node
        shape: &'static str,
    },

    /// Invalid resolver configuration
    #[error("Invalid resolver configuration: {0}")]
    Config(String),
}

impl ResolveError {
    pub(crate) fn not_found(specifier: impl Into<String>, origin: impl Into<String>) -> Self {
        ResolveError::ModuleNotFound {
            specifier: specifier.into(),
            origin: origin.into(),
        }
    }

    /// Whether this is the recoverable "nothing here" outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::ModuleNotFound { .. })
    }
}
