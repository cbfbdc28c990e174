//! noderesolve library
//!
//! Node.js-compatible module specifier resolution: `node_modules` lookup,
//! package.json `main`/`exports`/`imports`/`browser` fields and tsconfig
//! `paths`, over blocking or suspending storage.

pub mod cli;
pub mod config;
pub mod fs;
pub mod resolver;
pub mod utils;

pub use cli::Cli;
pub use config::ResolverConfig;
pub use fs::{Blocking, FileSystem, MemoryFs, OsFs, Storage, TokioFs};
pub use resolver::{ResolveError, ResolveOptions, Resolver, ResolverCache, EMPTY_MODULE};
pub use utils::normalize_module_specifier;
