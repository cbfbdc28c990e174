//! Storage capability consumed by the resolver
//!
//! The resolver only ever asks two questions: does a file exist, and what is
//! its text. Hosts answer through [`FileSystem`] (blocking) or [`Storage`]
//! (suspending). Paths are virtual and `/`-rooted; the bundled implementations
//! map `/` onto a host directory or an in-memory tree.

mod memory;

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

pub use memory::MemoryFs;

/// Blocking storage provider
pub trait FileSystem: Send + Sync {
    /// Whether `path` names an existing regular file
    fn is_file(&self, path: &str) -> bool;

    /// Read the full text of `path`
    fn read_to_string(&self, path: &str) -> io::Result<String>;
}

/// Suspending storage provider
#[async_trait]
pub trait Storage: Send + Sync {
    /// Whether `path` names an existing regular file
    async fn is_file(&self, path: &str) -> bool;

    /// Read the full text of `path`
    async fn read_to_string(&self, path: &str) -> io::Result<String>;
}

/// Exposes a [`FileSystem`] as [`Storage`] whose futures complete immediately
#[derive(Debug, Clone, Default)]
pub struct Blocking<F>(pub F);

#[async_trait]
impl<F: FileSystem> Storage for Blocking<F> {
    async fn is_file(&self, path: &str) -> bool {
        self.0.is_file(path)
    }

    async fn read_to_string(&self, path: &str) -> io::Result<String> {
        self.0.read_to_string(path)
    }
}

/// Map a virtual `/`-rooted path onto `root`
fn host_path(root: &Path, path: &str) -> PathBuf {
    let mut host = root.to_path_buf();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => {
                // never climb above the mapped root
                if host != root {
                    host.pop();
                }
            }
            _ => host.push(segment),
        }
    }
    host
}

/// Blocking access to a directory on disk
#[derive(Debug, Clone)]
pub struct OsFs {
    root: PathBuf,
}

impl OsFs {
    /// Serve the virtual root `/` from `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Host directory backing `/`
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileSystem for OsFs {
    fn is_file(&self, path: &str) -> bool {
        host_path(&self.root, path).is_file()
    }

    fn read_to_string(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(host_path(&self.root, path))
    }
}

/// Suspending access to a directory on disk through tokio
#[derive(Debug, Clone)]
pub struct TokioFs {
    root: PathBuf,
}

impl TokioFs {
    /// Serve the virtual root `/` from `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl Storage for TokioFs {
    async fn is_file(&self, path: &str) -> bool {
        tokio::fs::metadata(host_path(&self.root, path))
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    async fn read_to_string(&self, path: &str) -> io::Result<String> {
        tokio::fs::read_to_string(host_path(&self.root, path)).await
    }
}
