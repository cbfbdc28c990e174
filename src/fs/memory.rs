//! In-memory file tree

use std::collections::HashMap;
use std::io;
use std::path::Path;

use async_trait::async_trait;
use walkdir::WalkDir;

use super::{FileSystem, Storage};
use crate::utils::normalize_slashes;

/// Files held in memory, keyed by virtual path
///
/// The suspending [`Storage`] implementation yields to the executor before
/// every operation, so async callers observe a real suspension point.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: HashMap<String, String>,
}

impl MemoryFs {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`MemoryFs::insert`]
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.insert(path, content);
        self
    }

    /// Add or replace a file
    pub fn insert(&mut self, path: &str, content: &str) {
        self.files.insert(normalize_slashes(path), content.to_string());
    }

    /// Load every file below `dir`, rooted at `/`
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
        let dir = dir.as_ref();
        let mut fs = Self::new();

        for entry in WalkDir::new(dir) {
            let entry = entry.map_err(io::Error::other)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(dir)
                .map_err(io::Error::other)?;
            let content = std::fs::read_to_string(entry.path())?;
            fs.insert(&format!("/{}", relative.display()), &content);
        }

        Ok(fs)
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the tree holds no files
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn lookup(&self, path: &str) -> Option<&String> {
        self.files.get(&normalize_slashes(path))
    }
}

impl FileSystem for MemoryFs {
    fn is_file(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    fn read_to_string(&self, path: &str) -> io::Result<String> {
        self.lookup(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path))
        })
    }
}

#[async_trait]
impl Storage for MemoryFs {
    async fn is_file(&self, path: &str) -> bool {
        tokio::task::yield_now().await;
        FileSystem::is_file(self, path)
    }

    async fn read_to_string(&self, path: &str) -> io::Result<String> {
        tokio::task::yield_now().await;
        FileSystem::read_to_string(self, path)
    }
}
