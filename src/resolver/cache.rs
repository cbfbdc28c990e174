//! Shared memo table for processed package.json and tsconfig files
//!
//! Entries are insert-if-absent: a concurrent resolve that computes the same
//! key loses the race and adopts the stored value.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;

use super::package_json::PackageDescriptor;
use super::tsconfig::TsConfigDescriptor;

/// Cached outcome for one package.json path
#[derive(Debug, Clone)]
pub enum CachedPackage {
    /// Parsed and processed
    Found(Arc<PackageDescriptor>),
    /// Missing, unreadable or unparsable
    Missing,
}

/// Resolver cache, owned by the caller and shared across resolve calls
#[derive(Debug, Default)]
pub struct ResolverCache {
    /// Keyed by absolute package.json path
    packages: DashMap<String, CachedPackage>,

    /// Root tsconfig/jsconfig; `Some(None)` records that there is none
    tsconfig: OnceCell<Option<Arc<TsConfigDescriptor>>>,
}

impl ResolverCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached entry for a package.json path
    pub fn package(&self, path: &str) -> Option<CachedPackage> {
        self.packages.get(path).map(|entry| entry.clone())
    }

    /// Store an entry unless one is already present, returning the stored entry
    pub fn insert_package(&self, path: &str, entry: CachedPackage) -> CachedPackage {
        self.packages
            .entry(path.to_string())
            .or_insert(entry)
            .clone()
    }

    /// Get the cached root tsconfig, if it has been looked up
    pub fn tsconfig(&self) -> Option<Option<Arc<TsConfigDescriptor>>> {
        self.tsconfig.get().cloned()
    }

    /// Store the root tsconfig unless already set, returning the stored value
    pub fn insert_tsconfig(
        &self,
        config: Option<Arc<TsConfigDescriptor>>,
    ) -> Option<Arc<TsConfigDescriptor>> {
        self.tsconfig.get_or_init(|| config).clone()
    }

    /// Number of cached package.json entries
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Check if no package.json has been cached
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
