//! Module resolution
//!
//! Resolves an import specifier, as written in the file that issues it, to a
//! single absolute path. Covers relative and absolute paths, `node_modules`
//! packages (main fields, `exports`, alias fields), `#` subpath imports and
//! tsconfig/jsconfig `paths`.
//!
//! The algorithm is written once against [`Storage`]. The blocking entry point
//! drives that same future to completion over a [`Blocking`] adapter, so the
//! two calling conventions cannot diverge.

pub mod cache;
pub mod error;
pub mod package_json;
pub mod tsconfig;

use std::io;
use std::sync::Arc;

use futures::future::BoxFuture;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use tracing::{debug, trace, warn};

use crate::config::ResolverConfig;
use crate::fs::{Blocking, FileSystem, Storage};
use crate::utils::{
    dirname, join_path, normalize_module_specifier, parent_directories, split_package_specifier,
    substitute_glob, SpecifierKind,
};

pub use cache::{CachedPackage, ResolverCache};
pub use error::{ResolveError, Result};
pub use package_json::{FieldPriorities, PackageDescriptor, EMPTY_MODULE};
pub use tsconfig::TsConfigDescriptor;

/// Bound on alias substitution rounds and aliased file expansions
const MAX_ALIAS_DEPTH: usize = 5;

/// Extension list used once a path has been aliased to a concrete file
static EMPTY_EXTENSION: [String; 1] = [String::new()];

static SYNTHETIC_ROOT: Lazy<Arc<PackageDescriptor>> =
    Lazy::new(|| Arc::new(PackageDescriptor::synthetic_root()));

/// A single resolve request
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Absolute virtual path of the importing file
    pub filename: String,

    /// Resolution policy
    pub config: Arc<ResolverConfig>,

    /// Cache shared with other requests; a fresh one is used when absent
    pub cache: Option<Arc<ResolverCache>>,
}

impl ResolveOptions {
    /// Create a request issued from `filename`
    pub fn new(filename: impl Into<String>, config: Arc<ResolverConfig>) -> Self {
        Self {
            filename: filename.into(),
            config,
            cache: None,
        }
    }

    /// Share `cache` with this request
    pub fn with_cache(mut self, cache: Arc<ResolverCache>) -> Self {
        self.cache = Some(cache);
        self
    }
}

/// State shared by every step of one top-level resolve
struct Session {
    config: ResolverConfig,
    cache: Arc<ResolverCache>,
}

impl Session {
    fn new(options: &ResolveOptions) -> Result<Self> {
        Ok(Self {
            config: options.config.normalized()?,
            cache: options.cache.clone().unwrap_or_default(),
        })
    }

    fn priorities(&self) -> FieldPriorities<'_> {
        FieldPriorities {
            main_fields: &self.config.main_fields,
            alias_fields: &self.config.alias_fields,
            environment_keys: &self.config.environment_keys,
        }
    }

    /// Whether `filename` already lives inside a module directory tree
    fn in_module_directory(&self, filename: &str) -> bool {
        self.config
            .module_directories
            .iter()
            .any(|dir| filename.contains(&format!("/{}/", dir)))
    }
}

/// Module resolver over a storage provider
#[derive(Debug, Clone)]
pub struct Resolver<S> {
    storage: S,
}

impl<F: FileSystem> Resolver<Blocking<F>> {
    /// Create a resolver over blocking storage
    pub fn blocking(fs: F) -> Self {
        Self::new(Blocking(fs))
    }

    /// Resolve `specifier` without suspending
    pub fn resolve_sync(&self, specifier: &str, options: &ResolveOptions) -> Result<String> {
        futures::executor::block_on(self.resolve(specifier, options))
    }
}

impl<S: Storage> Resolver<S> {
    /// Create a resolver over suspending storage
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Get the storage provider
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Resolve `specifier` as imported from `options.filename`
    pub async fn resolve(&self, specifier: &str, options: &ResolveOptions) -> Result<String> {
        debug!("Resolving '{}' from '{}'", specifier, options.filename);

        let session = Session::new(options)?;
        let (rewritten, origin) = self
            .resolve_package_import(specifier, &options.filename, &session)
            .await?;

        match self.internal_resolve(rewritten, origin, &session, false).await {
            Ok(resolved) => {
                debug!("Resolved '{}' to {}", specifier, resolved);
                Ok(resolved)
            }
            Err(err) if err.is_not_found() => {
                debug!("Could not resolve '{}' from '{}'", specifier, options.filename);
                Err(ResolveError::not_found(specifier, &options.filename))
            }
            Err(err) => Err(err),
        }
    }

    async fn is_file(&self, path: &str) -> bool {
        if path == EMPTY_MODULE {
            return true;
        }

        let exists = self.storage.is_file(path).await;
        trace!("Probed {} (exists: {})", path, exists);
        exists
    }

    /// Find the nearest package.json at or above `path`, stopping at `root`
    async fn load_package_json(
        &self,
        path: &str,
        root: &str,
        session: &Session,
    ) -> Result<Option<Arc<PackageDescriptor>>> {
        for directory in parent_directories(path, root) {
            let package_path = join_path(&[&directory, "package.json"]);

            match session.cache.package(&package_path) {
                Some(CachedPackage::Found(descriptor)) => return Ok(Some(descriptor)),
                Some(CachedPackage::Missing) => continue,
                None => {}
            }

            let entry = match self.storage.read_to_string(&package_path).await {
                Ok(text) => match serde_json::from_str(&text) {
                    Ok(content) => {
                        let descriptor = PackageDescriptor::process(
                            &content,
                            &dirname(&package_path),
                            &package_path,
                            session.priorities(),
                        )?;
                        CachedPackage::Found(Arc::new(descriptor))
                    }
                    Err(err) => {
                        warn!("Ignoring unparsable {}: {}", package_path, err);
                        CachedPackage::Missing
                    }
                },
                Err(err) => {
                    if err.kind() != io::ErrorKind::NotFound {
                        warn!("Ignoring unreadable {}: {}", package_path, err);
                    }
                    CachedPackage::Missing
                }
            };

            if let CachedPackage::Found(descriptor) =
                session.cache.insert_package(&package_path, entry)
            {
                return Ok(Some(descriptor));
            }
        }

        Ok(None)
    }

    /// Nearest package.json for `path`, falling back to the project root
    async fn find_package_json(
        &self,
        path: &str,
        session: &Session,
    ) -> Result<Arc<PackageDescriptor>> {
        if let Some(descriptor) = self.load_package_json(path, "/", session).await? {
            return Ok(descriptor);
        }

        if let Some(descriptor) = self.load_package_json("/index", "/", session).await? {
            return Ok(descriptor);
        }

        Ok(SYNTHETIC_ROOT.clone())
    }

    /// Rewrite a `#` specifier through the nearest package's `imports`
    ///
    /// A rewritten specifier is resolved from the package.json that defined it.
    async fn resolve_package_import(
        &self,
        specifier: &str,
        origin: &str,
        session: &Session,
    ) -> Result<(String, String)> {
        if !specifier.starts_with('#') {
            return Ok((specifier.to_string(), origin.to_string()));
        }

        let package = self.find_package_json(origin, session).await?;
        match lookup_table(&package.imports, specifier) {
            Some(target) if target != specifier => {
                debug!(
                    "Package import {} -> {} ({})",
                    specifier, target, package.source_path
                );
                Ok((target, package.source_path.clone()))
            }
            _ => Ok((specifier.to_string(), origin.to_string())),
        }
    }

    /// Anchor a normalized specifier and apply the applicable alias table
    async fn resolve_module(
        &self,
        specifier: &str,
        origin: &str,
        session: &Session,
    ) -> Result<String> {
        let path = match SpecifierKind::classify(specifier) {
            SpecifierKind::Relative => join_path(&[&dirname(origin), specifier]),
            SpecifierKind::Absolute | SpecifierKind::Bare => specifier.to_string(),
        };

        let package = if path.starts_with('/') {
            self.find_package_json(&path, session).await?
        } else {
            self.find_package_json(origin, session).await?
        };

        let aliased = resolve_alias(&package, &path)?;
        if aliased != path {
            debug!("Aliased {} -> {}", path, aliased);
        }
        Ok(aliased)
    }

    /// Root tsconfig/jsconfig path mapping, loaded once per cache
    async fn tsconfig(&self, session: &Session) -> Option<Arc<TsConfigDescriptor>> {
        if let Some(config) = session.cache.tsconfig() {
            return config;
        }

        let mut config = None;
        for file in tsconfig::CONFIG_FILES {
            let Ok(text) = self.storage.read_to_string(file).await else {
                continue;
            };
            let Some(content) = tsconfig::parse_config_text(&text) else {
                continue;
            };

            debug!("Loaded path mapping from {}", file);
            config = TsConfigDescriptor::process(&content).map(Arc::new);
            break;
        }

        session.cache.insert_tsconfig(config)
    }

    /// First existing file for `path` plus one of `extensions`
    ///
    /// Candidates remapped by the nearest alias table are expanded again with
    /// no extension.
    fn expand_file<'a>(
        &'a self,
        path: String,
        extensions: &'a [String],
        session: &'a Session,
        depth: usize,
    ) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(async move {
            if depth > MAX_ALIAS_DEPTH {
                return Err(ResolveError::CyclicAlias { path });
            }

            let package = self.find_package_json(&path, session).await?;

            for extension in extensions {
                let candidate = format!("{}{}", path, extension);
                let aliased = resolve_alias(&package, &candidate)?;

                if aliased == candidate {
                    if self.is_file(&candidate).await {
                        return Ok(Some(candidate));
                    }
                } else if let Some(found) = self
                    .expand_file(aliased, &EMPTY_EXTENSION, session, depth + 1)
                    .await?
                {
                    return Ok(Some(found));
                }
            }

            Ok(None)
        })
    }

    /// Resolve a bare specifier by walking module directories upward
    fn resolve_node_module<'a>(
        &'a self,
        specifier: String,
        origin: String,
        session: &'a Session,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let (name, subpath) = split_package_specifier(&specifier);
            let mut origin = origin;

            'walk: loop {
                for directory in parent_directories(&origin, "/") {
                    for module_dir in &session.config.module_directories {
                        let package_root = join_path(&[&directory, module_dir, &name]);

                        match self.probe_package(&package_root, &subpath, session).await {
                            Ok(Some(resolved)) => return Ok(resolved),
                            Ok(None) => {}
                            // a shadowing copy may lack the file; retry from above it
                            Err(err) if err.is_not_found() && directory.len() > 1 => {
                                debug!(
                                    "No match for '{}' in {}, retrying above {}",
                                    specifier, package_root, directory
                                );
                                origin = dirname(&directory);
                                continue 'walk;
                            }
                            Err(err) => return Err(err),
                        }
                    }
                }

                return Err(ResolveError::not_found(specifier, origin));
            }
        })
    }

    /// Resolve inside one candidate package directory
    ///
    /// Returns `None` when no package.json exists under `package_root`.
    fn probe_package<'a>(
        &'a self,
        package_root: &'a str,
        subpath: &'a str,
        session: &'a Session,
    ) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(async move {
            let package_path = if subpath.is_empty() {
                package_root.to_string()
            } else {
                join_path(&[package_root, subpath])
            };

            let Some(package) = self
                .load_package_json(&package_path, package_root, session)
                .await?
            else {
                return Ok(None);
            };

            debug!("Probing {} ({})", package_path, package.source_path);

            match self
                .internal_resolve(package_path.clone(), package.source_path.clone(), session, false)
                .await
            {
                Ok(resolved) => Ok(Some(resolved)),
                Err(err) if err.is_not_found() && subpath.is_empty() => self
                    .internal_resolve(
                        join_path(&[&package_path, "index"]),
                        package.source_path.clone(),
                        session,
                        false,
                    )
                    .await
                    .map(Some),
                Err(err) => Err(err),
            }
        })
    }

    fn internal_resolve<'a>(
        &'a self,
        specifier: String,
        origin: String,
        session: &'a Session,
        skip_index: bool,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            // an excluded import arrives here as the sentinel itself
            let normalized = if specifier == EMPTY_MODULE {
                specifier.clone()
            } else {
                normalize_module_specifier(&specifier)
            };
            let module_path = self.resolve_module(&normalized, &origin, session).await?;

            if !module_path.starts_with('/') {
                if !session.config.skip_tsconfig && !session.in_module_directory(&origin) {
                    if let Some(tsconfig) = self.tsconfig(session).await {
                        for candidate in tsconfig.candidate_paths(&module_path) {
                            debug!("Trying tsconfig candidate {}", candidate);
                            match self
                                .internal_resolve(candidate, origin.clone(), session, false)
                                .await
                            {
                                Ok(resolved) => return Ok(resolved),
                                Err(err) if err.is_not_found() => {}
                                Err(err) => return Err(err),
                            }
                        }
                    }
                }

                return match self
                    .resolve_node_module(module_path, origin.clone(), session)
                    .await
                {
                    Err(err) if err.is_not_found() => {
                        Err(ResolveError::not_found(normalized, origin))
                    }
                    result => result,
                };
            }

            let extensions = &session.config.extensions;
            if let Some(found) = self
                .expand_file(module_path.clone(), extensions, session, 0)
                .await?
            {
                return Ok(found);
            }

            if !skip_index {
                let index = join_path(&[&module_path, "index"]);
                if let Some(found) = self.expand_file(index, extensions, session, 0).await? {
                    return Ok(found);
                }

                // an alias may have appended an extension to a directory; retry
                // the specifier itself with `/index`
                let last_segment = specifier.rsplit('/').next().unwrap_or_default();
                if !last_segment.starts_with("index") {
                    match self
                        .internal_resolve(format!("{}/index", specifier), origin.clone(), session, true)
                        .await
                    {
                        Ok(found) => return Ok(found),
                        Err(err) if err.is_not_found() => {}
                        Err(err) => return Err(err),
                    }
                }
            }

            Err(ResolveError::not_found(module_path, origin))
        })
    }
}

/// Exact entry, else the first wildcard entry in table order that matches
fn lookup_table(table: &IndexMap<String, String>, input: &str) -> Option<String> {
    if let Some(target) = table.get(input) {
        return Some(target.clone());
    }

    table
        .iter()
        .filter(|(pattern, _)| pattern.contains('*'))
        .find_map(|(pattern, target)| substitute_glob(pattern, target, input))
}

/// Apply a package's alias table until it settles
///
/// Exact entries chain; a wildcard entry is applied once and ends the chain.
pub fn resolve_alias(package: &PackageDescriptor, path: &str) -> Result<String> {
    let mut current = path.to_string();

    for _ in 0..=MAX_ALIAS_DEPTH {
        if let Some(target) = package.aliases.get(&current) {
            if *target == current {
                return Ok(current);
            }
            current = target.clone();
            continue;
        }

        let wildcard = package
            .aliases
            .iter()
            .filter(|(pattern, _)| pattern.contains('*'))
            .find_map(|(pattern, target)| substitute_glob(pattern, target, &current));

        return Ok(match wildcard {
            Some(aliased) => revert_repeated_suffix(&current, aliased),
            None => current,
        });
    }

    Err(ResolveError::CyclicAlias {
        path: path.to_string(),
    })
}

/// Undo a wildcard substitution that only re-appends a suffix the input has
///
/// `./*` -> `./*.js` must not turn `/pkg/a.js` into `/pkg/a.js.js`.
fn revert_repeated_suffix(input: &str, aliased: String) -> String {
    match aliased.strip_prefix(input) {
        Some(addition) if !addition.contains('/') && input.ends_with(addition) => {
            input.to_string()
        }
        _ => aliased,
    }
}
