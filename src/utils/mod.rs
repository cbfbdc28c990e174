//! Specifier and path helpers
//!
//! All paths handled by the resolver are virtual, `/`-rooted strings. Windows
//! separators are accepted anywhere and folded into `/`.

pub mod glob;

use once_cell::sync::Lazy;
use regex::Regex;

pub use glob::substitute_glob;

static SLASH_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\\/]+").unwrap());

/// How a specifier is anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind {
    /// `./foo`, `../foo`, `.`
    Relative,
    /// `/foo`
    Absolute,
    /// A package name, optionally followed by a sub-path
    Bare,
}

impl SpecifierKind {
    /// Classify a specifier by its first character
    pub fn classify(specifier: &str) -> Self {
        match specifier.as_bytes().first() {
            Some(b'.') => SpecifierKind::Relative,
            Some(b'/') => SpecifierKind::Absolute,
            _ => SpecifierKind::Bare,
        }
    }
}

/// Collapse every run of `/` or `\` into a single `/`
pub fn normalize_slashes(path: &str) -> String {
    SLASH_RUN_REGEX.replace_all(path, "/").into_owned()
}

/// Join path fragments, resolving `.` and `..` segments
///
/// A `..` pops the previous segment, whatever it is, and is only kept when
/// nothing precedes it. An empty result becomes `/`.
pub fn join_path(parts: &[&str]) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for part in parts {
        for segment in part.split('/') {
            match segment {
                "." => continue,
                ".." => {
                    if segments.pop().is_none() {
                        segments.push(segment);
                    }
                }
                _ => segments.push(segment),
            }
        }
    }

    let joined = normalize_slashes(&segments.join("/"));
    if joined.is_empty() {
        "/".to_string()
    } else {
        joined
    }
}

/// Parent directory of a path
///
/// A trailing slash counts as an empty last segment, so `/a/b/` and `/a/b`
/// both yield `/a`.
pub fn dirname(path: &str) -> String {
    let mut segments: Vec<&str> = path.split('/').collect();
    if let Some("") = segments.pop() {
        segments.pop();
    }

    let joined = segments.join("/");
    if joined.is_empty() {
        "/".to_string()
    } else {
        joined
    }
}

/// The path itself followed by each of its ancestors, nearest first
///
/// Stops at `root`: only `root` and directories beneath it on a segment boundary
/// are returned.
pub fn parent_directories(path: &str, root: &str) -> Vec<String> {
    let mut segments: Vec<&str> = path.split('/').collect();
    let mut directories = Vec::new();

    while !segments.is_empty() {
        let joined = segments.join("/");
        let directory = if joined.is_empty() { "/".to_string() } else { joined };

        if !is_within(&directory, root) {
            break;
        }

        directories.push(directory);
        segments.pop();
    }

    directories
}

/// Whether `path` is `root` or lies beneath it
pub fn is_within(path: &str, root: &str) -> bool {
    if root == "/" {
        return path.starts_with('/');
    }

    let root = root.trim_end_matches('/');
    match path.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Canonical form of a module specifier: single slashes, no trailing slash
pub fn normalize_module_specifier(specifier: &str) -> String {
    let normalized = normalize_slashes(specifier);
    match normalized.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => normalized,
    }
}

/// Split a bare specifier into package name and in-package sub-path
///
/// Scoped packages (`@scope/name`) keep both segments in the name.
pub fn split_package_specifier(specifier: &str) -> (String, String) {
    let segments: Vec<&str> = specifier.split('/').collect();
    let name_len = if specifier.starts_with('@') { 2 } else { 1 };
    let name_len = name_len.min(segments.len());

    (
        segments[..name_len].join("/"),
        segments[name_len..].join("/"),
    )
}
