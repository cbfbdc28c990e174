//! package.json processing
//!
//! Flattens `main`-style fields, `exports`, `browser`/`alias` remapping fields and
//! `imports` into two lookup tables. Every key and value is an absolute virtual
//! path, a bare specifier, or [`EMPTY_MODULE`].

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::error::{ResolveError, Result};
use crate::utils::{join_path, normalize_module_specifier};

/// Resolved path of a module that was remapped to nothing
pub const EMPTY_MODULE: &str = "//empty.js";

/// Processed, immutable view of one package.json
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// Absolute path of the package.json this was built from
    pub source_path: String,

    /// General specifier remapping, including the package entry point
    pub aliases: IndexMap<String, String>,

    /// `#`-prefixed subpath imports
    pub imports: IndexMap<String, String>,
}

/// Field priority lists, highest priority first
#[derive(Debug, Clone, Copy)]
pub struct FieldPriorities<'a> {
    pub main_fields: &'a [String],
    pub alias_fields: &'a [String],
    pub environment_keys: &'a [String],
}

impl PackageDescriptor {
    /// Empty descriptor used when no package.json can be found
    pub fn synthetic_root() -> Self {
        Self {
            source_path: "/package.json".to_string(),
            ..Self::default()
        }
    }

    /// Build a descriptor from parsed package.json content
    ///
    /// `pkg_root` is the directory containing the package.json. The root
    /// project (`/`) never has its own `exports` applied.
    pub fn process(
        content: &Value,
        pkg_root: &str,
        source_path: &str,
        fields: FieldPriorities<'_>,
    ) -> Result<Self> {
        let mut descriptor = Self {
            source_path: source_path.to_string(),
            ..Self::default()
        };

        let Some(content) = content.as_object() else {
            return Ok(descriptor);
        };

        let exports = match content.get("exports") {
            Some(exports) if is_truthy(exports) && pkg_root != "/" => {
                process_exports(exports, pkg_root, fields.environment_keys)?
            }
            _ => IndexMap::new(),
        };

        if !exports.contains_key(pkg_root) {
            if let Some(main) = fields
                .main_fields
                .iter()
                .find_map(|field| content.get(field).and_then(Value::as_str))
            {
                descriptor
                    .aliases
                    .insert(pkg_root.to_string(), normalize_alias_path(main, pkg_root, true));
            }
        }

        descriptor.aliases.extend(exports);

        if content.get("browser") == Some(&Value::Bool(false))
            && fields.main_fields.iter().any(|field| field == "browser")
        {
            descriptor
                .aliases
                .insert(pkg_root.to_string(), EMPTY_MODULE.to_string());
        }

        for field in fields.alias_fields {
            if let Some(Value::Object(entries)) = content.get(field) {
                process_alias_field(field, entries, pkg_root, &mut descriptor.aliases);
            }
        }

        if let Some(Value::Object(imports)) = content.get("imports") {
            for key in keys_by_specificity(imports) {
                let target =
                    resolve_conditional(&imports[key], pkg_root, fields.environment_keys, false)?;
                descriptor
                    .imports
                    .insert(key.clone(), target.unwrap_or_else(|| EMPTY_MODULE.to_string()));
            }
        }

        Ok(descriptor)
    }
}

/// Flatten an `exports` value into alias entries keyed by absolute path
fn process_exports(
    exports: &Value,
    pkg_root: &str,
    environment_keys: &[String],
) -> Result<IndexMap<String, String>> {
    let mut entries = IndexMap::new();

    match exports {
        Value::Object(subpaths) if subpaths.keys().any(|key| key.starts_with('.')) => {
            for key in keys_by_specificity(subpaths) {
                let target = resolve_conditional(&subpaths[key], pkg_root, environment_keys, true)?;
                entries.insert(
                    normalize_alias_path(key, pkg_root, true),
                    target.unwrap_or_else(|| EMPTY_MODULE.to_string()),
                );
            }
        }
        // a bare string, or one conditional node standing for the package root
        _ => {
            if let Some(target) = resolve_conditional(exports, pkg_root, environment_keys, true)? {
                entries.insert(pkg_root.to_string(), target);
            }
        }
    }

    Ok(entries)
}

fn process_alias_field(
    field: &str,
    entries: &Map<String, Value>,
    pkg_root: &str,
    aliases: &mut IndexMap<String, String>,
) {
    for key in keys_by_specificity(entries) {
        let value = match &entries[key] {
            Value::String(target) if !target.is_empty() => {
                normalize_alias_path(target, pkg_root, false)
            }
            value if !is_truthy(value) => EMPTY_MODULE.to_string(),
            _ => continue,
        };
        let key = normalize_alias_path(key, pkg_root, false);

        // browser maps are file-level only
        if field != "browser" {
            let companion = if value == EMPTY_MODULE {
                value.clone()
            } else {
                format!("{}/*", value)
            };
            aliases.insert(format!("{}/*", key), companion);
        }

        aliases.insert(key, value);
    }
}

/// Resolve an exports/imports node against the caller's environment keys
///
/// Strings are terminal, `null`/`false` exclude the entry, arrays yield their
/// first resolvable element and objects follow the first environment key they
/// contain.
pub fn resolve_conditional(
    node: &Value,
    pkg_root: &str,
    environment_keys: &[String],
    file_path: bool,
) -> Result<Option<String>> {
    match node {
        Value::String(target) => Ok(Some(normalize_alias_path(target, pkg_root, file_path))),
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Array(candidates) => {
            for candidate in candidates {
                if let Some(target) =
                    resolve_conditional(candidate, pkg_root, environment_keys, file_path)?
                {
                    return Ok(Some(target));
                }
            }
            Ok(None)
        }
        Value::Object(conditions) => {
            match environment_keys.iter().find_map(|key| conditions.get(key)) {
                Some(next) => resolve_conditional(next, pkg_root, environment_keys, file_path),
                None => Ok(None),
            }
        }
        Value::Bool(true) => Err(ResolveError::UnsupportedExportShape {
            package: pkg_root.to_string(),
            shape: "boolean",
        }),
        Value::Number(_) => Err(ResolveError::UnsupportedExportShape {
            package: pkg_root.to_string(),
            shape: "number",
        }),
    }
}

/// Normalize a path written inside a package.json
///
/// Relative paths are anchored at the package root. When `file_path` is set
/// (main fields, exports) bare names are package-relative too; otherwise they
/// stay bare and name another module.
pub(crate) fn normalize_alias_path(path: &str, pkg_root: &str, file_path: bool) -> String {
    if path == EMPTY_MODULE {
        return path.to_string();
    }

    let normalized = normalize_module_specifier(path);
    if normalized.starts_with('.') || (file_path && !normalized.starts_with('/')) {
        join_path(&[pkg_root, &normalized])
    } else {
        normalized
    }
}

/// Keys ordered longest first; ties keep their declaration order
fn keys_by_specificity(map: &Map<String, Value>) -> Vec<&String> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()));
    keys
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}
