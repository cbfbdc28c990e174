//! Default resolver policy

/// Extensions probed after the bare path
pub const DEFAULT_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".json"];

/// Module directory that is always searched
pub const NODE_MODULES: &str = "node_modules";

/// Entry point fields, highest priority first
pub const DEFAULT_MAIN_FIELDS: &[&str] = &["module", "browser", "main", "jsnext:main"];

/// Remapping fields, highest priority first
pub const DEFAULT_ALIAS_FIELDS: &[&str] = &["browser", "alias"];

/// Condition names for `exports`/`imports`, highest priority first
pub const DEFAULT_ENVIRONMENT_KEYS: &[&str] =
    &["browser", "development", "default", "require", "import"];

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn default_extensions() -> Vec<String> {
    owned(DEFAULT_EXTENSIONS)
}

pub(crate) fn default_module_directories() -> Vec<String> {
    owned(&[NODE_MODULES])
}

pub(crate) fn default_main_fields() -> Vec<String> {
    owned(DEFAULT_MAIN_FIELDS)
}

pub(crate) fn default_alias_fields() -> Vec<String> {
    owned(DEFAULT_ALIAS_FIELDS)
}

pub(crate) fn default_environment_keys() -> Vec<String> {
    owned(DEFAULT_ENVIRONMENT_KEYS)
}
