//! tsconfig.json / jsconfig.json path mapping

use serde_json::Value;
use tracing::warn;

use crate::utils::{join_path, substitute_glob};

/// Candidate config files, in lookup order
pub const CONFIG_FILES: [&str; 2] = ["/tsconfig.json", "/jsconfig.json"];

/// One `compilerOptions.paths` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRule {
    /// Specifier pattern, may contain one `*`
    pub pattern: String,
    /// Replacement targets relative to the base path, tried in order
    pub targets: Vec<String>,
}

/// Processed path-mapping section of a tsconfig
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsConfigDescriptor {
    /// Absolute directory `paths` targets are relative to
    pub base_path: String,
    /// Whether `baseUrl` was given, making bare specifiers resolvable from it
    pub has_base_url: bool,
    pub rules: Vec<PathRule>,
}

/// Parse tsconfig text, tolerating comments and trailing commas
pub fn parse_config_text(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }

    match jsonc_parser::parse_to_serde_value(text, &Default::default()) {
        Ok(value) => value,
        Err(err) => {
            warn!("Ignoring unparsable tsconfig: {}", err);
            None
        }
    }
}

impl TsConfigDescriptor {
    /// Extract `baseUrl` and `paths` from a parsed config at the project root
    ///
    /// Returns `None` when neither is present.
    pub fn process(content: &Value) -> Option<Self> {
        let options = content.get("compilerOptions")?.as_object()?;

        let base_url = options.get("baseUrl").and_then(Value::as_str);
        let paths = options.get("paths").and_then(Value::as_object);

        if base_url.is_none() && paths.is_none() {
            return None;
        }

        let rules = paths
            .map(|paths| {
                paths
                    .iter()
                    .map(|(pattern, targets)| PathRule {
                        pattern: pattern.clone(),
                        targets: targets
                            .as_array()
                            .map(|targets| {
                                targets
                                    .iter()
                                    .filter_map(Value::as_str)
                                    .map(str::to_string)
                                    .collect()
                            })
                            .unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            base_path: join_path(&["/", base_url.unwrap_or(".")]),
            has_base_url: base_url.is_some(),
            rules,
        })
    }

    /// Absolute paths a bare specifier may map to, in priority order
    pub fn candidate_paths(&self, specifier: &str) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();
        let mut push = |target: &str| {
            let path = join_path(&[&self.base_path, target]);
            if !candidates.contains(&path) {
                candidates.push(path);
            }
        };

        for rule in &self.rules {
            for target in &rule.targets {
                if rule.pattern.contains('*') {
                    if let Some(mapped) = substitute_glob(&rule.pattern, target, specifier) {
                        push(&mapped);
                    }
                } else if rule.pattern == specifier {
                    push(target);
                }
            }
        }

        if self.has_base_url {
            push(specifier);
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fixture() -> TsConfigDescriptor {
        TsConfigDescriptor::process(&json!({
            "compilerOptions": {
                "baseUrl": "./src",
                "paths": {
                    "something-special": ["app/something"],
                    "@app/*": ["app/*", "fallback/*"],
                    "~/*": ["*"]
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_process() {
        let config = fixture();
        assert_eq!(config.base_path, "/src");
        assert!(config.has_base_url);
        assert_eq!(config.rules.len(), 3);
        assert_eq!(config.rules[1].pattern, "@app/*");
        assert_eq!(config.rules[1].targets, vec!["app/*", "fallback/*"]);
    }

    #[test]
    fn test_missing_sections() {
        assert_eq!(TsConfigDescriptor::process(&json!({})), None);
        assert_eq!(
            TsConfigDescriptor::process(&json!({ "compilerOptions": { "strict": true } })),
            None
        );
    }

    #[test]
    fn test_paths_without_base_url() {
        let config = TsConfigDescriptor::process(&json!({
            "compilerOptions": { "paths": { "@lib/*": ["lib/*"] } }
        }))
        .unwrap();
        assert_eq!(config.base_path, "/");
        assert_eq!(config.candidate_paths("@lib/x"), vec!["/lib/x"]);
        assert!(config.candidate_paths("react").is_empty());
    }

    #[test]
    fn test_candidate_paths() {
        let config = fixture();
        assert_eq!(
            config.candidate_paths("@app/something"),
            vec!["/src/app/something", "/src/fallback/something", "/src/@app/something"]
        );
        assert_eq!(
            config.candidate_paths("something-special"),
            vec!["/src/app/something", "/src/something-special"]
        );
        assert_eq!(
            config.candidate_paths("~/app_config/test"),
            vec!["/src/app_config/test", "/src/~/app_config/test"]
        );
        assert_eq!(config.candidate_paths("app"), vec!["/src/app"]);
    }

    #[test]
    fn test_parse_config_text_with_comments() {
        let text = r#"{
            // comment
            "compilerOptions": {
                "baseUrl": ".",
            }
        }"#;
        let value = parse_config_text(text).unwrap();
        assert_eq!(value["compilerOptions"]["baseUrl"], json!("."));
    }

    #[test]
    fn test_parse_config_text_invalid() {
        assert_eq!(parse_config_text("{ \"compilerOptions\": "), None);
    }
}
