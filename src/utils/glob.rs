//! Single-wildcard pattern substitution
//!
//! Shared by alias tables, `exports`/`imports` maps and tsconfig `paths`.

/// Match `input` against `pattern` and substitute the captured text into `target`
///
/// `pattern` is split around its first `*`; the input must start with the part
/// before it and end with the part after it. A `target` without `*` is returned
/// verbatim. Returns `None` when the pattern has no wildcard or does not match.
pub fn substitute_glob(pattern: &str, target: &str, input: &str) -> Option<String> {
    let (prefix, suffix) = pattern.split_once('*')?;

    if !input.starts_with(prefix) || !input.ends_with(suffix) {
        return None;
    }

    // prefix and suffix must not overlap inside the input
    if prefix.len() + suffix.len() > input.len() {
        return None;
    }

    let Some((target_prefix, target_suffix)) = target.split_once('*') else {
        return Some(target.to_string());
    };

    let captured = &input[prefix.len()..input.len() - suffix.len()];
    Some(format!("{}{}{}", target_prefix, captured, target_suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_glob_at_the_end() {
        assert_eq!(
            substitute_glob("#test/*", "./something/*/index.js", "#test/hello").as_deref(),
            Some("./something/hello/index.js")
        );
    }

    #[test]
    fn test_replace_glob_in_the_middle() {
        assert_eq!(
            substitute_glob("#test/*.js", "./test/*.js", "#test/hello.js").as_deref(),
            Some("./test/hello.js")
        );
    }

    #[test]
    fn test_target_without_wildcard() {
        assert_eq!(
            substitute_glob("~/*", "./fixed.js", "~/anything").as_deref(),
            Some("./fixed.js")
        );
    }

    #[test]
    fn test_no_match() {
        assert_eq!(substitute_glob("#test/*", "./*", "#other/x"), None);
        assert_eq!(substitute_glob("#test/*.js", "./*.js", "#test/x.ts"), None);
        assert_eq!(substitute_glob("exact", "./x", "exact"), None);
    }

    #[test]
    fn test_overlapping_prefix_and_suffix() {
        assert_eq!(substitute_glob("ab*ba", "./*", "aba"), None);
        assert_eq!(substitute_glob("a*a", "./*", "aa").as_deref(), Some("./"));
    }
}
