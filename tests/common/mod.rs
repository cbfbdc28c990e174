//! Shared fixture tree and helpers for resolution tests

#![allow(dead_code)]

use std::sync::Arc;

use noderesolve::{MemoryFs, ResolveError, ResolveOptions, Resolver, ResolverConfig};

pub const DEFAULT_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx"];

const FILES: &[(&str, &str)] = &[
    // root project
    (
        "/package.json",
        r#"{
            "name": "fixture",
            "alias": {
                "aliased": "foo",
                "aliased-file": "./bar.js",
                "package-alias-exclude": false
            },
            "exports": { "a-custom-export": "./bar.js" }
        }"#,
    ),
    (
        "/tsconfig.json",
        r#"{
            "compilerOptions": {
                "baseUrl": "./src",
                "paths": {
                    "something-special": ["app/something"],
                    "@app/*": ["app/*"],
                    "~/*": ["*"]
                }
            }
        }"#,
    ),
    ("/foo.js", ""),
    ("/bar.js", ""),
    ("/index.tsx", ""),
    ("/nested/index.js", ""),
    ("/nested/test.js", ""),
    ("/src/app/index.js", ""),
    ("/src/app/something.js", ""),
    ("/src/app_config/test.js", ""),
    ("/packages/source/dist.js", ""),
    ("/packages/source-alias/other.js", ""),
    // plain packages
    ("/node_modules/foo/package.json", "{}"),
    ("/node_modules/foo/index.js", ""),
    ("/node_modules/foo/nested/baz.js", ""),
    ("/node_modules/package-main/package.json", r#"{ "main": "main.js" }"#),
    ("/node_modules/package-main/main.js", ""),
    ("/node_modules/simple/package.json", r#"{ "main": "entrypoint" }"#),
    ("/node_modules/simple/entrypoint.js", ""),
    (
        "/node_modules/package-module/package.json",
        r#"{ "main": "main.js", "module": "module.js" }"#,
    ),
    ("/node_modules/package-module/main.js", ""),
    ("/node_modules/package-module/module.js", ""),
    (
        "/node_modules/package-browser/package.json",
        r#"{ "main": "main.js", "browser": "browser.js" }"#,
    ),
    ("/node_modules/package-browser/main.js", ""),
    ("/node_modules/package-browser/browser.js", ""),
    (
        "/node_modules/solid-js/package.json",
        r#"{
            "main": "./dist/server.cjs",
            "browser": { "./dist/server.cjs": "./dist/solid.cjs" }
        }"#,
    ),
    ("/node_modules/solid-js/dist/server.cjs", ""),
    ("/node_modules/solid-js/dist/solid.cjs", ""),
    ("/node_modules/package-fallback/package.json", r#"{ "main": "missing.js" }"#),
    ("/node_modules/package-fallback/index.js", ""),
    ("/node_modules/package-main-directory/package.json", r#"{ "main": "nested" }"#),
    ("/node_modules/package-main-directory/nested/index.js", ""),
    ("/node_modules/styled-components/package.json", r#"{ "main": "dist/index.js" }"#),
    ("/node_modules/styled-components/dist/index.js", ""),
    ("/node_modules/styled-components/dist/macro.js", ""),
    (
        "/node_modules/styled-components/macro/package.json",
        r#"{ "main": "../dist/macro.js" }"#,
    ),
    ("/node_modules/@scope/pkg/package.json", "{}"),
    ("/node_modules/@scope/pkg/index.js", ""),
    ("/node_modules/@scope/pkg/foo/bar.js", ""),
    ("/node_modules/@scope/pkg-exports-main/package.json", r#"{ "exports": "./export.js" }"#),
    ("/node_modules/@scope/pkg-exports-main/export.js", ""),
    ("/node_modules/instantsearch.js/package.json", r#"{ "main": "index.js" }"#),
    ("/node_modules/instantsearch.js/index.js", ""),
    ("/node_modules/instantsearch.js/es/index.js", ""),
    // browser field
    (
        "/node_modules/package-browser-alias/package.json",
        r#"{
            "main": "main.js",
            "browser": {
                "./main.js": "./browser.js",
                "./foo.js": "./bar.js",
                "./nested.js": "./subfolder1/subfolder2/subfile.js"
            }
        }"#,
    ),
    ("/node_modules/package-browser-alias/main.js", ""),
    ("/node_modules/package-browser-alias/browser.js", ""),
    ("/node_modules/package-browser-alias/foo.js", ""),
    ("/node_modules/package-browser-alias/bar.js", ""),
    ("/node_modules/package-browser-alias/subfolder1/subfolder2/subfile.js", ""),
    (
        "/node_modules/package-browser-exclude/package.json",
        r#"{ "main": "index.js", "browser": false }"#,
    ),
    ("/node_modules/package-browser-exclude/index.js", ""),
    ("/node_modules/readable-stream/package.json", r#"{ "browser": { "util": false } }"#),
    ("/node_modules/readable-stream/index.js", ""),
    ("/node_modules/util/package.json", r#"{ "main": "util.js" }"#),
    ("/node_modules/util/util.js", ""),
    // alias field
    ("/node_modules/package-alias/package.json", r#"{ "alias": { "./foo": "./bar.js" } }"#),
    ("/node_modules/package-alias/browser.js", ""),
    ("/node_modules/package-alias/bar.js", ""),
    (
        "/node_modules/package-alias-glob/package.json",
        r#"{ "alias": { "./lib/*": "./src/*" } }"#,
    ),
    ("/node_modules/package-alias-glob/index.js", ""),
    ("/node_modules/package-alias-glob/src/test.js", ""),
    // exports
    (
        "/node_modules/package-exports/package.json",
        r#"{
            "main": "./main.js",
            "exports": {
                ".": "./module.js",
                "./*": "./*.js",
                "./*.js": "./*.js",
                "./components/*": "./src/components/*.js",
                "./utils/*": { "browser": "./src/utils/*.js" },
                "./internal": null
            }
        }"#,
    ),
    ("/node_modules/package-exports/main.js", ""),
    ("/node_modules/package-exports/module.js", ""),
    ("/node_modules/package-exports/src/components/a.js", ""),
    ("/node_modules/package-exports/src/utils/path.js", ""),
    ("/node_modules/package-exports/src/utils/test/index.js", ""),
    (
        "/node_modules/@zendesk/laika/package.json",
        r#"{ "exports": { ".": "./cjs/laika.js", "./esm/*": "./esm/*.js" } }"#,
    ),
    ("/node_modules/@zendesk/laika/cjs/laika.js", ""),
    ("/node_modules/@zendesk/laika/esm/laika.js", ""),
    // imports
    (
        "/node_modules/package-imports/package.json",
        r##"{
            "main": "index.js",
            "imports": {
                "#internal/*": "./src/internal/*.js",
                "#dep": "foo",
                "#env": { "browser": "./browser.js", "default": "./default.js" },
                "#excluded": null
            }
        }"##,
    ),
    ("/node_modules/package-imports/index.js", ""),
    ("/node_modules/package-imports/browser.js", ""),
    ("/node_modules/package-imports/default.js", ""),
    ("/node_modules/package-imports/src/internal/util.js", ""),
    // custom module directory
    ("/web_modules/widget/package.json", r#"{ "main": "widget.js" }"#),
    ("/web_modules/widget/widget.js", ""),
    // duplicate packages across nested module trees
    ("/nested_node_modules/node_modules/url/package.json", r#"{ "main": "url.js" }"#),
    ("/nested_node_modules/node_modules/url/url.js", ""),
    (
        "/nested_node_modules/node_modules/url/node_modules/punycode/package.json",
        r#"{ "main": "punycode.js" }"#,
    ),
    ("/nested_node_modules/node_modules/url/node_modules/punycode/punycode.js", ""),
    ("/nested_node_modules/node_modules/punycode/package.json", r#"{ "main": "index.js" }"#),
    (
        "/nested_node_modules/node_modules/punycode/1.3.2/package.json",
        r#"{ "main": "punycode.js" }"#,
    ),
    ("/nested_node_modules/node_modules/punycode/1.3.2/punycode.js", ""),
];

/// In-memory project exercising every resolution feature
pub fn fixture() -> MemoryFs {
    FILES
        .iter()
        .fold(MemoryFs::new(), |fs, (path, content)| fs.with_file(path, content))
}

pub fn options(filename: &str, extensions: &[&str]) -> ResolveOptions {
    options_with(filename, ResolverConfig::default().with_extensions(extensions.iter().copied()))
}

pub fn options_with(filename: &str, config: ResolverConfig) -> ResolveOptions {
    ResolveOptions::new(filename, Arc::new(config))
}

/// Resolve through both calling conventions and check they agree
pub async fn resolve_both(
    fs: &MemoryFs,
    specifier: &str,
    options: &ResolveOptions,
) -> Result<String, ResolveError> {
    let blocking = Resolver::blocking(fs.clone()).resolve_sync(specifier, options);
    let suspending = Resolver::new(fs.clone()).resolve(specifier, options).await;

    match (&blocking, &suspending) {
        (Ok(a), Ok(b)) => assert_eq!(a, b, "conventions disagree on '{}'", specifier),
        (Err(a), Err(b)) => assert_eq!(
            a.to_string(),
            b.to_string(),
            "conventions disagree on '{}'",
            specifier
        ),
        _ => panic!(
            "conventions disagree on '{}': {:?} vs {:?}",
            specifier, blocking, suspending
        ),
    }

    suspending
}

/// Resolve against the shared fixture with the given extensions
pub async fn resolve(
    specifier: &str,
    filename: &str,
    extensions: &[&str],
) -> Result<String, ResolveError> {
    resolve_both(&fixture(), specifier, &options(filename, extensions)).await
}
