//! Package declaration entry points.
//!
//! Each strategy looks at one candidate package directory and either names
//! its declaration entry file or gives up. The first hit wins; every failure
//! (missing directory, unreadable or malformed manifest) just moves on to the
//! next candidate.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use tsdoc_checker::PackageResolver;

/// The parts of `package.json` that point at declarations.
#[derive(Debug, Default, Deserialize)]
pub struct PackageJson {
    #[serde(default)]
    pub types: Option<String>,
    #[serde(default)]
    pub typings: Option<String>,
    #[serde(default)]
    pub exports: Option<serde_json::Value>,
}

pub fn read_package_json(path: &Path) -> Option<PackageJson> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(manifest) => Some(manifest),
        Err(err) => {
            debug!(path = %path.display(), %err, "ignoring malformed package.json");
            None
        }
    }
}

type Strategy = fn(&Path, Option<&PackageJson>) -> Option<PathBuf>;

/// Strategies tried against a package directory, in order.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("manifest types", manifest_types),
    ("manifest exports types", manifest_exports_types),
    ("index declaration", index_declaration),
];

fn manifest_types(package_dir: &Path, manifest: Option<&PackageJson>) -> Option<PathBuf> {
    let manifest = manifest?;
    let entry = manifest.types.as_deref().or(manifest.typings.as_deref())?;
    declaration_file(package_dir, entry)
}

fn manifest_exports_types(package_dir: &Path, manifest: Option<&PackageJson>) -> Option<PathBuf> {
    let exports = manifest?.exports.as_ref()?;
    declaration_file(package_dir, types_condition(exports, 0)?)
}

fn index_declaration(package_dir: &Path, _manifest: Option<&PackageJson>) -> Option<PathBuf> {
    let index = package_dir.join("index.d.ts");
    index.is_file().then_some(index)
}

/// The `types` condition for the package root inside an `exports` map:
/// `{ "types": ... }`, `{ ".": { "types": ... } }` or nested under
/// `import`/`require`/`default`.
fn types_condition(exports: &serde_json::Value, depth: usize) -> Option<&str> {
    let map = exports.as_object()?;
    if depth > 4 {
        return None;
    }
    if let Some(types) = map.get("types").and_then(|v| v.as_str()) {
        return Some(types);
    }
    [".", "import", "require", "default"]
        .iter()
        .filter_map(|key| map.get(*key))
        .find_map(|value| types_condition(value, depth + 1))
}

/// `entry` relative to the package directory, tolerating a missing `.d.ts`
/// extension.
fn declaration_file(package_dir: &Path, entry: &str) -> Option<PathBuf> {
    let path = package_dir.join(entry);
    if path.is_file() {
        return Some(path);
    }
    let with_extension = package_dir.join(format!("{}.d.ts", entry.trim_end_matches(".js")));
    if with_extension.is_file() {
        return Some(with_extension);
    }
    let index = path.join("index.d.ts");
    index.is_file().then_some(index)
}

/// `@types` package name for `name`: `@types/lodash` for `lodash`,
/// `@types/scope__pkg` for `@scope/pkg`.
pub fn types_package_name(name: &str) -> String {
    match name.strip_prefix('@') {
        Some(scoped) => format!("@types/{}", scoped.replace('/', "__")),
        None => format!("@types/{name}"),
    }
}

/// Declaration entry file of package `name`, searched in `node_modules`
/// from `cwd` upwards. At each level the package itself is tried before its
/// `@types` counterpart. Returns an empty list when nothing is found.
pub fn resolve_package_declaration_files(name: &str, cwd: &Path) -> Vec<PathBuf> {
    if name.is_empty() || name.starts_with('.') || name.contains('\\') {
        return Vec::new();
    }
    let types_name = types_package_name(name);
    for dir in cwd.ancestors() {
        let node_modules = dir.join("node_modules");
        if !node_modules.is_dir() {
            continue;
        }
        for package_dir in [node_modules.join(name), node_modules.join(&types_name)] {
            if !package_dir.is_dir() {
                continue;
            }
            let manifest = read_package_json(&package_dir.join("package.json"));
            for &(strategy, resolve) in STRATEGIES {
                trace!(package = name, strategy, dir = %package_dir.display(), "trying");
                if let Some(entry) = resolve(&package_dir, manifest.as_ref()) {
                    debug!(package = name, strategy, entry = %entry.display(), "package declarations");
                    return vec![entry];
                }
            }
        }
    }
    debug!(package = name, "no package declarations");
    Vec::new()
}

/// Places bare specifiers met while building a program (`export { x } from
/// "other-package"`) at their installed declarations.
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeModulesResolver;

impl PackageResolver for NodeModulesResolver {
    fn resolve_package(&self, specifier: &str, from_dir: &Path) -> Option<PathBuf> {
        resolve_package_declaration_files(specifier, from_dir).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_package_name() {
        assert_eq!(types_package_name("express"), "@types/express");
        assert_eq!(types_package_name("@babel/core"), "@types/babel__core");
    }

    #[test]
    fn test_types_condition_shapes() {
        let flat: serde_json::Value = serde_json::json!({ "types": "./a.d.ts" });
        assert_eq!(types_condition(&flat, 0), Some("./a.d.ts"));

        let dotted = serde_json::json!({ ".": { "import": { "types": "./esm/index.d.mts" } } });
        assert_eq!(types_condition(&dotted, 0), Some("./esm/index.d.mts"));

        let none = serde_json::json!("./index.js");
        assert_eq!(types_condition(&none, 0), None);
    }
}
