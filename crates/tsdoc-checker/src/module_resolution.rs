//! Relative module specifier resolution.
//!
//! Only relative specifiers (`./x`, `../y`) and triple-slash path references
//! are resolved here. Bare specifiers resolve against ambient
//! `declare module "name"` declarations in the checker, then against
//! whatever a `PackageResolver` placed while the program was built.

use std::path::{Component, Path, PathBuf};

/// Extensions tried for an extensionless specifier, in priority order.
/// `.d.ts` comes before `.ts` so `foo.d.ts` wins over a sibling `foo.ts`.
const TS_EXTENSIONS: &[&str] = &[".d.ts", ".ts", ".tsx", ".d.mts", ".mts", ".d.cts", ".cts"];

/// JavaScript extensions written in ESM-style specifiers (`./x.js`) that map
/// back to a TypeScript source or declaration file.
const JS_EXTENSIONS: &[&str] = &[".js", ".jsx", ".mjs", ".cjs"];

pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier == "."
        || specifier == ".."
}

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component. Does not touch the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn has_ts_extension(path: &str) -> bool {
    TS_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Candidate files for `specifier` imported from `from_file`, in the order
/// they should be tried.
pub(crate) fn specifier_candidates(from_file: &Path, specifier: &str) -> Vec<PathBuf> {
    let dir = from_file.parent().unwrap_or_else(|| Path::new(""));
    let base = normalize_path(&dir.join(specifier));
    let base_str = base.to_string_lossy().into_owned();

    let mut candidates = Vec::new();
    if has_ts_extension(&base_str) {
        candidates.push(base.clone());
    }
    let stem = JS_EXTENSIONS
        .iter()
        .find_map(|ext| base_str.strip_suffix(ext))
        .unwrap_or(&base_str);
    for ext in TS_EXTENSIONS {
        candidates.push(PathBuf::from(format!("{stem}{ext}")));
    }
    for ext in TS_EXTENSIONS {
        candidates.push(base.join(format!("index{ext}")));
    }
    candidates
}

/// Target of a `/// <reference path="..." />` directive.
pub(crate) fn reference_candidate(from_file: &Path, path: &str) -> PathBuf {
    let dir = from_file.parent().unwrap_or_else(|| Path::new(""));
    normalize_path(&dir.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_folds_dots() {
        assert_eq!(
            normalize_path(Path::new("/a/b/./c/../d.ts")),
            PathBuf::from("/a/b/d.ts")
        );
        assert_eq!(normalize_path(Path::new("../x")), PathBuf::from("../x"));
    }

    #[test]
    fn test_specifier_candidates_order() {
        let candidates = specifier_candidates(Path::new("/p/src/index.ts"), "./util");
        assert_eq!(candidates[0], PathBuf::from("/p/src/util.d.ts"));
        assert_eq!(candidates[1], PathBuf::from("/p/src/util.ts"));
        assert!(candidates.contains(&PathBuf::from("/p/src/util/index.d.ts")));
    }

    #[test]
    fn test_js_extension_maps_to_declaration() {
        let candidates = specifier_candidates(Path::new("/p/index.d.ts"), "../lib/core.js");
        assert_eq!(candidates[0], PathBuf::from("/lib/core.d.ts"));
    }

    #[test]
    fn test_explicit_ts_extension_is_tried_first() {
        let candidates = specifier_candidates(Path::new("/p/a.ts"), "./b.d.ts");
        assert_eq!(candidates[0], PathBuf::from("/p/b.d.ts"));
    }

    #[test]
    fn test_relative_specifiers() {
        assert!(is_relative_specifier("./a"));
        assert!(is_relative_specifier("../a"));
        assert!(!is_relative_specifier("express"));
        assert!(!is_relative_specifier("@types/node"));
    }
}
