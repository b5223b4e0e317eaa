//! Local project source discovery by file-name convention.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Directories below `cwd` searched for a local module, in order.
const SEARCH_DIRS: &[&str] = &["", "src", "lib"];

/// File shapes tried for a module named `name` inside each search directory.
fn candidate_names(name: &str) -> [String; 5] {
    [
        format!("{name}.d.ts"),
        format!("{name}.ts"),
        format!("{name}.tsx"),
        format!("{name}/index.d.ts"),
        format!("{name}/index.ts"),
    ]
}

/// Local file implementing module `name`, relative to `cwd`.
pub fn find_local_declaration_candidate(cwd: &Path, name: &str) -> Option<PathBuf> {
    if name.is_empty() || name.contains("..") {
        return None;
    }
    let found = SEARCH_DIRS
        .iter()
        .map(|dir| cwd.join(dir))
        .flat_map(|dir| candidate_names(name).map(|candidate| dir.join(candidate)))
        .find(|path| path.is_file());
    if let Some(path) = &found {
        debug!(module = name, path = %path.display(), "local module");
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_beats_source_and_src_dir() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(dir.path().join("src")).expect("mkdir src");
        std::fs::write(dir.path().join("src/util.d.ts"), "").expect("write");
        std::fs::write(dir.path().join("util.ts"), "").expect("write");
        std::fs::write(dir.path().join("util.d.ts"), "").expect("write");

        let found = find_local_declaration_candidate(dir.path(), "util");
        assert_eq!(found, Some(dir.path().join("util.d.ts")));
    }

    #[test]
    fn test_index_and_nested_dirs() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(dir.path().join("lib/shapes")).expect("mkdir");
        std::fs::write(dir.path().join("lib/shapes/index.ts"), "").expect("write");

        let found = find_local_declaration_candidate(dir.path(), "shapes");
        assert_eq!(found, Some(dir.path().join("lib").join("shapes/index.ts")));
        assert_eq!(find_local_declaration_candidate(dir.path(), "missing"), None);
        assert_eq!(find_local_declaration_candidate(dir.path(), "../etc"), None);
    }
}
