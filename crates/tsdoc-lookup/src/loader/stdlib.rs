//! Standard library declaration discovery.

use crate::config::LookupConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// `typescript/lib` below a `node_modules` directory.
const TYPESCRIPT_LIB: &[&str] = &["typescript", "lib"];

/// The TypeScript `lib` directory to read standard declarations from.
///
/// Tried in order: the configured directory, `node_modules/typescript/lib`
/// in `cwd` and each of its ancestors, every `NODE_PATH` entry, then the
/// usual global npm install prefixes.
pub fn find_lib_dir(config: &LookupConfig) -> Option<PathBuf> {
    if let Some(dir) = &config.lib_dir {
        if dir.is_dir() {
            return Some(dir.clone());
        }
        debug!(dir = %dir.display(), "configured lib dir does not exist");
    }

    let local = config
        .cwd
        .ancestors()
        .map(|dir| typescript_lib_in(&dir.join("node_modules")));
    let node_path = std::env::var_os("NODE_PATH")
        .map(|value| std::env::split_paths(&value).collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter()
        .map(|dir| typescript_lib_in(&dir));
    let global = global_node_modules().into_iter().map(|dir| typescript_lib_in(&dir));

    local
        .chain(node_path)
        .chain(global)
        .inspect(|candidate| trace!(candidate = %candidate.display(), "lib dir candidate"))
        .find(|candidate| candidate.is_dir())
}

fn typescript_lib_in(node_modules: &Path) -> PathBuf {
    TYPESCRIPT_LIB
        .iter()
        .fold(node_modules.to_path_buf(), |path, part| path.join(part))
}

fn global_node_modules() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/local/lib/node_modules"),
        PathBuf::from("/usr/lib/node_modules"),
        PathBuf::from("/opt/homebrew/lib/node_modules"),
    ];
    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".npm-global").join("lib").join("node_modules"));
        dirs.push(home.join(".local").join("lib").join("node_modules"));
    }
    if let Some(app_data) = std::env::var_os("APPDATA") {
        dirs.push(PathBuf::from(app_data).join("npm").join("node_modules"));
    }
    dirs
}

/// Every `lib*.d.ts` file directly inside `lib_dir`, sorted by file name so
/// the order is stable across runs.
pub fn list_lib_files(lib_dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(lib_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with("lib") && name.ends_with(".d.ts"))
        })
        .map(|entry| entry.into_path())
        .collect()
}

/// Standard library declaration files, or an empty list when no TypeScript
/// installation can be found.
pub fn list_standard_library_declaration_files(config: &LookupConfig) -> Vec<PathBuf> {
    match find_lib_dir(config) {
        Some(dir) => {
            let files = list_lib_files(&dir);
            debug!(dir = %dir.display(), count = files.len(), "standard library");
            files
        }
        None => Vec::new(),
    }
}
