//! Declaration universe loading.
//!
//! The universe is every standard library declaration file, optionally
//! followed by one package's or one local module's entry file. Discovery
//! failures never abort a lookup; they only leave the universe smaller.

mod local;
mod packages;
mod stdlib;

pub use local::find_local_declaration_candidate;
pub use packages::{
    NodeModulesResolver, PackageJson, read_package_json, resolve_package_declaration_files,
    types_package_name,
};
pub use stdlib::{find_lib_dir, list_lib_files, list_standard_library_declaration_files};

use crate::config::LookupConfig;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Where the non-standard part of a universe came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UniverseRoot {
    /// Standard library only
    StandardLibrary,
    /// A package found in `node_modules`
    Package { name: String, entry: PathBuf },
    /// A project file found by naming convention
    Local { name: String, entry: PathBuf },
}

/// Ordered declaration files analyzed together. Standard library files come
/// first in enumeration order; order is the tie-break for ambiguous names.
#[derive(Clone, Debug)]
pub struct DeclarationUniverse {
    pub files: Vec<PathBuf>,
    pub root: UniverseRoot,
}

impl DeclarationUniverse {
    /// Entry file of the package or local module, if any.
    pub fn entry(&self) -> Option<&PathBuf> {
        match &self.root {
            UniverseRoot::StandardLibrary => None,
            UniverseRoot::Package { entry, .. } | UniverseRoot::Local { entry, .. } => Some(entry),
        }
    }
}

fn standard_library(config: &LookupConfig) -> Vec<PathBuf> {
    let files = list_standard_library_declaration_files(config);
    if files.is_empty() {
        warn!("no TypeScript standard library found; set TSDOC_LIB_DIR or pass --lib-dir");
    }
    files
}

/// Standard library plus the entry file for `root_name`: an installed
/// package when one exists, otherwise a local module found by naming
/// convention. Either addition may be missing; the standard library is
/// always there (when installed).
pub fn load_universe(config: &LookupConfig, root_name: Option<&str>) -> DeclarationUniverse {
    let mut files = standard_library(config);
    let root = match root_name {
        Some(name) => root_for(config, name),
        None => UniverseRoot::StandardLibrary,
    };
    let mut universe = DeclarationUniverse { files: Vec::new(), root };
    if let Some(entry) = universe.entry() {
        if !files.contains(entry) {
            files.push(entry.clone());
        }
    }
    universe.files = files;
    debug!(files = universe.files.len(), root = ?universe.root, "declaration universe");
    universe
}

fn root_for(config: &LookupConfig, name: &str) -> UniverseRoot {
    if let Some(entry) = resolve_package_declaration_files(name, &config.cwd).into_iter().next() {
        return UniverseRoot::Package {
            name: name.to_string(),
            entry,
        };
    }
    match find_local_declaration_candidate(&config.cwd, name) {
        Some(entry) => UniverseRoot::Local {
            name: name.to_string(),
            entry,
        },
        None => UniverseRoot::StandardLibrary,
    }
}
