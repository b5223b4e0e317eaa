//! Program construction.
//!
//! A program is the declaration universe plus every file it pulls in through
//! relative imports, re-exports and `/// <reference path>` directives, parsed
//! and bound in one pass. Bare package specifiers are followed too when a
//! [`PackageResolver`] can place them.

use crate::module_resolution::{
    is_relative_specifier, normalize_path, reference_candidate, specifier_candidates,
};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, debug_span, trace, warn};
use tsdoc_binder::BinderState;
use tsdoc_common::FileId;
use tsdoc_parser::{SourceFile, parse_file};

// =============================================================================
// Source hosts
// =============================================================================

/// Where program files are read from.
pub trait SourceHost {
    fn read_file(&self, path: &Path) -> io::Result<String>;
    fn file_exists(&self, path: &Path) -> bool;
}

/// Reads files from disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiskHost;

impl SourceHost for DiskHost {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// In-memory files, keyed by normalized path.
#[derive(Clone, Debug, Default)]
pub struct MemoryHost {
    files: FxHashMap<PathBuf, String>,
}

impl MemoryHost {
    pub fn new() -> MemoryHost {
        MemoryHost::default()
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, text: impl Into<String>) -> MemoryHost {
        self.add_file(path, text);
        self
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>, text: impl Into<String>) {
        self.files
            .insert(normalize_path(path.as_ref()), text.into());
    }
}

impl SourceHost for MemoryHost {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(&normalize_path(path))
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such in-memory file"))
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.contains_key(&normalize_path(path))
    }
}

// =============================================================================
// Package resolution
// =============================================================================

/// Finds the declaration entry file of a bare specifier (`"minimatch"`,
/// `"@scope/pkg"`) imported from a file in `from_dir`.
pub trait PackageResolver {
    fn resolve_package(&self, specifier: &str, from_dir: &Path) -> Option<PathBuf>;
}

/// Places no packages; bare specifiers then only match ambient modules.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPackages;

impl PackageResolver for NoPackages {
    fn resolve_package(&self, _specifier: &str, _from_dir: &Path) -> Option<PathBuf> {
        None
    }
}

// =============================================================================
// Program
// =============================================================================

/// Fixed compilation settings. Nothing is emitted; these only document the
/// language level declarations are read at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramOptions {
    pub target: &'static str,
    pub module: &'static str,
}

impl Default for ProgramOptions {
    fn default() -> ProgramOptions {
        ProgramOptions {
            target: "ESNext",
            module: "NodeNext",
        }
    }
}

pub struct Program {
    files: Vec<SourceFile>,
    paths: Vec<PathBuf>,
    by_path: FxHashMap<PathBuf, FileId>,
    /// Entry file of each bare specifier, as first resolved
    packages: FxHashMap<String, PathBuf>,
    /// Number of files that came from the universe itself; the rest were
    /// discovered by following references
    universe_len: usize,
    binder: BinderState,
    options: ProgramOptions,
}

impl Program {
    /// Read, parse and bind `universe` (and whatever it references) from disk.
    pub fn build(universe: &[PathBuf]) -> Program {
        Program::build_with_host(universe, &DiskHost)
    }

    pub fn build_with_host(universe: &[PathBuf], host: &dyn SourceHost) -> Program {
        Program::build_with(universe, host, &NoPackages)
    }

    pub fn build_with(
        universe: &[PathBuf],
        host: &dyn SourceHost,
        packages: &dyn PackageResolver,
    ) -> Program {
        let _span = debug_span!("program_build", universe = universe.len()).entered();
        let options = ProgramOptions::default();
        debug!(target = options.target, module = options.module, "program options");

        let mut files = Vec::new();
        let mut paths = Vec::new();
        let mut by_path: FxHashMap<PathBuf, FileId> = FxHashMap::default();
        let mut package_entries: FxHashMap<String, PathBuf> = FxHashMap::default();
        let mut universe_len = 0;

        let mut pending: Vec<PathBuf> = universe.iter().map(|p| normalize_path(p)).collect();
        let mut next = 0;
        while next < pending.len() {
            let path = pending[next].clone();
            let from_universe = next < universe.len();
            next += 1;
            if by_path.contains_key(&path) {
                continue;
            }
            let text = match host.read_file(&path) {
                Ok(text) => text,
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping unreadable file");
                    continue;
                }
            };
            let source = parse_file(path.to_string_lossy(), text);
            if !source.diagnostics.is_empty() {
                debug!(
                    file = %source.file_name,
                    count = source.diagnostics.len(),
                    first = %source.diagnostics[0].message,
                    "parse diagnostics"
                );
            }
            pending.extend(discover_dependencies(&path, &source, host));
            for (specifier, entry) in discover_packages(&path, &source, host, packages) {
                if let Entry::Vacant(slot) = package_entries.entry(specifier) {
                    pending.push(entry.clone());
                    slot.insert(entry);
                }
            }

            let id = FileId(files.len() as u32);
            if from_universe {
                universe_len += 1;
            }
            by_path.insert(path.clone(), id);
            paths.push(path);
            files.push(source);
        }

        let mut binder = BinderState::new();
        for (i, source) in files.iter().enumerate() {
            binder.bind_source_file(FileId(i as u32), source);
        }
        debug!(
            files = files.len(),
            discovered = files.len() - universe_len,
            symbols = binder.symbols().len(),
            "program built"
        );

        Program {
            files,
            paths,
            by_path,
            packages: package_entries,
            universe_len,
            binder,
            options,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn files(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, f)| (FileId(i as u32), f))
    }

    #[inline]
    pub fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    pub fn path(&self, id: FileId) -> Option<&Path> {
        self.paths.get(id.index()).map(PathBuf::as_path)
    }

    pub fn file_id(&self, path: &Path) -> Option<FileId> {
        self.by_path.get(&normalize_path(path)).copied()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Files that came from the universe, in universe order.
    pub fn universe_files(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
        self.files().take(self.universe_len)
    }

    #[inline]
    pub fn binder(&self) -> &BinderState {
        &self.binder
    }

    pub fn options(&self) -> ProgramOptions {
        self.options
    }

    /// Entry file loaded for a bare package specifier.
    pub fn resolve_package_module(&self, specifier: &str) -> Option<FileId> {
        self.by_path.get(self.packages.get(specifier)?).copied()
    }

    /// File a relative specifier in `from` points at, if it was loaded.
    pub fn resolve_relative_module(&self, from: FileId, specifier: &str) -> Option<FileId> {
        if !is_relative_specifier(specifier) {
            return None;
        }
        let from_path = self.path(from)?;
        specifier_candidates(from_path, specifier)
            .iter()
            .find_map(|candidate| self.by_path.get(candidate).copied())
    }
}

/// Package entry files for the bare specifiers in `source`.
fn discover_packages(
    path: &Path,
    source: &SourceFile,
    host: &dyn SourceHost,
    packages: &dyn PackageResolver,
) -> Vec<(String, PathBuf)> {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    source
        .module_specifiers()
        .into_iter()
        .filter(|specifier| !is_relative_specifier(specifier))
        .filter_map(|specifier| {
            let entry = normalize_path(&packages.resolve_package(specifier, dir)?);
            if !host.file_exists(&entry) {
                return None;
            }
            trace!(from = %path.display(), specifier, entry = %entry.display(), "package import");
            Some((specifier.to_string(), entry))
        })
        .collect()
}

/// Sibling files `source` needs: reference directives first, then relative
/// module specifiers in source order.
fn discover_dependencies(path: &Path, source: &SourceFile, host: &dyn SourceHost) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for reference in source.referenced_paths() {
        let candidate = reference_candidate(path, &reference);
        if host.file_exists(&candidate) {
            found.push(candidate);
        } else {
            debug!(from = %path.display(), reference = %reference, "unresolved reference path");
        }
    }
    for specifier in source.module_specifiers() {
        if !is_relative_specifier(specifier) {
            continue;
        }
        match specifier_candidates(path, specifier)
            .into_iter()
            .find(|candidate| host.file_exists(candidate))
        {
            Some(candidate) => found.push(candidate),
            None => debug!(from = %path.display(), specifier, "unresolved relative import"),
        }
    }
    found
}
