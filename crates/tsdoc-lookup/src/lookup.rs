//! One lookup, end to end: load, build, resolve, extract.

use crate::config::LookupConfig;
use crate::describe::{SymbolDescription, describe};
use crate::error::LookupError;
use crate::exports::{ExportListing, list_exports};
use crate::loader::{DeclarationUniverse, NodeModulesResolver, UniverseRoot, load_universe};
use crate::resolver::{Resolution, resolve, resolve_from_module};
use anyhow::anyhow;
use serde::Serialize;
use tracing::{debug, debug_span};
use tsdoc_binder::SymbolId;
use tsdoc_checker::{Checker, DiskHost, Program};

/// What a lookup produced: a description of one entity, or the export list
/// of a package or module named on its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LookupOutput {
    Symbol(Box<SymbolDescription>),
    Exports(ExportListing),
}

/// Split a dotted path into segments. Rejects empty paths and empty
/// segments.
pub fn parse_symbol_path(query: &str) -> Result<Vec<String>, LookupError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(LookupError::InvalidPath(query.to_string()));
    }
    let segments: Vec<String> = query.split('.').map(str::to_string).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(LookupError::InvalidPath(query.to_string()));
    }
    Ok(segments)
}

/// Resolve `query` and describe what it names.
pub fn lookup(query: &str, config: &LookupConfig) -> Result<LookupOutput, LookupError> {
    let _span = debug_span!("lookup", query).entered();
    let segments = parse_symbol_path(query)?;
    if !config.cwd.is_dir() {
        return Err(anyhow!("working directory {} does not exist", config.cwd.display()).into());
    }

    let universe = load_universe(config, Some(&segments[0]));
    let program = Program::build_with(&universe.files, &DiskHost, &NodeModulesResolver);
    let checker = Checker::new(&program);
    lookup_in(&checker, &universe, &segments, query.trim(), config)
}

/// The module symbol of a universe's package or local entry file. Files
/// that only declare an ambient module of the root's name count too.
fn entry_module(checker: &Checker<'_>, universe: &DeclarationUniverse, name: &str) -> Option<SymbolId> {
    let file = checker.program().file_id(universe.entry()?)?;
    checker
        .module_of_file(file)
        .or_else(|| checker.binder().ambient_module(name))
}

/// A package or local module root: its export list when named alone,
/// otherwise the member chain below it.
fn lookup_in_module(
    checker: &Checker<'_>,
    module: SymbolId,
    segments: &[String],
    query: &str,
    config: &LookupConfig,
) -> Result<LookupOutput, LookupError> {
    let (root, rest) = segments
        .split_first()
        .ok_or_else(|| LookupError::InvalidPath(query.to_string()))?;
    if rest.is_empty() {
        return Ok(LookupOutput::Exports(list_exports(checker, module, root, config)));
    }
    match resolve_from_module(checker, module, rest) {
        Resolution::Found(entity) => Ok(LookupOutput::Symbol(Box::new(describe(checker, &entity, query, config)))),
        Resolution::NotFound => Err(LookupError::not_found(query)),
    }
}

/// Resolve against an already-built program. Package roots come first,
/// then declared entities, then a local module of the root's name.
pub fn lookup_in(
    checker: &Checker<'_>,
    universe: &DeclarationUniverse,
    segments: &[String],
    query: &str,
    config: &LookupConfig,
) -> Result<LookupOutput, LookupError> {
    if let UniverseRoot::Package { name, .. } = &universe.root {
        if let Some(module) = entry_module(checker, universe, name) {
            debug!(package = %name, "resolving against package");
            return lookup_in_module(checker, module, segments, query, config);
        }
        debug!(package = %name, "package entry declares no module");
    }

    if let Resolution::Found(entity) = resolve(checker, segments) {
        return Ok(LookupOutput::Symbol(Box::new(describe(checker, &entity, query, config))));
    }

    if let UniverseRoot::Local { name, .. } = &universe.root {
        if let Some(module) = entry_module(checker, universe, name) {
            debug!(module = %name, "resolving against local module");
            return lookup_in_module(checker, module, segments, query, config);
        }
    }
    Err(LookupError::not_found(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbol_path() {
        assert_eq!(
            parse_symbol_path("Array.isArray").expect("valid path"),
            vec!["Array".to_string(), "isArray".to_string()]
        );
        assert_eq!(parse_symbol_path(" lodash ").expect("valid path"), vec!["lodash".to_string()]);
        assert!(matches!(parse_symbol_path(""), Err(LookupError::InvalidPath(_))));
        assert!(matches!(parse_symbol_path("Array..map"), Err(LookupError::InvalidPath(_))));
        assert!(matches!(parse_symbol_path("Array."), Err(LookupError::InvalidPath(_))));
    }
}
