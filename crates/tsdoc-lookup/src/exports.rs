//! Export listings for package and module roots.

use crate::config::LookupConfig;
use crate::describe::{Location, display_name, excerpt, location_of};
use crate::entity::{EntityKind, ResolvedEntity};
use serde::Serialize;
use tracing::debug;
use tsdoc_binder::SymbolId;
use tsdoc_checker::Checker;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportEntry {
    pub name: String,
    pub kind: EntityKind,
    pub summary: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportListing {
    pub name: String,
    pub location: Option<Location>,
    pub exports: Vec<ExportEntry>,
    /// Exports left out past the cap
    pub more_exports: usize,
}

/// List a module's exports in declaration order, capped at
/// `config.max_exports`.
pub fn list_exports(checker: &Checker<'_>, module: SymbolId, name: &str, config: &LookupConfig) -> ExportListing {
    let all = checker.exports_of_module(module);
    let total = all.len();
    let exports = all
        .into_iter()
        .take(config.max_exports)
        .map(|(export, id)| {
            let entity = ResolvedEntity::of_symbol(checker, id);
            let summary = excerpt(checker.symbol_documentation(entity.symbol).first_line(), config.summary_width);
            ExportEntry {
                name: export,
                kind: entity.kind,
                summary: (!summary.is_empty()).then_some(summary),
            }
        })
        .collect::<Vec<_>>();

    let location = checker
        .symbol(module)
        .and_then(|s| s.first_declaration())
        .and_then(|decl| location_of(checker, decl));
    let listing_name = if name.is_empty() {
        display_name(checker, module)
    } else {
        name.to_string()
    };
    debug!(module = %listing_name, total, listed = exports.len(), "export listing");

    ExportListing {
        name: listing_name,
        location,
        more_exports: total - exports.len(),
        exports,
    }
}
