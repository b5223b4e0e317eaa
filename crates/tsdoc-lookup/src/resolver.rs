//! Dotted path resolution.
//!
//! The first segment is searched for in the syntax trees of the loaded
//! declaration files; every further segment narrows to a property of the
//! current entity's type. A missing member anywhere in the chain fails the
//! whole resolution.

use crate::entity::ResolvedEntity;
use tracing::{debug, trace};
use tsdoc_binder::symbols::EXPORT_EQUALS;
use tsdoc_binder::{DeclRef, SymbolId};
use tsdoc_checker::Checker;
use tsdoc_common::FileId;
use tsdoc_parser::{NodeData, NodeIndex, SourceFile};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Found(ResolvedEntity),
    NotFound,
}

impl Resolution {
    pub fn found(self) -> Option<ResolvedEntity> {
        match self {
            Resolution::Found(entity) => Some(entity),
            Resolution::NotFound => None,
        }
    }
}

impl From<Option<ResolvedEntity>> for Resolution {
    fn from(entity: Option<ResolvedEntity>) -> Self {
        entity.map_or(Resolution::NotFound, Resolution::Found)
    }
}

// =============================================================================
// Root search
// =============================================================================

/// The statement shapes the root search distinguishes.
enum DeclShape<'a> {
    /// Interface, class, type alias, function or enum
    Named(&'a str),
    /// Declarators of a variable statement
    Variable(&'a [NodeIndex]),
    /// Namespace or ambient module with its body
    Module { name: &'a str, body: &'a [NodeIndex] },
    /// Specifiers of `export { ... }`
    NamedExport(&'a [NodeIndex]),
    Other,
}

fn classify(data: &NodeData) -> DeclShape<'_> {
    match data {
        NodeData::Interface(d) => DeclShape::Named(&d.name),
        NodeData::TypeAlias(d) => DeclShape::Named(&d.name),
        NodeData::Enum(d) => DeclShape::Named(&d.name),
        NodeData::Class(d) => d.name.as_deref().map_or(DeclShape::Other, DeclShape::Named),
        NodeData::Function(d) => d.name.as_deref().map_or(DeclShape::Other, DeclShape::Named),
        NodeData::VariableStatement(d) => DeclShape::Variable(&d.declarations),
        NodeData::Module(d) => DeclShape::Module {
            name: d.name.trim_matches(['"', '\'']),
            body: d.body.as_deref().unwrap_or_default(),
        },
        NodeData::ExportDeclaration(d) => d
            .specifiers
            .as_deref()
            .map_or(DeclShape::Other, DeclShape::NamedExport),
        _ => DeclShape::Other,
    }
}

/// Walks one file's statements depth-first; the first subtree that yields an
/// entity wins.
struct RootSearch<'c, 'p> {
    checker: &'c Checker<'p>,
    file: FileId,
    source: &'p SourceFile,
    root: &'c str,
}

impl RootSearch<'_, '_> {
    fn in_statements(&self, statements: &[NodeIndex]) -> Option<ResolvedEntity> {
        statements.iter().find_map(|&node| self.in_node(node))
    }

    fn in_node(&self, node: NodeIndex) -> Option<ResolvedEntity> {
        match classify(self.source.data(node)?) {
            DeclShape::Named(name) if name == self.root => self.entity_at(node),
            DeclShape::Variable(declarators) => declarators
                .iter()
                .copied()
                .find(|&d| self.source.data(d).and_then(NodeData::name) == Some(self.root))
                .and_then(|d| self.entity_at(d)),
            DeclShape::Module { name, .. } if name == self.root => self.entity_at(node),
            DeclShape::Module { body, .. } => self.in_statements(body),
            DeclShape::NamedExport(specifiers) => specifiers
                .iter()
                .copied()
                .find(|&s| self.source.data(s).and_then(NodeData::name) == Some(self.root))
                .and_then(|s| {
                    let alias = self.checker.symbol_at_declaration(DeclRef::new(self.file, s))?;
                    Some(ResolvedEntity::of_symbol(self.checker, alias))
                }),
            DeclShape::Named(_) | DeclShape::Other => None,
        }
    }

    fn entity_at(&self, node: NodeIndex) -> Option<ResolvedEntity> {
        let decl = DeclRef::new(self.file, node);
        let symbol = self.checker.symbol_at_declaration(decl)?;
        trace!(root = self.root, file = %self.source.file_name, "root declaration");
        Some(ResolvedEntity::at_declaration(self.checker, symbol, decl))
    }

    /// Exact-name match in the file's export list.
    fn in_module_exports(&self) -> Option<ResolvedEntity> {
        let module = self.checker.module_of_file(self.file)?;
        let export = self.checker.export_of_module(module, self.root)?;
        trace!(root = self.root, file = %self.source.file_name, "root export");
        Some(ResolvedEntity::of_symbol(self.checker, export))
    }
}

/// Entity named by a root segment. Declaration files are searched in
/// program order; within a file, declarations take priority over the
/// file's export list.
pub fn find_root(checker: &Checker<'_>, root: &str) -> Option<ResolvedEntity> {
    checker
        .program()
        .files()
        .filter(|(_, source)| source.is_declaration_file)
        .find_map(|(file, source)| {
            let search = RootSearch {
                checker,
                file,
                source,
                root,
            };
            search
                .in_statements(source.statements())
                .or_else(|| search.in_module_exports())
        })
}

// =============================================================================
// Member descent
// =============================================================================

/// Property `name` of a symbol: its value side first, then its declared
/// type.
fn member_of(checker: &Checker<'_>, symbol: SymbolId, name: &str) -> Option<SymbolId> {
    let value = checker.type_of_symbol(symbol);
    if let Some(member) = checker.property_of_type(value, name) {
        return Some(member);
    }
    let declared = checker.declared_type_of_symbol(symbol);
    if checker.is_error_type(declared) {
        return None;
    }
    checker.property_of_type(declared, name)
}

/// Narrow `entity` through each of `segments` in turn.
pub fn descend(checker: &Checker<'_>, entity: ResolvedEntity, segments: &[String]) -> Resolution {
    let mut current = entity;
    for segment in segments {
        match member_of(checker, current.symbol, segment) {
            Some(member) => current = ResolvedEntity::of_symbol(checker, member),
            None => {
                debug!(
                    owner = checker.symbol_name(current.symbol),
                    member = %segment,
                    "member not found"
                );
                return Resolution::NotFound;
            }
        }
    }
    Resolution::Found(current)
}

/// Resolve a full path whose root is a declared entity.
pub fn resolve(checker: &Checker<'_>, segments: &[String]) -> Resolution {
    let Some((root, rest)) = segments.split_first() else {
        return Resolution::NotFound;
    };
    match find_root(checker, root) {
        Some(entity) => {
            debug!(root = %root, kind = %entity.kind, "root found");
            descend(checker, entity, rest)
        }
        None => {
            debug!(root = %root, "root not found in any declaration file");
            Resolution::NotFound
        }
    }
}

/// Resolve member `segments` against a module. An `export =` assignment
/// makes the assigned entity the starting point.
pub fn resolve_from_module(checker: &Checker<'_>, module: SymbolId, segments: &[String]) -> Resolution {
    let start = checker
        .symbol(module)
        .and_then(|s| s.exports.get(EXPORT_EQUALS))
        .map_or(module, |&assigned| checker.resolve_alias(assigned));
    descend(checker, ResolvedEntity::of_symbol(checker, start), segments)
}
