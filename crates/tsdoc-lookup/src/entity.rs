//! Resolved entities and their kinds.

use serde::Serialize;
use std::fmt;
use tsdoc_binder::{DeclRef, SymbolId};
use tsdoc_checker::Checker;
use tsdoc_parser::NodeData;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Interface,
    Class,
    TypeAlias,
    Function,
    Method,
    Property,
    Variable,
    Enum,
    Module,
    /// A declaration shape with no more specific kind
    Symbol,
    /// A member whose declaration could not be found
    UnresolvedMember,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Interface => "interface",
            EntityKind::Class => "class",
            EntityKind::TypeAlias => "type-alias",
            EntityKind::Function => "function",
            EntityKind::Method => "method",
            EntityKind::Property => "property",
            EntityKind::Variable => "variable",
            EntityKind::Enum => "enum",
            EntityKind::Module => "module",
            EntityKind::Symbol => "symbol",
            EntityKind::UnresolvedMember => "unresolved-member",
        }
    }

    /// Kind of the entity declared by a node.
    ///
    /// Method signatures (interface and type-literal members, such as
    /// `ArrayConstructor.isArray`) read as functions; methods with a class
    /// body read as methods.
    pub fn of_declaration(data: &NodeData) -> EntityKind {
        match data {
            NodeData::Interface(_) => EntityKind::Interface,
            NodeData::Class(_) | NodeData::ClassExpression(_) => EntityKind::Class,
            NodeData::TypeAlias(_) => EntityKind::TypeAlias,
            NodeData::Function(_) | NodeData::MethodSignature(_) => EntityKind::Function,
            NodeData::MethodDeclaration(_) => EntityKind::Method,
            NodeData::PropertySignature(_)
            | NodeData::PropertyDeclaration(_)
            | NodeData::GetAccessor(_)
            | NodeData::SetAccessor(_)
            | NodeData::Parameter(_) => EntityKind::Property,
            NodeData::VariableDeclaration(_) => EntityKind::Variable,
            NodeData::Enum(_) => EntityKind::Enum,
            NodeData::Module(_) | NodeData::SourceFile(_) => EntityKind::Module,
            _ => EntityKind::Symbol,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity found by the path resolver: the symbol, the declaration it was
/// reached through, and that declaration's kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedEntity {
    pub symbol: SymbolId,
    /// `None` when the symbol has no declaration to point at
    pub decl: Option<DeclRef>,
    pub kind: EntityKind,
}

impl ResolvedEntity {
    /// Entity for `decl` itself.
    pub fn at_declaration(checker: &Checker<'_>, symbol: SymbolId, decl: DeclRef) -> ResolvedEntity {
        let kind = checker
            .decl_data(decl)
            .map_or(EntityKind::Symbol, EntityKind::of_declaration);
        ResolvedEntity {
            symbol,
            decl: Some(decl),
            kind,
        }
    }

    /// Entity for a symbol reached by name (an export or a member): aliases
    /// are followed and the value declaration is preferred.
    pub fn of_symbol(checker: &Checker<'_>, symbol: SymbolId) -> ResolvedEntity {
        let symbol = checker.resolve_alias(symbol);
        let decl = checker
            .symbol(symbol)
            .and_then(|s| s.value_declaration.or_else(|| s.first_declaration()));
        match decl {
            Some(decl) => ResolvedEntity::at_declaration(checker, symbol, decl),
            None => ResolvedEntity {
                symbol,
                decl: None,
                kind: EntityKind::UnresolvedMember,
            },
        }
    }
}
