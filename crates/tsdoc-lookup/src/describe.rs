//! Description extraction.
//!
//! Turns a [`ResolvedEntity`] into a [`SymbolDescription`]: plain data with
//! every type already rendered to text, so callers never need the checker
//! to print it.

use crate::config::LookupConfig;
use crate::entity::{EntityKind, ResolvedEntity};
use serde::Serialize;
use tracing::debug;
use tsdoc_binder::{DeclRef, SymbolFlags, SymbolId};
use tsdoc_checker::{Checker, ParsedJsdoc, Signature, SignatureKind, TypeId};
use tsdoc_parser::{ModifierFlags, NodeData};

/// Tags rendered as part of signatures rather than listed on their own.
const SIGNATURE_TAGS: &[&str] = &[
    "param",
    "arg",
    "argument",
    "returns",
    "return",
    "template",
    "typeParam",
    "typeparam",
];

/// Tags with a dedicated field.
const PARTITIONED_TAGS: &[&str] = &["deprecated", "since", "throws", "exception", "example", "see"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: String,
    /// 1-based
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TypeParameterDescription {
    pub name: String,
    pub constraint: Option<String>,
    pub default: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParameterDescription {
    pub name: String,
    pub type_text: String,
    pub optional: bool,
    pub rest: bool,
    /// Default value as written
    pub default_value: Option<String>,
    pub doc: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignatureDescription {
    /// The whole signature, `new ` prefixed for construct signatures
    pub text: String,
    pub type_parameters: Vec<TypeParameterDescription>,
    pub parameters: Vec<ParameterDescription>,
    /// Only set for call signatures
    pub return_type: Option<String>,
    pub returns_doc: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemberDescription {
    pub name: String,
    pub type_text: String,
    pub optional: bool,
    pub readonly: bool,
    #[serde(rename = "static")]
    pub static_: bool,
    pub summary: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SymbolDescription {
    pub name: String,
    /// The path as queried
    pub path: String,
    pub kind: EntityKind,
    pub location: Option<Location>,
    pub construct_signatures: Vec<SignatureDescription>,
    pub call_signatures: Vec<SignatureDescription>,
    /// Set only when there are no signatures to show
    pub type_text: Option<String>,
    pub documentation: String,
    pub deprecated: bool,
    pub deprecation_note: Option<String>,
    pub since: Option<String>,
    pub throws: Vec<String>,
    pub examples: Vec<String>,
    pub see: Vec<String>,
    /// Remaining tags, each as `@name text`
    pub other_tags: Vec<String>,
    pub members: Vec<MemberDescription>,
    /// Members left out past the cap
    pub more_members: usize,
}

/// First line of `text`, cut to `width` characters with `...` appended
/// when anything was cut.
pub(crate) fn excerpt(text: &str, width: usize) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.chars().count() <= width {
        return line.to_string();
    }
    let mut out: String = line.chars().take(width).collect();
    out.push_str("...");
    out
}

fn summary_of(doc: &ParsedJsdoc, width: usize) -> Option<String> {
    let line = excerpt(doc.first_line(), width);
    (!line.is_empty()).then_some(line)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn location_of(checker: &Checker<'_>, decl: DeclRef) -> Option<Location> {
    let path = checker.program().path(decl.file)?;
    let source = checker.file(decl.file)?;
    Some(Location {
        file: path.display().to_string(),
        line: source.line_of(decl.node),
    })
}

/// Display name of a symbol; ambient module names lose their quotes.
pub(crate) fn display_name(checker: &Checker<'_>, symbol: SymbolId) -> String {
    checker.symbol_name(symbol).trim_matches(['"', '\'']).to_string()
}

/// Value-side type of a symbol, or its declared type when it has no value
/// side.
fn type_of_entity(checker: &Checker<'_>, symbol: SymbolId) -> TypeId {
    let value = checker.type_of_symbol(symbol);
    if checker.is_error_type(value) {
        checker.declared_type_of_symbol(symbol)
    } else {
        value
    }
}

// =============================================================================
// Signatures
// =============================================================================

struct SignatureDescriber<'c, 'p> {
    checker: &'c Checker<'p>,
    /// Documentation of the entity, used when a signature has none of its own
    entity_doc: &'c ParsedJsdoc,
}

impl SignatureDescriber<'_, '_> {
    fn describe(&self, signature: &Signature) -> SignatureDescription {
        let checker = self.checker;
        let own_doc = signature.decl.and_then(|decl| checker.documentation(decl));
        let param_doc = |name: &str| {
            own_doc
                .as_ref()
                .and_then(|doc| doc.param_doc(name))
                .or_else(|| self.entity_doc.param_doc(name))
                .filter(|text| !text.is_empty())
                .map(str::to_string)
        };

        let type_parameters = signature
            .type_parameters
            .iter()
            .map(|tp| TypeParameterDescription {
                name: tp.name.clone(),
                constraint: tp.constraint.map(|c| checker.type_to_string(c)),
                default: tp.default.map(|d| checker.type_to_string(d)),
            })
            .collect();
        let parameters = signature
            .parameters
            .iter()
            .map(|p| ParameterDescription {
                name: p.name.clone(),
                type_text: checker.type_to_string(p.ty),
                optional: p.optional,
                rest: p.rest,
                default_value: p.default_text.clone(),
                doc: param_doc(&p.name),
            })
            .collect();

        let (return_type, returns_doc) = match signature.kind {
            SignatureKind::Call => {
                let returns_doc = own_doc.as_ref().and_then(|doc| {
                    doc.tags
                        .iter()
                        .find(|tag| tag.name == "returns" || tag.name == "return")
                        .map(|tag| tag.text.clone())
                        .filter(|text| !text.is_empty())
                });
                (Some(checker.type_to_string(signature.return_type)), returns_doc)
            }
            SignatureKind::Construct => (None, None),
        };

        SignatureDescription {
            text: checker.signature_to_string(signature),
            type_parameters,
            parameters,
            return_type,
            returns_doc,
        }
    }
}

// =============================================================================
// Members
// =============================================================================

fn declares_optional(data: &NodeData) -> bool {
    match data {
        NodeData::PropertySignature(p) | NodeData::PropertyDeclaration(p) => p.optional,
        NodeData::MethodSignature(m) | NodeData::MethodDeclaration(m) => m.optional,
        NodeData::Parameter(p) => p.optional,
        _ => false,
    }
}

/// A member as declared on an interface, with its own doc comment.
fn member_from_declaration(checker: &Checker<'_>, decl: DeclRef, width: usize) -> Option<MemberDescription> {
    let source = checker.file(decl.file)?;
    let node = source.node(decl.node)?;
    let type_of_member = || {
        checker
            .symbol_at_declaration(decl)
            .map(|id| checker.type_to_string(checker.type_of_symbol(id)))
            .unwrap_or_else(|| "any".to_string())
    };
    let (name, type_text, optional) = match &node.data {
        NodeData::PropertySignature(p) => {
            let type_text = if p.type_node.is_some() {
                checker.type_to_string(checker.type_of_type_node(decl.file, p.type_node))
            } else {
                "any".to_string()
            };
            (p.name.clone(), type_text, p.optional)
        }
        NodeData::MethodSignature(m) => {
            let signature = checker.signature_from_node(decl, SignatureKind::Call)?;
            (m.name.clone(), checker.signature_to_string(&signature), m.optional)
        }
        NodeData::GetAccessor(m) | NodeData::SetAccessor(m) => (m.name.clone(), type_of_member(), false),
        NodeData::IndexSignature(index) => {
            let key = checker.index_key_to_string(decl, index.parameter)?;
            let value = checker.type_of_type_node(decl.file, index.type_node);
            (key, checker.type_to_string(value), false)
        }
        // Call and construct signatures are not named members
        _ => return None,
    };
    Some(MemberDescription {
        name,
        type_text,
        optional,
        readonly: node.modifiers.contains(ModifierFlags::READONLY),
        static_: false,
        summary: checker
            .documentation(decl)
            .and_then(|doc| summary_of(&doc, width)),
    })
}

/// A member reached as a property of a type.
fn member_from_symbol(checker: &Checker<'_>, name: &str, id: SymbolId, width: usize) -> MemberDescription {
    let id = checker.resolve_alias(id);
    let flags = checker.symbol_flags(id);
    let decl = checker
        .symbol(id)
        .and_then(|s| s.value_declaration.or_else(|| s.first_declaration()));
    let node = decl.and_then(|decl| checker.file(decl.file)?.node(decl.node));

    let signature = decl
        .filter(|&decl| {
            matches!(
                checker.decl_data(decl),
                Some(NodeData::MethodSignature(_) | NodeData::MethodDeclaration(_) | NodeData::Function(_))
            )
        })
        .and_then(|decl| checker.signature_from_node(decl, SignatureKind::Call));
    let type_text = match signature {
        Some(signature) => checker.signature_to_string(&signature),
        None => checker.type_to_string(type_of_entity(checker, id)),
    };

    let optional = flags.contains(SymbolFlags::OPTIONAL) || node.is_some_and(|n| declares_optional(&n.data));
    let readonly = flags.contains(SymbolFlags::READONLY)
        || node.is_some_and(|n| {
            n.modifiers.contains(ModifierFlags::READONLY)
                || (matches!(n.data, NodeData::VariableDeclaration(_)) && n.modifiers.contains(ModifierFlags::CONST))
        });
    let summary = summary_of(&checker.symbol_documentation(id), width);

    MemberDescription {
        name: name.to_string(),
        type_text,
        optional,
        readonly,
        static_: flags.contains(SymbolFlags::STATIC),
        summary,
    }
}

/// Every member of an entity, uncapped.
fn collect_members(checker: &Checker<'_>, entity: &ResolvedEntity, width: usize) -> Vec<MemberDescription> {
    let symbol = entity.symbol;
    match entity.kind {
        EntityKind::Interface => checker
            .symbol(symbol)
            .map(|s| s.declarations.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&decl| match checker.decl_data(decl)? {
                NodeData::Interface(interface) => Some(
                    interface
                        .members
                        .iter()
                        .filter_map(|&member| {
                            member_from_declaration(checker, DeclRef::new(decl.file, member), width)
                        })
                        .collect::<Vec<_>>(),
                ),
                _ => None,
            })
            .flatten()
            .collect(),
        EntityKind::Class => {
            let instance = checker.properties_of_type(checker.declared_type_of_symbol(symbol));
            let statics = checker.properties_of_type(checker.type_of_symbol(symbol));
            instance
                .iter()
                .chain(statics.iter())
                .map(|(name, id)| member_from_symbol(checker, name, *id, width))
                .collect()
        }
        _ => checker
            .properties_of_type(type_of_entity(checker, symbol))
            .iter()
            .map(|(name, id)| member_from_symbol(checker, name, *id, width))
            .collect(),
    }
}

// =============================================================================
// Entry point
// =============================================================================

/// Describe a resolved entity. `path` is the query it was resolved from.
pub fn describe(
    checker: &Checker<'_>,
    entity: &ResolvedEntity,
    path: &str,
    config: &LookupConfig,
) -> SymbolDescription {
    let symbol = entity.symbol;
    let doc = checker.symbol_documentation(symbol);
    let value_type = checker.type_of_symbol(symbol);

    let describer = SignatureDescriber {
        checker,
        entity_doc: &doc,
    };
    let construct_signatures: Vec<SignatureDescription> = checker
        .signatures_of_type(value_type, SignatureKind::Construct)
        .iter()
        .map(|s| describer.describe(s))
        .collect();
    let call_signatures: Vec<SignatureDescription> = checker
        .signatures_of_type(value_type, SignatureKind::Call)
        .iter()
        .map(|s| describer.describe(s))
        .collect();

    let type_text = if !construct_signatures.is_empty() || !call_signatures.is_empty() {
        None
    } else {
        match entity.kind {
            EntityKind::Interface => None,
            EntityKind::TypeAlias => entity.decl.and_then(|decl| match checker.decl_data(decl)? {
                NodeData::TypeAlias(alias) => {
                    let source = checker.file(decl.file)?;
                    Some(collapse_whitespace(source.node_text(alias.type_node)))
                }
                _ => None,
            }),
            _ => Some(checker.type_to_string(type_of_entity(checker, symbol))),
        }
    };

    let deprecated_tag = doc.tags_named("deprecated").next();
    let tag_texts = |names: &[&str]| -> Vec<String> {
        doc.tags
            .iter()
            .filter(|tag| names.contains(&tag.name.as_str()))
            .map(|tag| tag.text.clone())
            .collect()
    };
    let other_tags = doc
        .tags
        .iter()
        .filter(|tag| {
            let name = tag.name.as_str();
            !SIGNATURE_TAGS.contains(&name) && !PARTITIONED_TAGS.contains(&name)
        })
        .map(|tag| {
            if tag.text.is_empty() {
                format!("@{}", tag.name)
            } else {
                format!("@{} {}", tag.name, tag.text)
            }
        })
        .collect();

    let mut members = collect_members(checker, entity, config.summary_width);
    let more_members = members.len().saturating_sub(config.max_members);
    members.truncate(config.max_members);

    let description = SymbolDescription {
        name: display_name(checker, symbol),
        path: path.to_string(),
        kind: entity.kind,
        location: entity.decl.and_then(|decl| location_of(checker, decl)),
        construct_signatures,
        call_signatures,
        type_text,
        documentation: doc.summary.clone(),
        deprecated: deprecated_tag.is_some(),
        deprecation_note: deprecated_tag
            .map(|tag| tag.text.clone())
            .filter(|text| !text.is_empty()),
        since: doc.tags_named("since").next().map(|tag| tag.text.clone()),
        throws: tag_texts(&["throws", "exception"]),
        examples: tag_texts(&["example"]),
        see: tag_texts(&["see"]),
        other_tags,
        members,
        more_members,
    };
    debug!(
        path,
        kind = %description.kind,
        signatures = description.call_signatures.len() + description.construct_signatures.len(),
        members = description.members.len(),
        "described"
    );
    description
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_truncates_with_marker() {
        assert_eq!(excerpt("Short summary.", 80), "Short summary.");
        assert_eq!(excerpt("first line\nsecond line", 80), "first line");
        let long = "x".repeat(100);
        let cut = excerpt(&long, 80);
        assert_eq!(cut.len(), 83);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("{\n    a: string;\n    b: number;\n}"), "{ a: string; b: number; }");
    }
}
