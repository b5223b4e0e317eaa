//! Properties and signatures of types.
//!
//! Member lists are built from declarations: own members first, then
//! inherited ones not already overridden. Inheritance walks are bounded by
//! [`MAX_HERITAGE_DEPTH`] and never visit the same declaration twice.

use crate::checker::Checker;
use crate::signatures::{ParameterList, Signature, SignatureKind, TypeParameterList};
use crate::types::{IntrinsicKind, TypeData, TypeId};
use rustc_hash::FxHashSet;
use tsdoc_binder::symbols::{CALL_MEMBER, CONSTRUCTOR_MEMBER, NEW_MEMBER};
use tsdoc_binder::{SymbolFlags, SymbolId, is_reserved_member_name};
use tsdoc_common::limits::MAX_HERITAGE_DEPTH;
use tsdoc_parser::NodeData;

/// Collected properties, deduplicated by name; the first one seen wins.
#[derive(Default)]
struct PropertyList {
    items: Vec<(String, SymbolId)>,
    names: FxHashSet<String>,
}

impl PropertyList {
    fn push(&mut self, name: &str, id: SymbolId) {
        if self.names.insert(name.to_string()) {
            self.items.push((name.to_string(), id));
        }
    }
}

impl Checker<'_> {
    // =========================================================================
    // Properties
    // =========================================================================

    /// Named properties of a type, own members before inherited ones.
    pub fn properties_of_type(&self, ty: TypeId) -> Vec<(String, SymbolId)> {
        let mut list = PropertyList::default();
        let mut visited = FxHashSet::default();
        self.collect_properties(ty, 0, &mut list, &mut visited);
        list.items
    }

    pub fn property_of_type(&self, ty: TypeId, name: &str) -> Option<SymbolId> {
        self.properties_of_type(ty)
            .into_iter()
            .find_map(|(property, id)| (property == name).then_some(id))
    }

    fn collect_properties(
        &self,
        ty: TypeId,
        depth: usize,
        list: &mut PropertyList,
        visited: &mut FxHashSet<(SymbolId, bool)>,
    ) {
        if depth > MAX_HERITAGE_DEPTH {
            return;
        }
        match self.type_data(ty) {
            TypeData::Reference { target, .. } => {
                if !visited.insert((target, false)) {
                    return;
                }
                let flags = self.symbol_flags(target);
                if flags.intersects(SymbolFlags::CLASS | SymbolFlags::INTERFACE) {
                    self.push_members(target, list);
                    for base in self.instance_heritage(target) {
                        self.collect_properties(base, depth + 1, list, visited);
                    }
                } else if flags.intersects(SymbolFlags::TYPE_ALIAS) {
                    let aliased = self.declared_type_of_symbol(target);
                    self.collect_properties(aliased, depth + 1, list, visited);
                } else if flags.contains(SymbolFlags::TYPE_LITERAL) {
                    self.push_members(target, list);
                }
            }
            TypeData::Anonymous { symbol } => {
                if !visited.insert((symbol, true)) {
                    return;
                }
                let flags = self.symbol_flags(symbol);
                if flags.contains(SymbolFlags::TYPE_LITERAL) {
                    self.push_members(symbol, list);
                } else if flags.contains(SymbolFlags::CLASS) {
                    for (name, id) in self.exports_of_module(symbol) {
                        if name != "prototype" && !is_reserved_member_name(&name) {
                            list.push(&name, id);
                        }
                    }
                    if let Some(base) = self.base_class_type(symbol) {
                        if let TypeData::Reference { target, .. } = self.type_data(base) {
                            let base_static = self.type_of_symbol(target);
                            self.collect_properties(base_static, depth + 1, list, visited);
                        }
                    }
                } else {
                    for (name, id) in self.exports_of_module(symbol) {
                        if !is_reserved_member_name(&name) {
                            list.push(&name, id);
                        }
                    }
                }
            }
            TypeData::Array(_) | TypeData::Tuple(_) => {
                if let Some(array) = self.global_interface_type("Array") {
                    self.collect_properties(array, depth + 1, list, visited);
                }
            }
            TypeData::Intrinsic(kind) => {
                if let Some(apparent) = kind
                    .apparent_interface()
                    .and_then(|name| self.global_interface_type(name))
                {
                    self.collect_properties(apparent, depth + 1, list, visited);
                }
            }
            TypeData::Literal(text) => {
                let apparent = literal_apparent_kind(&text)
                    .apparent_interface()
                    .and_then(|name| self.global_interface_type(name));
                if let Some(apparent) = apparent {
                    self.collect_properties(apparent, depth + 1, list, visited);
                }
            }
            TypeData::Union(members) => {
                // Only properties every member has
                let mut common: Option<Vec<(String, SymbolId)>> = None;
                for member in members {
                    let props = self.properties_of_type(member);
                    common = Some(match common {
                        None => props,
                        Some(prev) => prev
                            .into_iter()
                            .filter(|(name, _)| props.iter().any(|(other, _)| other == name))
                            .collect(),
                    });
                }
                for (name, id) in common.unwrap_or_default() {
                    list.push(&name, id);
                }
            }
            TypeData::Intersection(members) => {
                for member in members {
                    self.collect_properties(member, depth + 1, list, visited);
                }
            }
            TypeData::TypeParameter { decl, .. } => {
                if let Some(constraint) = self.constraint_of_type_parameter(decl) {
                    self.collect_properties(constraint, depth + 1, list, visited);
                }
            }
            TypeData::Error | TypeData::Function { .. } | TypeData::Opaque(_) => {}
        }
    }

    fn push_members(&self, id: SymbolId, list: &mut PropertyList) {
        let Some(symbol) = self.symbol(id) else {
            return;
        };
        for (name, &member) in &symbol.members {
            if !is_reserved_member_name(name) {
                list.push(name, member);
            }
        }
    }

    /// Declared type of a global interface or class such as `Array`.
    fn global_interface_type(&self, name: &str) -> Option<TypeId> {
        let &id = self.binder().globals().get(name)?;
        self.symbol_flags(id)
            .intersects(SymbolFlags::INTERFACE | SymbolFlags::CLASS)
            .then(|| self.declared_type_of_symbol(id))
    }

    /// Types an interface extends, or the base class of a class.
    pub fn instance_heritage(&self, id: SymbolId) -> Vec<TypeId> {
        let Some(symbol) = self.symbol(id) else {
            return Vec::new();
        };
        let mut bases = Vec::new();
        for &decl in &symbol.declarations {
            match self.decl_data(decl) {
                Some(NodeData::Interface(interface)) => {
                    bases.extend(
                        interface
                            .heritage
                            .iter()
                            .map(|&node| self.type_of_type_node(decl.file, node)),
                    );
                }
                Some(NodeData::Class(class)) | Some(NodeData::ClassExpression(class))
                    if class.extends.is_some() =>
                {
                    bases.push(self.type_of_type_node(decl.file, class.extends));
                }
                _ => {}
            }
        }
        bases
    }

    /// Type written in a class's `extends` clause.
    pub fn base_class_type(&self, class: SymbolId) -> Option<TypeId> {
        let symbol = self.symbol(class)?;
        symbol.declarations.iter().find_map(|&decl| match self.decl_data(decl)? {
            NodeData::Class(data) | NodeData::ClassExpression(data) if data.extends.is_some() => {
                Some(self.type_of_type_node(decl.file, data.extends))
            }
            _ => None,
        })
    }

    // =========================================================================
    // Signatures
    // =========================================================================

    /// Call or construct signatures of a type.
    pub fn signatures_of_type(&self, ty: TypeId, kind: SignatureKind) -> Vec<Signature> {
        self.collect_signatures(ty, kind, 0)
    }

    fn collect_signatures(&self, ty: TypeId, kind: SignatureKind, depth: usize) -> Vec<Signature> {
        if depth > MAX_HERITAGE_DEPTH {
            return Vec::new();
        }
        match self.type_data(ty) {
            TypeData::Anonymous { symbol } => {
                let flags = self.symbol_flags(symbol);
                match kind {
                    SignatureKind::Call if flags.intersects(SymbolFlags::FUNCTION | SymbolFlags::METHOD) => {
                        self.function_signatures(symbol)
                    }
                    SignatureKind::Construct if flags.contains(SymbolFlags::CLASS) => {
                        self.class_construct_signatures(symbol, depth)
                    }
                    _ if flags.contains(SymbolFlags::TYPE_LITERAL) => self.member_signatures(symbol, kind),
                    _ => Vec::new(),
                }
            }
            TypeData::Reference { target, .. } => {
                let flags = self.symbol_flags(target);
                if flags.intersects(SymbolFlags::INTERFACE | SymbolFlags::TYPE_LITERAL) {
                    let mut signatures = self.member_signatures(target, kind);
                    if flags.contains(SymbolFlags::INTERFACE) {
                        for base in self.instance_heritage(target) {
                            signatures.extend(self.collect_signatures(base, kind, depth + 1));
                        }
                    }
                    signatures
                } else if flags.contains(SymbolFlags::TYPE_ALIAS) {
                    let aliased = self.declared_type_of_symbol(target);
                    if aliased == ty {
                        return Vec::new();
                    }
                    self.collect_signatures(aliased, kind, depth + 1)
                } else {
                    Vec::new()
                }
            }
            TypeData::Function { decl, construct } => {
                let wanted = kind == SignatureKind::Construct;
                if construct != wanted {
                    return Vec::new();
                }
                self.signature_from_node(decl, kind).into_iter().collect()
            }
            TypeData::Intersection(members) => members
                .into_iter()
                .flat_map(|member| self.collect_signatures(member, kind, depth + 1))
                .collect(),
            TypeData::Union(members) if members.len() == 1 => {
                self.collect_signatures(members[0], kind, depth + 1)
            }
            TypeData::TypeParameter { decl, .. } => match self.constraint_of_type_parameter(decl) {
                Some(constraint) => self.collect_signatures(constraint, kind, depth + 1),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// Signatures of a function or method. When overloads exist the
    /// implementation signature is hidden.
    fn function_signatures(&self, id: SymbolId) -> Vec<Signature> {
        let Some(symbol) = self.symbol(id) else {
            return Vec::new();
        };
        let callable: Vec<_> = symbol
            .declarations
            .iter()
            .copied()
            .filter(|&decl| {
                matches!(
                    self.decl_data(decl),
                    Some(
                        NodeData::Function(_)
                            | NodeData::MethodSignature(_)
                            | NodeData::MethodDeclaration(_)
                    )
                )
            })
            .collect();
        let has_overloads = callable
            .iter()
            .any(|&decl| matches!(self.decl_data(decl), Some(NodeData::Function(f)) if !f.has_body));
        callable
            .into_iter()
            .filter(|&decl| {
                !has_overloads
                    || !matches!(self.decl_data(decl), Some(NodeData::Function(f)) if f.has_body)
            })
            .filter_map(|decl| self.signature_from_node(decl, SignatureKind::Call))
            .collect()
    }

    /// `__call` or `__new` member signatures declared on an interface or
    /// type literal.
    fn member_signatures(&self, id: SymbolId, kind: SignatureKind) -> Vec<Signature> {
        let member_name = match kind {
            SignatureKind::Call => CALL_MEMBER,
            SignatureKind::Construct => NEW_MEMBER,
        };
        let Some(member) = self.symbol(id).and_then(|s| s.members.get(member_name)) else {
            return Vec::new();
        };
        let Some(member) = self.symbol(*member) else {
            return Vec::new();
        };
        member
            .declarations
            .iter()
            .filter_map(|&decl| self.signature_from_node(decl, kind))
            .collect()
    }

    /// Construct signatures of a class: its declared constructors, the base
    /// class's when it declares none, or an implicit parameterless one.
    fn class_construct_signatures(&self, class: SymbolId, depth: usize) -> Vec<Signature> {
        let instance = self.declared_type_of_symbol(class);
        let class_type_parameters = self
            .symbol(class)
            .and_then(|s| {
                s.declarations.iter().find_map(|&decl| match self.decl_data(decl)? {
                    NodeData::Class(data) | NodeData::ClassExpression(data) => {
                        Some(self.type_parameter_infos(decl.file, &data.type_parameters))
                    }
                    _ => None,
                })
            })
            .unwrap_or_default();

        let declared: Vec<Signature> = self
            .symbol(class)
            .and_then(|s| s.members.get(CONSTRUCTOR_MEMBER))
            .and_then(|&ctor| self.symbol(ctor))
            .map(|ctor| {
                ctor.declarations
                    .iter()
                    .filter_map(|&decl| self.signature_from_node(decl, SignatureKind::Construct))
                    .collect()
            })
            .unwrap_or_default();

        let mut signatures = if !declared.is_empty() {
            declared
        } else {
            let inherited = self
                .base_class_type(class)
                .and_then(|base| match self.type_data(base) {
                    TypeData::Reference { target, .. } => Some(target),
                    _ => None,
                })
                .map(|base| {
                    let base_static = self.type_of_symbol(base);
                    self.collect_signatures(base_static, SignatureKind::Construct, depth + 1)
                })
                .unwrap_or_default();
            if inherited.is_empty() {
                vec![Signature {
                    kind: SignatureKind::Construct,
                    decl: None,
                    type_parameters: TypeParameterList::new(),
                    parameters: ParameterList::new(),
                    return_type: instance,
                }]
            } else {
                inherited
            }
        };
        for signature in &mut signatures {
            signature.return_type = instance;
            if signature.type_parameters.is_empty() {
                signature.type_parameters = class_type_parameters.clone();
            }
        }
        signatures
    }
}

/// Primitive a literal type widens to.
fn literal_apparent_kind(text: &str) -> IntrinsicKind {
    if text.starts_with(['"', '\'', '`']) {
        IntrinsicKind::String
    } else if text == "true" || text == "false" {
        IntrinsicKind::Boolean
    } else if text.ends_with('n') {
        IntrinsicKind::BigInt
    } else {
        IntrinsicKind::Number
    }
}
