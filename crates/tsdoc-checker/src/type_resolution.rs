//! Types of symbols, type nodes and initializer expressions.

use crate::checker::Checker;
use crate::signatures::{
    ParameterInfo, ParameterList, Signature, SignatureKind, TypeParameterInfo, TypeParameterList,
};
use crate::types::{IntrinsicKind, TupleElement, TypeData, TypeId};
use tsdoc_binder::{DeclRef, SymbolFlags, SymbolId};
use tsdoc_common::FileId;
use tsdoc_parser::parser::node::SignatureData;
use tsdoc_parser::{ModifierFlags, NodeData, NodeIndex};
use tsdoc_scanner::SyntaxKind;

impl Checker<'_> {
    // =========================================================================
    // Symbol types
    // =========================================================================

    /// Value-side type of a symbol. Functions, classes, enums and namespaces
    /// get an anonymous type standing for `typeof symbol`; pure types have no
    /// value side and yield the error type.
    pub fn type_of_symbol(&self, id: SymbolId) -> TypeId {
        let id = self.resolve_alias(id);
        if let Some(&ty) = self.symbol_types.borrow().get(&id) {
            return ty;
        }
        if !self.resolving.borrow_mut().insert(id) {
            return self.error_type();
        }
        let ty = self.compute_type_of_symbol(id);
        self.resolving.borrow_mut().remove(&id);
        self.symbol_types.borrow_mut().insert(id, ty);
        ty
    }

    fn compute_type_of_symbol(&self, id: SymbolId) -> TypeId {
        let Some(symbol) = self.symbol(id) else {
            return self.error_type();
        };
        let flags = symbol.flags;
        if flags.intersects(SymbolFlags::VARIABLE | SymbolFlags::PROPERTY) {
            if let Some(decl) = symbol.value_declaration.or(symbol.first_declaration()) {
                return self.type_of_variable_like(id, decl);
            }
        }
        if flags.intersects(
            SymbolFlags::FUNCTION
                | SymbolFlags::METHOD
                | SymbolFlags::CLASS
                | SymbolFlags::ENUM
                | SymbolFlags::MODULE
                | SymbolFlags::TYPE_LITERAL,
        ) {
            return self.intern(TypeData::Anonymous { symbol: id });
        }
        if flags.intersects(SymbolFlags::ACCESSOR) {
            return self.type_of_accessor(id);
        }
        if flags.contains(SymbolFlags::ENUM_MEMBER) {
            return self.intern(TypeData::Reference {
                target: id,
                args: Vec::new(),
            });
        }
        self.error_type()
    }

    fn type_of_variable_like(&self, id: SymbolId, decl: DeclRef) -> TypeId {
        let Some(node) = self.file(decl.file).and_then(|f| f.node(decl.node)) else {
            return self.error_type();
        };
        let keep_literal = node
            .modifiers
            .intersects(ModifierFlags::CONST | ModifierFlags::READONLY);
        let (type_node, initializer) = match &node.data {
            NodeData::VariableDeclaration(v) => (v.type_node, v.initializer),
            NodeData::PropertySignature(p) | NodeData::PropertyDeclaration(p) => {
                (p.type_node, p.initializer)
            }
            NodeData::Parameter(p) => (p.type_node, p.initializer),
            NodeData::ExportAssignment(a) => (NodeIndex::NONE, a.expression),
            NodeData::EnumMember(_) => {
                return self.intern(TypeData::Reference {
                    target: id,
                    args: Vec::new(),
                });
            }
            _ => (NodeIndex::NONE, NodeIndex::NONE),
        };
        if type_node.is_some() {
            self.type_of_type_node(decl.file, type_node)
        } else if initializer.is_some() {
            self.type_of_expression(decl.file, initializer, keep_literal)
        } else {
            self.intrinsic(IntrinsicKind::Any)
        }
    }

    fn type_of_accessor(&self, id: SymbolId) -> TypeId {
        let Some(symbol) = self.symbol(id) else {
            return self.error_type();
        };
        for &decl in &symbol.declarations {
            match self.decl_data(decl) {
                Some(NodeData::GetAccessor(m)) if m.signature.return_type.is_some() => {
                    return self.type_of_type_node(decl.file, m.signature.return_type);
                }
                Some(NodeData::SetAccessor(m)) => {
                    let parameter = m
                        .signature
                        .parameters
                        .first()
                        .and_then(|&p| self.file(decl.file)?.data(p));
                    if let Some(NodeData::Parameter(p)) = parameter {
                        if p.type_node.is_some() {
                            return self.type_of_type_node(decl.file, p.type_node);
                        }
                    }
                }
                _ => {}
            }
        }
        self.intrinsic(IntrinsicKind::Any)
    }

    /// Type-side meaning of a symbol: the instance type of a class or
    /// interface, the aliased type of a type alias, the enum type of an enum.
    pub fn declared_type_of_symbol(&self, id: SymbolId) -> TypeId {
        let id = self.resolve_alias(id);
        if let Some(&ty) = self.declared_types.borrow().get(&id) {
            return ty;
        }
        let flags = self.symbol_flags(id);
        let ty = if flags.intersects(SymbolFlags::CLASS | SymbolFlags::INTERFACE) {
            let args = self.declared_type_parameters(id);
            self.intern(TypeData::Reference { target: id, args })
        } else if flags.contains(SymbolFlags::TYPE_ALIAS) {
            // Seed the cache so a self-referential alias terminates
            let error = self.error_type();
            self.declared_types.borrow_mut().insert(id, error);
            self.aliased_type(id).unwrap_or(error)
        } else if flags.intersects(SymbolFlags::ENUM | SymbolFlags::ENUM_MEMBER) {
            self.intern(TypeData::Reference {
                target: id,
                args: Vec::new(),
            })
        } else if flags.contains(SymbolFlags::TYPE_LITERAL) {
            self.intern(TypeData::Anonymous { symbol: id })
        } else {
            self.error_type()
        };
        self.declared_types.borrow_mut().insert(id, ty);
        ty
    }

    fn aliased_type(&self, id: SymbolId) -> Option<TypeId> {
        let symbol = self.symbol(id)?;
        symbol.declarations.iter().find_map(|&decl| match self.decl_data(decl)? {
            NodeData::TypeAlias(alias) => Some(self.type_of_type_node(decl.file, alias.type_node)),
            _ => None,
        })
    }

    /// Type parameters of a class or interface as type-parameter types.
    fn declared_type_parameters(&self, id: SymbolId) -> Vec<TypeId> {
        let Some(symbol) = self.symbol(id) else {
            return Vec::new();
        };
        for &decl in &symbol.declarations {
            let params = match self.decl_data(decl) {
                Some(NodeData::Interface(d)) => &d.type_parameters,
                Some(NodeData::Class(d)) | Some(NodeData::ClassExpression(d)) => &d.type_parameters,
                _ => continue,
            };
            if params.is_empty() {
                continue;
            }
            return params
                .iter()
                .filter_map(|&p| self.type_parameter_type(decl.file, p))
                .collect();
        }
        Vec::new()
    }

    fn type_parameter_type(&self, file: FileId, node: NodeIndex) -> Option<TypeId> {
        match self.file(file)?.data(node)? {
            NodeData::TypeParameter(tp) => Some(self.intern(TypeData::TypeParameter {
                name: tp.name.clone(),
                decl: DeclRef::new(file, node),
            })),
            _ => None,
        }
    }

    /// Constraint written on a type parameter (`T extends X`).
    pub fn constraint_of_type_parameter(&self, decl: DeclRef) -> Option<TypeId> {
        match self.decl_data(decl)? {
            NodeData::TypeParameter(tp) if tp.constraint.is_some() => {
                Some(self.type_of_type_node(decl.file, tp.constraint))
            }
            _ => None,
        }
    }

    // =========================================================================
    // Type nodes
    // =========================================================================

    /// Type denoted by a type annotation node.
    pub fn type_of_type_node(&self, file: FileId, node: NodeIndex) -> TypeId {
        let Some(source) = self.file(file) else {
            return self.error_type();
        };
        let Some(data) = source.data(node) else {
            return self.error_type();
        };
        let opaque = || self.intern(TypeData::Opaque(source.node_text(node).to_string()));
        match data {
            NodeData::KeywordType(kind) => match keyword_intrinsic(*kind) {
                Some(kind) => self.intrinsic(kind),
                None => opaque(),
            },
            NodeData::LiteralType => self.intern(TypeData::Literal(source.node_text(node).to_string())),
            NodeData::TypeReference(reference) => {
                let args: Vec<TypeId> = reference
                    .type_arguments
                    .iter()
                    .map(|&arg| self.type_of_type_node(file, arg))
                    .collect();
                if let [name] = reference.name.as_slice() {
                    if let Some(tp) = self.find_type_parameter(file, node, name) {
                        return tp;
                    }
                }
                match self.resolve_entity_path(file, node, &reference.name, SymbolFlags::TYPE | SymbolFlags::NAMESPACE) {
                    Some(target) => self.reference_to(target, args),
                    None => opaque(),
                }
            }
            NodeData::ArrayType(element) => {
                let element = self.type_of_type_node(file, *element);
                self.intern(TypeData::Array(element))
            }
            NodeData::TupleType(members) => {
                let elements = members
                    .iter()
                    .map(|&member| match source.data(member) {
                        Some(NodeData::TupleMember(m)) => TupleElement {
                            name: m.name.clone(),
                            optional: m.optional,
                            rest: m.rest,
                            ty: self.type_of_type_node(file, m.type_node),
                        },
                        _ => TupleElement {
                            name: None,
                            optional: false,
                            rest: false,
                            ty: self.type_of_type_node(file, member),
                        },
                    })
                    .collect();
                self.intern(TypeData::Tuple(elements))
            }
            NodeData::UnionType(types) => {
                let types = types.iter().map(|&t| self.type_of_type_node(file, t)).collect();
                self.union_of(types)
            }
            NodeData::IntersectionType(types) => {
                let types: Vec<TypeId> = types.iter().map(|&t| self.type_of_type_node(file, t)).collect();
                self.intern(TypeData::Intersection(types))
            }
            NodeData::FunctionType(_) => self.intern(TypeData::Function {
                decl: DeclRef::new(file, node),
                construct: false,
            }),
            NodeData::ConstructorType(_) => self.intern(TypeData::Function {
                decl: DeclRef::new(file, node),
                construct: true,
            }),
            NodeData::TypeLiteral(_) => match self.binder().symbol_of_node(file, node) {
                Some(symbol) => self.intern(TypeData::Anonymous { symbol }),
                None => opaque(),
            },
            NodeData::ParenthesizedType(inner) => self.type_of_type_node(file, *inner),
            NodeData::TypePredicate(_) => self.intrinsic(IntrinsicKind::Boolean),
            NodeData::TypeQuery(path) => {
                match self.resolve_entity_path(file, node, path, SymbolFlags::VALUE | SymbolFlags::NAMESPACE) {
                    Some(symbol) => self.type_of_symbol(symbol),
                    None => opaque(),
                }
            }
            _ => opaque(),
        }
    }

    /// Flattened union with duplicate members removed, in written order.
    pub fn union_of(&self, types: Vec<TypeId>) -> TypeId {
        let mut flat: Vec<TypeId> = Vec::with_capacity(types.len());
        for ty in types {
            let members = match self.type_data(ty) {
                TypeData::Union(inner) => inner,
                _ => vec![ty],
            };
            for member in members {
                if !flat.contains(&member) {
                    flat.push(member);
                }
            }
        }
        match flat.as_slice() {
            [] => self.intrinsic(IntrinsicKind::Never),
            [single] => *single,
            _ => self.intern(TypeData::Union(flat)),
        }
    }

    /// Reference to a named type. `Array<T>` is normalized to `T[]`.
    fn reference_to(&self, target: SymbolId, args: Vec<TypeId>) -> TypeId {
        let target = self.resolve_alias(target);
        if args.len() == 1 && self.binder().globals().get("Array") == Some(&target) {
            return self.intern(TypeData::Array(args[0]));
        }
        if self.symbol_flags(target) == SymbolFlags::TYPE_LITERAL {
            return self.intern(TypeData::Anonymous { symbol: target });
        }
        self.intern(TypeData::Reference { target, args })
    }

    /// Type parameter `name` declared on `node` or one of its ancestors.
    fn find_type_parameter(&self, file: FileId, node: NodeIndex, name: &str) -> Option<TypeId> {
        let source = self.file(file)?;
        let mut current = node;
        while current.is_some() {
            if let Some(data) = source.data(current) {
                for &param in type_parameters_of(data) {
                    if matches!(source.data(param), Some(NodeData::TypeParameter(tp)) if tp.name == name) {
                        return self.type_parameter_type(file, param);
                    }
                }
            }
            current = source.arena.parent_of(current);
        }
        None
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Display type of an initializer. Literals widen to their primitive
    /// unless `keep_literal` (const declarations, readonly properties).
    pub fn type_of_expression(&self, file: FileId, node: NodeIndex, keep_literal: bool) -> TypeId {
        let Some(source) = self.file(file) else {
            return self.error_type();
        };
        let Some(data) = source.data(node) else {
            return self.intrinsic(IntrinsicKind::Any);
        };
        match data {
            NodeData::Literal(kind) => {
                let primitive = match kind {
                    SyntaxKind::StringLiteral
                    | SyntaxKind::NoSubstitutionTemplateLiteral => Some(IntrinsicKind::String),
                    SyntaxKind::NumericLiteral => Some(IntrinsicKind::Number),
                    SyntaxKind::BigIntLiteral => Some(IntrinsicKind::BigInt),
                    SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => Some(IntrinsicKind::Boolean),
                    SyntaxKind::TemplateLiteral => return self.intrinsic(IntrinsicKind::String),
                    SyntaxKind::NullKeyword => return self.intrinsic(IntrinsicKind::Null),
                    SyntaxKind::RegularExpressionLiteral => {
                        return match self.binder().globals().get("RegExp") {
                            Some(&regexp) => self.reference_to(regexp, Vec::new()),
                            None => self.intern(TypeData::Opaque("RegExp".to_string())),
                        };
                    }
                    _ => None,
                };
                match primitive {
                    Some(_) if keep_literal => {
                        self.intern(TypeData::Literal(source.node_text(node).to_string()))
                    }
                    Some(primitive) => self.intrinsic(primitive),
                    None => self.intrinsic(IntrinsicKind::Any),
                }
            }
            NodeData::EntityExpression(path) => {
                if let [name] = path.as_slice() {
                    if name == "undefined" {
                        return self.intrinsic(IntrinsicKind::Undefined);
                    }
                }
                match self.resolve_entity_path(file, node, path, SymbolFlags::VALUE) {
                    Some(symbol) => self.type_of_symbol(symbol),
                    None => self.intrinsic(IntrinsicKind::Any),
                }
            }
            NodeData::ArrowFunction(_) | NodeData::FunctionExpression(_) => {
                self.intern(TypeData::Function {
                    decl: DeclRef::new(file, node),
                    construct: false,
                })
            }
            NodeData::ClassExpression(_) => match self.binder().symbol_of_node(file, node) {
                Some(symbol) => self.intern(TypeData::Anonymous { symbol }),
                None => self.intrinsic(IntrinsicKind::Any),
            },
            NodeData::NewExpression(reference) => {
                let args = reference
                    .type_arguments
                    .iter()
                    .map(|&arg| self.type_of_type_node(file, arg))
                    .collect();
                match self.resolve_entity_path(file, node, &reference.name, SymbolFlags::CLASS | SymbolFlags::VALUE) {
                    Some(class) => self.reference_to(class, args),
                    None => self.intrinsic(IntrinsicKind::Any),
                }
            }
            NodeData::ArrayLiteral(elements) => {
                if elements.is_empty() {
                    let any = self.intrinsic(IntrinsicKind::Any);
                    return self.intern(TypeData::Array(any));
                }
                let element_types = elements
                    .iter()
                    .map(|&e| self.type_of_expression(file, e, false))
                    .collect();
                let element = self.union_of(element_types);
                self.intern(TypeData::Array(element))
            }
            NodeData::ObjectLiteral => self.intrinsic(IntrinsicKind::Object),
            NodeData::AsExpression(cast) => {
                if cast.type_node.is_some() {
                    self.type_of_type_node(file, cast.type_node)
                } else {
                    self.type_of_expression(file, cast.expression, true)
                }
            }
            _ => self.intrinsic(IntrinsicKind::Any),
        }
    }

    // =========================================================================
    // Signatures
    // =========================================================================

    /// Build a signature from a callable node.
    pub fn signature_from_node(&self, decl: DeclRef, kind: SignatureKind) -> Option<Signature> {
        let data = self.decl_data(decl)?;
        let sig = data.signature()?;
        let return_type = self.signature_return_type(decl, data, sig);
        Some(Signature {
            kind,
            decl: Some(decl),
            type_parameters: self.type_parameter_infos(decl.file, &sig.type_parameters),
            parameters: self.parameter_infos(decl.file, &sig.parameters),
            return_type,
        })
    }

    fn signature_return_type(&self, decl: DeclRef, data: &NodeData, sig: &SignatureData) -> TypeId {
        if sig.return_type.is_some() {
            return self.type_of_type_node(decl.file, sig.return_type);
        }
        match data {
            NodeData::Constructor(_) => self.enclosing_class_instance_type(decl),
            NodeData::SetAccessor(_) => self.intrinsic(IntrinsicKind::Void),
            // Bodies are skipped when parsing, so nothing is inferred from them
            _ => self.intrinsic(IntrinsicKind::Any),
        }
    }

    fn enclosing_class_instance_type(&self, decl: DeclRef) -> TypeId {
        let class = self
            .file(decl.file)
            .map(|f| f.arena.parent_of(decl.node))
            .and_then(|parent| self.binder().symbol_of_node(decl.file, parent));
        match class {
            Some(class) => self.declared_type_of_symbol(class),
            None => self.intrinsic(IntrinsicKind::Any),
        }
    }

    pub fn type_parameter_infos(&self, file: FileId, params: &[NodeIndex]) -> TypeParameterList {
        let Some(source) = self.file(file) else {
            return TypeParameterList::new();
        };
        params
            .iter()
            .filter_map(|&p| match source.data(p) {
                Some(NodeData::TypeParameter(tp)) => Some(TypeParameterInfo {
                    name: tp.name.clone(),
                    constraint: tp
                        .constraint
                        .is_some()
                        .then(|| self.type_of_type_node(file, tp.constraint)),
                    default: tp
                        .default
                        .is_some()
                        .then(|| self.type_of_type_node(file, tp.default)),
                }),
                _ => None,
            })
            .collect()
    }

    fn parameter_infos(&self, file: FileId, params: &[NodeIndex]) -> ParameterList {
        let Some(source) = self.file(file) else {
            return ParameterList::new();
        };
        params
            .iter()
            .filter_map(|&p| {
                let NodeData::Parameter(param) = source.data(p)? else {
                    return None;
                };
                let ty = if param.type_node.is_some() {
                    self.type_of_type_node(file, param.type_node)
                } else if param.initializer.is_some() {
                    self.type_of_expression(file, param.initializer, false)
                } else if param.rest {
                    let any = self.intrinsic(IntrinsicKind::Any);
                    self.intern(TypeData::Array(any))
                } else {
                    self.intrinsic(IntrinsicKind::Any)
                };
                Some(ParameterInfo {
                    name: param.name.clone(),
                    ty,
                    optional: param.optional || param.initializer.is_some(),
                    rest: param.rest,
                    default_text: param
                        .initializer
                        .is_some()
                        .then(|| source.node_text(param.initializer).to_string()),
                    decl: Some(DeclRef::new(file, p)),
                })
            })
            .collect()
    }
}

fn keyword_intrinsic(kind: SyntaxKind) -> Option<IntrinsicKind> {
    Some(match kind {
        SyntaxKind::AnyKeyword => IntrinsicKind::Any,
        SyntaxKind::UnknownKeyword => IntrinsicKind::Unknown,
        SyntaxKind::NeverKeyword => IntrinsicKind::Never,
        SyntaxKind::VoidKeyword => IntrinsicKind::Void,
        SyntaxKind::UndefinedKeyword => IntrinsicKind::Undefined,
        SyntaxKind::NullKeyword => IntrinsicKind::Null,
        SyntaxKind::StringKeyword => IntrinsicKind::String,
        SyntaxKind::NumberKeyword => IntrinsicKind::Number,
        SyntaxKind::BooleanKeyword => IntrinsicKind::Boolean,
        SyntaxKind::BigIntKeyword => IntrinsicKind::BigInt,
        SyntaxKind::SymbolKeyword => IntrinsicKind::Symbol,
        SyntaxKind::ObjectKeyword => IntrinsicKind::Object,
        SyntaxKind::ThisKeyword => IntrinsicKind::This,
        _ => return None,
    })
}

/// Type parameter list declared directly on a node.
pub(crate) fn type_parameters_of(data: &NodeData) -> &[NodeIndex] {
    match data {
        NodeData::Interface(d) => &d.type_parameters,
        NodeData::Class(d) | NodeData::ClassExpression(d) => &d.type_parameters,
        NodeData::TypeAlias(d) => &d.type_parameters,
        other => match other.signature() {
            Some(sig) => &sig.type_parameters,
            None => &[],
        },
    }
}
