//! Declaration and member binding.

use crate::state::{BinderState, FileCtx, Scope, TableKind};
use crate::symbols::{
    CALL_MEMBER, CONSTRUCTOR_MEMBER, DEFAULT_EXPORT, INDEX_MEMBER, NEW_MEMBER, SymbolFlags,
    SymbolId,
};
use tracing::trace;
use tsdoc_parser::parser::node::VariableKind;
use tsdoc_parser::{ModifierFlags, NodeData, NodeIndex};

impl BinderState {
    pub(crate) fn bind_statement(&mut self, ctx: FileCtx<'_>, scope: Scope, index: NodeIndex) {
        let Some(node) = ctx.source.node(index) else {
            return;
        };
        let modifiers = node.modifiers;
        let exported = modifiers.contains(ModifierFlags::EXPORT);
        let is_default = exported && modifiers.contains(ModifierFlags::DEFAULT);
        let decl = ctx.decl(index);

        match &node.data {
            NodeData::Interface(interface) => {
                let id = self.declare_in_scope(scope, &interface.name, SymbolFlags::INTERFACE, decl, exported && !is_default);
                if is_default {
                    self.add_export_name(scope, DEFAULT_EXPORT, id);
                }
                self.bind_type_members(ctx, id, &interface.members);
            }
            NodeData::Class(class) => {
                let name = class.name.as_deref().unwrap_or(DEFAULT_EXPORT);
                let id = self.declare_in_scope(scope, name, SymbolFlags::CLASS, decl, exported && !is_default);
                if is_default {
                    self.add_export_name(scope, DEFAULT_EXPORT, id);
                }
                self.bind_class_members(ctx, id, &class.members);
            }
            NodeData::TypeAlias(alias) => {
                self.declare_in_scope(scope, &alias.name, SymbolFlags::TYPE_ALIAS, decl, exported);
            }
            NodeData::Function(function) => {
                let name = function.name.as_deref().unwrap_or(DEFAULT_EXPORT);
                let id = self.declare_in_scope(scope, name, SymbolFlags::FUNCTION, decl, exported && !is_default);
                if is_default {
                    self.add_export_name(scope, DEFAULT_EXPORT, id);
                }
            }
            NodeData::VariableStatement(statement) => {
                let flags = match statement.kind {
                    VariableKind::Var => SymbolFlags::FUNCTION_SCOPED_VARIABLE,
                    VariableKind::Let | VariableKind::Const | VariableKind::Using => {
                        SymbolFlags::BLOCK_SCOPED_VARIABLE
                    }
                };
                for &declaration in &statement.declarations {
                    let Some(NodeData::VariableDeclaration(var)) = ctx.source.data(declaration) else {
                        continue;
                    };
                    if var.is_binding_pattern {
                        continue;
                    }
                    self.declare_in_scope(scope, &var.name, flags, ctx.decl(declaration), exported);
                }
            }
            NodeData::Enum(enum_data) => {
                let flags = if modifiers.contains(ModifierFlags::CONST) {
                    SymbolFlags::CONST_ENUM
                } else {
                    SymbolFlags::REGULAR_ENUM
                };
                let id = self.declare_in_scope(scope, &enum_data.name, flags, decl, exported);
                for &member in &enum_data.members {
                    if let Some(NodeData::EnumMember(m)) = ctx.source.data(member) {
                        self.add_declaration(
                            Some(id),
                            TableKind::Exports,
                            &m.name,
                            SymbolFlags::ENUM_MEMBER,
                            ctx.decl(member),
                        );
                    }
                }
            }
            NodeData::Module(module) => self.bind_module_declaration(ctx, scope, index, module),
            NodeData::Import(import) => self.bind_import_declaration(ctx, scope, import),
            NodeData::ImportEquals(import) => {
                self.bind_import_equals_declaration(ctx, scope, index, import, exported)
            }
            NodeData::ExportDeclaration(export) => {
                self.bind_export_declaration(ctx, scope, index, export)
            }
            NodeData::ExportAssignment(assignment) => {
                self.bind_export_assignment(ctx, scope, index, assignment)
            }
            NodeData::NamespaceExport(name) => self.bind_namespace_export(ctx, index, name),
            _ => {}
        }
    }

    /// Members of an interface or type literal.
    pub(crate) fn bind_type_members(&mut self, ctx: FileCtx<'_>, owner: SymbolId, members: &[NodeIndex]) {
        for &member in members {
            let Some(node) = ctx.source.node(member) else {
                continue;
            };
            let readonly = if node.modifiers.contains(ModifierFlags::READONLY) {
                SymbolFlags::READONLY
            } else {
                SymbolFlags::empty()
            };
            let (name, flags): (&str, SymbolFlags) = match &node.data {
                NodeData::PropertySignature(p) => {
                    (p.name.as_str(), SymbolFlags::PROPERTY | optional_flag(p.optional) | readonly)
                }
                NodeData::MethodSignature(m) => (m.name.as_str(), SymbolFlags::METHOD | optional_flag(m.optional)),
                NodeData::GetAccessor(m) => (m.name.as_str(), SymbolFlags::GET_ACCESSOR),
                NodeData::SetAccessor(m) => (m.name.as_str(), SymbolFlags::SET_ACCESSOR),
                NodeData::CallSignature(_) => (CALL_MEMBER, SymbolFlags::SIGNATURE),
                NodeData::ConstructSignature(_) => (NEW_MEMBER, SymbolFlags::SIGNATURE),
                NodeData::IndexSignature(_) => (INDEX_MEMBER, SymbolFlags::SIGNATURE | readonly),
                _ => continue,
            };
            self.add_declaration(Some(owner), TableKind::Members, name, flags, ctx.decl(member));
        }
    }

    /// Members of a class: instance side to `members`, statics to `exports`.
    pub(crate) fn bind_class_members(&mut self, ctx: FileCtx<'_>, owner: SymbolId, members: &[NodeIndex]) {
        for &member in members {
            let Some(node) = ctx.source.node(member) else {
                continue;
            };
            let is_static = node.modifiers.contains(ModifierFlags::STATIC);
            let mut modifier_flags = SymbolFlags::empty();
            if is_static {
                modifier_flags |= SymbolFlags::STATIC;
            }
            if node.modifiers.contains(ModifierFlags::READONLY) {
                modifier_flags |= SymbolFlags::READONLY;
            }
            let table = if is_static {
                TableKind::Exports
            } else {
                TableKind::Members
            };
            let (name, flags): (&str, SymbolFlags) = match &node.data {
                NodeData::PropertyDeclaration(p) => (p.name.as_str(), SymbolFlags::PROPERTY | optional_flag(p.optional)),
                NodeData::MethodDeclaration(m) => (m.name.as_str(), SymbolFlags::METHOD | optional_flag(m.optional)),
                NodeData::GetAccessor(m) => (m.name.as_str(), SymbolFlags::GET_ACCESSOR),
                NodeData::SetAccessor(m) => (m.name.as_str(), SymbolFlags::SET_ACCESSOR),
                NodeData::IndexSignature(_) => (INDEX_MEMBER, SymbolFlags::SIGNATURE),
                NodeData::Constructor(signature) => {
                    self.bind_parameter_properties(ctx, owner, &signature.parameters);
                    (CONSTRUCTOR_MEMBER, SymbolFlags::CONSTRUCTOR)
                }
                _ => continue,
            };
            // `#private` names are not reachable from outside the class body
            if name.starts_with('#') {
                continue;
            }
            self.add_declaration(Some(owner), table, name, flags | modifier_flags, ctx.decl(member));
        }
    }

    /// `constructor(private readonly x: T)` declares an instance property.
    fn bind_parameter_properties(&mut self, ctx: FileCtx<'_>, owner: SymbolId, parameters: &[NodeIndex]) {
        for &parameter in parameters {
            let Some(node) = ctx.source.node(parameter) else {
                continue;
            };
            let NodeData::Parameter(param) = &node.data else {
                continue;
            };
            if !node.modifiers.intersects(ModifierFlags::PARAMETER_PROPERTY) {
                continue;
            }
            let mut flags = SymbolFlags::PROPERTY | optional_flag(param.optional);
            if node.modifiers.contains(ModifierFlags::READONLY) {
                flags |= SymbolFlags::READONLY;
            }
            trace!(name = %param.name, "parameter property");
            self.add_declaration(Some(owner), TableKind::Members, &param.name, flags, ctx.decl(parameter));
        }
    }
}

fn optional_flag(optional: bool) -> SymbolFlags {
    if optional {
        SymbolFlags::OPTIONAL
    } else {
        SymbolFlags::empty()
    }
}
