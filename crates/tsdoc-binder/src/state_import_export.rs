//! Import and export binding.
//!
//! Every import binding and export specifier becomes an alias symbol whose
//! target is kept as written; the checker follows it on demand once all
//! files of the program are bound.

use crate::state::{BinderState, FileCtx, Scope, TableKind};
use crate::symbols::{AliasTarget, DEFAULT_EXPORT, EXPORT_EQUALS, SymbolFlags};
use tsdoc_parser::parser::node::{
    ExportAssignmentData, ExportDeclData, ImportDeclData, ImportEqualsData, ModuleReference,
};
use tsdoc_parser::{NodeData, NodeIndex};

impl BinderState {
    pub(crate) fn bind_import_declaration(&mut self, ctx: FileCtx<'_>, scope: Scope, import: &ImportDeclData) {
        let module = &import.module_specifier;
        for &binding in &import.bindings {
            let (name, target) = match ctx.source.data(binding) {
                Some(NodeData::ImportSpecifier(spec)) => (
                    spec.name.as_str(),
                    AliasTarget::Import {
                        module: module.clone(),
                        name: spec.property_name.clone().unwrap_or_else(|| spec.name.clone()),
                    },
                ),
                Some(NodeData::NamespaceImport(name)) => (
                    name.as_str(),
                    AliasTarget::Namespace {
                        module: module.clone(),
                    },
                ),
                _ => continue,
            };
            self.declare_alias(scope.owner(), TableKind::Locals, name, ctx.decl(binding), target);
        }
    }

    pub(crate) fn bind_import_equals_declaration(
        &mut self,
        ctx: FileCtx<'_>,
        scope: Scope,
        index: NodeIndex,
        import: &ImportEqualsData,
        exported: bool,
    ) {
        let target = match &import.module_reference {
            ModuleReference::External(module) => AliasTarget::Namespace {
                module: module.clone(),
            },
            ModuleReference::Entity(path) => AliasTarget::Local { path: path.clone() },
        };
        let kind = if exported {
            TableKind::Exports
        } else {
            TableKind::Locals
        };
        self.declare_alias(scope.owner(), kind, &import.name, ctx.decl(index), target);
    }

    pub(crate) fn bind_export_declaration(
        &mut self,
        ctx: FileCtx<'_>,
        scope: Scope,
        index: NodeIndex,
        export: &ExportDeclData,
    ) {
        let owner = scope.owner();
        let Some(specifiers) = &export.specifiers else {
            let Some(module) = &export.module_specifier else {
                return;
            };
            match &export.namespace_export {
                Some(name) => {
                    self.declare_alias(
                        owner,
                        TableKind::Exports,
                        name,
                        ctx.decl(index),
                        AliasTarget::Namespace {
                            module: module.clone(),
                        },
                    );
                }
                None => {
                    let Some(id) = owner else {
                        return;
                    };
                    if let Some(symbol) = self.symbols.get_mut(id) {
                        symbol.export_stars.push((ctx.file, module.clone()));
                    }
                }
            }
            return;
        };

        for &specifier in specifiers {
            let Some(NodeData::ExportSpecifier(spec)) = ctx.source.data(specifier) else {
                continue;
            };
            let local = spec.property_name.clone().unwrap_or_else(|| spec.name.clone());
            let target = match &export.module_specifier {
                Some(module) => AliasTarget::Import {
                    module: module.clone(),
                    name: local,
                },
                None => AliasTarget::Local { path: vec![local] },
            };
            self.declare_alias(owner, TableKind::Exports, &spec.name, ctx.decl(specifier), target);
        }
    }

    pub(crate) fn bind_export_assignment(
        &mut self,
        ctx: FileCtx<'_>,
        scope: Scope,
        index: NodeIndex,
        assignment: &ExportAssignmentData,
    ) {
        let name = if assignment.is_export_equals {
            EXPORT_EQUALS
        } else {
            DEFAULT_EXPORT
        };
        match ctx.source.data(assignment.expression) {
            Some(NodeData::EntityExpression(path)) => {
                self.declare_alias(
                    scope.owner(),
                    TableKind::Exports,
                    name,
                    ctx.decl(index),
                    AliasTarget::Local { path: path.clone() },
                );
            }
            _ => {
                self.add_declaration(scope.owner(), TableKind::Exports, name, SymbolFlags::PROPERTY, ctx.decl(index));
            }
        }
    }

    /// `export as namespace X;` makes the file's module visible as a global.
    pub(crate) fn bind_namespace_export(&mut self, ctx: FileCtx<'_>, index: NodeIndex, name: &str) {
        let Some(module) = self.file_module(ctx.file) else {
            return;
        };
        self.declare_alias(None, TableKind::Exports, name, ctx.decl(index), AliasTarget::Symbol(module));
    }
}
