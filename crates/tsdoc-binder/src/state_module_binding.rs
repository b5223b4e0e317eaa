//! Module and namespace declaration binding.
//!
//! Handles `namespace A.B {}`, ambient `declare module "x" {}` (merged by
//! name across every file of the program) and `declare global {}`.

use crate::state::{BinderState, FileCtx, Scope, has_export_declarations};
use crate::symbols::{Symbol, SymbolFlags};
use tracing::trace;
use tsdoc_parser::parser::node::ModuleData;
use tsdoc_parser::{ModifierFlags, NodeIndex};

impl BinderState {
    pub(crate) fn bind_module_declaration(
        &mut self,
        ctx: FileCtx<'_>,
        scope: Scope,
        index: NodeIndex,
        module: &ModuleData,
    ) {
        let modifiers = ctx
            .source
            .node(index)
            .map(|n| n.modifiers)
            .unwrap_or_default();
        let ambient = scope.is_ambient() || modifiers.contains(ModifierFlags::DECLARE);

        if module.is_global {
            if let Some(body) = &module.body {
                self.bind_statements(ctx, Scope::Global { ambient: true }, body);
            }
            return;
        }

        if module.is_string_name {
            self.bind_ambient_module(ctx, index, module);
            return;
        }

        let exported = modifiers.contains(ModifierFlags::EXPORT);
        let id = self.declare_in_scope(
            scope,
            &module.name,
            SymbolFlags::NAMESPACE_MODULE | SymbolFlags::VALUE_MODULE,
            ctx.decl(index),
            exported,
        );
        if let Some(body) = &module.body {
            let inner = Scope::Container {
                symbol: id,
                ambient,
                export_context: ambient && !has_export_declarations(ctx.source, body),
            };
            self.bind_statements(ctx, inner, body);
        }
    }

    /// `declare module "name" { ... }`. Every file declaring the same name
    /// contributes to one symbol.
    fn bind_ambient_module(&mut self, ctx: FileCtx<'_>, index: NodeIndex, module: &ModuleData) {
        let decl = ctx.decl(index);
        let id = match self.ambient_modules.get(&module.name) {
            Some(&id) => id,
            None => {
                let symbol = Symbol::new(format!("\"{}\"", module.name), SymbolFlags::empty());
                let id = self.symbols.alloc(symbol);
                self.ambient_modules.insert(module.name.clone(), id);
                id
            }
        };
        if let Some(symbol) = self.symbols.get_mut(id) {
            symbol.flags |= SymbolFlags::VALUE_MODULE;
            symbol.declarations.push(decl);
            if symbol.value_declaration.is_none() {
                symbol.value_declaration = Some(decl);
            }
        }
        self.node_symbols.insert(decl, id);
        trace!(module = %module.name, file = %ctx.source.file_name, "ambient module");

        if let Some(body) = &module.body {
            let inner = Scope::Container {
                symbol: id,
                ambient: true,
                export_context: !has_export_declarations(ctx.source, body),
            };
            self.bind_statements(ctx, inner, body);
        }
    }
}
