//! Binder state.
//!
//! `BinderState` owns the symbol arena and the program-wide tables (globals,
//! ambient modules, per-file module symbols). Files are bound one at a time
//! in program order, so merged declarations list their nodes in that order.

use crate::symbols::{AliasTarget, DeclRef, Symbol, SymbolArena, SymbolFlags, SymbolId, SymbolTable};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::debug;
use tsdoc_common::FileId;
use tsdoc_parser::{NodeData, NodeIndex, SourceFile};

/// Which table of a container a declaration lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TableKind {
    Members,
    Exports,
    Locals,
}

/// The declaration container currently being bound.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Scope {
    /// Script files and `declare global` blocks
    Global { ambient: bool },
    /// A module file, ambient module or namespace body
    Container {
        symbol: SymbolId,
        ambient: bool,
        /// Every declaration is exported (ambient body without explicit exports)
        export_context: bool,
    },
}

impl Scope {
    pub(crate) fn is_ambient(self) -> bool {
        match self {
            Scope::Global { ambient } | Scope::Container { ambient, .. } => ambient,
        }
    }

    pub(crate) fn owner(self) -> Option<SymbolId> {
        match self {
            Scope::Global { .. } => None,
            Scope::Container { symbol, .. } => Some(symbol),
        }
    }
}

/// One file being bound.
#[derive(Clone, Copy)]
pub(crate) struct FileCtx<'a> {
    pub file: FileId,
    pub source: &'a SourceFile,
}

impl FileCtx<'_> {
    pub(crate) fn decl(&self, node: NodeIndex) -> DeclRef {
        DeclRef::new(self.file, node)
    }
}

#[derive(Debug, Default)]
pub struct BinderState {
    pub(crate) symbols: SymbolArena,
    pub(crate) globals: SymbolTable,
    pub(crate) ambient_modules: IndexMap<String, SymbolId>,
    pub(crate) file_modules: FxHashMap<FileId, SymbolId>,
    pub(crate) node_symbols: FxHashMap<DeclRef, SymbolId>,
}

impl BinderState {
    pub fn new() -> BinderState {
        BinderState::default()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[inline]
    pub fn symbols(&self) -> &SymbolArena {
        &self.symbols
    }

    #[inline]
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    pub fn globals(&self) -> &SymbolTable {
        &self.globals
    }

    /// `declare module "name"` symbol, merged across files.
    pub fn ambient_module(&self, name: &str) -> Option<SymbolId> {
        self.ambient_modules.get(name).copied()
    }

    pub fn ambient_modules(&self) -> &IndexMap<String, SymbolId> {
        &self.ambient_modules
    }

    /// Module symbol of an external-module file. Script files have none.
    pub fn file_module(&self, file: FileId) -> Option<SymbolId> {
        self.file_modules.get(&file).copied()
    }

    /// Symbol a declaration node contributes to.
    pub fn symbol_of_node(&self, file: FileId, node: NodeIndex) -> Option<SymbolId> {
        self.node_symbols.get(&DeclRef::new(file, node)).copied()
    }

    // =========================================================================
    // Binding entry point
    // =========================================================================

    /// Bind every declaration of one parsed file.
    pub fn bind_source_file(&mut self, file: FileId, source: &SourceFile) {
        let ctx = FileCtx { file, source };
        let symbols_before = self.symbols.len();
        let statements = source.statements();

        let scope = if source.is_external_module {
            let mut symbol = Symbol::new(format!("\"{}\"", source.file_name), SymbolFlags::VALUE_MODULE);
            symbol.declarations.push(ctx.decl(source.root));
            symbol.value_declaration = Some(ctx.decl(source.root));
            let id = self.symbols.alloc(symbol);
            self.file_modules.insert(file, id);
            self.node_symbols.insert(ctx.decl(source.root), id);
            Scope::Container {
                symbol: id,
                ambient: source.is_declaration_file,
                export_context: source.is_declaration_file
                    && !has_export_declarations(source, statements),
            }
        } else {
            Scope::Global {
                ambient: source.is_declaration_file,
            }
        };

        self.bind_statements(ctx, scope, statements);
        self.bind_anonymous_types(ctx);

        debug!(
            file = %source.file_name,
            module = source.is_external_module,
            symbols = self.symbols.len() - symbols_before,
            "bound source file"
        );
    }

    pub(crate) fn bind_statements(&mut self, ctx: FileCtx<'_>, scope: Scope, statements: &[NodeIndex]) {
        for &statement in statements {
            self.bind_statement(ctx, scope, statement);
        }
    }

    // =========================================================================
    // Declaring symbols
    // =========================================================================

    pub(crate) fn table(&self, owner: Option<SymbolId>, kind: TableKind) -> Option<&SymbolTable> {
        match owner {
            None => Some(&self.globals),
            Some(id) => self.symbols.get(id).map(|s| match kind {
                TableKind::Members => &s.members,
                TableKind::Exports => &s.exports,
                TableKind::Locals => &s.locals,
            }),
        }
    }

    pub(crate) fn table_mut(&mut self, owner: Option<SymbolId>, kind: TableKind) -> Option<&mut SymbolTable> {
        match owner {
            None => Some(&mut self.globals),
            Some(id) => self.symbols.get_mut(id).map(|s| match kind {
                TableKind::Members => &mut s.members,
                TableKind::Exports => &mut s.exports,
                TableKind::Locals => &mut s.locals,
            }),
        }
    }

    /// Add a declaration to `owner`'s table, merging with a same-named
    /// symbol already there.
    pub(crate) fn add_declaration(
        &mut self,
        owner: Option<SymbolId>,
        kind: TableKind,
        name: &str,
        flags: SymbolFlags,
        decl: DeclRef,
    ) -> SymbolId {
        let existing = self
            .table(owner, kind)
            .and_then(|table| table.get(name))
            .copied();
        let id = match existing {
            Some(id) => id,
            None => {
                let mut symbol = Symbol::new(name, SymbolFlags::empty());
                symbol.parent = owner;
                let id = self.symbols.alloc(symbol);
                if let Some(table) = self.table_mut(owner, kind) {
                    table.insert(name.to_string(), id);
                }
                id
            }
        };
        if let Some(symbol) = self.symbols.get_mut(id) {
            symbol.flags |= flags;
            symbol.declarations.push(decl);
            if symbol.value_declaration.is_none() && flags.intersects(SymbolFlags::VALUE) {
                symbol.value_declaration = Some(decl);
            }
        }
        self.node_symbols.insert(decl, id);
        id
    }

    /// Declare a statement-level declaration in the current scope.
    pub(crate) fn declare_in_scope(
        &mut self,
        scope: Scope,
        name: &str,
        flags: SymbolFlags,
        decl: DeclRef,
        exported: bool,
    ) -> SymbolId {
        let kind = match scope {
            Scope::Global { .. } => TableKind::Exports,
            Scope::Container { export_context, .. } => {
                if exported || export_context {
                    TableKind::Exports
                } else {
                    TableKind::Locals
                }
            }
        };
        self.add_declaration(scope.owner(), kind, name, flags, decl)
    }

    /// Make an existing symbol visible under another exported name
    /// (`export default class Foo`).
    pub(crate) fn add_export_name(&mut self, scope: Scope, name: &str, id: SymbolId) {
        if let Some(table) = self.table_mut(scope.owner(), TableKind::Exports) {
            table.entry(name.to_string()).or_insert(id);
        }
    }

    pub(crate) fn declare_alias(
        &mut self,
        owner: Option<SymbolId>,
        kind: TableKind,
        name: &str,
        decl: DeclRef,
        target: AliasTarget,
    ) -> SymbolId {
        let id = self.add_declaration(owner, kind, name, SymbolFlags::ALIAS, decl);
        if let Some(symbol) = self.symbols.get_mut(id) {
            if symbol.alias_target.is_none() {
                symbol.alias_target = Some(target);
            }
        }
        id
    }

    /// Symbols for type literals and class expressions anywhere in the file.
    fn bind_anonymous_types(&mut self, ctx: FileCtx<'_>) {
        let arena = &ctx.source.arena;
        for index in 0..arena.len() {
            let node_index = NodeIndex(index as u32);
            let Some(data) = arena.data(node_index) else {
                continue;
            };
            match data {
                NodeData::TypeLiteral(members) => {
                    let mut symbol = Symbol::new("__type", SymbolFlags::TYPE_LITERAL);
                    symbol.declarations.push(ctx.decl(node_index));
                    let id = self.symbols.alloc(symbol);
                    self.node_symbols.insert(ctx.decl(node_index), id);
                    self.bind_type_members(ctx, id, members);
                }
                NodeData::ClassExpression(class) => {
                    let mut symbol = Symbol::new(
                        class.name.clone().unwrap_or_else(|| "__class".to_string()),
                        SymbolFlags::CLASS,
                    );
                    symbol.declarations.push(ctx.decl(node_index));
                    symbol.value_declaration = Some(ctx.decl(node_index));
                    let id = self.symbols.alloc(symbol);
                    self.node_symbols.insert(ctx.decl(node_index), id);
                    self.bind_class_members(ctx, id, &class.members);
                }
                _ => {}
            }
        }
    }
}

/// Whether a module body names its exports explicitly (`export {}`,
/// `export =`, `export default`), which turns off implicit exporting in
/// ambient contexts.
pub(crate) fn has_export_declarations(source: &SourceFile, statements: &[NodeIndex]) -> bool {
    statements.iter().any(|&s| {
        matches!(
            source.data(s),
            Some(NodeData::ExportDeclaration(_) | NodeData::ExportAssignment(_))
        )
    })
}
