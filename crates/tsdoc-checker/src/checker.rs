//! The `Checker`: semantic queries over a built [`Program`].
//!
//! Every query takes `&self`; results are memoized in `RefCell` caches that
//! live as long as the checker, so repeated queries during one lookup are
//! cheap and always agree with each other.

use crate::jsdoc::{ParsedJsdoc, parse_jsdoc};
use crate::module_resolution::is_relative_specifier;
use crate::program::Program;
use crate::types::{IntrinsicKind, TypeData, TypeId, TypeInterner};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use tracing::trace;
use tsdoc_binder::symbols::{DEFAULT_EXPORT, EXPORT_EQUALS};
use tsdoc_binder::{AliasTarget, BinderState, DeclRef, Symbol, SymbolFlags, SymbolId};
use tsdoc_common::FileId;
use tsdoc_common::comments::get_jsdoc_content;
use tsdoc_common::limits::MAX_ALIAS_CHAIN;
use tsdoc_parser::{NodeData, NodeIndex, SourceFile};

pub struct Checker<'p> {
    program: &'p Program,
    pub(crate) types: RefCell<TypeInterner>,
    pub(crate) symbol_types: RefCell<FxHashMap<SymbolId, TypeId>>,
    pub(crate) declared_types: RefCell<FxHashMap<SymbolId, TypeId>>,
    /// Symbols whose type is being computed, to cut cycles
    pub(crate) resolving: RefCell<FxHashSet<SymbolId>>,
    alias_targets: RefCell<FxHashMap<SymbolId, SymbolId>>,
    resolving_aliases: RefCell<FxHashSet<SymbolId>>,
}

impl<'p> Checker<'p> {
    pub fn new(program: &'p Program) -> Checker<'p> {
        Checker {
            program,
            types: RefCell::new(TypeInterner::new()),
            symbol_types: RefCell::new(FxHashMap::default()),
            declared_types: RefCell::new(FxHashMap::default()),
            resolving: RefCell::new(FxHashSet::default()),
            alias_targets: RefCell::new(FxHashMap::default()),
            resolving_aliases: RefCell::new(FxHashSet::default()),
        }
    }

    // =========================================================================
    // Program access
    // =========================================================================

    #[inline]
    pub fn program(&self) -> &'p Program {
        self.program
    }

    #[inline]
    pub fn binder(&self) -> &'p BinderState {
        self.program.binder()
    }

    #[inline]
    pub fn file(&self, id: FileId) -> Option<&'p SourceFile> {
        self.program.file(id)
    }

    #[inline]
    pub fn symbol(&self, id: SymbolId) -> Option<&'p Symbol> {
        self.program.binder().symbol(id)
    }

    pub fn symbol_name(&self, id: SymbolId) -> &'p str {
        self.symbol(id).map_or("", |s| s.name.as_str())
    }

    pub fn symbol_flags(&self, id: SymbolId) -> SymbolFlags {
        self.symbol(id).map_or(SymbolFlags::empty(), |s| s.flags)
    }

    /// Payload of a declaration node.
    pub fn decl_data(&self, decl: DeclRef) -> Option<&'p NodeData> {
        self.file(decl.file)?.data(decl.node)
    }

    // =========================================================================
    // Type storage
    // =========================================================================

    pub fn intern(&self, data: TypeData) -> TypeId {
        self.types.borrow_mut().intern(data)
    }

    pub fn type_data(&self, id: TypeId) -> TypeData {
        self.types
            .borrow()
            .get(id)
            .cloned()
            .unwrap_or(TypeData::Error)
    }

    pub fn intrinsic(&self, kind: IntrinsicKind) -> TypeId {
        self.intern(TypeData::Intrinsic(kind))
    }

    pub fn error_type(&self) -> TypeId {
        self.intern(TypeData::Error)
    }

    pub fn is_error_type(&self, id: TypeId) -> bool {
        matches!(self.type_data(id), TypeData::Error)
    }

    // =========================================================================
    // Symbols
    // =========================================================================

    /// Symbol declared by a declaration node. A variable statement maps to
    /// its first declarator.
    pub fn symbol_at_declaration(&self, decl: DeclRef) -> Option<SymbolId> {
        let binder = self.binder();
        if let Some(id) = binder.symbol_of_node(decl.file, decl.node) {
            return Some(id);
        }
        match self.decl_data(decl)? {
            NodeData::VariableStatement(statement) => statement
                .declarations
                .iter()
                .find_map(|&d| binder.symbol_of_node(decl.file, d)),
            _ => None,
        }
    }

    /// Follow an alias chain to the symbol it finally names. Non-aliases and
    /// aliases whose target cannot be found resolve to themselves.
    pub fn resolve_alias(&self, id: SymbolId) -> SymbolId {
        if !self.symbol_flags(id).contains(SymbolFlags::ALIAS) {
            return id;
        }
        if let Some(&target) = self.alias_targets.borrow().get(&id) {
            return target;
        }
        if !self.resolving_aliases.borrow_mut().insert(id) {
            return id;
        }
        let mut current = id;
        for _ in 0..MAX_ALIAS_CHAIN {
            if !self.symbol_flags(current).contains(SymbolFlags::ALIAS) {
                break;
            }
            match self.resolve_alias_once(current) {
                Some(next) if next != current => current = next,
                _ => break,
            }
        }
        self.resolving_aliases.borrow_mut().remove(&id);
        trace!(alias = self.symbol_name(id), target = self.symbol_name(current), "resolved alias");
        self.alias_targets.borrow_mut().insert(id, current);
        current
    }

    fn resolve_alias_once(&self, alias: SymbolId) -> Option<SymbolId> {
        let symbol = self.symbol(alias)?;
        let decl = symbol.first_declaration()?;
        match symbol.alias_target.as_ref()? {
            AliasTarget::Import { module, name } => {
                let module = self.resolve_module(decl.file, module)?;
                self.export_of_module(module, name).or_else(|| {
                    // `import x from "cjs"` against an `export =` module
                    (name == DEFAULT_EXPORT)
                        .then(|| self.export_equals_target(module))
                        .flatten()
                })
            }
            AliasTarget::Namespace { module } => {
                let module = self.resolve_module(decl.file, module)?;
                Some(self.export_equals_target(module).unwrap_or(module))
            }
            AliasTarget::Local { path } => {
                self.resolve_entity_path_excluding(decl.file, decl.node, path, SymbolFlags::all(), Some(alias))
            }
            AliasTarget::Symbol(target) => Some(*target),
        }
    }

    // =========================================================================
    // Modules
    // =========================================================================

    /// Module symbol of a file (`None` for script files).
    pub fn module_of_file(&self, file: FileId) -> Option<SymbolId> {
        self.binder().file_module(file)
    }

    /// Module a specifier written in `from` refers to.
    pub fn resolve_module(&self, from: FileId, specifier: &str) -> Option<SymbolId> {
        if is_relative_specifier(specifier) {
            let file = self.program.resolve_relative_module(from, specifier)?;
            return self.module_of_file(file);
        }
        self.binder().ambient_module(specifier).or_else(|| {
            let file = self.program.resolve_package_module(specifier)?;
            self.module_of_file(file)
        })
    }

    fn export_equals_target(&self, module: SymbolId) -> Option<SymbolId> {
        let symbol = self.symbol(module)?;
        symbol
            .exports
            .get(EXPORT_EQUALS)
            .map(|&id| self.resolve_alias(id))
    }

    /// Exports of a module or namespace in declaration order, followed by
    /// names re-exported through `export *`. An `export =` assignment
    /// replaces the list with the assigned entity's exports.
    pub fn exports_of_module(&self, module: SymbolId) -> Vec<(String, SymbolId)> {
        let mut out = Vec::new();
        let mut seen_names = FxHashSet::default();
        let mut visited = FxHashSet::default();
        self.collect_module_exports(module, true, &mut out, &mut seen_names, &mut visited);
        out
    }

    fn collect_module_exports(
        &self,
        module: SymbolId,
        include_default: bool,
        out: &mut Vec<(String, SymbolId)>,
        seen_names: &mut FxHashSet<String>,
        visited: &mut FxHashSet<SymbolId>,
    ) {
        let module = self.resolve_alias(module);
        if !visited.insert(module) {
            return;
        }
        let Some(symbol) = self.symbol(module) else {
            return;
        };

        if let Some(&assigned) = symbol.exports.get(EXPORT_EQUALS) {
            let target = self.resolve_alias(assigned);
            let has_exports = self.symbol(target).is_some_and(|s| !s.exports.is_empty());
            if target != assigned && has_exports {
                self.collect_module_exports(target, include_default, out, seen_names, visited);
            } else if seen_names.insert(self.symbol_name(target).to_string()) {
                out.push((self.symbol_name(target).to_string(), target));
            }
            return;
        }

        for (name, &id) in &symbol.exports {
            if !include_default && name == DEFAULT_EXPORT {
                continue;
            }
            if seen_names.insert(name.clone()) {
                out.push((name.clone(), id));
            }
        }
        for (file, specifier) in &symbol.export_stars {
            match self.resolve_module(*file, specifier) {
                Some(target) => self.collect_module_exports(target, false, out, seen_names, visited),
                None => trace!(specifier = %specifier, "unresolved export *"),
            }
        }
    }

    /// One named export of a module or namespace.
    pub fn export_of_module(&self, module: SymbolId, name: &str) -> Option<SymbolId> {
        let module = self.resolve_alias(module);
        if let Some(&id) = self
            .symbol(module)
            .and_then(|s| s.exports.get(name))
            .filter(|_| name != EXPORT_EQUALS)
        {
            return Some(id);
        }
        self.exports_of_module(module)
            .into_iter()
            .find_map(|(export, id)| (export == name).then_some(id))
    }

    // =========================================================================
    // Name resolution
    // =========================================================================

    /// Resolve `name` as seen from `node`: enclosing namespaces and ambient
    /// modules innermost first, then the file's module scope, then globals.
    pub fn resolve_name(&self, file: FileId, node: NodeIndex, name: &str, meaning: SymbolFlags) -> Option<SymbolId> {
        self.resolve_name_excluding(file, node, name, meaning, None)
    }

    fn resolve_name_excluding(
        &self,
        file: FileId,
        node: NodeIndex,
        name: &str,
        meaning: SymbolFlags,
        exclude: Option<SymbolId>,
    ) -> Option<SymbolId> {
        let source = self.file(file)?;
        let binder = self.binder();
        let accepts = |id: SymbolId| {
            Some(id) != exclude && self.symbol_flags(id).intersects(meaning | SymbolFlags::ALIAS)
        };
        let lookup = |container: SymbolId| {
            let symbol = self.symbol(container)?;
            symbol
                .locals
                .get(name)
                .copied()
                .filter(|&id| accepts(id))
                .or_else(|| symbol.exports.get(name).copied().filter(|&id| accepts(id)))
        };

        let mut current = source.arena.parent_of(node);
        while current.is_some() {
            if let Some(NodeData::Module(module)) = source.data(current) {
                if !module.is_global {
                    if let Some(found) = binder.symbol_of_node(file, current).and_then(lookup) {
                        return Some(found);
                    }
                }
            }
            current = source.arena.parent_of(current);
        }
        if let Some(found) = binder.file_module(file).and_then(lookup) {
            return Some(found);
        }
        binder.globals().get(name).copied().filter(|&id| accepts(id))
    }

    /// Resolve a dotted entity name (`A.B.C`) as seen from `node`.
    pub fn resolve_entity_path(
        &self,
        file: FileId,
        node: NodeIndex,
        path: &[String],
        meaning: SymbolFlags,
    ) -> Option<SymbolId> {
        self.resolve_entity_path_excluding(file, node, path, meaning, None)
    }

    fn resolve_entity_path_excluding(
        &self,
        file: FileId,
        node: NodeIndex,
        path: &[String],
        meaning: SymbolFlags,
        exclude: Option<SymbolId>,
    ) -> Option<SymbolId> {
        let (first, rest) = path.split_first()?;
        let first_meaning = if rest.is_empty() {
            meaning
        } else {
            SymbolFlags::NAMESPACE | SymbolFlags::VALUE
        };
        let mut current = self.resolve_name_excluding(file, node, first, first_meaning, exclude)?;
        for segment in rest {
            current = self.export_of_module(current, segment)?;
        }
        Some(current)
    }

    // =========================================================================
    // Documentation
    // =========================================================================

    /// The JSDoc comment attached to a declaration. Variable declarators
    /// fall back to the comment on their statement.
    pub fn documentation(&self, decl: DeclRef) -> Option<ParsedJsdoc> {
        let source = self.file(decl.file)?;
        let comment = source.jsdoc_of(decl.node).or_else(|| {
            match source.data(decl.node)? {
                NodeData::VariableDeclaration(_) => source.jsdoc_of(source.arena.parent_of(decl.node)),
                _ => None,
            }
        })?;
        Some(parse_jsdoc(&get_jsdoc_content(comment, &source.text)))
    }

    /// Documentation of every declaration of a symbol merged together: the
    /// first non-empty summary, and the tags of all declarations in order.
    pub fn symbol_documentation(&self, id: SymbolId) -> ParsedJsdoc {
        let mut merged = ParsedJsdoc::default();
        let Some(symbol) = self.symbol(id) else {
            return merged;
        };
        for &decl in &symbol.declarations {
            let Some(doc) = self.documentation(decl) else {
                continue;
            };
            if merged.summary.is_empty() {
                merged.summary = doc.summary;
            }
            merged.tags.extend(doc.tags);
        }
        merged
    }
}
