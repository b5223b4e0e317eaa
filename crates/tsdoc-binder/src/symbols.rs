//! Symbol storage.
//!
//! A [`Symbol`] is one named entity after declaration merging: every
//! declaration node that contributes to it, the union of their meanings,
//! and the member/export tables hanging off it.

use bitflags::bitflags;
use indexmap::IndexMap;
use smallvec::SmallVec;
use tsdoc_common::FileId;
use tsdoc_parser::NodeIndex;

bitflags! {
    /// What a symbol means. Merged declarations OR their flags together.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SymbolFlags: u32 {
        const FUNCTION_SCOPED_VARIABLE = 1 << 0;
        const BLOCK_SCOPED_VARIABLE = 1 << 1;
        const PROPERTY = 1 << 2;
        const ENUM_MEMBER = 1 << 3;
        const FUNCTION = 1 << 4;
        const CLASS = 1 << 5;
        const INTERFACE = 1 << 6;
        const CONST_ENUM = 1 << 7;
        const REGULAR_ENUM = 1 << 8;
        const VALUE_MODULE = 1 << 9;
        const NAMESPACE_MODULE = 1 << 10;
        const TYPE_LITERAL = 1 << 11;
        const METHOD = 1 << 12;
        const CONSTRUCTOR = 1 << 13;
        const GET_ACCESSOR = 1 << 14;
        const SET_ACCESSOR = 1 << 15;
        const SIGNATURE = 1 << 16;
        const TYPE_PARAMETER = 1 << 17;
        const TYPE_ALIAS = 1 << 18;
        const ALIAS = 1 << 19;
        const OPTIONAL = 1 << 20;
        const TRANSIENT = 1 << 21;
        const STATIC = 1 << 22;
        const READONLY = 1 << 23;

        const VARIABLE = Self::FUNCTION_SCOPED_VARIABLE.bits() | Self::BLOCK_SCOPED_VARIABLE.bits();
        const ENUM = Self::CONST_ENUM.bits() | Self::REGULAR_ENUM.bits();
        const MODULE = Self::VALUE_MODULE.bits() | Self::NAMESPACE_MODULE.bits();
        const ACCESSOR = Self::GET_ACCESSOR.bits() | Self::SET_ACCESSOR.bits();
        const VALUE = Self::VARIABLE.bits()
            | Self::PROPERTY.bits()
            | Self::ENUM_MEMBER.bits()
            | Self::FUNCTION.bits()
            | Self::CLASS.bits()
            | Self::ENUM.bits()
            | Self::VALUE_MODULE.bits()
            | Self::METHOD.bits()
            | Self::ACCESSOR.bits();
        const TYPE = Self::CLASS.bits()
            | Self::INTERFACE.bits()
            | Self::ENUM.bits()
            | Self::ENUM_MEMBER.bits()
            | Self::TYPE_LITERAL.bits()
            | Self::TYPE_PARAMETER.bits()
            | Self::TYPE_ALIAS.bits();
        const NAMESPACE = Self::MODULE.bits() | Self::ENUM.bits();
    }
}

/// Index of a symbol in its [`SymbolArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(pub u32);

impl SymbolId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A declaration node in a specific file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeclRef {
    pub file: FileId,
    pub node: NodeIndex,
}

impl DeclRef {
    pub fn new(file: FileId, node: NodeIndex) -> DeclRef {
        DeclRef { file, node }
    }
}

/// Name to symbol, in declaration order.
pub type SymbolTable = IndexMap<String, SymbolId>;

/// Reserved member names for unnamed members.
pub const CALL_MEMBER: &str = "__call";
pub const NEW_MEMBER: &str = "__new";
pub const INDEX_MEMBER: &str = "__index";
pub const CONSTRUCTOR_MEMBER: &str = "__constructor";
pub const EXPORT_EQUALS: &str = "export=";
pub const DEFAULT_EXPORT: &str = "default";

/// Whether a table key names a signature slot rather than a property.
pub fn is_reserved_member_name(name: &str) -> bool {
    matches!(
        name,
        CALL_MEMBER | NEW_MEMBER | INDEX_MEMBER | CONSTRUCTOR_MEMBER | EXPORT_EQUALS
    )
}

/// Where an alias symbol points. Resolved lazily by the checker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AliasTarget {
    /// `import { name } from "module"` / `export { name } from "module"`
    Import { module: String, name: String },
    /// `import * as x from "module"`, `import x = require("module")`,
    /// `export * as x from "module"`
    Namespace { module: String },
    /// `export { x }`, `export default x`, `export = x`, `import x = A.B`
    Local { path: Vec<String> },
    /// `export as namespace X` pointing back at the file's module symbol
    Symbol(SymbolId),
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: String,
    pub flags: SymbolFlags,
    pub declarations: SmallVec<[DeclRef; 2]>,
    /// First declaration that carries a value meaning
    pub value_declaration: Option<DeclRef>,
    /// Instance members of classes/interfaces/type literals
    pub members: SymbolTable,
    /// Exports of modules/namespaces, class statics, enum members
    pub exports: SymbolTable,
    /// Non-exported declarations of a module or namespace body
    pub locals: SymbolTable,
    /// Containing module, namespace, class or type literal
    pub parent: Option<SymbolId>,
    pub alias_target: Option<AliasTarget>,
    /// `export * from "x"` specifiers together with the file they appear in
    pub export_stars: Vec<(FileId, String)>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, flags: SymbolFlags) -> Symbol {
        Symbol {
            name: name.into(),
            flags,
            declarations: SmallVec::new(),
            value_declaration: None,
            members: SymbolTable::default(),
            exports: SymbolTable::default(),
            locals: SymbolTable::default(),
            parent: None,
            alias_target: None,
            export_stars: Vec::new(),
        }
    }

    #[inline]
    pub fn has_any_flags(&self, flags: SymbolFlags) -> bool {
        self.flags.intersects(flags)
    }

    pub fn first_declaration(&self) -> Option<DeclRef> {
        self.declarations.first().copied()
    }
}

/// Owns every symbol of a program.
#[derive(Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> SymbolArena {
        SymbolArena::default()
    }

    pub fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    #[inline]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId(i as u32), s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_flags_cover_their_parts() {
        assert!(SymbolFlags::VALUE.contains(SymbolFlags::FUNCTION));
        assert!(SymbolFlags::TYPE.contains(SymbolFlags::INTERFACE));
        assert!(SymbolFlags::CLASS.intersects(SymbolFlags::VALUE));
        assert!(SymbolFlags::CLASS.intersects(SymbolFlags::TYPE));
        assert!(!SymbolFlags::INTERFACE.intersects(SymbolFlags::VALUE));
    }

    #[test]
    fn reserved_names() {
        assert!(is_reserved_member_name("__call"));
        assert!(is_reserved_member_name("export="));
        assert!(!is_reserved_member_name("__proto__"));
        assert!(!is_reserved_member_name("call"));
    }

    #[test]
    fn arena_ids_are_dense() {
        let mut arena = SymbolArena::new();
        let a = arena.alloc(Symbol::new("a", SymbolFlags::FUNCTION));
        let b = arena.alloc(Symbol::new("b", SymbolFlags::INTERFACE));
        assert_eq!(a, SymbolId(0));
        assert_eq!(b, SymbolId(1));
        assert_eq!(arena.get(b).map(|s| s.name.as_str()), Some("b"));
        assert_eq!(arena.len(), 2);
    }
}
