//! Type representation.
//!
//! Types are interned: structurally equal `TypeData` values share one
//! [`TypeId`], so ids can be compared and hashed directly. Generic types are
//! never instantiated; a reference keeps its written type arguments and
//! members are read from the generic declaration.

use rustc_hash::FxHashMap;
use tsdoc_binder::{DeclRef, SymbolId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    Object,
    This,
}

impl IntrinsicKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IntrinsicKind::Any => "any",
            IntrinsicKind::Unknown => "unknown",
            IntrinsicKind::Never => "never",
            IntrinsicKind::Void => "void",
            IntrinsicKind::Undefined => "undefined",
            IntrinsicKind::Null => "null",
            IntrinsicKind::String => "string",
            IntrinsicKind::Number => "number",
            IntrinsicKind::Boolean => "boolean",
            IntrinsicKind::BigInt => "bigint",
            IntrinsicKind::Symbol => "symbol",
            IntrinsicKind::Object => "object",
            IntrinsicKind::This => "this",
        }
    }

    /// Global interface whose members a primitive of this kind exposes.
    pub fn apparent_interface(self) -> Option<&'static str> {
        match self {
            IntrinsicKind::String => Some("String"),
            IntrinsicKind::Number => Some("Number"),
            IntrinsicKind::Boolean => Some("Boolean"),
            IntrinsicKind::BigInt => Some("BigInt"),
            IntrinsicKind::Symbol => Some("Symbol"),
            IntrinsicKind::Object => Some("Object"),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TupleElement {
    pub name: Option<String>,
    pub optional: bool,
    pub rest: bool,
    pub ty: TypeId,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    /// Unresolvable or circular; prints as `any`
    Error,
    Intrinsic(IntrinsicKind),
    /// String, numeric, bigint or boolean literal, kept as written
    Literal(String),
    /// Named class, interface, enum, enum member or alias
    Reference { target: SymbolId, args: Vec<TypeId> },
    /// Value side of a function, class, enum, namespace or module, or the
    /// structure of a type literal
    Anonymous { symbol: SymbolId },
    /// A function or constructor type node, arrow function or function
    /// expression
    Function { decl: DeclRef, construct: bool },
    Array(TypeId),
    Tuple(Vec<TupleElement>),
    Union(Vec<TypeId>),
    Intersection(Vec<TypeId>),
    /// `decl` is the type parameter node
    TypeParameter { name: String, decl: DeclRef },
    /// Shapes kept as source text (conditional, mapped, indexed access,
    /// template literal, import and operator types)
    Opaque(String),
}

#[derive(Debug, Default)]
pub struct TypeInterner {
    types: Vec<TypeData>,
    ids: FxHashMap<TypeData, TypeId>,
}

impl TypeInterner {
    pub fn new() -> TypeInterner {
        TypeInterner::default()
    }

    pub fn intern(&mut self, data: TypeData) -> TypeId {
        if let Some(&id) = self.ids.get(&data) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(data.clone());
        self.ids.insert(data, id);
        id
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeData> {
        self.types.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning_dedupes_structurally() {
        let mut interner = TypeInterner::new();
        let string = interner.intern(TypeData::Intrinsic(IntrinsicKind::String));
        let number = interner.intern(TypeData::Intrinsic(IntrinsicKind::Number));
        let union_a = interner.intern(TypeData::Union(vec![string, number]));
        let union_b = interner.intern(TypeData::Union(vec![string, number]));
        assert_eq!(union_a, union_b);
        assert_ne!(string, number);
        assert_eq!(interner.len(), 3);
        assert_eq!(
            interner.get(string),
            Some(&TypeData::Intrinsic(IntrinsicKind::String))
        );
    }
}
