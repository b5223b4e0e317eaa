//! Call and construct signatures.

use crate::types::TypeId;
use smallvec::SmallVec;
use tsdoc_binder::DeclRef;

/// Inline capacities fit nearly every declaration.
pub type TypeParameterList = SmallVec<[TypeParameterInfo; 2]>;
pub type ParameterList = SmallVec<[ParameterInfo; 4]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    Call,
    Construct,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParameterInfo {
    pub name: String,
    pub constraint: Option<TypeId>,
    pub default: Option<TypeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: String,
    pub ty: TypeId,
    /// Written with `?` or has a default value
    pub optional: bool,
    pub rest: bool,
    /// Source text of the default value
    pub default_text: Option<String>,
    /// The parameter node, or `None` for synthesized parameters
    pub decl: Option<DeclRef>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub kind: SignatureKind,
    /// Node carrying the signature: a function, method, signature member,
    /// constructor, function type or arrow function. `None` for the implicit
    /// constructor of a class without one.
    pub decl: Option<DeclRef>,
    pub type_parameters: TypeParameterList,
    pub parameters: ParameterList,
    pub return_type: TypeId,
}
