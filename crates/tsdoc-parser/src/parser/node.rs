//! AST node definitions.
//!
//! A node is a span (`pos..end`), a parent link, the modifiers written in
//! front of it, and a closed [`NodeData`] payload. Children are referenced
//! by [`NodeIndex`] into the owning arena.

use super::base::NodeIndex;
use bitflags::bitflags;
use tsdoc_scanner::SyntaxKind;

bitflags! {
    /// Modifiers written on a declaration, member or parameter.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModifierFlags: u32 {
        const EXPORT = 1 << 0;
        const DEFAULT = 1 << 1;
        const DECLARE = 1 << 2;
        const ABSTRACT = 1 << 3;
        const STATIC = 1 << 4;
        const READONLY = 1 << 5;
        const ASYNC = 1 << 6;
        const CONST = 1 << 7;
        const PUBLIC = 1 << 8;
        const PRIVATE = 1 << 9;
        const PROTECTED = 1 << 10;
        const OVERRIDE = 1 << 11;
        const ACCESSOR = 1 << 12;

        /// Modifiers that turn a constructor parameter into a property.
        const PARAMETER_PROPERTY = Self::PUBLIC.bits()
            | Self::PRIVATE.bits()
            | Self::PROTECTED.bits()
            | Self::READONLY.bits()
            | Self::OVERRIDE.bits();
    }
}

impl ModifierFlags {
    /// Map a modifier keyword to its flag.
    pub fn from_keyword(kind: SyntaxKind) -> Option<ModifierFlags> {
        let flag = match kind {
            SyntaxKind::ExportKeyword => ModifierFlags::EXPORT,
            SyntaxKind::DefaultKeyword => ModifierFlags::DEFAULT,
            SyntaxKind::DeclareKeyword => ModifierFlags::DECLARE,
            SyntaxKind::AbstractKeyword => ModifierFlags::ABSTRACT,
            SyntaxKind::StaticKeyword => ModifierFlags::STATIC,
            SyntaxKind::ReadonlyKeyword => ModifierFlags::READONLY,
            SyntaxKind::AsyncKeyword => ModifierFlags::ASYNC,
            SyntaxKind::ConstKeyword => ModifierFlags::CONST,
            SyntaxKind::PublicKeyword => ModifierFlags::PUBLIC,
            SyntaxKind::PrivateKeyword => ModifierFlags::PRIVATE,
            SyntaxKind::ProtectedKeyword => ModifierFlags::PROTECTED,
            SyntaxKind::OverrideKeyword => ModifierFlags::OVERRIDE,
            SyntaxKind::AccessorKeyword => ModifierFlags::ACCESSOR,
            _ => return None,
        };
        Some(flag)
    }
}

/// An AST node.
#[derive(Clone, Debug)]
pub struct Node {
    /// Start of the first token of the node (after leading trivia)
    pub pos: u32,
    /// End of the last token of the node
    pub end: u32,
    pub parent: NodeIndex,
    pub modifiers: ModifierFlags,
    pub data: NodeData,
}

// =============================================================================
// Node Payloads
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct SourceFileData {
    pub statements: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct InterfaceData {
    pub name: String,
    pub type_parameters: Vec<NodeIndex>,
    /// `extends` clause entries (type references)
    pub heritage: Vec<NodeIndex>,
    pub members: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct ClassData {
    /// `None` for `export default class { }`
    pub name: Option<String>,
    pub type_parameters: Vec<NodeIndex>,
    pub extends: NodeIndex,
    pub implements: Vec<NodeIndex>,
    pub members: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct TypeAliasData {
    pub name: String,
    pub type_parameters: Vec<NodeIndex>,
    pub type_node: NodeIndex,
}

/// Parameters, type parameters and return type shared by every callable
/// shape (functions, methods, signatures, function types, arrows).
#[derive(Clone, Debug, Default)]
pub struct SignatureData {
    pub type_parameters: Vec<NodeIndex>,
    pub parameters: Vec<NodeIndex>,
    pub return_type: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct FunctionData {
    /// `None` for `export default function () {}`
    pub name: Option<String>,
    pub signature: SignatureData,
    pub has_body: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariableKind {
    Var,
    Let,
    Const,
    Using,
}

#[derive(Clone, Debug)]
pub struct VariableStatementData {
    pub kind: VariableKind,
    pub declarations: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct VariableDeclarationData {
    /// Identifier, or the source text of a destructuring pattern
    pub name: String,
    pub is_binding_pattern: bool,
    pub type_node: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct EnumData {
    pub name: String,
    pub members: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct EnumMemberData {
    pub name: String,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ModuleData {
    /// Identifier, or the unquoted text of a string-named ambient module
    pub name: String,
    pub is_string_name: bool,
    /// `declare global { }`
    pub is_global: bool,
    /// `None` for shorthand ambient modules (`declare module "x";`)
    pub body: Option<Vec<NodeIndex>>,
}

#[derive(Clone, Debug)]
pub struct ImportDeclData {
    pub module_specifier: String,
    pub is_type_only: bool,
    /// Default, namespace and named import bindings
    pub bindings: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct ImportSpecifierData {
    /// Local name
    pub name: String,
    /// Imported name when it differs (`default` for default imports)
    pub property_name: Option<String>,
    pub is_type_only: bool,
}

#[derive(Clone, Debug)]
pub enum ModuleReference {
    /// `import x = require("y")`
    External(String),
    /// `import x = A.B.C`
    Entity(Vec<String>),
}

#[derive(Clone, Debug)]
pub struct ImportEqualsData {
    pub name: String,
    pub module_reference: ModuleReference,
}

#[derive(Clone, Debug)]
pub struct ExportDeclData {
    pub module_specifier: Option<String>,
    pub is_type_only: bool,
    /// `None` for `export * from "x"`
    pub specifiers: Option<Vec<NodeIndex>>,
    /// `export * as ns from "x"`
    pub namespace_export: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ExportSpecifierData {
    /// Exported name
    pub name: String,
    /// Local (or re-exported) name when it differs
    pub property_name: Option<String>,
    pub is_type_only: bool,
}

#[derive(Clone, Debug)]
pub struct ExportAssignmentData {
    /// `export = x` rather than `export default x`
    pub is_export_equals: bool,
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct PropertyData {
    pub name: String,
    pub optional: bool,
    pub type_node: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct MethodData {
    pub name: String,
    pub optional: bool,
    pub signature: SignatureData,
}

#[derive(Clone, Debug)]
pub struct IndexSignatureData {
    pub parameter: NodeIndex,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ParameterData {
    pub name: String,
    pub optional: bool,
    pub rest: bool,
    pub type_node: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TypeParameterData {
    pub name: String,
    pub constraint: NodeIndex,
    pub default: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TypeReferenceData {
    /// Qualified name segments (`Intl.NumberFormat` -> `["Intl", "NumberFormat"]`)
    pub name: Vec<String>,
    pub type_arguments: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct TupleMemberData {
    pub name: Option<String>,
    pub optional: bool,
    pub rest: bool,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TypePredicateData {
    pub asserts: bool,
    pub parameter_name: String,
    /// `NONE` for `asserts x`
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TypeOperatorData {
    /// `keyof`, `readonly` or `unique`
    pub operator: SyntaxKind,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct AsExpressionData {
    pub expression: NodeIndex,
    /// `NONE` for `as const`
    pub type_node: NodeIndex,
}

/// Node payload.
///
/// Type shapes the checker never needs to look inside (conditional, mapped,
/// indexed access, template literal and import types) are parsed as
/// [`NodeData::OpaqueType`] and rendered from their source span.
#[derive(Clone, Debug)]
pub enum NodeData {
    SourceFile(SourceFileData),

    // Declarations
    Interface(InterfaceData),
    Class(ClassData),
    TypeAlias(TypeAliasData),
    Function(FunctionData),
    VariableStatement(VariableStatementData),
    VariableDeclaration(VariableDeclarationData),
    Enum(EnumData),
    EnumMember(EnumMemberData),
    Module(ModuleData),
    Import(ImportDeclData),
    ImportSpecifier(ImportSpecifierData),
    NamespaceImport(String),
    ImportEquals(ImportEqualsData),
    ExportDeclaration(ExportDeclData),
    ExportSpecifier(ExportSpecifierData),
    ExportAssignment(ExportAssignmentData),
    /// `export as namespace X;`
    NamespaceExport(String),

    // Members
    PropertySignature(PropertyData),
    PropertyDeclaration(PropertyData),
    MethodSignature(MethodData),
    MethodDeclaration(MethodData),
    CallSignature(SignatureData),
    ConstructSignature(SignatureData),
    Constructor(SignatureData),
    GetAccessor(MethodData),
    SetAccessor(MethodData),
    IndexSignature(IndexSignatureData),
    Parameter(ParameterData),
    TypeParameter(TypeParameterData),

    // Types
    KeywordType(SyntaxKind),
    LiteralType,
    TypeReference(TypeReferenceData),
    ArrayType(NodeIndex),
    TupleType(Vec<NodeIndex>),
    TupleMember(TupleMemberData),
    UnionType(Vec<NodeIndex>),
    IntersectionType(Vec<NodeIndex>),
    FunctionType(SignatureData),
    ConstructorType(SignatureData),
    TypeLiteral(Vec<NodeIndex>),
    ParenthesizedType(NodeIndex),
    TypePredicate(TypePredicateData),
    TypeQuery(Vec<String>),
    TypeOperator(TypeOperatorData),
    OpaqueType,

    // Expressions (initializers and export targets)
    Literal(SyntaxKind),
    EntityExpression(Vec<String>),
    ArrowFunction(SignatureData),
    FunctionExpression(SignatureData),
    ClassExpression(ClassData),
    NewExpression(TypeReferenceData),
    ArrayLiteral(Vec<NodeIndex>),
    ObjectLiteral,
    AsExpression(AsExpressionData),
    OtherExpression,
}

impl NodeData {
    /// Declared name of a named declaration or member.
    pub fn name(&self) -> Option<&str> {
        match self {
            NodeData::Interface(d) => Some(&d.name),
            NodeData::Class(d) | NodeData::ClassExpression(d) => d.name.as_deref(),
            NodeData::TypeAlias(d) => Some(&d.name),
            NodeData::Function(d) => d.name.as_deref(),
            NodeData::VariableDeclaration(d) => Some(&d.name),
            NodeData::Enum(d) => Some(&d.name),
            NodeData::EnumMember(d) => Some(&d.name),
            NodeData::Module(d) => Some(&d.name),
            NodeData::ImportSpecifier(d) => Some(&d.name),
            NodeData::NamespaceImport(name) | NodeData::NamespaceExport(name) => Some(name),
            NodeData::ImportEquals(d) => Some(&d.name),
            NodeData::ExportSpecifier(d) => Some(&d.name),
            NodeData::PropertySignature(d) | NodeData::PropertyDeclaration(d) => Some(&d.name),
            NodeData::MethodSignature(d)
            | NodeData::MethodDeclaration(d)
            | NodeData::GetAccessor(d)
            | NodeData::SetAccessor(d) => Some(&d.name),
            NodeData::Parameter(d) => Some(&d.name),
            NodeData::TypeParameter(d) => Some(&d.name),
            _ => None,
        }
    }

    /// The signature of any callable node.
    pub fn signature(&self) -> Option<&SignatureData> {
        match self {
            NodeData::Function(d) => Some(&d.signature),
            NodeData::MethodSignature(d)
            | NodeData::MethodDeclaration(d)
            | NodeData::GetAccessor(d)
            | NodeData::SetAccessor(d) => Some(&d.signature),
            NodeData::CallSignature(sig)
            | NodeData::ConstructSignature(sig)
            | NodeData::Constructor(sig)
            | NodeData::FunctionType(sig)
            | NodeData::ConstructorType(sig)
            | NodeData::ArrowFunction(sig)
            | NodeData::FunctionExpression(sig) => Some(sig),
            _ => None,
        }
    }

    pub fn is_type_node(&self) -> bool {
        matches!(
            self,
            NodeData::KeywordType(_)
                | NodeData::LiteralType
                | NodeData::TypeReference(_)
                | NodeData::ArrayType(_)
                | NodeData::TupleType(_)
                | NodeData::TupleMember(_)
                | NodeData::UnionType(_)
                | NodeData::IntersectionType(_)
                | NodeData::FunctionType(_)
                | NodeData::ConstructorType(_)
                | NodeData::TypeLiteral(_)
                | NodeData::ParenthesizedType(_)
                | NodeData::TypePredicate(_)
                | NodeData::TypeQuery(_)
                | NodeData::TypeOperator(_)
                | NodeData::OpaqueType
        )
    }
}
