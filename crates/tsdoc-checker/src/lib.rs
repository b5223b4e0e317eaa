//! Program construction and semantic queries for TypeScript declarations.
//!
//! A [`Program`] parses and binds a set of declaration files; a [`Checker`]
//! answers questions about it: what a name refers to, the type of a symbol,
//! the properties and signatures of a type, and how to print them.

pub mod checker;
pub mod jsdoc;
pub mod module_resolution;
pub mod program;
mod properties;
pub mod signatures;
mod type_printer;
mod type_resolution;
pub mod types;

pub use checker::Checker;
pub use jsdoc::{JsdocTag, ParsedJsdoc, parse_jsdoc};
pub use program::{
    DiskHost, MemoryHost, NoPackages, PackageResolver, Program, ProgramOptions, SourceHost,
};
pub use signatures::{
    ParameterInfo, ParameterList, Signature, SignatureKind, TypeParameterInfo, TypeParameterList,
};
pub use types::{IntrinsicKind, TupleElement, TypeData, TypeId};
