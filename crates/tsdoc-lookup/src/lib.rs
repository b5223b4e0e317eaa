//! Documentation lookup for dotted TypeScript symbol paths.
//!
//! A lookup runs four steps, each starting from scratch:
//!
//! - **Loading**: standard library declarations, plus the entry file of the
//!   package or local module the path's root names ([`loader`])
//! - **Building**: one parse/bind pass over those files ([`tsdoc_checker::Program`])
//! - **Resolving**: root search over declaration files, then member descent
//!   ([`resolver`])
//! - **Extracting**: a [`SymbolDescription`] for an entity, or an
//!   [`ExportListing`] for a module named on its own
//!
//! ```no_run
//! use tsdoc_lookup::{LookupConfig, lookup};
//!
//! let _output = lookup("Array.isArray", &LookupConfig::from_env())?;
//! # Ok::<(), tsdoc_lookup::LookupError>(())
//! ```

pub mod config;
pub mod describe;
pub mod entity;
pub mod error;
pub mod exports;
pub mod loader;
pub mod lookup;
pub mod resolver;

pub use config::{LIB_DIR_ENV, LookupConfig};
pub use describe::{
    Location, MemberDescription, ParameterDescription, SignatureDescription, SymbolDescription,
    TypeParameterDescription, describe,
};
pub use entity::{EntityKind, ResolvedEntity};
pub use error::LookupError;
pub use exports::{ExportEntry, ExportListing, list_exports};
pub use loader::{DeclarationUniverse, UniverseRoot, load_universe};
pub use lookup::{LookupOutput, lookup, lookup_in, parse_symbol_path};
pub use resolver::{Resolution, resolve, resolve_from_module};
