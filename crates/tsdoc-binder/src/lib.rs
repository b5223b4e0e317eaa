//! Name binder for tsdoc.
//!
//! Walks parsed files and builds the symbol graph the checker queries:
//! - one global table shared by every script file and `declare global` block
//! - a module symbol per external-module file, with `locals` and `exports`
//! - ambient `declare module "x"` symbols merged by name across files
//! - alias symbols for imports and re-exports, resolved later by the checker
//!
//! Same-named declarations in one table merge into a single symbol, which is
//! how interface merging, function overloads and namespace/class merging
//! show up downstream.

pub mod symbols;
pub use symbols::{
    AliasTarget, DeclRef, Symbol, SymbolArena, SymbolFlags, SymbolId, SymbolTable,
    is_reserved_member_name,
};

mod state;
pub use state::BinderState;

mod state_import_export;
mod state_module_binding;
mod state_node_binding;
