//! Arena AST and the recursive-descent `ParserState`.

mod base;
pub mod node;
mod node_arena;
mod source_file;
mod state;
mod state_expressions;
mod state_statements;
mod state_statements_class_members;
mod state_types;

pub use base::NodeIndex;
pub use node::*;
pub use node_arena::NodeArena;
pub use source_file::{SourceFile, parse_file};
pub use state::{ParseDiagnostic, ParserState};
