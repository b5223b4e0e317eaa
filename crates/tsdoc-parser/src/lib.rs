//! Parser and arena AST for TypeScript declarations.
//!
//! The parser understands everything that can appear in a `.d.ts` file and
//! the declaration surface of ordinary `.ts` sources. Statement and function
//! bodies are skipped, so the tree only carries what documentation lookup
//! needs: declarations, their types, and their source spans.

pub mod parser;

pub use parser::{
    ModifierFlags, Node, NodeArena, NodeData, NodeIndex, ParseDiagnostic, ParserState,
    SourceFile, parse_file,
};
