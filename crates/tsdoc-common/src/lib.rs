//! Common types and utilities for tsdoc.
//!
//! This crate provides foundational types used across all tsdoc crates:
//! - Position/line-map types for 1-based source locations
//! - Comment ranges and JSDoc comment helpers
//! - Centralized limits (listing caps, recursion guards)

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position, SourceLocation};

// Comment ranges recorded by the scanner
pub mod comments;
pub use comments::CommentRange;

// Centralized limits and thresholds
pub mod limits;

/// Identifies one file inside a loaded program.
///
/// File ids are dense indices assigned in load order, so comparing two ids
/// also compares the position of their files in the declaration universe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct FileId(pub u32);

impl FileId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
