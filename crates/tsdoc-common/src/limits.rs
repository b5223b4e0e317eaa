//! Centralized limits and thresholds.
//!
//! Listing caps bound what a description shows; recursion limits keep the
//! checker from looping on self-referential declarations.

// =============================================================================
// Listing Caps
// =============================================================================

/// Maximum number of members listed for a type before reporting "N more".
pub const MAX_TYPE_MEMBERS: usize = 20;

/// Maximum number of exports listed for a module before reporting "N more".
pub const MAX_MODULE_EXPORTS: usize = 50;

/// Character budget for one-line documentation excerpts in export listings.
pub const SUMMARY_WIDTH: usize = 80;

// =============================================================================
// Recursion Depth Limits (Checker)
// =============================================================================

/// Maximum depth when flattening heritage clauses (`extends`/`implements`).
///
/// ```typescript
/// interface A extends B {}
/// interface B extends A {} // cyclic, must terminate
/// ```
pub const MAX_HERITAGE_DEPTH: usize = 32;

/// Maximum number of alias hops followed when resolving re-exports.
pub const MAX_ALIAS_CHAIN: usize = 64;

/// Maximum nesting when rendering a type to text.
pub const MAX_TYPE_PRINT_DEPTH: usize = 16;
