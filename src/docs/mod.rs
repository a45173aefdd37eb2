// src/docs/mod.rs
// =============================================================================
// This module finds the documents we check.
//
// Currently implements:
// - Recursive walk of the documentation root
// - Filtering by file extension (.md by default)
// - Deterministic ordering, so two runs over the same tree report the same
//   errors in the same order
// =============================================================================

mod discover;

// Re-export the main function from discover.rs
pub use discover::discover_documents;
