//! Resolution driver
//!
//! Turns unresolved-symbol signals into a per-translation-unit edit set:
//! queries the symbol indexes, applies the disambiguation policy, and emits
//! one header-insertion replacement plus any name-qualification replacements.
//! The driver performs no I/O; applying the edits is the edit module's job.

mod includes;
mod resolve;

pub use includes::{
    ExistingInclude, header_matches, insertion_offset, minimize_spelling, normalize_spelling,
    scan_includes,
};
pub use resolve::{FixerOptions, FixerResult, IncludeFixer, SkippedSymbol};
