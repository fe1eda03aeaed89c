//! Text edit model and application
//!
//! Edits are half-open byte-range replacements. They are generated by the
//! resolution driver, verified non-overlapping, and applied exactly once per
//! run in one of two modes: persisted to disk, or spliced into an in-memory
//! buffer returned to the caller.

mod apply;
mod replacement;

pub use apply::{ApplyReport, apply_to_buffer, apply_to_disk};
pub use replacement::{EditError, Replacement, check_replacements};
