//! Symbol indexes: queryable, read-only symbol-to-header providers
//!
//! An index is constructed once at run start and only answers lookups
//! afterwards. Multiple heterogeneous indexes are merged behind
//! [`SymbolIndexManager`]; no index has authority over another.

mod error;
mod manager;
mod memory;
mod yaml;

pub use error::IndexError;
pub use manager::SymbolIndexManager;
pub use memory::InMemorySymbolIndex;
pub use yaml::{DB_FILE_NAME, YamlSymbolIndex};

use crate::symbol::SymbolInfo;

/// Queryable provider of symbol-to-header associations
///
/// Implementations are read-only after construction; `lookup` must be safe to
/// call repeatedly and concurrently within one run. Returns every record the
/// index holds for the unqualified name, empty when the name is unknown.
pub trait SymbolIndex: Send + Sync {
    fn lookup(&self, name: &str) -> Vec<SymbolInfo>;
}
