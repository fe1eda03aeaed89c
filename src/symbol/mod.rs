//! Symbol data model
//!
//! `SymbolInfo` is the database exchange record mapping an unqualified name
//! to the header that declares it. `UnresolvedSymbol` is the per-occurrence
//! signal consumed from the semantic front-end.

mod info;
mod unresolved;

pub use info::{SymbolInfo, SymbolKind};
pub use unresolved::{SignalError, TranslationUnitSignals, UnresolvedSymbol, load_signals};
