//! Fan-out and merge over registered symbol indexes

use crate::index::SymbolIndex;
use crate::symbol::SymbolInfo;

/// Owns the symbol indexes of one run and merges their answers
///
/// Registration is append-only; queries are read-only and safe to issue
/// concurrently from independent translation-unit runs. The manager unions
/// and orders candidates but never picks among distinct headers — that
/// decision belongs to the resolution driver.
#[derive(Default)]
pub struct SymbolIndexManager {
    indexes: Vec<Box<dyn SymbolIndex>>,
}

impl SymbolIndexManager {
    pub fn new() -> Self {
        Self {
            indexes: Vec::new(),
        }
    }

    /// Register an index for the remainder of the run
    pub fn add_index(&mut self, index: Box<dyn SymbolIndex>) {
        self.indexes.push(index);
    }

    /// Number of registered indexes
    pub fn index_count(&self) -> usize {
        self.indexes.len()
    }

    /// Look up `name` in every registered index and merge the results
    ///
    /// Records with the same name and header spelling collapse to one,
    /// keeping the highest priority seen. The merged list is ordered by
    /// descending priority, then lexicographic header, so repeated queries
    /// are deterministic. An empty manager answers with an empty list.
    pub fn query(&self, name: &str) -> Vec<SymbolInfo> {
        let mut merged: Vec<SymbolInfo> = Vec::new();

        for index in &self.indexes {
            for record in index.lookup(name) {
                if !record.is_eligible() {
                    continue;
                }
                let duplicate = merged
                    .iter()
                    .position(|r| r.name == record.name && r.header == record.header);
                match duplicate {
                    Some(pos) => {
                        if record.priority > merged[pos].priority {
                            merged[pos] = record;
                        }
                    }
                    None => merged.push(record),
                }
            }
        }

        merged.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.header.cmp(&b.header))
        });
        merged
    }
}
