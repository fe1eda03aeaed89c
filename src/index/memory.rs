//! Fixed-mapping symbol index
//!
//! Backed by caller-supplied associations, typically parsed from a
//! `name=header[,header...][;name=...]` mapping string on the command line.

use std::collections::HashMap;

use crate::index::{IndexError, SymbolIndex};
use crate::symbol::SymbolInfo;

/// Symbol index over a fixed in-memory mapping
#[derive(Debug, Default)]
pub struct InMemorySymbolIndex {
    symbols: HashMap<String, Vec<SymbolInfo>>,
}

impl InMemorySymbolIndex {
    /// Build an index from pre-constructed records
    pub fn new(records: Vec<SymbolInfo>) -> Self {
        let mut symbols: HashMap<String, Vec<SymbolInfo>> = HashMap::new();
        for record in records {
            symbols.entry(record.name.clone()).or_default().push(record);
        }
        Self { symbols }
    }

    /// Parse a mapping specification into an index
    ///
    /// `;` separates symbols, `,` separates multiple headers for one symbol.
    /// A comma list is a conjunction: using the symbol requires all of those
    /// headers, so they form one record with companion headers rather than
    /// competing alternatives. Separate entries for the same name stay
    /// separate records and compete normally. Whitespace around names and
    /// headers is trimmed; kind is `Unknown`, no template arguments. An empty
    /// name or header is a configuration error.
    pub fn from_mapping_spec(spec: &str) -> Result<Self, IndexError> {
        let mut records = Vec::new();

        for pair in spec.split(';').filter(|p| !p.trim().is_empty()) {
            let Some((name, headers)) = pair.split_once('=') else {
                return Err(IndexError::MalformedMapping {
                    pair: pair.trim().to_string(),
                });
            };

            let name = name.trim();
            if name.is_empty() {
                return Err(IndexError::MalformedMapping {
                    pair: pair.trim().to_string(),
                });
            }

            let mut spellings = Vec::new();
            for header in headers.split(',') {
                let header = header.trim();
                if header.is_empty() {
                    return Err(IndexError::MalformedMapping {
                        pair: pair.trim().to_string(),
                    });
                }
                spellings.push(header.to_string());
            }

            let mut record = SymbolInfo::new(name, spellings.remove(0));
            record.companion_headers = spellings;
            records.push(record);
        }

        Ok(Self::new(records))
    }

    /// Number of distinct symbol names in the index
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }
}

impl SymbolIndex for InMemorySymbolIndex {
    fn lookup(&self, name: &str) -> Vec<SymbolInfo> {
        self.symbols.get(name).cloned().unwrap_or_default()
    }
}
