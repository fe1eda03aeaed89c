//! File-backed symbol index
//!
//! Loads a YAML database produced by a symbol-indexing run: a sequence of
//! records, each mapping a name to its declaring header. The database is
//! either named explicitly or discovered by walking up from the first input
//! file's directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::index::{IndexError, SymbolIndex};
use crate::symbol::SymbolInfo;

/// Conventional database file name used by directory discovery
pub const DB_FILE_NAME: &str = "include_fixer_db.yaml";

/// Symbol index backed by an on-disk YAML database
#[derive(Debug)]
pub struct YamlSymbolIndex {
    /// Path the database was loaded from
    path: PathBuf,
    symbols: HashMap<String, Vec<SymbolInfo>>,
}

impl YamlSymbolIndex {
    /// Load a database from an explicit path
    ///
    /// Fails if the file is missing, unreadable, unparseable, or contains a
    /// record with an empty name or header.
    pub fn from_file(path: &Path) -> Result<Self, IndexError> {
        if !path.exists() {
            return Err(IndexError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| IndexError::ReadError {
            path: path.to_string_lossy().to_string(),
            error: e.to_string(),
        })?;

        let records: Vec<SymbolInfo> =
            serde_yaml::from_str(&content).map_err(|e| IndexError::ParseError {
                path: path.to_string_lossy().to_string(),
                error: e.to_string(),
            })?;

        if records.iter().any(|r| !r.is_eligible()) {
            return Err(IndexError::InvalidRecord {
                path: path.to_string_lossy().to_string(),
            });
        }

        let mut symbols: HashMap<String, Vec<SymbolInfo>> = HashMap::new();
        for record in records {
            symbols.entry(record.name.clone()).or_default().push(record);
        }

        debug!(
            "Loaded {} symbol names from {}",
            symbols.len(),
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            symbols,
        })
    }

    /// Discover and load a database named `file_name` in `start` or one of
    /// its ancestors
    pub fn from_directory(start: &Path, file_name: &str) -> Result<Self, IndexError> {
        let mut directory = Some(start);
        while let Some(dir) = directory {
            let candidate = dir.join(file_name);
            if candidate.is_file() {
                return Self::from_file(&candidate);
            }
            directory = dir.parent();
        }

        Err(IndexError::DatabaseNotFound {
            searched: start.to_string_lossy().to_string(),
            file_name: file_name.to_string(),
        })
    }

    /// Path the database was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SymbolIndex for YamlSymbolIndex {
    fn lookup(&self, name: &str) -> Vec<SymbolInfo> {
        self.symbols.get(name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE_DB: &str = r#"
- name: HashMap
  kind: Class
  header: '"hash_map.h"'
  priority: 3
  template_arity: 2
- name: HashMap
  kind: Class
  header: '"legacy/hash_map.h"'
  priority: 1
  template_arity: 2
- name: strlen
  kind: Function
  header: "<cstring>"
  qualified_name: "std::strlen"
"#;

    #[test]
    fn test_from_file_loads_records() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("db.yaml");
        std::fs::write(&db_path, SAMPLE_DB).unwrap();

        let index = YamlSymbolIndex::from_file(&db_path).unwrap();
        assert_eq!(index.path(), db_path);

        let records = index.lookup("HashMap");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].header, "\"hash_map.h\"");
        assert_eq!(records[0].priority, 3);

        let strlen = index.lookup("strlen");
        assert_eq!(strlen.len(), 1);
        assert_eq!(strlen[0].qualified_name.as_deref(), Some("std::strlen"));
    }

    #[test]
    fn test_from_file_missing() {
        let result = YamlSymbolIndex::from_file(Path::new("/nonexistent/db.yaml"));
        assert!(matches!(result, Err(IndexError::FileNotFound { .. })));
    }

    #[test]
    fn test_from_file_unparseable() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("db.yaml");
        std::fs::write(&db_path, "{ definitely: [not, a, record, list").unwrap();

        let result = YamlSymbolIndex::from_file(&db_path);
        assert!(matches!(result, Err(IndexError::ParseError { .. })));
    }

    #[test]
    fn test_from_file_rejects_empty_header() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("db.yaml");
        std::fs::write(&db_path, "- name: foo\n  header: ''\n").unwrap();

        let result = YamlSymbolIndex::from_file(&db_path);
        assert!(matches!(result, Err(IndexError::InvalidRecord { .. })));
    }

    #[test]
    fn test_from_directory_finds_in_ancestor() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(DB_FILE_NAME), SAMPLE_DB).unwrap();

        let nested = dir.path().join("src").join("lib");
        std::fs::create_dir_all(&nested).unwrap();

        let index = YamlSymbolIndex::from_directory(&nested, DB_FILE_NAME).unwrap();
        assert_eq!(index.lookup("strlen").len(), 1);
        assert_eq!(index.path(), dir.path().join(DB_FILE_NAME));
    }

    #[test]
    fn test_from_directory_exhausts_ancestors() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("deep").join("er");
        std::fs::create_dir_all(&nested).unwrap();

        let result = YamlSymbolIndex::from_directory(&nested, "no_such_db.yaml");
        assert!(matches!(result, Err(IndexError::DatabaseNotFound { .. })));
    }
}
