//! Run configuration
//!
//! One `Config` value carries every knob the resolution and application
//! stages need; nothing in the pipeline reads ambient global state.

use std::path::{Path, PathBuf};

use crate::index::{DB_FILE_NAME, InMemorySymbolIndex, IndexError, SymbolIndexManager, YamlSymbolIndex};

/// Where symbol records come from
#[derive(Debug, Clone)]
pub enum DatabaseSpec {
    /// Caller-supplied `name=header[,header...][;...]` mapping string
    Fixed { mapping: String },

    /// On-disk YAML database; `None` discovers `include_fixer_db.yaml` in
    /// the first input file's directory or an ancestor
    Yaml { path: Option<PathBuf> },
}

/// Configuration for one invocation
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseSpec,

    /// Strip configured search-path prefixes from inserted headers
    pub minimize_paths: bool,

    /// Include search paths used for minimization
    pub include_paths: Vec<PathBuf>,

    /// Suppress the per-header "Added #include" report
    pub quiet: bool,

    /// Fallback style name handed to the external reformatter
    pub style: String,

    /// Single-buffer editor mode: transform stdin, print, never write files
    pub stdin_mode: bool,
}

impl Config {
    /// Construct the run's symbol index manager
    ///
    /// `first_input` anchors database discovery when no explicit path was
    /// given. Any failure here is a configuration error: the run aborts
    /// before analysis, with no fallback source.
    pub fn build_index_manager(&self, first_input: &Path) -> Result<SymbolIndexManager, IndexError> {
        let mut manager = SymbolIndexManager::new();

        match &self.database {
            DatabaseSpec::Fixed { mapping } => {
                let index = InMemorySymbolIndex::from_mapping_spec(mapping)?;
                manager.add_index(Box::new(index));
            }
            DatabaseSpec::Yaml { path } => {
                let index = match path {
                    Some(path) => YamlSymbolIndex::from_file(path)?,
                    None => {
                        let absolute = std::path::absolute(first_input)
                            .unwrap_or_else(|_| first_input.to_path_buf());
                        let directory = absolute.parent().unwrap_or(Path::new("."));
                        YamlSymbolIndex::from_directory(directory, DB_FILE_NAME)?
                    }
                };
                manager.add_index(Box::new(index));
            }
        }

        Ok(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_with(database: DatabaseSpec) -> Config {
        Config {
            database,
            minimize_paths: true,
            include_paths: Vec::new(),
            quiet: false,
            style: "llvm".to_string(),
            stdin_mode: false,
        }
    }

    #[test]
    fn test_fixed_database() {
        let config = config_with(DatabaseSpec::Fixed {
            mapping: "foo=a.h".to_string(),
        });
        let manager = config.build_index_manager(Path::new("main.cpp")).unwrap();
        assert_eq!(manager.index_count(), 1);
        assert_eq!(manager.query("foo").len(), 1);
    }

    #[test]
    fn test_fixed_database_malformed_mapping_is_fatal() {
        let config = config_with(DatabaseSpec::Fixed {
            mapping: "justaname".to_string(),
        });
        let result = config.build_index_manager(Path::new("main.cpp"));
        assert!(matches!(result, Err(IndexError::MalformedMapping { .. })));
    }

    #[test]
    fn test_yaml_database_discovered_from_input_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(DB_FILE_NAME),
            "- name: foo\n  header: '\"foo.h\"'\n",
        )
        .unwrap();
        let source = dir.path().join("main.cpp");

        let config = config_with(DatabaseSpec::Yaml { path: None });
        let manager = config.build_index_manager(&source).unwrap();
        assert_eq!(manager.query("foo").len(), 1);
    }

    #[test]
    fn test_yaml_database_missing_everywhere_is_fatal() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("main.cpp");

        // No database anywhere up the ancestor chain of a temp dir.
        let config = config_with(DatabaseSpec::Yaml { path: None });
        let result = config.build_index_manager(&source);
        assert!(matches!(result, Err(IndexError::DatabaseNotFound { .. })));
    }

    #[test]
    fn test_yaml_database_explicit_path() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("custom.yaml");
        std::fs::write(&db, "- name: bar\n  header: '\"bar.h\"'\n").unwrap();

        let config = config_with(DatabaseSpec::Yaml {
            path: Some(db.clone()),
        });
        let manager = config.build_index_manager(Path::new("elsewhere.cpp")).unwrap();
        assert_eq!(manager.query("bar").len(), 1);
    }
}
