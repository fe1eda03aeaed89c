//! Unresolved-symbol signals from the semantic front-end
//!
//! The front-end that decides *which* identifiers lack a visible declaration
//! is an external collaborator. Its findings reach this tool as a JSON file:
//! one entry per translation unit, each carrying the occurrences with byte
//! offsets valid for the unit's current content.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("Unresolved-symbol file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read unresolved-symbol file: {error}")]
    ReadError { error: String },

    #[error("Failed to parse unresolved-symbol JSON: {error}")]
    ParseError { error: String },

    #[error("Unresolved-symbol entry has an empty name in {file}")]
    EmptySymbolName { file: String },
}

/// One use of an identifier with no visible declaration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UnresolvedSymbol {
    /// Identifier as spelled at the use site
    pub name: String,

    /// Byte offset of the identifier in the unit's main file
    pub offset: usize,

    /// Spelled length in bytes; 0 when the range is unknown, which
    /// suppresses qualification edits for this occurrence
    #[serde(default)]
    pub length: usize,

    /// Template-argument count observed at the use site, when the front-end
    /// could tell
    #[serde(default)]
    pub template_args: Option<u32>,
}

/// All unresolved occurrences of one translation unit
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationUnitSignals {
    /// Main file of the translation unit
    pub file: PathBuf,

    /// Occurrences, in front-end order
    pub symbols: Vec<UnresolvedSymbol>,
}

/// Load front-end signals from a JSON file
///
/// A missing or malformed file is an analysis failure for the whole run;
/// callers abort before generating any edit.
pub fn load_signals(path: &Path) -> Result<Vec<TranslationUnitSignals>, SignalError> {
    if !path.exists() {
        return Err(SignalError::FileNotFound {
            path: path.to_string_lossy().to_string(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| SignalError::ReadError {
        error: e.to_string(),
    })?;

    let reader = std::io::BufReader::new(file);
    let units: Vec<TranslationUnitSignals> =
        serde_json::from_reader(reader).map_err(|e| SignalError::ParseError {
            error: e.to_string(),
        })?;

    for unit in &units {
        if unit.symbols.iter().any(|s| s.name.is_empty()) {
            return Err(SignalError::EmptySymbolName {
                file: unit.file.to_string_lossy().to_string(),
            });
        }
    }

    Ok(units)
}
