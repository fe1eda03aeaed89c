//! Edit application: disk mode and buffer mode

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::edit::replacement::{EditError, Replacement, check_replacements};

/// Splice sorted, verified replacements into `content`
fn splice(content: &str, replacements: &[Replacement]) -> String {
    let mut output = String::with_capacity(
        content.len() + replacements.iter().map(|r| r.text.len()).sum::<usize>(),
    );

    let mut cursor = 0;
    for replacement in replacements {
        output.push_str(&content[cursor..replacement.offset]);
        output.push_str(&replacement.text);
        cursor = replacement.end();
    }
    output.push_str(&content[cursor..]);
    output
}

/// Apply edits to an in-memory buffer and return the transformed text
///
/// Nothing touches the file system. An empty buffer with no edits is a no-op
/// success. Every byte outside the edited ranges is preserved exactly.
pub fn apply_to_buffer(content: &str, replacements: &[Replacement]) -> Result<String, EditError> {
    if replacements.is_empty() {
        return Ok(content.to_string());
    }

    let mut sorted = replacements.to_vec();
    check_replacements(&mut sorted, content.len())?;
    Ok(splice(content, &sorted))
}

/// Outcome of a disk-mode application
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Files rewritten successfully
    pub written: Vec<PathBuf>,
    /// Files whose edits could not be applied, with the failure
    pub failed: Vec<(PathBuf, EditError)>,
}

impl ApplyReport {
    /// True when every file with edits was rewritten
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Apply each file's edits in place and persist the result
///
/// Files are processed independently: one file's failure is recorded and the
/// remaining files are still rewritten. Files with an empty edit set are
/// skipped entirely.
pub fn apply_to_disk(edits_by_file: &BTreeMap<PathBuf, Vec<Replacement>>) -> ApplyReport {
    let mut report = ApplyReport::default();

    for (file, replacements) in edits_by_file {
        if replacements.is_empty() {
            continue;
        }
        match rewrite_file(file, replacements) {
            Ok(()) => {
                debug!("Rewrote {}", file.display());
                report.written.push(file.clone());
            }
            Err(e) => {
                error!("Failed to rewrite {}: {}", file.display(), e);
                report.failed.push((file.clone(), e));
            }
        }
    }

    report
}

fn rewrite_file(file: &Path, replacements: &[Replacement]) -> Result<(), EditError> {
    let content = std::fs::read_to_string(file).map_err(|e| EditError::ReadError {
        file: file.to_string_lossy().to_string(),
        error: e.to_string(),
    })?;

    let mut sorted = replacements.to_vec();
    check_replacements(&mut sorted, content.len())?;

    let output = splice(&content, &sorted);
    std::fs::write(file, output).map_err(|e| EditError::WriteError {
        file: file.to_string_lossy().to_string(),
        error: e.to_string(),
    })
}
