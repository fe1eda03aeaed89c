//! Replacement value type and internal-consistency checks

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("Overlapping edits in {file}: [{first_start}, {first_end}) and [{second_start}, {second_end})")]
    Overlap {
        file: String,
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },

    #[error("Edit range [{start}, {end}) exceeds content length {len} in {file}")]
    OutOfBounds {
        file: String,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("Failed to read {file}: {error}")]
    ReadError { file: String, error: String },

    #[error("Failed to write {file}: {error}")]
    WriteError { file: String, error: String },
}

/// A half-open text replacement
///
/// `length` 0 makes this a pure insertion at `offset`. Offsets are byte
/// positions into the target's current content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// File the edit targets
    pub file: PathBuf,

    /// Byte offset where the replaced range starts
    pub offset: usize,

    /// Length of the replaced range in bytes
    pub length: usize,

    /// Text spliced in place of the range
    pub text: String,
}

impl Replacement {
    pub fn new(file: impl Into<PathBuf>, offset: usize, length: usize, text: String) -> Self {
        Self {
            file: file.into(),
            offset,
            length,
            text,
        }
    }

    /// Pure insertion at `offset`
    pub fn insertion(file: impl Into<PathBuf>, offset: usize, text: String) -> Self {
        Self::new(file, offset, 0, text)
    }

    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Sort replacements by offset and verify they fit `content_len` without
/// overlapping
///
/// Overlap is a logic error in upstream edit generation, not a runtime input
/// condition; it aborts application for the affected file. Two pure
/// insertions at the same offset count as overlapping (their relative order
/// would be unspecified); an insertion at the start of a replaced range is
/// fine and applies before it.
pub fn check_replacements(
    replacements: &mut Vec<Replacement>,
    content_len: usize,
) -> Result<(), EditError> {
    replacements.sort_by_key(|r| (r.offset, r.end()));

    for pair in replacements.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.offset < prev.end() || (next.offset == prev.offset && next.length == 0) {
            return Err(EditError::Overlap {
                file: prev.file.to_string_lossy().to_string(),
                first_start: prev.offset,
                first_end: prev.end(),
                second_start: next.offset,
                second_end: next.end(),
            });
        }
    }

    if let Some(last) = replacements.last()
        && last.end() > content_len
    {
        return Err(EditError::OutOfBounds {
            file: last.file.to_string_lossy().to_string(),
            start: last.offset,
            end: last.end(),
            len: content_len,
        });
    }

    Ok(())
}
