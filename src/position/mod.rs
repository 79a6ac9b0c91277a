//! Source positions and line/column translation.
//!
//! A [`Position`] names a point in a file by byte offset and by 1-based
//! line/column. The [`translate`] submodule turns a caller-supplied
//! line/column pair into the byte offset the resolver expects.

pub mod translate;

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

pub use translate::{translate_byte_offset, translate_byte_offset_checked};

/// A point in a named file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    /// File containing the position.
    pub filename: PathBuf,

    /// Byte offset from the start of the file (0-based).
    pub offset: usize,

    /// Line number (1-based).
    pub line: usize,

    /// Column number (1-based, in bytes).
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(filename: impl Into<PathBuf>, offset: usize, line: usize, column: usize) -> Self {
        Self {
            filename: filename.into(),
            offset,
            line,
            column,
        }
    }

    /// Byte offset of the first byte of the line containing this position.
    ///
    /// Saturates at zero for positions whose column is larger than their
    /// offset allows.
    pub fn line_start(&self) -> usize {
        self.offset.saturating_add(1).saturating_sub(self.column)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.filename.display(),
            self.line,
            self.column
        )
    }
}
