//! identrefs error types.
//!
//! All errors are typed and provide root cause information.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for identrefs operations.
///
/// The same type travels on the search error channel: once streaming has
/// started, every value of this type is reported and the search continues.
#[derive(Error, Debug)]
pub enum RefsError {
    /// The file could not be opened for reading.
    #[error("cannot open {path}: {source}")]
    FileNotReadable {
        /// The file that could not be opened.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// I/O error while reading or seeking an open file.
    #[error("I/O error for path {path}: {source}")]
    Io {
        /// The file path that caused the I/O error.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Requested line is past the end of the file.
    #[error("line {line} is out of range for {path} ({line_count} lines)")]
    LineOutOfRange {
        /// The file being translated.
        path: PathBuf,
        /// The requested 1-based line.
        line: usize,
        /// Number of lines the file actually has.
        line_count: usize,
    },

    /// Requested column does not fit in a byte offset on that line.
    #[error("column {column} on line {line} is out of range for {path}")]
    ColumnOutOfRange {
        /// The file being translated.
        path: PathBuf,
        /// The requested 1-based line.
        line: usize,
        /// The requested column.
        column: usize,
    },

    /// No grammar is registered for the file's extension.
    #[error("unsupported language for {path}")]
    UnsupportedLanguage {
        /// The file whose language could not be detected.
        path: PathBuf,
    },

    /// Tree-sitter parsing error.
    #[error("Parse error in {file}: {message}")]
    Parse {
        /// The file that failed to parse.
        file: PathBuf,
        /// The parse error message.
        message: String,
    },

    /// No identifier covers the requested offset.
    #[error("no identifier found at offset {offset} in {file}")]
    IdentifierNotFound {
        /// The file that was searched.
        file: PathBuf,
        /// The byte offset that was looked up.
        offset: usize,
    },

    /// Directory traversal error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// UTF-8 validation error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Generic error with context.
    #[error("{0}")]
    Other(String),
}

impl RefsError {
    /// Build an [`RefsError::Io`] for `path`.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        RefsError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Build a [`RefsError::FileNotReadable`] for `path`.
    pub fn not_readable(path: &Path, source: std::io::Error) -> Self {
        RefsError::FileNotReadable {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The file this error is about, when there is one.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            RefsError::FileNotReadable { path, .. }
            | RefsError::Io { path, .. }
            | RefsError::LineOutOfRange { path, .. }
            | RefsError::ColumnOutOfRange { path, .. }
            | RefsError::UnsupportedLanguage { path } => Some(path),
            RefsError::Parse { file, .. } | RefsError::IdentifierNotFound { file, .. } => {
                Some(file)
            }
            RefsError::Walk(err) => err.path(),
            RefsError::Utf8(_) | RefsError::Other(_) => None,
        }
    }
}

impl From<std::io::Error> for RefsError {
    fn from(err: std::io::Error) -> Self {
        RefsError::Io {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

/// Result type alias for identrefs operations.
pub type Result<T> = std::result::Result<T, RefsError>;
