//! End-to-end reference query.
//!
//! A query is: resolve the cursor to a byte offset, look up the identifier
//! there, start the reference search, and merge its streams into a sink.
//! Translation and lookup failures end the query; once streaming starts,
//! errors are reported one by one and never stop it.

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::position::translate_byte_offset_checked;
use crate::resolve::Resolver;
use crate::stream::{merge_streams, MergeSummary, OutputFormat, ReportSink};
use std::path::{Path, PathBuf};

/// Where in the file the identifier is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Byte offset into the file.
    Offset(usize),
    /// 1-based line and 1-based byte column.
    LineColumn {
        /// Line number.
        line: usize,
        /// Column number, in bytes.
        column: usize,
    },
}

/// Immutable settings for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// File containing the identifier.
    pub file: PathBuf,
    /// Position of the identifier in `file`.
    pub target: Target,
    /// Directory to search for references.
    pub root: PathBuf,
    /// Emit the resolved identifier before its references.
    pub show_ident: bool,
    /// Descend into subdirectories of `root`.
    pub recursive: bool,
    /// Output format for results.
    pub format: OutputFormat,
    /// Search worker threads.
    pub jobs: usize,
}

impl Config {
    /// Configuration with defaults: root is the file's directory, recursive,
    /// text output, one worker per available core.
    pub fn new(file: impl Into<PathBuf>, target: Target) -> Self {
        let file = file.into();
        let root = default_root(&file);
        Self {
            file,
            target,
            root,
            show_ident: false,
            recursive: true,
            format: OutputFormat::Text,
            jobs: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

/// Directory containing `file`, or `.` for a bare file name.
pub fn default_root(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Byte offset of the configured target.
pub fn resolve_offset(config: &Config) -> Result<usize> {
    match config.target {
        Target::Offset(offset) => Ok(offset),
        Target::LineColumn { line, column } => {
            translate_byte_offset_checked(&config.file, line, column)
        }
    }
}

/// Run one query, streaming results into `sink`.
///
/// # Errors
/// Returns the translation or lookup error that prevented the search from
/// starting. Errors during the search go to `sink` instead.
pub fn run_query<R, S>(
    config: &Config,
    resolver: &R,
    sink: &mut S,
    cancel: &CancelToken,
) -> Result<MergeSummary>
where
    R: Resolver + ?Sized,
    S: ReportSink + ?Sized,
{
    let offset = resolve_offset(config)?;
    let ident = resolver.lookup(&config.file, offset)?;

    if config.show_ident {
        sink.identifier(&ident);
    }

    let streams = resolver.find_references(&ident, &config.root, config.recursive, cancel);
    let summary = merge_streams(streams, cancel, sink);

    log::info!(
        "Query for '{}' finished: {} references, {} errors",
        ident.name,
        summary.references,
        summary.errors
    );

    Ok(summary)
}
