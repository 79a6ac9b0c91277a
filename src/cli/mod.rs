//! Command-line interface for identrefs.
//!
//! This module handles argument parsing only. Turning the parsed flags into
//! a [`Config`] is the one decision made here: which position form was
//! given, and whether enough was given to run at all.

use crate::query::{default_root, Config, Target};
use crate::stream::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// identrefs: find an identifier's definition and stream its references.
#[derive(Parser, Debug)]
#[command(name = "identrefs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Byte offset of the identifier in the file.
    #[arg(long, value_name = "N")]
    pub offset: Option<usize>,

    /// Line number of the identifier in the file (1-based).
    #[arg(long, value_name = "N")]
    pub line: Option<usize>,

    /// Column of the identifier in the file (1-based, in bytes).
    #[arg(long, value_name = "N")]
    pub column: Option<usize>,

    /// File containing the identifier.
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Directory to search for references (defaults to the file's directory).
    #[arg(short, long, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Print the identifier's name and definition position first.
    #[arg(long)]
    pub ident: bool,

    /// Emit one JSON object per result instead of plain text.
    #[arg(long)]
    pub json: bool,

    /// Number of search worker threads.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Only search files directly inside the root directory.
    #[arg(long)]
    pub no_recursive: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the query configuration.
    ///
    /// Returns `None` when there is nothing to run: no file, or neither an
    /// offset nor a full line/column pair. Line/column wins over offset when
    /// both are present.
    pub fn to_config(&self) -> Option<Config> {
        let file = self.file.clone()?;
        let target = match (self.line, self.column, self.offset) {
            (Some(line), Some(column), _) => Target::LineColumn { line, column },
            (_, _, Some(offset)) => Target::Offset(offset),
            _ => return None,
        };

        let mut config = Config::new(file, target);
        config.root = self
            .root
            .clone()
            .unwrap_or_else(|| default_root(&config.file));
        config.show_ident = self.ident;
        config.recursive = !self.no_recursive;
        config.format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };
        if let Some(jobs) = self.jobs {
            config.jobs = jobs.max(1);
        }

        Some(config)
    }
}

/// Parse command-line arguments.
///
/// This function is the entry point for CLI argument parsing.
/// It returns the parsed Cli struct or exits on error.
pub fn parse_args() -> Cli {
    Cli::parse()
}
