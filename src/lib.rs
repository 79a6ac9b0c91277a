//! identrefs: find an identifier's definition and stream its references.
//!
//! This library turns a cursor position into a byte offset, resolves the
//! identifier there, and merges the resolver's reference and error streams
//! into a single report as results arrive.

#![warn(missing_docs)]
// env_logger is used by src/main.rs (binary), not this library
#![expect(unused_crate_dependencies)]

pub mod cancel;
pub mod cli;
pub mod error;
pub mod ingest;
pub mod position;
pub mod query;
pub mod resolve;
pub mod stream;

/// Re-export common error types for convenience.
pub use error::{RefsError, Result};

/// Re-export the core types for convenience.
pub use cancel::CancelToken;
pub use position::Position;
pub use query::{run_query, Config, Target};
pub use resolve::{Identifier, Reference, ReferenceStreams, Resolver, TreeSitterResolver};
pub use stream::{merge_streams, ConsoleSink, MergeSummary, OutputFormat, ReportSink};

/// identrefs version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
