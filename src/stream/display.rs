//! Console output for merged search results.
//!
//! Each reference is printed with the source line it sits on. The line is
//! re-read from disk per reference: open, seek to the line start, read up to
//! the next `\n`. Failures there are reported like any other search error,
//! and the reference is still printed with an empty context.

use crate::error::{RefsError, Result};
use crate::position::Position;
use crate::resolve::{Identifier, Reference};
use crate::stream::ReportSink;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};

/// How results are written to the output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `position` line followed by the source line.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Read the source line containing `position`, without its line ending.
pub fn read_context_line(position: &Position) -> Result<String> {
    let path = &position.filename;
    let mut file = File::open(path).map_err(|e| RefsError::not_readable(path, e))?;
    file.seek(SeekFrom::Start(position.line_start() as u64))
        .map_err(|e| RefsError::io(path, e))?;

    let mut line = Vec::new();
    BufReader::new(file)
        .read_until(b'\n', &mut line)
        .map_err(|e| RefsError::io(path, e))?;

    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }

    Ok(String::from_utf8_lossy(&line).into_owned())
}

/// JSON record written per result in [`OutputFormat::Json`].
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum JsonRecord<'a> {
    Identifier {
        name: &'a str,
        position: &'a Position,
    },
    Reference {
        position: &'a Position,
        context: Option<&'a str>,
    },
}

/// Writes results to `out` and errors to `err`.
///
/// Errors are written as `error: <message>` so `out` carries results only.
pub struct ConsoleSink<W: Write, E: Write> {
    out: W,
    err: E,
    format: OutputFormat,
}

impl<W: Write, E: Write> ConsoleSink<W, E> {
    /// Create a sink over the given writers.
    pub fn new(out: W, err: E, format: OutputFormat) -> Self {
        Self { out, err, format }
    }

    /// Give back the underlying writers.
    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }

    fn write_record(&mut self, record: &JsonRecord<'_>) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        writeln!(self.out)
    }

    fn write_reference(
        &mut self,
        position: &Position,
        context: Option<&str>,
    ) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "{}", position)?;
                writeln!(self.out, "{}", context.unwrap_or_default())
            }
            OutputFormat::Json => self.write_record(&JsonRecord::Reference { position, context }),
        }
    }
}

impl<W: Write, E: Write> ReportSink for ConsoleSink<W, E> {
    fn identifier(&mut self, ident: &Identifier) {
        let written = match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", ident),
            OutputFormat::Json => self.write_record(&JsonRecord::Identifier {
                name: &ident.name,
                position: &ident.position,
            }),
        };
        if let Err(e) = written {
            log::warn!("Failed to write identifier: {}", e);
        }
    }

    fn reference(&mut self, reference: Reference) {
        let context = match read_context_line(&reference.position) {
            Ok(line) => Some(line),
            Err(e) => {
                self.error(e);
                None
            }
        };
        if let Err(e) = self.write_reference(&reference.position, context.as_deref()) {
            log::warn!("Failed to write reference {}: {}", reference.position, e);
        }
    }

    fn error(&mut self, error: RefsError) {
        if let Err(e) = writeln!(self.err, "error: {}", error) {
            log::warn!("Failed to write error: {}", e);
        }
    }
}
