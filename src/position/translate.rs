//! Line/column to byte offset translation.
//!
//! The file is scanned one `\n`-terminated line at a time. The column is
//! added to the byte offset of the matched line's first byte without being
//! checked against the line's length, and it is a byte count: callers that
//! computed a character column on multi-byte text will land elsewhere.

use crate::error::{RefsError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Outcome of scanning a file for a line.
enum LineScan {
    /// Byte offset of the first byte of the requested line.
    Found(usize),
    /// The file ended first; carries the number of lines seen.
    PastEnd(usize),
}

/// Translate a 1-based line and column into a byte offset.
///
/// Returns the byte length of every preceding line (delimiters included)
/// plus `column`. A `line` past the end of the file yields `Ok(0)`; use
/// [`translate_byte_offset_checked`] to get an error instead.
///
/// # Errors
/// * [`RefsError::FileNotReadable`] if the file cannot be opened
/// * [`RefsError::Io`] if reading fails part way
/// * [`RefsError::ColumnOutOfRange`] if `column` overflows the offset
pub fn translate_byte_offset(path: &Path, line: usize, column: usize) -> Result<usize> {
    match scan_to_line(path, line)? {
        LineScan::Found(line_start) => add_column(path, line, line_start, column),
        LineScan::PastEnd(_) => Ok(0),
    }
}

/// Like [`translate_byte_offset`], but a `line` past the end of the file is
/// reported as [`RefsError::LineOutOfRange`].
pub fn translate_byte_offset_checked(path: &Path, line: usize, column: usize) -> Result<usize> {
    match scan_to_line(path, line)? {
        LineScan::Found(line_start) => add_column(path, line, line_start, column),
        LineScan::PastEnd(line_count) => Err(RefsError::LineOutOfRange {
            path: path.to_path_buf(),
            line,
            line_count,
        }),
    }
}

fn add_column(path: &Path, line: usize, line_start: usize, column: usize) -> Result<usize> {
    line_start
        .checked_add(column)
        .ok_or_else(|| RefsError::ColumnOutOfRange {
            path: path.to_path_buf(),
            line,
            column,
        })
}

fn scan_to_line(path: &Path, target_line: usize) -> Result<LineScan> {
    let file = File::open(path).map_err(|e| RefsError::not_readable(path, e))?;
    let mut reader = BufReader::new(file);

    let mut buf = Vec::new();
    let mut current_line = 0;
    let mut byte_offset = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| RefsError::io(path, e))?;
        if read == 0 {
            return Ok(LineScan::PastEnd(current_line));
        }

        current_line += 1;
        if current_line == target_line {
            return Ok(LineScan::Found(byte_offset));
        }
        byte_offset += read;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_source(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", contents).unwrap();
        temp_file
    }

    #[test]
    fn test_first_line_is_just_the_column() {
        let file = temp_source("x := 1\nfmt.Println(x)\n");
        assert_eq!(translate_byte_offset(file.path(), 1, 1).unwrap(), 1);
        assert_eq!(translate_byte_offset(file.path(), 1, 4).unwrap(), 4);
    }

    #[test]
    fn test_sums_preceding_lines_with_delimiters() {
        let lines = ["package main\n", "\n", "func main() {\n", "\tx := 1\n", "}\n"];
        let file = temp_source(&lines.concat());

        for (idx, _) in lines.iter().enumerate() {
            let preceding: usize = lines[..idx].iter().map(|l| l.len()).sum();
            for column in 1..=lines[idx].len() {
                assert_eq!(
                    translate_byte_offset(file.path(), idx + 1, column).unwrap(),
                    preceding + column,
                    "line {} column {}",
                    idx + 1,
                    column
                );
            }
        }
    }

    #[test]
    fn test_offsets_increase_with_line_number() {
        let file = temp_source("a\nbb\nccc\ndddd\n");
        let offsets: Vec<usize> = (1..=4)
            .map(|line| translate_byte_offset(file.path(), line, 1).unwrap())
            .collect();
        assert!(offsets.windows(2).all(|w| w[0] < w[1]), "{:?}", offsets);
    }

    #[test]
    fn test_last_line_without_newline() {
        let file = temp_source("one\ntwo");
        assert_eq!(translate_byte_offset(file.path(), 2, 2).unwrap(), 6);
    }

    #[test]
    fn test_column_counts_bytes_not_characters() {
        // "é" is two bytes, so line 2 starts at byte 3
        let file = temp_source("é\nb\n");
        assert_eq!(translate_byte_offset(file.path(), 2, 1).unwrap(), 4);
    }

    #[test]
    fn test_column_is_not_validated() {
        let file = temp_source("ab\ncd\n");
        assert_eq!(translate_byte_offset(file.path(), 1, 50).unwrap(), 50);
    }

    #[test]
    fn test_column_overflow_is_an_error() {
        let file = temp_source("ab\ncd\n");
        for result in [
            translate_byte_offset(file.path(), 2, usize::MAX),
            translate_byte_offset_checked(file.path(), 2, usize::MAX),
        ] {
            match result {
                Err(RefsError::ColumnOutOfRange { line, column, .. }) => {
                    assert_eq!(line, 2);
                    assert_eq!(column, usize::MAX);
                }
                other => panic!("expected ColumnOutOfRange, got {:?}", other),
            }
        }
        // Line 1 starts at 0, so the largest column still fits
        assert_eq!(
            translate_byte_offset(file.path(), 1, usize::MAX).unwrap(),
            usize::MAX
        );
    }

    #[test]
    fn test_line_past_end_falls_back_to_zero() {
        let file = temp_source("x := 1\nfmt.Println(x)\n");
        assert_eq!(translate_byte_offset(file.path(), 3, 1).unwrap(), 0);
        assert_eq!(translate_byte_offset(file.path(), 0, 1).unwrap(), 0);
    }

    #[test]
    fn test_checked_reports_line_past_end() {
        let file = temp_source("x := 1\nfmt.Println(x)\n");
        match translate_byte_offset_checked(file.path(), 3, 1) {
            Err(RefsError::LineOutOfRange {
                line, line_count, ..
            }) => {
                assert_eq!(line, 3);
                assert_eq!(line_count, 2);
            }
            other => panic!("expected LineOutOfRange, got {:?}", other),
        }
        assert_eq!(
            translate_byte_offset_checked(file.path(), 2, 13).unwrap(),
            20
        );
    }

    #[test]
    fn test_empty_file() {
        let file = temp_source("");
        assert_eq!(translate_byte_offset(file.path(), 1, 1).unwrap(), 0);
        assert!(translate_byte_offset_checked(file.path(), 1, 1).is_err());
    }

    #[test]
    fn test_missing_file_is_not_readable() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("missing.go");
        match translate_byte_offset(&missing, 1, 1) {
            Err(RefsError::FileNotReadable { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected FileNotReadable, got {:?}", other),
        }
    }
}
