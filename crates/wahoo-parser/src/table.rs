use std::fs;
use std::path::Path;

use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::errors::{ParserError, Pass};

const UTF8_BOM: char = '\u{feff}';

/// Ordered grid of raw CSV cells. Rows keep their original 0-based positions,
/// including rows produced by empty lines, which carry no cells at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowTable {
    rows: Vec<Vec<String>>,
}

impl RowTable {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Decodes comma-separated text. Empty lines become zero-cell rows so
    /// that blank-row terminators survive decoding.
    pub fn parse_str(content: &str) -> Result<Self, ParserError> {
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut rows = Vec::new();
        let mut record = StringRecord::new();
        let mut consumed = 0usize;

        loop {
            let found = reader.read_record(&mut record).map_err(|source| ParserError::Csv {
                line_index: source.position().map_or(0, |pos| pos.line() as usize),
                source,
            })?;

            // The reader skips empty lines; they sit between the end of the
            // previous record and the start of this one.
            let end = if found {
                reader.position().byte() as usize
            } else {
                content.len()
            };
            rows.extend((0..skipped_line_breaks(content, consumed, end)).map(|_| Vec::new()));

            if !found {
                break;
            }
            rows.push(record.iter().map(str::to_string).collect());
            consumed = end;
        }

        Ok(Self { rows })
    }

    pub fn parse_bytes(content: &[u8]) -> Result<Self, ParserError> {
        let text = std::str::from_utf8(content).map_err(|source| ParserError::Encoding { source })?;
        Self::parse_str(text)
    }

    pub fn read_path(path: &Path) -> Result<Self, ParserError> {
        let bytes = fs::read(path).map_err(|source| ParserError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_bytes(&bytes)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }

    /// True when the row exists and holds no non-whitespace cell.
    pub fn is_blank_row(&self, index: usize) -> bool {
        self.row(index).is_some_and(is_blank)
    }

    pub(crate) fn require_row(&self, pass: Pass, index: usize) -> Result<&[String], ParserError> {
        self.row(index).ok_or_else(|| {
            ParserError::malformed(
                pass,
                index,
                format!("expected row {index} but the table has {} rows", self.len()),
            )
        })
    }

    pub(crate) fn require_header(
        &self,
        pass: Pass,
        index: usize,
    ) -> Result<&[String], ParserError> {
        let row = self.require_row(pass, index)?;
        if is_blank(row) {
            return Err(ParserError::malformed(pass, index, "header row is blank"));
        }
        Ok(row)
    }
}

pub(crate) fn is_blank(cells: &[String]) -> bool {
    cells.iter().all(|cell| cell.trim().is_empty())
}

/// Counts the empty lines at the start of `content[start..end]`. A `\n`
/// completing the `\r\n` terminator of the previous record is not one.
fn skipped_line_breaks(content: &str, start: usize, end: usize) -> usize {
    let bytes = content.as_bytes();
    let mut idx = start;
    if idx > 0 && bytes.get(idx) == Some(&b'\n') && bytes[idx - 1] == b'\r' {
        idx += 1;
    }

    let mut breaks = 0;
    while idx < end {
        match bytes[idx] {
            b'\r' if bytes.get(idx + 1) == Some(&b'\n') => idx += 2,
            b'\r' | b'\n' => idx += 1,
            _ => break,
        }
        breaks += 1;
    }
    breaks
}
