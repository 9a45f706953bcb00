use std::collections::HashSet;

use tracing::warn;

use crate::errors::{ParserError, Pass};
use crate::table::{is_blank, RowTable};

/// Lower snake_case form of a header cell: `StartTime` -> `start_time`,
/// `MA_SmoothnessX` -> `ma_smoothness_x`, `Avg Speed` -> `avg_speed`.
pub(crate) fn normalize_header(raw: &str) -> String {
    let chars: Vec<char> = raw.trim().chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);

    for (idx, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && idx > 0 {
            let prev = chars[idx - 1];
            let next_is_lower = chars.get(idx + 1).is_some_and(|c| c.is_lowercase());
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }

        if ch == '-' || ch.is_whitespace() {
            if !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        out.extend(ch.to_lowercase());
    }

    out
}

/// A normalised header row. Empty header cells are kept as empty names so
/// positions stay aligned with the data rows.
#[derive(Debug, Clone)]
pub(crate) struct Header {
    pub row_index: usize,
    pub names: Vec<String>,
}

impl Header {
    pub fn read(table: &RowTable, pass: Pass, row_index: usize) -> Result<Self, ParserError> {
        let row = table.require_header(pass, row_index)?;
        let names: Vec<String> = row.iter().map(|cell| normalize_header(cell)).collect();

        let mut seen = HashSet::new();
        for name in names.iter().filter(|name| !name.is_empty()) {
            if !seen.insert(name.as_str()) {
                return Err(ParserError::DuplicateField {
                    pass,
                    row_index,
                    field: name.clone(),
                });
            }
        }

        Ok(Self { row_index, names })
    }

    /// Pairs every named column with the cell at the same position in `row`.
    pub fn zip(
        &self,
        pass: Pass,
        row_index: usize,
        row: &[String],
        strict: bool,
    ) -> Result<Vec<(String, String)>, ParserError> {
        if row.len() != self.names.len() {
            if strict {
                return Err(ParserError::FieldCountMismatch {
                    pass,
                    row_index,
                    expected: self.names.len(),
                    found: row.len(),
                });
            }
            warn!(
                pass = pass.as_str(),
                row_index,
                expected = self.names.len(),
                found = row.len(),
                "cell count differs from header; padding or truncating"
            );
        }

        let mut pairs = Vec::with_capacity(self.names.len());
        for (column, name) in self.names.iter().enumerate() {
            let value = row.get(column).map(String::as_str).unwrap_or_default();
            if name.is_empty() {
                if value.trim().is_empty() {
                    continue;
                }
                return Err(ParserError::malformed(
                    pass,
                    row_index,
                    format!("value '{value}' in column {column} has no header"),
                ));
            }
            pairs.push((name.clone(), value.to_string()));
        }

        Ok(pairs)
    }
}

/// Result of walking data rows below a header until a blank row.
#[derive(Debug)]
pub(crate) struct Section<T> {
    pub records: Vec<T>,
    /// Index of the row just past the terminating blank row, if one was found.
    pub next_offset: Option<usize>,
}

/// Walks rows from `first_row` until a blank row or the end of the table,
/// handing each data row to `build`.
pub(crate) fn read_until_blank<T, F>(
    table: &RowTable,
    first_row: usize,
    mut build: F,
) -> Result<Section<T>, ParserError>
where
    F: FnMut(usize, &[String]) -> Result<T, ParserError>,
{
    let mut records = Vec::new();

    for (offset, row) in table.rows().iter().enumerate().skip(first_row) {
        if is_blank(row) {
            return Ok(Section {
                records,
                next_offset: Some(offset + 1),
            });
        }
        records.push(build(offset, row)?);
    }

    Ok(Section {
        records,
        next_offset: None,
    })
}

/// Splits `Day23` into `("Day", Some("23"))`: the text before the first
/// digit and the first run of digits.
pub(crate) fn split_alpha_numeric(value: &str) -> (&str, Option<&str>) {
    let trimmed = value.trim();
    let Some(start) = trimmed.find(|c: char| c.is_ascii_digit()) else {
        return (trimmed, None);
    };
    let rest = &trimmed[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    (trimmed[..start].trim_end(), Some(&rest[..end]))
}
