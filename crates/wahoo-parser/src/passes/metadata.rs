use tracing::debug;

use crate::errors::{ParserError, Pass};
use crate::model::Metadata;
use crate::table::RowTable;

use super::common::split_alpha_numeric;

/// (row, column) of every metadata label. The value sits one column right.
const LABEL_CELLS: [(usize, usize); 11] = [
    (0, 0),
    (0, 2),
    (0, 4),
    (0, 6),
    (1, 0),
    (1, 2),
    (1, 4),
    (1, 6),
    (1, 8),
    (1, 10),
    (1, 12),
];

pub(crate) fn extract_metadata(table: &RowTable) -> Result<Metadata, ParserError> {
    table.require_row(Pass::Metadata, 0)?;
    table.require_row(Pass::Metadata, 1)?;

    let mut metadata = Metadata::new();
    let mut repaired = Metadata::new();

    for (row, column) in LABEL_CELLS {
        let Some(label) = table
            .cell(row, column)
            .map(str::trim)
            .filter(|label| !label.is_empty())
        else {
            continue;
        };
        let Some(value) = table.cell(row, column + 1).map(str::trim) else {
            continue;
        };

        match repair_merged_label(label, value) {
            Some(pairs) => {
                debug!(label, value, "repairing merged date/time label");
                repaired.extend(pairs);
            }
            None => {
                metadata.insert(label.to_string(), value.to_string());
            }
        }
    }

    metadata.extend(repaired);
    debug!(entries = metadata.len(), "extracted metadata");
    Ok(metadata)
}

/// Some 5.5.x exports shift the date/time cells so that a label carries the
/// previous number (`Day23`) and the value carries the next label (`Hou14`).
/// Returns the corrected pairs, or `None` when the label is already clean.
fn repair_merged_label(label: &str, value: &str) -> Option<Vec<(String, String)>> {
    let fallback_value_label = if label.contains("Day") {
        "Hour"
    } else if label.contains("Minu") {
        "Second"
    } else {
        return None;
    };

    let (base, digits) = split_alpha_numeric(label);
    let digits = digits?;
    if base.is_empty() {
        return None;
    }

    let mut pairs = vec![(base.to_string(), digits.to_string())];

    if let (value_base, Some(value_digits)) = split_alpha_numeric(value) {
        let value_label = if value_base.is_empty() {
            fallback_value_label
        } else {
            value_base
        };
        pairs.push((value_label.to_string(), value_digits.to_string()));
    }

    Some(pairs)
}
