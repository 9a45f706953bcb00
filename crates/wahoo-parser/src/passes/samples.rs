use tracing::{debug, warn};

use crate::errors::{ParserError, Pass};
use crate::model::{IntervalSample, SAMPLE_FIELDS};
use crate::table::RowTable;

use super::common::{read_until_blank, Header};

/// Reads the sample table whose header sits at `header_row`. Rows after the
/// first blank row are ignored.
pub(crate) fn extract_interval_samples(
    table: &RowTable,
    header_row: usize,
    strict: bool,
) -> Result<Vec<IntervalSample>, ParserError> {
    let header = Header::read(table, Pass::IntervalSamples, header_row)?;

    for name in header
        .names
        .iter()
        .filter(|name| !name.is_empty() && !SAMPLE_FIELDS.contains(&name.as_str()))
    {
        warn!(column = name.as_str(), "unknown sample column kept as extra field");
    }

    let section = read_until_blank(table, header_row + 1, |row_index, row| {
        let mut sample = IntervalSample::default();
        for (name, value) in header.zip(Pass::IntervalSamples, row_index, row, strict)? {
            sample.set(&name, value);
        }
        Ok(sample)
    })?;

    debug!(
        samples = section.records.len(),
        terminated = section.next_offset.is_some(),
        "extracted interval samples"
    );
    Ok(section.records)
}
