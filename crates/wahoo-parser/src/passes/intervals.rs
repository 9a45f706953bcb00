use tracing::debug;

use crate::errors::{ParserError, Pass};
use crate::model::{WorkoutInterval, WorkoutSummary};
use crate::table::RowTable;

use super::common::{read_until_blank, Header};

pub(crate) const INTERVAL_HEADER_ROW: usize = 16;

/// Intervals plus the index of the row that follows their terminating blank
/// row, where the sample table header lives.
#[derive(Debug)]
pub(crate) struct IntervalSection {
    pub intervals: Vec<WorkoutInterval>,
    pub next_offset: usize,
}

pub(crate) fn extract_intervals(
    table: &RowTable,
    strict: bool,
) -> Result<IntervalSection, ParserError> {
    let header = Header::read(table, Pass::Intervals, INTERVAL_HEADER_ROW)?;
    let mut last_interval: Option<String> = None;

    let section = read_until_blank(table, header.row_index + 1, |row_index, row| {
        let mut summary = WorkoutSummary::new();
        for (name, value) in header.zip(Pass::Intervals, row_index, row, strict)? {
            summary.insert(name, value);
        }

        let current = summary.get("interval").map(str::to_string);
        let is_subinterval = matches!(
            (&last_interval, &current),
            (Some(previous), Some(label)) if previous == label
        );
        last_interval = current;

        Ok(WorkoutInterval {
            summary,
            is_subinterval,
        })
    })?;

    let next_offset = section.next_offset.ok_or_else(|| {
        ParserError::malformed(
            Pass::Intervals,
            table.len(),
            "interval list is not terminated by a blank row",
        )
    })?;

    debug!(
        intervals = section.records.len(),
        next_offset, "extracted intervals"
    );
    Ok(IntervalSection {
        intervals: section.records,
        next_offset,
    })
}
