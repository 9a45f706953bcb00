use tracing::debug;

use crate::errors::{ParserError, Pass};
use crate::model::WorkoutSummary;
use crate::table::RowTable;

use super::common::Header;

const WORKOUT_HEADER_ROW: usize = 13;

pub(crate) fn extract_workout(
    table: &RowTable,
    strict: bool,
) -> Result<WorkoutSummary, ParserError> {
    let header = Header::read(table, Pass::Workout, WORKOUT_HEADER_ROW)?;
    let value_row = WORKOUT_HEADER_ROW + 1;
    let values = table.require_row(Pass::Workout, value_row)?;

    let mut summary = WorkoutSummary::new();
    for (name, value) in header.zip(Pass::Workout, value_row, values, strict)? {
        summary.insert(name, value);
    }

    debug!(
        fields = summary.len(),
        dynamic = summary.dynamic_fields().count(),
        "extracted workout summary"
    );
    Ok(summary)
}
