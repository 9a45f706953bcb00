use std::path::Path;

use tracing::debug;

use crate::errors::{ParserError, Pass};
use crate::model::ParsedWorkout;
use crate::options::ParseOptions;
use crate::passes::{
    extract_comments, extract_interval_samples, extract_intervals, extract_metadata,
    extract_sensors, extract_workout, INTERVAL_HEADER_ROW,
};
use crate::table::RowTable;

/// Rows 0 through the interval header must exist in every export.
pub const MIN_ROWS: usize = INTERVAL_HEADER_ROW + 1;

#[derive(Debug, Clone, Default)]
pub struct WorkoutParser {
    options: ParseOptions,
}

impl WorkoutParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn parse_str(&self, content: &str) -> Result<ParsedWorkout, ParserError> {
        self.parse_table(&RowTable::parse_str(content)?)
    }

    pub fn parse_bytes(&self, content: &[u8]) -> Result<ParsedWorkout, ParserError> {
        self.parse_table(&RowTable::parse_bytes(content)?)
    }

    pub fn parse_path(&self, path: &Path) -> Result<ParsedWorkout, ParserError> {
        debug!(path = %path.display(), "parsing workout export");
        self.parse_table(&RowTable::read_path(path)?)
    }

    /// Runs every extraction pass over `table`. The interval pass hands the
    /// offset of the sample header to the sample pass.
    pub fn parse_table(&self, table: &RowTable) -> Result<ParsedWorkout, ParserError> {
        if table.len() < MIN_ROWS {
            return Err(ParserError::malformed(
                Pass::Table,
                table.len(),
                format!(
                    "expected at least {MIN_ROWS} rows, found {}",
                    table.len()
                ),
            ));
        }

        let strict = self.options.strict_field_counts;

        let metadata = extract_metadata(table)?;
        let comments = extract_comments(table, self.options.comment_mode)?;
        let sensors = extract_sensors(table)?;
        let workout = extract_workout(table, strict)?;
        let section = extract_intervals(table, strict)?;
        let interval_samples = extract_interval_samples(table, section.next_offset, strict)?;

        Ok(ParsedWorkout::new(
            metadata,
            comments,
            sensors,
            workout,
            section.intervals,
            interval_samples,
        ))
    }
}

pub fn parse_workout_str(content: &str) -> Result<ParsedWorkout, ParserError> {
    WorkoutParser::new().parse_str(content)
}

pub fn parse_workout_bytes(content: &[u8]) -> Result<ParsedWorkout, ParserError> {
    WorkoutParser::new().parse_bytes(content)
}

pub fn parse_workout_file(path: impl AsRef<Path>) -> Result<ParsedWorkout, ParserError> {
    WorkoutParser::new().parse_path(path.as_ref())
}
