//! Parser for the fixed-layout CSV workout exports written by the Wahoo
//! Fitness app: session metadata, sensors, the workout summary, intervals
//! and per-sample measurements.

pub mod errors;
mod frame;
pub mod model;
pub mod options;
mod parser;
mod passes;
pub mod table;

pub use errors::{ParserError, Pass};
pub use model::{
    HeartRateStats, IntervalSample, Metadata, ParsedWorkout, Sensor, WorkoutInterval,
    WorkoutSummary, SAMPLE_FIELDS, WORKOUT_FIELDS,
};
pub use options::{CommentMode, ParseOptions};
pub use parser::{
    parse_workout_bytes, parse_workout_file, parse_workout_str, WorkoutParser, MIN_ROWS,
};
pub use table::RowTable;

#[cfg(test)]
mod tests;
