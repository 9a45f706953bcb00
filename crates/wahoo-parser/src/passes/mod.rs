mod comments;
mod common;
mod intervals;
mod metadata;
mod samples;
mod sensors;
mod workout;

pub(crate) use comments::extract_comments;
pub(crate) use intervals::{extract_intervals, INTERVAL_HEADER_ROW};
pub(crate) use metadata::extract_metadata;
pub(crate) use samples::extract_interval_samples;
pub(crate) use sensors::extract_sensors;
pub(crate) use workout::extract_workout;

#[cfg(test)]
pub(crate) use common::{normalize_header, split_alpha_numeric};
