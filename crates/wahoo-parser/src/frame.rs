use polars::prelude::*;

use crate::errors::ParserError;
use crate::model::{parse_cell_f64, IntervalSample, ParsedWorkout, SAMPLE_FIELDS};

impl ParsedWorkout {
    /// Sample table as a DataFrame: `interval` as text, `paused` as a boolean
    /// and every other known column as nullable `f64`.
    pub fn samples_frame(&self) -> Result<DataFrame, ParserError> {
        build_samples_frame(self.interval_samples())
    }
}

fn build_samples_frame(samples: &[IntervalSample]) -> Result<DataFrame, ParserError> {
    let mut columns: Vec<Column> = Vec::with_capacity(SAMPLE_FIELDS.len());

    for name in SAMPLE_FIELDS {
        let series = match name {
            "interval" => {
                let values: Vec<Option<&str>> = samples
                    .iter()
                    .map(|sample| Some(sample.interval.as_str()).filter(|v| !v.is_empty()))
                    .collect();
                Series::new(name.into(), values)
            }
            "paused" => {
                let values: Vec<bool> = samples.iter().map(IntervalSample::is_paused).collect();
                Series::new(name.into(), values)
            }
            _ => {
                let values: Vec<Option<f64>> = samples
                    .iter()
                    .map(|sample| sample.field(name).and_then(parse_cell_f64))
                    .collect();
                Series::new(name.into(), values)
            }
        };
        columns.push(series.into());
    }

    DataFrame::new(columns).map_err(|err| ParserError::Frame {
        message: err.to_string(),
    })
}
