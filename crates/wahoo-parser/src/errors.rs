use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The extraction pass that was running when a parse failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    Table,
    Metadata,
    Comments,
    Sensors,
    Workout,
    Intervals,
    IntervalSamples,
}

impl Pass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pass::Table => "table",
            Pass::Metadata => "metadata",
            Pass::Comments => "comments",
            Pass::Sensors => "sensors",
            Pass::Workout => "workout",
            Pass::Intervals => "intervals",
            Pass::IntervalSamples => "interval_samples",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("{pass} pass: malformed input at row {row_index}: {message}")]
    MalformedInput {
        pass: Pass,
        row_index: usize,
        message: String,
    },

    #[error("{pass} pass: row {row_index} has {found} cells but the header has {expected}")]
    FieldCountMismatch {
        pass: Pass,
        row_index: usize,
        expected: usize,
        found: usize,
    },

    #[error("{pass} pass: header row {row_index} repeats field '{field}'")]
    DuplicateField {
        pass: Pass,
        row_index: usize,
        field: String,
    },

    #[error("CSV error on line {line_index}: {source}")]
    Csv {
        line_index: usize,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input is not valid UTF-8: {source}")]
    Encoding {
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("invalid parser configuration: {message}")]
    Config { message: String },

    #[error("failed to build sample frame: {message}")]
    Frame { message: String },
}

impl ParserError {
    pub(crate) fn malformed(pass: Pass, row_index: usize, message: impl Into<String>) -> Self {
        ParserError::MalformedInput {
            pass,
            row_index,
            message: message.into(),
        }
    }

    /// The pass that failed, when the error came from an extraction pass.
    pub fn pass(&self) -> Option<Pass> {
        match self {
            ParserError::MalformedInput { pass, .. }
            | ParserError::FieldCountMismatch { pass, .. }
            | ParserError::DuplicateField { pass, .. } => Some(*pass),
            _ => None,
        }
    }

    /// Row offset (0-based) the failing pass was looking at.
    pub fn row_index(&self) -> Option<usize> {
        match self {
            ParserError::MalformedInput { row_index, .. }
            | ParserError::FieldCountMismatch { row_index, .. }
            | ParserError::DuplicateField { row_index, .. } => Some(*row_index),
            _ => None,
        }
    }
}
