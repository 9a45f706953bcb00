use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ParserError;

/// How the free-text comment row is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentMode {
    /// Only the first cell of the comment row.
    #[default]
    FirstCell,
    /// Every non-empty cell of the comment row, joined with commas. Older
    /// exports split commas in the comment across cells.
    WholeRow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    pub comment_mode: CommentMode,
    /// Reject data rows whose cell count differs from their header row.
    /// When disabled, missing cells read as empty and surplus cells are dropped.
    pub strict_field_counts: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            comment_mode: CommentMode::FirstCell,
            strict_field_counts: true,
        }
    }
}

impl ParseOptions {
    pub fn from_toml_str(content: &str) -> Result<Self, ParserError> {
        toml::from_str(content).map_err(|err| ParserError::Config {
            message: err.to_string(),
        })
    }

    pub fn from_toml_path(path: &Path) -> Result<Self, ParserError> {
        let content = fs::read_to_string(path).map_err(|source| ParserError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn with_comment_mode(mut self, comment_mode: CommentMode) -> Self {
        self.comment_mode = comment_mode;
        self
    }

    pub fn with_strict_field_counts(mut self, strict: bool) -> Self {
        self.strict_field_counts = strict;
        self
    }
}
