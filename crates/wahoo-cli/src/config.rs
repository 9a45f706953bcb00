use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::debug;
use wahoo_parser::{CommentMode, ParseOptions};

use crate::ParserArgs;

const CONFIG_ENV: &str = "WAHOO_CONFIG";

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CommentModeArg {
    FirstCell,
    WholeRow,
}

impl From<CommentModeArg> for CommentMode {
    fn from(value: CommentModeArg) -> Self {
        match value {
            CommentModeArg::FirstCell => CommentMode::FirstCell,
            CommentModeArg::WholeRow => CommentMode::WholeRow,
        }
    }
}

/// Flags override the config file, which overrides the defaults.
pub fn resolve_options(args: &ParserArgs) -> Result<ParseOptions> {
    let config_path = args
        .config
        .clone()
        .or_else(|| env::var(CONFIG_ENV).ok().map(PathBuf::from));

    let mut options = match config_path {
        Some(path) => {
            debug!(path = %path.display(), "loading parser options");
            ParseOptions::from_toml_path(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => ParseOptions::default(),
    };

    if let Some(mode) = args.comment_mode {
        options = options.with_comment_mode(mode.into());
    }
    if args.lenient {
        options = options.with_strict_field_counts(false);
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "comment_mode = \"whole_row\"").expect("write failed");

        let args = ParserArgs {
            config: Some(file.path().to_path_buf()),
            comment_mode: None,
            lenient: true,
        };
        let options = resolve_options(&args).expect("resolve failed");
        assert_eq!(options.comment_mode, CommentMode::WholeRow);
        assert!(!options.strict_field_counts);

        let args = ParserArgs {
            config: Some(file.path().to_path_buf()),
            comment_mode: Some(CommentModeArg::FirstCell),
            lenient: false,
        };
        let options = resolve_options(&args).expect("resolve failed");
        assert_eq!(options.comment_mode, CommentMode::FirstCell);
        assert!(options.strict_field_counts);
    }

    #[test]
    fn unreadable_config_is_an_error() {
        let args = ParserArgs {
            config: Some(PathBuf::from("/nonexistent/wahoo.toml")),
            comment_mode: None,
            lenient: false,
        };
        assert!(resolve_options(&args).is_err());
    }
}
