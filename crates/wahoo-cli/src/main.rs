use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{export, inspect, samples};
use config::{resolve_options, CommentModeArg};

/// Inspect and convert Wahoo Fitness CSV workout exports
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    parser: ParserArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default)]
pub struct ParserArgs {
    /// TOML file with parser options (falls back to $WAHOO_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// How to read the comment row
    #[arg(long, value_enum, global = true)]
    comment_mode: Option<CommentModeArg>,

    /// Pad or truncate rows whose cell count differs from their header
    #[arg(long, global = true)]
    lenient: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarise one or more exports (files or directories)
    Inspect {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Write the parsed workout as JSON
    Export {
        path: PathBuf,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the sample table to a Parquet file
    Samples {
        path: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let options = resolve_options(&cli.parser)?;

    match cli.command {
        Command::Inspect { paths } => inspect::run(&paths, options),
        Command::Export { path, output } => export::run(&path, output.as_deref(), options),
        Command::Samples { path, output } => samples::run(&path, &output, options),
    }
}
