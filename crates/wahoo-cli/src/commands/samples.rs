use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::ParquetWriter;
use tracing::info;
use wahoo_parser::{ParseOptions, WorkoutParser};

pub fn run(path: &Path, output: &Path, options: ParseOptions) -> Result<()> {
    let parsed = WorkoutParser::with_options(options)
        .parse_path(path)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let mut df = parsed.samples_frame()?;
    let mut file =
        File::create(output).with_context(|| format!("failed to create {}", output.display()))?;
    ParquetWriter::new(&mut file).finish(&mut df)?;

    info!(
        rows = df.height(),
        output = %output.display(),
        "wrote sample table"
    );
    Ok(())
}
