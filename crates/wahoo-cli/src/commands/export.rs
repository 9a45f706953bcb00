use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use wahoo_parser::{ParseOptions, WorkoutParser};

pub fn run(path: &Path, output: Option<&Path>, options: ParseOptions) -> Result<()> {
    let parsed = WorkoutParser::with_options(options)
        .parse_path(path)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    match output {
        Some(target) => {
            let file = File::create(target)
                .with_context(|| format!("failed to create {}", target.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &parsed)?;
            writer.flush()?;
            info!(output = %target.display(), "wrote workout JSON");
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, &parsed)?;
            writeln!(handle)?;
        }
    }

    Ok(())
}
