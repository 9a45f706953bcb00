use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use comfy_table::Table;
use tracing::warn;
use wahoo_parser::{ParseOptions, ParsedWorkout, WorkoutParser};

pub fn run(paths: &[PathBuf], options: ParseOptions) -> Result<()> {
    let parser = WorkoutParser::with_options(options);
    let files = collect_files(paths)?;

    let mut table = Table::new();
    table.set_header(vec![
        "File",
        "Start",
        "App",
        "Intervals",
        "Sub-intervals",
        "Samples",
        "HR min/avg/max",
    ]);

    let mut failure_count = 0;
    for file in &files {
        match parser.parse_path(file) {
            Ok(parsed) => {
                table.add_row(summary_row(file, &parsed));
            }
            Err(err) => {
                warn!(path = %file.display(), error = %err, "skipping file");
                eprintln!("{}: {err}", file.display());
                failure_count += 1;
            }
        }
    }

    println!("{table}");
    println!(
        "{} parsed, {} failed",
        files.len() - failure_count,
        failure_count
    );

    if failure_count > 0 {
        bail!("{failure_count} file(s) failed to parse");
    }
    Ok(())
}

fn summary_row(path: &Path, parsed: &ParsedWorkout) -> Vec<String> {
    let start = parsed
        .start_time()
        .map(|t| t.to_string())
        .unwrap_or_else(|| "-".to_string());
    let heart_rate = parsed
        .heart_rate_stats()
        .map(|hr| format!("{:.0}/{:.0}/{:.0}", hr.min, hr.mean, hr.max))
        .unwrap_or_else(|| "-".to_string());

    vec![
        path.display().to_string(),
        start,
        parsed.app_version().unwrap_or("-").to_string(),
        parsed.intervals().len().to_string(),
        parsed.subinterval_count().to_string(),
        parsed.interval_samples().len().to_string(),
        heart_rate,
    ]
}

/// Files are taken as given; directories are searched for `*.csv`.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let pattern = path.join("**/*.csv");
        let pattern_str = pattern
            .to_str()
            .with_context(|| format!("path is not valid UTF-8: {}", path.display()))?;

        for entry in glob::glob(pattern_str)? {
            match entry {
                Ok(found) if found.is_file() => files.push(found),
                Ok(_) => {}
                Err(err) => warn!(error = %err, "could not read path from glob pattern"),
            }
        }
    }

    files.sort();
    Ok(files)
}
