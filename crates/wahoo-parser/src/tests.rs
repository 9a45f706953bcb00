use std::fs;
use std::path::PathBuf;

use crate::errors::{ParserError, Pass};
use crate::options::{CommentMode, ParseOptions};
use crate::passes::{normalize_header, split_alpha_numeric};
use crate::table::RowTable;
use crate::{parse_workout_file, parse_workout_str, WorkoutParser, MIN_ROWS};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn fixture(name: &str) -> String {
    let full_path = fixture_path(name);
    fs::read_to_string(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| cell.to_string()).collect()
}

/// A minimal export: metadata rows, comment, six sensors, workout summary,
/// then the given interval rows, a blank row and the given sample rows.
fn layout(intervals: &[Vec<String>], samples: &[Vec<String>]) -> Vec<Vec<String>> {
    let mut rows = vec![
        row(&["Year", "2015", "Month", "3", "Day23", "14", "AppVersion", "5.5.1"]),
        row(&["Minute", "5", "Second", "9"]),
        Vec::new(),
        row(&["Comments"]),
        row(&["first", "second", ""]),
        Vec::new(),
        row(&["Sensor", "Present", "SmRec", "ZeroAvg", "Model"]),
    ];
    for sensor in ["HR", "SPD", "CAD", "PWR", "FP", "MA"] {
        rows.push(row(&[sensor, "0", "0", "0", ""]));
    }
    rows.push(row(&["Workout", "Runningtime"]));
    rows.push(row(&["Biking", "60"]));
    rows.push(Vec::new());
    rows.push(row(&["Interval", "Time", "HR"]));
    rows.extend(intervals.iter().cloned());
    rows.push(Vec::new());
    rows.push(row(&["Interval", "HR_heartrate", "Time"]));
    rows.extend(samples.iter().cloned());
    rows
}

#[test]
fn parses_5_5_1_export_from_path() {
    let parsed = parse_workout_file(fixture_path("biking_5_5_1.csv")).expect("5.5.1 parse failed");

    let meta = parsed.metadata();
    assert_eq!(meta.get("Day").map(String::as_str), Some("22"));
    assert_eq!(meta.get("Hou").map(String::as_str), Some("14"));
    assert_eq!(meta.get("Minu").map(String::as_str), Some("3"));
    assert_eq!(meta.get("Sec").map(String::as_str), Some("7"));
    assert!(!meta.contains_key("Day22"));
    assert!(!meta.contains_key("Minu3"));
    assert_eq!(parsed.app_version(), Some("5.5.1"));
    assert_eq!(meta.get("Locale").map(String::as_str), Some("en_US"));

    assert_eq!(parsed.comments(), "Morning loop along the river");
    assert_eq!(parsed.sensors().len(), 6);
    assert_eq!(parsed.sensors()[0].sensor_type, "HR");
    assert_eq!(parsed.sensors()[0].model, "TICKR");
    assert!(!parsed.sensors()[3].is_present());

    assert_eq!(parsed.workout().get("workout"), Some("Biking"));
    assert_eq!(parsed.workout().get("pwr_pedal_contribution"), Some(""));
    assert_eq!(parsed.workout().get_f64("runningtime"), Some(3605.0));
    assert_eq!(parsed.workout().get_f64("gpsdist"), Some(27012.5));

    let flags: Vec<bool> = parsed.intervals().iter().map(|i| i.is_subinterval).collect();
    assert_eq!(flags, vec![false, true, false]);
    assert_eq!(parsed.subinterval_count(), 1);

    assert_eq!(parsed.interval_samples().len(), 10);
    assert!(parsed.interval_samples()[3].is_paused());
    assert_eq!(parsed.interval_samples()[9].interval, "2");
    assert!(parsed.interval_samples().iter().all(|s| s.extra.is_empty()));
}

#[test]
fn parses_5_6_export_from_string() {
    let parsed = parse_workout_str(&fixture("running_5_6_0.csv")).expect("5.6.0 parse failed");

    let meta = parsed.metadata();
    assert_eq!(meta.get("Day").map(String::as_str), Some("14"));
    assert_eq!(meta.get("Hour").map(String::as_str), Some("7"));
    assert_eq!(meta.get("Minute").map(String::as_str), Some("45"));
    assert_eq!(meta.get("Second").map(String::as_str), Some("30"));

    assert_eq!(parsed.comments(), "Tempo run, felt strong");
    assert_eq!(parsed.sensors().iter().filter(|s| s.is_present()).count(), 3);

    let dynamic: Vec<(&str, &str)> = parsed.workout().dynamic_fields().collect();
    assert_eq!(dynamic, vec![("calories", "512")]);

    let flags: Vec<bool> = parsed.intervals().iter().map(|i| i.is_subinterval).collect();
    assert_eq!(flags, vec![false, false, true, false]);

    // The trailing "Laps" block after the blank row is not part of the samples.
    assert_eq!(parsed.interval_samples().len(), 6);
    let first = &parsed.interval_samples()[0];
    assert_eq!(first.extra.get("lev_battery").map(String::as_str), Some("99"));
    assert_eq!(first.field("lev_battery"), Some("99"));
    assert_eq!(first.heart_rate(), Some(150.0));
}

#[test]
fn start_time_accepts_truncated_and_full_labels() {
    let biking = parse_workout_file(fixture_path("biking_5_5_1.csv")).expect("parse failed");
    let running = parse_workout_file(fixture_path("running_5_6_0.csv")).expect("parse failed");

    assert_eq!(
        biking.start_time().map(|t| t.to_string()),
        Some("2015-03-22 14:03:07".to_string())
    );
    assert_eq!(
        running.start_time().map(|t| t.to_string()),
        Some("2015-06-14 07:45:30".to_string())
    );
}

#[test]
fn heart_rate_stats_skip_missing_readings() {
    let parsed = parse_workout_file(fixture_path("biking_5_5_1.csv")).expect("parse failed");
    let stats = parsed.heart_rate_stats().expect("expected heart rate readings");

    assert_eq!(stats.samples, 9);
    assert_eq!(stats.min, 118.0);
    assert_eq!(stats.max, 147.0);
    assert!((stats.mean - 134.0).abs() < 1e-9);
}

#[test]
fn merged_day_label_with_bare_hour_value() {
    let rows = layout(&[row(&["1", "0:05", "120"])], &[]);
    let parsed = WorkoutParser::new()
        .parse_table(&RowTable::from_rows(rows))
        .expect("parse failed");

    let meta = parsed.metadata();
    assert_eq!(meta.get("Day").map(String::as_str), Some("23"));
    assert_eq!(meta.get("Hour").map(String::as_str), Some("14"));
    assert!(!meta.contains_key("Day23"));
    assert_eq!(meta.get("Minute").map(String::as_str), Some("5"));
}

#[test]
fn merged_day_label_with_space_before_digits() {
    let mut rows = layout(&[], &[]);
    rows[0] = row(&["Year", "2015", "Month", "3", "Day 23", "14"]);
    let parsed = WorkoutParser::new()
        .parse_table(&RowTable::from_rows(rows))
        .expect("parse failed");

    let meta = parsed.metadata();
    assert_eq!(meta.get("Day").map(String::as_str), Some("23"));
    assert_eq!(meta.get("Hour").map(String::as_str), Some("14"));
    assert!(meta.keys().all(|key| key.trim() == key));
}

#[test]
fn metadata_drops_labels_without_value_cells() {
    let mut rows = layout(&[], &[]);
    rows[1] = row(&["Minute", "5", "Second"]);
    let parsed = WorkoutParser::new()
        .parse_table(&RowTable::from_rows(rows))
        .expect("parse failed");

    assert!(!parsed.metadata().contains_key("Second"));
    assert!(!parsed.metadata().contains_key(""));
}

#[test]
fn subinterval_flags_follow_repeated_labels() {
    let rows = layout(
        &[
            row(&["1", "0:05", "120"]),
            row(&["1", "0:10", "130"]),
            row(&["2", "0:15", "140"]),
        ],
        &[],
    );
    let parsed = WorkoutParser::new()
        .parse_table(&RowTable::from_rows(rows))
        .expect("parse failed");

    let flags: Vec<bool> = parsed.intervals().iter().map(|i| i.is_subinterval).collect();
    assert_eq!(flags, vec![false, true, false]);
    assert_eq!(parsed.intervals()[1].get("hr"), Some("130"));
    assert_eq!(parsed.intervals()[2].interval(), Some("2"));
}

#[test]
fn sample_section_starts_after_interval_terminator() {
    let rows = layout(
        &[row(&["1", "0:05", "120"]), row(&["2", "0:10", "130"])],
        &[row(&["1", "121", "5"]), row(&["2", "131", "10"])],
    );
    let parsed = WorkoutParser::new()
        .parse_table(&RowTable::from_rows(rows))
        .expect("parse failed");

    assert_eq!(parsed.intervals().len(), 2);
    assert_eq!(parsed.interval_samples().len(), 2);
    assert_eq!(parsed.interval_samples()[1].hr_heartrate, "131");
    assert_eq!(parsed.interval_samples()[1].elapsed_seconds(), Some(10.0));
}

#[test]
fn comma_only_row_terminates_intervals() {
    let mut rows = layout(&[row(&["1", "0:05", "120"])], &[row(&["1", "121", "5"])]);
    let blank_index = 18;
    assert!(rows[blank_index].is_empty());
    rows[blank_index] = row(&["", "", ""]);

    let parsed = WorkoutParser::new()
        .parse_table(&RowTable::from_rows(rows))
        .expect("parse failed");
    assert_eq!(parsed.intervals().len(), 1);
    assert_eq!(parsed.interval_samples().len(), 1);
}

#[test]
fn rejects_tables_shorter_than_minimum() {
    let rows = layout(&[], &[]);
    let short: Vec<Vec<String>> = rows.into_iter().take(MIN_ROWS - 1).collect();

    let err = WorkoutParser::new()
        .parse_table(&RowTable::from_rows(short))
        .expect_err("short table must fail");
    assert!(matches!(
        err,
        ParserError::MalformedInput {
            pass: Pass::Table,
            row_index: 16,
            ..
        }
    ));
}

#[test]
fn rejects_blank_interval_header() {
    let mut rows = layout(&[], &[]);
    rows[16] = Vec::new();

    let err = WorkoutParser::new()
        .parse_table(&RowTable::from_rows(rows))
        .expect_err("blank header must fail");
    assert_eq!(err.pass(), Some(Pass::Intervals));
    assert_eq!(err.row_index(), Some(16));
}

#[test]
fn rejects_unterminated_interval_list() {
    let mut rows = layout(&[row(&["1", "0:05", "120"])], &[]);
    rows.truncate(18);

    let err = WorkoutParser::new()
        .parse_table(&RowTable::from_rows(rows))
        .expect_err("missing sample section must fail");
    assert!(matches!(
        err,
        ParserError::MalformedInput {
            pass: Pass::Intervals,
            ..
        }
    ));
}

#[test]
fn rejects_missing_sample_header() {
    let rows = layout(&[row(&["1", "0:05", "120"])], &[]);
    let mut rows: Vec<Vec<String>> = rows.into_iter().take(19).collect();
    rows.push(Vec::new());

    let err = WorkoutParser::new()
        .parse_table(&RowTable::from_rows(rows))
        .expect_err("blank sample header must fail");
    assert_eq!(err.pass(), Some(Pass::IntervalSamples));
    assert_eq!(err.row_index(), Some(19));
}

#[test]
fn strict_mode_rejects_short_interval_rows() {
    let rows = layout(&[row(&["1", "0:05"])], &[]);

    let err = WorkoutParser::new()
        .parse_table(&RowTable::from_rows(rows))
        .expect_err("mismatched row must fail");
    assert!(matches!(
        err,
        ParserError::FieldCountMismatch {
            pass: Pass::Intervals,
            row_index: 17,
            expected: 3,
            found: 2,
        }
    ));
}

#[test]
fn strict_mode_rejects_long_workout_value_row() {
    let mut rows = layout(&[], &[]);
    rows[14] = row(&["Biking", "60", "extra"]);

    let err = WorkoutParser::new()
        .parse_table(&RowTable::from_rows(rows))
        .expect_err("mismatched workout row must fail");
    assert!(matches!(
        err,
        ParserError::FieldCountMismatch {
            pass: Pass::Workout,
            row_index: 14,
            expected: 2,
            found: 3,
        }
    ));
}

#[test]
fn strict_mode_rejects_sample_row_with_trailing_comma() {
    let rows = layout(
        &[row(&["1", "0:05", "120"])],
        &[row(&["1", "121", "5"]), row(&["1", "122", "6", ""])],
    );

    let err = WorkoutParser::new()
        .parse_table(&RowTable::from_rows(rows))
        .expect_err("mismatched sample row must fail");
    assert!(matches!(
        err,
        ParserError::FieldCountMismatch {
            pass: Pass::IntervalSamples,
            row_index: 21,
            expected: 3,
            found: 4,
        }
    ));
}

#[test]
fn lenient_mode_pads_and_truncates() {
    let rows = layout(
        &[row(&["1", "0:05"]), row(&["2", "0:10", "130", "surplus"])],
        &[],
    );
    let options = ParseOptions::default().with_strict_field_counts(false);

    let parsed = WorkoutParser::with_options(options)
        .parse_table(&RowTable::from_rows(rows))
        .expect("lenient parse failed");

    assert_eq!(parsed.intervals()[0].get("hr"), Some(""));
    assert_eq!(parsed.intervals()[1].get("hr"), Some("130"));
    assert_eq!(parsed.intervals()[1].summary.len(), 3);
}

#[test]
fn rejects_duplicate_workout_headers() {
    let mut rows = layout(&[], &[]);
    rows[13] = row(&["Workout", "workout"]);

    let err = WorkoutParser::new()
        .parse_table(&RowTable::from_rows(rows))
        .expect_err("duplicate header must fail");
    assert!(matches!(
        err,
        ParserError::DuplicateField {
            pass: Pass::Workout,
            row_index: 13,
            ref field,
        } if field == "workout"
    ));
}

#[test]
fn whole_row_comment_mode_joins_cells() {
    let rows = layout(&[], &[]);
    let options = ParseOptions::default().with_comment_mode(CommentMode::WholeRow);

    let legacy = WorkoutParser::with_options(options)
        .parse_table(&RowTable::from_rows(rows.clone()))
        .expect("parse failed");
    let current = WorkoutParser::new()
        .parse_table(&RowTable::from_rows(rows))
        .expect("parse failed");

    assert_eq!(legacy.comments(), "first,second");
    assert_eq!(current.comments(), "first");
}

#[test]
fn row_table_keeps_empty_lines() {
    let table = RowTable::parse_str("a,b\n\nc,\"d\ne\"\n,\n").expect("decode failed");

    assert_eq!(table.len(), 4);
    assert_eq!(table.row(0), Some(&["a".to_string(), "b".to_string()][..]));
    assert!(table.row(1).is_some_and(|cells| cells.is_empty()));
    assert_eq!(table.cell(2, 1), Some("d\ne"));
    assert!(table.is_blank_row(1));
    assert!(table.is_blank_row(3));
    assert!(!table.is_blank_row(0));
    assert!(!table.is_blank_row(10));
}

#[test]
fn row_table_reads_stray_quote_as_text() {
    let table = RowTable::parse_str("Comments\nbought 6\" riser,\n\nnext,row\n").expect("decode failed");

    assert_eq!(table.len(), 4);
    assert_eq!(table.cell(1, 0), Some("bought 6\" riser"));
    assert!(table.is_blank_row(2));
    assert_eq!(table.cell(3, 1), Some("row"));
}

#[test]
fn row_table_counts_crlf_blank_lines() {
    let table = RowTable::parse_str("a,b\r\n\r\n\r\nc\r\n\r\n").expect("decode failed");

    assert_eq!(table.len(), 5);
    assert!(table.is_blank_row(1));
    assert!(table.is_blank_row(2));
    assert_eq!(table.cell(3, 0), Some("c"));
    assert!(table.is_blank_row(4));
}

#[test]
fn comment_with_stray_quote_does_not_swallow_rows() {
    let content = fixture("biking_5_5_1.csv")
        .replace("Morning loop along the river", "bought 6\" riser");
    let parsed = parse_workout_str(&content).expect("parse failed");

    assert_eq!(parsed.comments(), "bought 6\" riser");
    assert_eq!(parsed.intervals().len(), 3);
    assert_eq!(parsed.interval_samples().len(), 10);
}

#[test]
fn row_table_strips_byte_order_mark() {
    let table = RowTable::parse_bytes("\u{feff}Year,2015\r\n".as_bytes()).expect("decode failed");
    assert_eq!(table.cell(0, 0), Some("Year"));
}

#[test]
fn row_table_rejects_invalid_utf8() {
    let err = RowTable::parse_bytes(&[0x59, 0xff, 0x2c]).expect_err("invalid utf8 must fail");
    assert!(matches!(err, ParserError::Encoding { .. }));
}

#[test]
fn header_normalisation() {
    assert_eq!(normalize_header("Interval"), "interval");
    assert_eq!(normalize_header("HR"), "hr");
    assert_eq!(normalize_header("StartTime"), "start_time");
    assert_eq!(normalize_header("PwrPedalContribution"), "pwr_pedal_contribution");
    assert_eq!(normalize_header("MA_smoothnessX"), "ma_smoothness_x");
    assert_eq!(normalize_header("PWR_leftPedal"), "pwr_left_pedal");
    assert_eq!(normalize_header("MANUAL_dist"), "manual_dist");
    assert_eq!(normalize_header(" Avg  Speed "), "avg_speed");
    assert_eq!(normalize_header("gps-dist"), "gps_dist");
}

#[test]
fn alpha_numeric_split() {
    assert_eq!(split_alpha_numeric("Day23"), ("Day", Some("23")));
    assert_eq!(split_alpha_numeric("Hou14"), ("Hou", Some("14")));
    assert_eq!(split_alpha_numeric("14"), ("", Some("14")));
    assert_eq!(split_alpha_numeric("Day"), ("Day", None));
    assert_eq!(split_alpha_numeric("Day23x"), ("Day", Some("23")));
    assert_eq!(split_alpha_numeric("Day 23"), ("Day", Some("23")));
}

#[test]
fn options_from_toml() {
    let options = ParseOptions::from_toml_str(
        "comment_mode = \"whole_row\"\nstrict_field_counts = false\n",
    )
    .expect("valid config");
    assert_eq!(options.comment_mode, CommentMode::WholeRow);
    assert!(!options.strict_field_counts);

    let defaults = ParseOptions::from_toml_str("").expect("empty config");
    assert_eq!(defaults, ParseOptions::default());

    let err = ParseOptions::from_toml_str("strict = true").expect_err("unknown key");
    assert!(matches!(err, ParserError::Config { .. }));
}

#[test]
fn samples_frame_has_one_row_per_sample() {
    let parsed = parse_workout_file(fixture_path("biking_5_5_1.csv")).expect("parse failed");
    let df = parsed.samples_frame().expect("frame build failed");

    assert_eq!(df.height(), 10);
    assert_eq!(df.width(), crate::SAMPLE_FIELDS.len());

    let hr = df
        .column("hr_heartrate")
        .expect("hr column missing")
        .f64()
        .expect("hr column not float");
    assert_eq!(hr.get(0), Some(118.0));
    assert_eq!(hr.get(3), None);

    let paused = df
        .column("paused")
        .expect("paused column missing")
        .bool()
        .expect("paused column not boolean");
    assert_eq!(paused.get(3), Some(true));
}
