use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Session metadata keyed by the labels found in the first two rows.
pub type Metadata = BTreeMap<String, String>;

/// Field names of the workout summary row as exported by app 5.5.x.
/// Other versions may add columns; those are kept as dynamic fields.
pub const WORKOUT_FIELDS: [&str; 15] = [
    "workout",
    "starttime",
    "runningtime",
    "pausedtime",
    "wheeldist",
    "cadavg",
    "spdavg",
    "pwravg",
    "pwr_pedal_contribution",
    "hravg",
    "striderateavg",
    "stridedist",
    "gpsdist",
    "smoothnessavg",
    "manualdist",
];

/// Column names of the per-sample table, after header normalisation.
pub const SAMPLE_FIELDS: [&str; 39] = [
    "cad_cadence",
    "disp_altitude",
    "disp_atmospressure",
    "disp_temperature",
    "fp_accdist",
    "fp_accsteps",
    "fp_speed",
    "gps_altitude",
    "gps_dist",
    "gps_lat",
    "gps_lon",
    "gps_speed",
    "hr_heartrate",
    "interval",
    "ma_cadence",
    "ma_gct",
    "ma_jerkx",
    "ma_jerky",
    "ma_jerkz",
    "ma_riderposition",
    "ma_smoothness",
    "ma_smoothness_x",
    "ma_smoothness_y",
    "ma_smoothness_z",
    "ma_trunkangle",
    "ma_vertosc",
    "manual_dist",
    "manual_speed",
    "paused",
    "pwr_accdist",
    "pwr_cadence",
    "pwr_instpwr",
    "pwr_left_pedal",
    "pwr_right_pedal",
    "pwr_speed",
    "pwr_torque",
    "spd_accdist",
    "spd_instspeed",
    "time",
];

/// A device listed in the sensor block. Values are the raw tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    #[serde(rename = "type")]
    pub sensor_type: String,
    pub present: String,
    pub smrec: String,
    pub zeroavg: String,
    pub model: String,
}

impl Sensor {
    pub fn is_present(&self) -> bool {
        flag_is_set(&self.present)
    }
}

/// One header row zipped against one value row. Keys are normalised
/// header names; the field set varies between app versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutSummary {
    fields: BTreeMap<String, String>,
}

impl WorkoutSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(parse_cell_f64)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields present in this record that are not part of [`WORKOUT_FIELDS`].
    pub fn dynamic_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter(|(name, _)| !WORKOUT_FIELDS.contains(&name.as_str()))
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub(crate) fn insert(&mut self, name: String, value: String) {
        self.fields.insert(name, value);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutInterval {
    pub summary: WorkoutSummary,
    /// Set when this row repeats the `interval` label of the row before it.
    pub is_subinterval: bool,
}

impl WorkoutInterval {
    pub fn interval(&self) -> Option<&str> {
        self.summary.get("interval")
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.summary.get(name)
    }
}

/// A single row of the sample table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSample {
    pub cad_cadence: String,
    pub disp_altitude: String,
    pub disp_atmospressure: String,
    pub disp_temperature: String,
    pub fp_accdist: String,
    pub fp_accsteps: String,
    pub fp_speed: String,
    pub gps_altitude: String,
    pub gps_dist: String,
    pub gps_lat: String,
    pub gps_lon: String,
    pub gps_speed: String,
    pub hr_heartrate: String,
    pub interval: String,
    pub ma_cadence: String,
    pub ma_gct: String,
    pub ma_jerkx: String,
    pub ma_jerky: String,
    pub ma_jerkz: String,
    pub ma_riderposition: String,
    pub ma_smoothness: String,
    pub ma_smoothness_x: String,
    pub ma_smoothness_y: String,
    pub ma_smoothness_z: String,
    pub ma_trunkangle: String,
    pub ma_vertosc: String,
    pub manual_dist: String,
    pub manual_speed: String,
    pub paused: String,
    pub pwr_accdist: String,
    pub pwr_cadence: String,
    pub pwr_instpwr: String,
    pub pwr_left_pedal: String,
    pub pwr_right_pedal: String,
    pub pwr_speed: String,
    pub pwr_torque: String,
    pub spd_accdist: String,
    pub spd_instspeed: String,
    pub time: String,
    /// Columns this version of the format did not know about.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl IntervalSample {
    /// Looks up a value by normalised column name, falling back to [`Self::extra`].
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "cad_cadence" => &self.cad_cadence,
            "disp_altitude" => &self.disp_altitude,
            "disp_atmospressure" => &self.disp_atmospressure,
            "disp_temperature" => &self.disp_temperature,
            "fp_accdist" => &self.fp_accdist,
            "fp_accsteps" => &self.fp_accsteps,
            "fp_speed" => &self.fp_speed,
            "gps_altitude" => &self.gps_altitude,
            "gps_dist" => &self.gps_dist,
            "gps_lat" => &self.gps_lat,
            "gps_lon" => &self.gps_lon,
            "gps_speed" => &self.gps_speed,
            "hr_heartrate" => &self.hr_heartrate,
            "interval" => &self.interval,
            "ma_cadence" => &self.ma_cadence,
            "ma_gct" => &self.ma_gct,
            "ma_jerkx" => &self.ma_jerkx,
            "ma_jerky" => &self.ma_jerky,
            "ma_jerkz" => &self.ma_jerkz,
            "ma_riderposition" => &self.ma_riderposition,
            "ma_smoothness" => &self.ma_smoothness,
            "ma_smoothness_x" => &self.ma_smoothness_x,
            "ma_smoothness_y" => &self.ma_smoothness_y,
            "ma_smoothness_z" => &self.ma_smoothness_z,
            "ma_trunkangle" => &self.ma_trunkangle,
            "ma_vertosc" => &self.ma_vertosc,
            "manual_dist" => &self.manual_dist,
            "manual_speed" => &self.manual_speed,
            "paused" => &self.paused,
            "pwr_accdist" => &self.pwr_accdist,
            "pwr_cadence" => &self.pwr_cadence,
            "pwr_instpwr" => &self.pwr_instpwr,
            "pwr_left_pedal" => &self.pwr_left_pedal,
            "pwr_right_pedal" => &self.pwr_right_pedal,
            "pwr_speed" => &self.pwr_speed,
            "pwr_torque" => &self.pwr_torque,
            "spd_accdist" => &self.spd_accdist,
            "spd_instspeed" => &self.spd_instspeed,
            "time" => &self.time,
            other => return self.extra.get(other).map(String::as_str),
        };
        Some(value.as_str())
    }

    fn known_field_mut(&mut self, name: &str) -> Option<&mut String> {
        let slot = match name {
            "cad_cadence" => &mut self.cad_cadence,
            "disp_altitude" => &mut self.disp_altitude,
            "disp_atmospressure" => &mut self.disp_atmospressure,
            "disp_temperature" => &mut self.disp_temperature,
            "fp_accdist" => &mut self.fp_accdist,
            "fp_accsteps" => &mut self.fp_accsteps,
            "fp_speed" => &mut self.fp_speed,
            "gps_altitude" => &mut self.gps_altitude,
            "gps_dist" => &mut self.gps_dist,
            "gps_lat" => &mut self.gps_lat,
            "gps_lon" => &mut self.gps_lon,
            "gps_speed" => &mut self.gps_speed,
            "hr_heartrate" => &mut self.hr_heartrate,
            "interval" => &mut self.interval,
            "ma_cadence" => &mut self.ma_cadence,
            "ma_gct" => &mut self.ma_gct,
            "ma_jerkx" => &mut self.ma_jerkx,
            "ma_jerky" => &mut self.ma_jerky,
            "ma_jerkz" => &mut self.ma_jerkz,
            "ma_riderposition" => &mut self.ma_riderposition,
            "ma_smoothness" => &mut self.ma_smoothness,
            "ma_smoothness_x" => &mut self.ma_smoothness_x,
            "ma_smoothness_y" => &mut self.ma_smoothness_y,
            "ma_smoothness_z" => &mut self.ma_smoothness_z,
            "ma_trunkangle" => &mut self.ma_trunkangle,
            "ma_vertosc" => &mut self.ma_vertosc,
            "manual_dist" => &mut self.manual_dist,
            "manual_speed" => &mut self.manual_speed,
            "paused" => &mut self.paused,
            "pwr_accdist" => &mut self.pwr_accdist,
            "pwr_cadence" => &mut self.pwr_cadence,
            "pwr_instpwr" => &mut self.pwr_instpwr,
            "pwr_left_pedal" => &mut self.pwr_left_pedal,
            "pwr_right_pedal" => &mut self.pwr_right_pedal,
            "pwr_speed" => &mut self.pwr_speed,
            "pwr_torque" => &mut self.pwr_torque,
            "spd_accdist" => &mut self.spd_accdist,
            "spd_instspeed" => &mut self.spd_instspeed,
            "time" => &mut self.time,
            _ => return None,
        };
        Some(slot)
    }

    /// Stores a value under its column name. Returns `false` when the column
    /// is not one of [`SAMPLE_FIELDS`] and went to [`Self::extra`] instead.
    pub(crate) fn set(&mut self, name: &str, value: String) -> bool {
        match self.known_field_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => {
                self.extra.insert(name.to_string(), value);
                false
            }
        }
    }

    pub fn heart_rate(&self) -> Option<f64> {
        parse_cell_f64(&self.hr_heartrate)
    }

    pub fn power(&self) -> Option<f64> {
        parse_cell_f64(&self.pwr_instpwr)
    }

    pub fn cadence(&self) -> Option<f64> {
        parse_cell_f64(&self.cad_cadence).or_else(|| parse_cell_f64(&self.pwr_cadence))
    }

    /// Wheel speed sensor first, then GPS.
    pub fn speed(&self) -> Option<f64> {
        parse_cell_f64(&self.spd_instspeed).or_else(|| parse_cell_f64(&self.gps_speed))
    }

    pub fn elapsed_seconds(&self) -> Option<f64> {
        parse_cell_f64(&self.time)
    }

    pub fn latitude(&self) -> Option<f64> {
        parse_cell_f64(&self.gps_lat)
    }

    pub fn longitude(&self) -> Option<f64> {
        parse_cell_f64(&self.gps_lon)
    }

    pub fn is_paused(&self) -> bool {
        flag_is_set(&self.paused)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeartRateStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub samples: usize,
}

/// Everything extracted from one export file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedWorkout {
    metadata: Metadata,
    comments: String,
    sensors: Vec<Sensor>,
    workout: WorkoutSummary,
    intervals: Vec<WorkoutInterval>,
    interval_samples: Vec<IntervalSample>,
}

impl ParsedWorkout {
    pub(crate) fn new(
        metadata: Metadata,
        comments: String,
        sensors: Vec<Sensor>,
        workout: WorkoutSummary,
        intervals: Vec<WorkoutInterval>,
        interval_samples: Vec<IntervalSample>,
    ) -> Self {
        Self {
            metadata,
            comments,
            sensors,
            workout,
            intervals,
            interval_samples,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    pub fn workout(&self) -> &WorkoutSummary {
        &self.workout
    }

    pub fn intervals(&self) -> &[WorkoutInterval] {
        &self.intervals
    }

    pub fn interval_samples(&self) -> &[IntervalSample] {
        &self.interval_samples
    }

    pub fn app_version(&self) -> Option<&str> {
        self.metadata.get("AppVersion").map(String::as_str)
    }

    pub fn subinterval_count(&self) -> usize {
        self.intervals.iter().filter(|i| i.is_subinterval).count()
    }

    /// Local start time assembled from the date/time metadata. Accepts both
    /// the full labels and the truncated ones written by app 5.5.x.
    pub fn start_time(&self) -> Option<NaiveDateTime> {
        let year = self.metadata_number(&["Year"])?;
        let month = self.metadata_number(&["Month"])?;
        let day = self.metadata_number(&["Day"])?;
        let hour = self.metadata_number(&["Hour", "Hou"]).unwrap_or(0);
        let minute = self.metadata_number(&["Minute", "Minu", "Min"]).unwrap_or(0);
        let second = self.metadata_number(&["Second", "Sec"]).unwrap_or(0);

        NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?
            .and_hms_opt(hour, minute, second)
    }

    pub fn heart_rate_stats(&self) -> Option<HeartRateStats> {
        let readings: Vec<f64> = self
            .interval_samples
            .iter()
            .filter_map(IntervalSample::heart_rate)
            .collect();
        if readings.is_empty() {
            return None;
        }

        let min = readings.iter().copied().fold(f64::INFINITY, f64::min);
        let max = readings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = readings.iter().sum::<f64>() / readings.len() as f64;

        Some(HeartRateStats {
            min,
            max,
            mean,
            samples: readings.len(),
        })
    }

    fn metadata_number(&self, keys: &[&str]) -> Option<u32> {
        keys.iter()
            .find_map(|key| self.metadata.get(*key))
            .and_then(|value| value.trim().parse::<u32>().ok())
    }
}

/// Empty cells and `nan` read as missing.
pub(crate) fn parse_cell_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn flag_is_set(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}
