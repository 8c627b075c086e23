//! Learns an hourly consumption shape from sub-daily meter readings.
//!
//! Two table layouts are recognized:
//!
//! - utility exports with a `START TIME` (`H:MM`) and a `USAGE` column;
//! - smart-home exports with a `Time` (`H:MM`) or `Date` (date-time) column
//!   and an `Energy Consumption (kWh)` column.
//!
//! [`load_or_fallback`] never fails: any problem with the table degrades to
//! [`HourlyProfile::generic_residential`].

use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::HourlyProfile;

const UTILITY_HOUR: &str = "START TIME";
const UTILITY_USAGE: &str = "USAGE";
const SMART_HOME_TIME: &str = "Time";
const SMART_HOME_DATE: &str = "Date";
const SMART_HOME_USAGE: &str = "Energy Consumption (kWh)";

const CLOCK_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M:%S %p"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Why a calibration table could not be turned into a profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("cannot open calibration table: {0}")]
    Io(#[from] io::Error),
    #[error("malformed calibration CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("unrecognized calibration schema (columns: {headers})")]
    UnknownSchema { headers: String },
    #[error("calibration table has no `{column}` column")]
    MissingColumn { column: &'static str },
    #[error("non-numeric usage `{value}` on line {line}")]
    BadUsage { line: u64, value: String },
    #[error("none of the {rows} rows has a recognizable `{column}` timestamp")]
    NoParseableTimestamps { column: &'static str, rows: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HourFormat {
    /// `H:MM` wall-clock time.
    Clock,
    /// A date, optionally followed by a time.
    DateTime,
}

#[derive(Debug, Clone, Copy)]
struct Layout {
    hour_col: usize,
    hour_name: &'static str,
    usage_col: usize,
    format: HourFormat,
}

impl Layout {
    fn detect(headers: &csv::StringRecord) -> Result<Self, ProfileError> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let (hour_col, hour_name, format, usage_name) = if let Some(i) = find(UTILITY_HOUR) {
            (i, UTILITY_HOUR, HourFormat::Clock, UTILITY_USAGE)
        } else if let Some(i) = find(SMART_HOME_TIME) {
            (i, SMART_HOME_TIME, HourFormat::Clock, SMART_HOME_USAGE)
        } else if let Some(i) = find(SMART_HOME_DATE) {
            (i, SMART_HOME_DATE, HourFormat::DateTime, SMART_HOME_USAGE)
        } else {
            return Err(ProfileError::UnknownSchema {
                headers: headers.iter().collect::<Vec<_>>().join(", "),
            });
        };

        let usage_col = find(usage_name).ok_or(ProfileError::MissingColumn { column: usage_name })?;

        Ok(Self {
            hour_col,
            hour_name,
            usage_col,
            format,
        })
    }

    fn hour(&self, raw: &str) -> Option<u8> {
        match self.format {
            HourFormat::Clock => parse_clock_hour(raw),
            HourFormat::DateTime => parse_datetime_hour(raw),
        }
    }
}

/// Parses the hour out of a wall-clock time, 24-hour or `AM`/`PM`.
fn parse_clock_hour(raw: &str) -> Option<u8> {
    CLOCK_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
        .and_then(|t| u8::try_from(t.hour()).ok())
}

/// Parses the hour out of a date-time; a bare date is hour 0.
fn parse_datetime_hour(raw: &str) -> Option<u8> {
    let hour = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.hour())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .map(|_| 0)
        })?;
    u8::try_from(hour).ok()
}

/// Estimates a profile from CSV readings.
///
/// Readings are averaged per hour of day. Rows without a usable hour or with
/// an empty usage cell are skipped, but a table where no row carries a
/// usable hour is rejected.
///
/// # Errors
///
/// Returns a [`ProfileError`] when the table is unreadable, has an unknown
/// layout, carries a non-numeric usage value, or has no parseable timestamp.
pub fn estimate_from_reader<R: io::Read>(reader: R) -> Result<HourlyProfile, ProfileError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let layout = Layout::detect(rdr.headers()?)?;

    let mut buckets: BTreeMap<u8, (f64, usize)> = BTreeMap::new();
    let mut rows = 0_usize;
    let mut timestamped = 0_usize;
    let mut skipped = 0_usize;
    for record in rdr.records() {
        let record = record?;
        rows += 1;
        let Some(hour) = record.get(layout.hour_col).and_then(|s| layout.hour(s)) else {
            skipped += 1;
            continue;
        };
        timestamped += 1;
        let raw = record.get(layout.usage_col).unwrap_or("");
        if raw.is_empty() {
            skipped += 1;
            continue;
        }
        let usage: f64 = raw.parse().map_err(|_| ProfileError::BadUsage {
            line: record.position().map_or(0, csv::Position::line),
            value: raw.to_string(),
        })?;
        let bucket = buckets.entry(hour).or_insert((0.0, 0));
        bucket.0 += usage;
        bucket.1 += 1;
    }

    if rows > 0 && timestamped == 0 {
        return Err(ProfileError::NoParseableTimestamps {
            column: layout.hour_name,
            rows,
        });
    }

    debug!(
        buckets = buckets.len(),
        skipped, "grouped calibration readings by hour"
    );

    // Ascending hour order; missing hours are not re-inserted, the present
    // means are repeated instead.
    let means: Vec<f64> = buckets
        .values()
        .map(|&(sum, count)| sum / count as f64)
        .collect();
    Ok(HourlyProfile::from_weights(&means))
}

/// Estimates a profile from a CSV file.
///
/// # Errors
///
/// See [`estimate_from_reader`]; also fails if the file cannot be opened.
pub fn estimate_from_path(path: &Path) -> Result<HourlyProfile, ProfileError> {
    let file = File::open(path)?;
    estimate_from_reader(file)
}

/// Learns the profile from `path`, or falls back to the generic residential
/// profile when there is no path or the table cannot be used.
pub fn load_or_fallback(path: Option<&Path>) -> HourlyProfile {
    let Some(path) = path else {
        info!("no calibration table configured, using generic residential profile");
        return HourlyProfile::generic_residential();
    };

    match estimate_from_path(path) {
        Ok(profile) => {
            info!(path = %path.display(), "learned hourly profile from calibration table");
            profile
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "cannot read hourly profile, using generic residential profile"
            );
            HourlyProfile::generic_residential()
        }
    }
}
