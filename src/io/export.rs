//! CSV export for scenario histories.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::{Season, SimulationHistory};

/// Column header for CSV history export.
const HEADER: &str = "season,timestep,day,hour,solar_kwh,consumption_kwh,battery_kwh";

/// Exports season histories to a CSV file at the given path.
///
/// Writes a header row followed by one data row per simulated hour, season
/// by season in the order given. Produces deterministic output for identical
/// inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(runs: &[(Season, &SimulationHistory)], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(runs, buf)
}

/// Writes season histories as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(runs: &[(Season, &SimulationHistory)], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for (season, history) in runs {
        for r in history.iter() {
            wtr.write_record(&[
                season.as_str().to_string(),
                r.timestep.to_string(),
                r.day().to_string(),
                r.hour_of_day().to_string(),
                format!("{:.4}", r.solar_kwh),
                format!("{:.4}", r.consumption_kwh),
                format!("{:.4}", r.battery_kwh),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
