//! Core simulation types: seasons, per-day draws, and the hourly history.

use std::fmt;

use crate::devices::types::{HOURS_PER_DAY, HourlyCurve};

/// Season whose fitted parameters drive a scenario run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Summer,
}

impl Season {
    pub const ALL: [Season; 2] = [Season::Winter, Season::Summer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Summer => "summer",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One simulated day before it is folded into the battery.
#[derive(Debug, Clone, PartialEq)]
pub struct DayRecord {
    /// Sampled solar production total (kWh, >= 0).
    pub solar_total_kwh: f64,
    /// Sampled consumption total (kWh, >= 0).
    pub consumption_total_kwh: f64,
    /// Solar production per hour (kWh).
    pub solar_hourly: HourlyCurve,
    /// Consumption per hour (kWh).
    pub consumption_hourly: HourlyCurve,
}

/// A single hour of a simulation history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourRecord {
    /// Absolute hour index from the start of the run.
    pub timestep: usize,
    /// Solar production during the hour (kWh).
    pub solar_kwh: f64,
    /// Consumption during the hour (kWh).
    pub consumption_kwh: f64,
    /// Battery level after the hour's transition (kWh).
    pub battery_kwh: f64,
}

impl HourRecord {
    /// Zero-based day the hour belongs to.
    pub fn day(&self) -> usize {
        self.timestep / HOURS_PER_DAY
    }

    /// Hour of day (0..24).
    pub fn hour_of_day(&self) -> usize {
        self.timestep % HOURS_PER_DAY
    }
}

impl fmt::Display for HourRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>4} (day {:>2} {:02}h) | solar={:>6.3} kWh  load={:>6.3} kWh  battery={:>6.3} kWh",
            self.timestep,
            self.day(),
            self.hour_of_day(),
            self.solar_kwh,
            self.consumption_kwh,
            self.battery_kwh,
        )
    }
}

/// Append-only hourly output of a scenario run.
///
/// Three parallel series indexed by absolute hour `0..days * 24`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationHistory {
    solar_kwh: Vec<f64>,
    consumption_kwh: Vec<f64>,
    battery_kwh: Vec<f64>,
}

impl SimulationHistory {
    /// Creates an empty history with room for `days` days.
    pub fn with_days(days: usize) -> Self {
        let hours = days * HOURS_PER_DAY;
        Self {
            solar_kwh: Vec::with_capacity(hours),
            consumption_kwh: Vec::with_capacity(hours),
            battery_kwh: Vec::with_capacity(hours),
        }
    }

    pub(crate) fn push(&mut self, solar_kwh: f64, consumption_kwh: f64, battery_kwh: f64) {
        self.solar_kwh.push(solar_kwh);
        self.consumption_kwh.push(consumption_kwh);
        self.battery_kwh.push(battery_kwh);
    }

    /// Number of recorded hours.
    pub fn len(&self) -> usize {
        self.battery_kwh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.battery_kwh.is_empty()
    }

    pub fn solar_kwh(&self) -> &[f64] {
        &self.solar_kwh
    }

    pub fn consumption_kwh(&self) -> &[f64] {
        &self.consumption_kwh
    }

    pub fn battery_kwh(&self) -> &[f64] {
        &self.battery_kwh
    }

    /// Returns the record at absolute hour `timestep`.
    pub fn hour(&self, timestep: usize) -> Option<HourRecord> {
        Some(HourRecord {
            timestep,
            solar_kwh: *self.solar_kwh.get(timestep)?,
            consumption_kwh: *self.consumption_kwh.get(timestep)?,
            battery_kwh: *self.battery_kwh.get(timestep)?,
        })
    }

    /// Iterates over all recorded hours in order.
    pub fn iter(&self) -> impl Iterator<Item = HourRecord> + '_ {
        (0..self.len()).filter_map(|t| self.hour(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_records_parallel_series() {
        let mut h = SimulationHistory::with_days(1);
        assert!(h.is_empty());
        h.push(1.0, 2.0, 3.0);
        h.push(4.0, 5.0, 6.0);
        assert_eq!(h.len(), 2);
        assert_eq!(h.solar_kwh(), &[1.0, 4.0]);
        assert_eq!(h.consumption_kwh(), &[2.0, 5.0]);
        assert_eq!(h.battery_kwh(), &[3.0, 6.0]);
        assert_eq!(h.hour(1).map(|r| r.battery_kwh), Some(6.0));
        assert!(h.hour(2).is_none());
        assert_eq!(h.iter().count(), 2);
    }

    #[test]
    fn hour_record_day_and_hour() {
        let r = HourRecord {
            timestep: 50,
            solar_kwh: 0.0,
            consumption_kwh: 0.0,
            battery_kwh: 0.0,
        };
        assert_eq!(r.day(), 2);
        assert_eq!(r.hour_of_day(), 2);
        assert!(!format!("{r}").is_empty());
    }

    #[test]
    fn season_names() {
        assert_eq!(Season::Winter.to_string(), "winter");
        assert_eq!(Season::Summer.as_str(), "summer");
    }
}
