//! Battery balance engine: folds hourly curves into the battery state.

use tracing::trace;

use crate::devices::Battery;
use crate::devices::types::HourlyCurve;

use super::types::{DayRecord, SimulationHistory};

/// Owns the battery state and the history for one scenario run.
///
/// The battery is set once when the engine is created and carried across day
/// boundaries; nothing outside the engine can touch it until the history is
/// handed back by [`BalanceEngine::into_history`].
#[derive(Debug, Clone)]
pub struct BalanceEngine {
    battery: Battery,
    history: SimulationHistory,
}

impl BalanceEngine {
    /// Creates an engine starting from `battery`, sized for `days` days.
    pub fn new(battery: Battery, days: usize) -> Self {
        Self {
            battery,
            history: SimulationHistory::with_days(days),
        }
    }

    /// Applies one hour and records it.
    ///
    /// # Returns
    ///
    /// The battery level after the transition (kWh).
    pub fn step(&mut self, production_kwh: f64, consumption_kwh: f64) -> f64 {
        self.battery = self.battery.step(production_kwh, consumption_kwh);
        let level = self.battery.level_kwh();
        self.history.push(production_kwh, consumption_kwh, level);
        level
    }

    /// Folds one day of hourly curves into the battery, in hour order.
    pub fn run_curves(&mut self, solar: &HourlyCurve, consumption: &HourlyCurve) {
        for (&production, &load) in solar.iter().zip(consumption) {
            let level = self.step(production, load);
            trace!(
                hour = self.history.len() - 1,
                production, load, level, "battery transition"
            );
        }
    }

    /// Folds a sampled day into the battery.
    pub fn run_day(&mut self, day: &DayRecord) {
        self.run_curves(&day.solar_hourly, &day.consumption_hourly);
    }

    /// Current battery state.
    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    /// History recorded so far.
    pub fn history(&self) -> &SimulationHistory {
        &self.history
    }

    /// Ends the run and returns the full history.
    pub fn into_history(self) -> SimulationHistory {
        self.history
    }
}
