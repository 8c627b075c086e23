//! Post-hoc KPI computation from a simulation history.

use std::fmt;

use crate::devices::types::HOURS_PER_DAY;

use super::types::SimulationHistory;

/// Aggregate indicators derived from a complete scenario run.
///
/// Curtailment and unmet load are reconstructed from consecutive battery
/// levels; the engine itself never tracks them.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    /// Number of simulated days.
    pub days: usize,
    /// Total solar production (kWh).
    pub total_solar_kwh: f64,
    /// Total consumption (kWh).
    pub total_consumption_kwh: f64,
    /// Surplus that did not fit in the battery (kWh).
    pub curtailed_kwh: f64,
    /// Deficit the battery could not cover (kWh).
    pub unmet_kwh: f64,
    /// Hours ending with an empty battery.
    pub hours_empty: usize,
    /// Hours ending with a full battery.
    pub hours_full: usize,
    /// Lowest battery level reached (kWh).
    pub min_level_kwh: f64,
    /// Highest battery level reached (kWh).
    pub max_level_kwh: f64,
    /// Battery level after the last hour (kWh).
    pub final_level_kwh: f64,
    /// Share of consumption covered by solar or battery (%).
    pub self_sufficiency_pct: f64,
}

impl ScenarioReport {
    /// Computes all KPIs from a history.
    ///
    /// # Arguments
    ///
    /// * `history` - Complete scenario history
    /// * `capacity_kwh` - Battery capacity used for the run
    /// * `initial_level_kwh` - Battery level before the first hour
    pub fn from_history(
        history: &SimulationHistory,
        capacity_kwh: f64,
        initial_level_kwh: f64,
    ) -> Self {
        let mut total_solar = 0.0_f64;
        let mut total_consumption = 0.0_f64;
        let mut curtailed = 0.0_f64;
        let mut unmet = 0.0_f64;
        let mut hours_empty = 0_usize;
        let mut hours_full = 0_usize;
        let mut min_level = initial_level_kwh;
        let mut max_level = initial_level_kwh;
        let mut previous = initial_level_kwh;

        for r in history.iter() {
            total_solar += r.solar_kwh;
            total_consumption += r.consumption_kwh;

            let unclamped = previous + (r.solar_kwh - r.consumption_kwh);
            curtailed += (unclamped - capacity_kwh).max(0.0);
            unmet += (-unclamped).max(0.0);

            if r.battery_kwh <= 0.0 {
                hours_empty += 1;
            }
            if r.battery_kwh >= capacity_kwh {
                hours_full += 1;
            }
            min_level = min_level.min(r.battery_kwh);
            max_level = max_level.max(r.battery_kwh);
            previous = r.battery_kwh;
        }

        let self_sufficiency_pct = if total_consumption > 0.0 {
            100.0 * (1.0 - unmet / total_consumption)
        } else {
            100.0
        };

        Self {
            days: history.len() / HOURS_PER_DAY,
            total_solar_kwh: total_solar,
            total_consumption_kwh: total_consumption,
            curtailed_kwh: curtailed,
            unmet_kwh: unmet,
            hours_empty,
            hours_full,
            min_level_kwh: min_level,
            max_level_kwh: max_level,
            final_level_kwh: previous,
            self_sufficiency_pct,
        }
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let per_day = |kwh: f64| {
            if self.days > 0 {
                kwh / self.days as f64
            } else {
                0.0
            }
        };
        writeln!(f, "Days simulated:        {}", self.days)?;
        writeln!(
            f,
            "Solar production:      {:.2} kWh ({:.2} kWh/day)",
            self.total_solar_kwh,
            per_day(self.total_solar_kwh)
        )?;
        writeln!(
            f,
            "Consumption:           {:.2} kWh ({:.2} kWh/day)",
            self.total_consumption_kwh,
            per_day(self.total_consumption_kwh)
        )?;
        writeln!(f, "Curtailed:             {:.2} kWh", self.curtailed_kwh)?;
        writeln!(f, "Unmet load:            {:.2} kWh", self.unmet_kwh)?;
        writeln!(f, "Self-sufficiency:      {:.1}%", self.self_sufficiency_pct)?;
        writeln!(f, "Hours empty:           {}", self.hours_empty)?;
        writeln!(f, "Hours full:            {}", self.hours_full)?;
        writeln!(
            f,
            "Battery range:         {:.2}..{:.2} kWh",
            self.min_level_kwh, self.max_level_kwh
        )?;
        write!(f, "Final battery level:   {:.2} kWh", self.final_level_kwh)
    }
}
