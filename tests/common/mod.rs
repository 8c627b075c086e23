//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use home_energy_sim::config::ScenarioConfig;
use home_energy_sim::devices::{Battery, HouseholdLoad, SolarArray};
use home_energy_sim::profile::HourlyProfile;
use home_energy_sim::sim::scenario::{Scenario, SeasonInputs};
use home_energy_sim::sim::types::{Season, SimulationHistory};

/// Reference battery capacity (kWh).
pub const CAPACITY_KWH: f64 = 13.5;

/// Reference starting level (kWh).
pub const INITIAL_LEVEL_KWH: f64 = 6.5;

/// Baseline fitted inputs for `season`.
pub fn baseline_inputs(season: Season) -> SeasonInputs {
    ScenarioConfig::baseline().season_inputs(season)
}

/// Baseline scenario for `season` over `days` days with the generic profile.
pub fn baseline_scenario(season: Season, days: usize) -> Scenario {
    let load = HouseholdLoad::new(HourlyProfile::generic_residential(), 0.1)
        .expect("baseline noise is valid");
    Scenario::new(
        days,
        &baseline_inputs(season),
        SolarArray::default(),
        load,
        Battery::new(CAPACITY_KWH, INITIAL_LEVEL_KWH),
    )
    .expect("baseline scenario is valid")
}

/// Asserts the battery never leaves `[0, capacity]`.
pub fn assert_battery_bounded(history: &SimulationHistory, capacity_kwh: f64) {
    for (t, &level) in history.battery_kwh().iter().enumerate() {
        assert!(
            (0.0..=capacity_kwh).contains(&level),
            "battery level {level} out of bounds at hour {t}"
        );
    }
}
