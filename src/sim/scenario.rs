//! Scenario driver: N simulated days for one season's parameters.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::devices::{Battery, HourlyDecomposer, HouseholdLoad, SolarArray};
use crate::error::{Series, SimError};

use super::engine::BalanceEngine;
use super::sampler::{DailySampler, SeasonParameters};
use super::types::{DayRecord, SimulationHistory};

/// Distribution parameters for both series in one season.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonInputs {
    pub solar: SeasonParameters,
    pub consumption: SeasonParameters,
}

/// A validated, ready-to-run scenario.
///
/// Building a `Scenario` checks every input; running it cannot fail. Each
/// run starts from the same initial battery and draws all randomness from
/// the caller's random source.
///
/// # Examples
///
/// ```
/// use home_energy_sim::devices::{Battery, HouseholdLoad, SolarArray};
/// use home_energy_sim::profile::HourlyProfile;
/// use home_energy_sim::sim::sampler::SeasonParameters;
/// use home_energy_sim::sim::scenario::{Scenario, SeasonInputs};
///
/// let inputs = SeasonInputs {
///     solar: SeasonParameters::gamma(1.67, 0.16, 1.89),
///     consumption: SeasonParameters::gamma(6.47, -2.77, 3.29),
/// };
/// let load = HouseholdLoad::new(HourlyProfile::uniform(), 0.1).unwrap();
/// let scenario = Scenario::new(3, &inputs, SolarArray::default(), load, Battery::default()).unwrap();
/// let history = scenario.run_seeded(42);
/// assert_eq!(history.len(), 72);
/// ```
#[derive(Debug, Clone)]
pub struct Scenario {
    days: usize,
    solar_sampler: DailySampler,
    consumption_sampler: DailySampler,
    solar: SolarArray,
    load: HouseholdLoad,
    battery: Battery,
}

impl Scenario {
    /// Creates a scenario.
    ///
    /// # Arguments
    ///
    /// * `days` - Number of days to simulate
    /// * `inputs` - Fitted solar and consumption parameters for the season
    /// * `solar` - Solar hourly decomposition
    /// * `load` - Consumption hourly decomposition (carries the hourly profile)
    /// * `battery` - Battery state at the first hour
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidDistribution`] if either parameter triple
    /// is malformed.
    pub fn new(
        days: usize,
        inputs: &SeasonInputs,
        solar: SolarArray,
        load: HouseholdLoad,
        battery: Battery,
    ) -> Result<Self, SimError> {
        Ok(Self {
            days,
            solar_sampler: inputs.solar.sampler(Series::Solar)?,
            consumption_sampler: inputs.consumption.sampler(Series::Consumption)?,
            solar,
            load,
            battery,
        })
    }

    /// Draws one day: solar total, consumption total, then the hourly curves.
    pub fn sample_day<R: Rng + ?Sized>(&self, rng: &mut R) -> DayRecord {
        let solar_total_kwh = self.solar_sampler.sample(rng);
        let consumption_total_kwh = self.consumption_sampler.sample(rng);
        DayRecord {
            solar_total_kwh,
            consumption_total_kwh,
            solar_hourly: self.solar.decompose(solar_total_kwh, rng),
            consumption_hourly: self.load.decompose(consumption_total_kwh, rng),
        }
    }

    /// Runs every day in order, carrying the battery across days.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> SimulationHistory {
        info!(
            days = self.days,
            capacity_kwh = self.battery.capacity_kwh(),
            initial_level_kwh = self.battery.level_kwh(),
            "starting scenario run"
        );

        let mut engine = BalanceEngine::new(self.battery, self.days);
        for day in 0..self.days {
            let record = self.sample_day(rng);
            engine.run_day(&record);
            debug!(
                day,
                solar_kwh = record.solar_total_kwh,
                consumption_kwh = record.consumption_total_kwh,
                battery_kwh = engine.battery().level_kwh(),
                "simulated day"
            );
        }

        let history = engine.into_history();
        info!(
            hours = history.len(),
            final_level_kwh = history.battery_kwh().last().copied().unwrap_or(self.battery.level_kwh()),
            "scenario run finished"
        );
        history
    }

    /// Runs with a `StdRng` seeded from `seed`; identical seeds give identical histories.
    pub fn run_seeded(&self, seed: u64) -> SimulationHistory {
        self.run(&mut StdRng::seed_from_u64(seed))
    }

    /// Runs with a fresh OS-seeded random source.
    pub fn run_unseeded(&self) -> SimulationHistory {
        self.run(&mut StdRng::from_os_rng())
    }
}
