//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::devices::battery::{DEFAULT_CAPACITY_KWH, DEFAULT_INITIAL_LEVEL_KWH};
use crate::devices::household::DEFAULT_NOISE_STD;
use crate::devices::solar::{DEFAULT_PEAK_HOUR, DEFAULT_SPREAD_HOURS};
use crate::devices::types::HOURS_PER_DAY;
use crate::devices::{Battery, HouseholdLoad, SolarArray};
use crate::error::SimError;
use crate::profile::HourlyProfile;
use crate::sim::sampler::SeasonParameters;
use crate::sim::scenario::{Scenario, SeasonInputs};
use crate::sim::types::Season;

/// Seed offset for the summer run so it does not replay the winter draws.
pub const SUMMER_SEED_OFFSET: u64 = 1;

/// Top-level scenario configuration parsed from TOML.
///
/// All tables have defaults matching the baseline household. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run length and random seed.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Battery storage parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Hourly profile calibration source.
    #[serde(default)]
    pub profile: ProfileConfig,
    /// Hourly decomposition constants.
    #[serde(default)]
    pub decomposition: DecompositionConfig,
    /// Fitted daily solar production distributions.
    #[serde(default = "SeriesConfig::baseline_solar")]
    pub solar: SeriesConfig,
    /// Fitted daily consumption distributions.
    #[serde(default = "SeriesConfig::baseline_consumption")]
    pub consumption: SeriesConfig,
}

/// Longest accepted run, one century of days.
pub const MAX_DAYS: usize = 36_525;

/// Run length and random seed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of days per season run, in `1..=MAX_DAYS`.
    pub days: usize,
    /// Random seed; unseeded runs draw from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            days: 15,
            seed: None,
        }
    }
}

/// Battery storage parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Usable capacity (kWh).
    pub capacity_kwh: f64,
    /// Level at the start of each season run (kWh).
    pub initial_level_kwh: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: DEFAULT_CAPACITY_KWH,
            initial_level_kwh: DEFAULT_INITIAL_LEVEL_KWH,
        }
    }
}

/// Hourly profile calibration source.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    /// CSV of sub-daily readings; the generic profile is used if unset or unreadable.
    pub path: Option<PathBuf>,
}

/// Hourly decomposition constants.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecompositionConfig {
    /// Hour of day the solar bell peaks at.
    pub solar_peak_hour: f64,
    /// Standard deviation of the solar bell (hours).
    pub solar_spread_hours: f64,
    /// Standard deviation of the per-hour consumption multiplier.
    pub consumption_noise_std: f64,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            solar_peak_hour: DEFAULT_PEAK_HOUR,
            solar_spread_hours: DEFAULT_SPREAD_HOURS,
            consumption_noise_std: DEFAULT_NOISE_STD,
        }
    }
}

/// Winter and summer parameters for one series.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesConfig {
    pub winter: SeasonParameters,
    pub summer: SeasonParameters,
}

impl SeriesConfig {
    /// Solar fit of the reference household (winter ~3.3, summer ~18 kWh/day).
    pub fn baseline_solar() -> Self {
        Self {
            winter: SeasonParameters::gamma(1.6678779297865651, 0.16070725078743087, 1.8871140604934582),
            summer: SeasonParameters::gamma(514.066769648103, -130.75223807209858, 0.2898945029981943),
        }
    }

    /// Consumption fit of the reference household (winter ~18.5, summer ~9.2 kWh/day).
    pub fn baseline_consumption() -> Self {
        Self {
            winter: SeasonParameters::gamma(6.468657320847244, -2.771614471746993, 3.2919875899109767),
            summer: SeasonParameters::gamma(2.60736791363958, 3.3705618589665227, 2.229800106915757),
        }
    }

    pub fn for_season(&self, season: Season) -> SeasonParameters {
        match season {
            Season::Winter => self.winter,
            Season::Summer => self.summer,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.capacity_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: the reference household's fitted parameters.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            battery: BatteryConfig::default(),
            profile: ProfileConfig::default(),
            decomposition: DecompositionConfig::default(),
            solar: SeriesConfig::baseline_solar(),
            consumption: SeriesConfig::baseline_consumption(),
        }
    }

    /// Returns the baseline household with two stacked batteries.
    pub fn oversized_battery() -> Self {
        Self {
            battery: BatteryConfig {
                capacity_kwh: 2.0 * DEFAULT_CAPACITY_KWH,
                initial_level_kwh: DEFAULT_CAPACITY_KWH,
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "oversized_battery"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "oversized_battery" => Ok(Self::oversized_battery()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.simulation.days == 0 {
            errors.push(ConfigError::new("simulation.days", "must be > 0"));
        } else if self.simulation.days > MAX_DAYS {
            errors.push(ConfigError::new(
                "simulation.days",
                format!("must be at most {MAX_DAYS}"),
            ));
        }

        let bat = &self.battery;
        if !bat.capacity_kwh.is_finite() || bat.capacity_kwh <= 0.0 {
            errors.push(ConfigError::new("battery.capacity_kwh", "must be > 0"));
        } else if !(0.0..=bat.capacity_kwh).contains(&bat.initial_level_kwh) {
            errors.push(ConfigError::new(
                "battery.initial_level_kwh",
                "must be in [0, battery.capacity_kwh]",
            ));
        }

        let d = &self.decomposition;
        if !(0.0..HOURS_PER_DAY as f64).contains(&d.solar_peak_hour) {
            errors.push(ConfigError::new(
                "decomposition.solar_peak_hour",
                "must be in [0, 24)",
            ));
        }
        if !d.solar_spread_hours.is_finite() || d.solar_spread_hours <= 0.0 {
            errors.push(ConfigError::new(
                "decomposition.solar_spread_hours",
                "must be > 0",
            ));
        }
        if !d.consumption_noise_std.is_finite() || d.consumption_noise_std < 0.0 {
            errors.push(ConfigError::new(
                "decomposition.consumption_noise_std",
                "must be >= 0",
            ));
        }

        for (series, cfg) in [("solar", &self.solar), ("consumption", &self.consumption)] {
            for season in Season::ALL {
                if let Err(message) = cfg.for_season(season).validate() {
                    errors.push(ConfigError::new(format!("{series}.{season}"), message));
                }
            }
        }

        errors
    }

    /// Seed for one season's run, if the scenario is seeded.
    pub fn seed_for(&self, season: Season) -> Option<u64> {
        self.simulation.seed.map(|seed| match season {
            Season::Winter => seed,
            Season::Summer => seed.wrapping_add(SUMMER_SEED_OFFSET),
        })
    }

    pub fn season_inputs(&self, season: Season) -> SeasonInputs {
        SeasonInputs {
            solar: self.solar.for_season(season),
            consumption: self.consumption.for_season(season),
        }
    }

    /// Builds the scenario for `season` around an already estimated profile.
    ///
    /// # Panics
    ///
    /// Panics if the battery settings are invalid; call [`Self::validate`] first.
    ///
    /// # Errors
    ///
    /// Returns a [`SimError`] for malformed distribution or decomposition parameters.
    pub fn build_scenario(
        &self,
        season: Season,
        profile: HourlyProfile,
    ) -> Result<Scenario, SimError> {
        let d = &self.decomposition;
        let solar = SolarArray::new(d.solar_peak_hour, d.solar_spread_hours)?;
        let load = HouseholdLoad::new(profile, d.consumption_noise_std)?;
        let battery = Battery::new(self.battery.capacity_kwh, self.battery.initial_level_kwh);
        Scenario::new(
            self.simulation.days,
            &self.season_inputs(season),
            solar,
            load,
            battery,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn oversized_battery_doubles_capacity() {
        let base = ScenarioConfig::baseline();
        let big = ScenarioConfig::oversized_battery();
        assert_eq!(big.battery.capacity_kwh, 2.0 * base.battery.capacity_kwh);
        assert_eq!(big.solar.summer, base.solar.summer);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
days = 30
seed = 7

[battery]
capacity_kwh = 10.0
initial_level_kwh = 5.0

[profile]
path = "D202.csv"

[decomposition]
solar_peak_hour = 12.5
solar_spread_hours = 3.0
consumption_noise_std = 0.05

[solar.winter]
shape = 1.5
location = 0.0
scale = 2.0

[solar.summer]
family = "weibull_min"
shape = 3.0
location = 5.0
scale = 12.0

[consumption.winter]
shape = 6.0
location = -2.0
scale = 3.0

[consumption.summer]
shape = 2.5
location = 3.0
scale = 2.0
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.days), Some(30));
        assert_eq!(cfg.as_ref().and_then(|c| c.simulation.seed), Some(7));
        assert_eq!(
            cfg.as_ref().map(|c| c.solar.summer.family),
            Some(crate::sim::sampler::DistributionFamily::WeibullMin)
        );
        assert_eq!(
            cfg.as_ref().and_then(|c| c.profile.path.clone()),
            Some(PathBuf::from("D202.csv"))
        );
        assert!(cfg.map(|c| c.validate().is_empty()).unwrap_or(false));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[battery]
capacity_kwh = 10.0
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().and_then(|c| c.simulation.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.days), Some(15));
        assert_eq!(cfg.as_ref().map(|c| c.battery.capacity_kwh), Some(13.5));
        assert_eq!(
            cfg.as_ref().map(|c| c.consumption.winter),
            Some(SeriesConfig::baseline_consumption().winter)
        );
    }

    #[test]
    fn validation_catches_zero_days() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.days = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.days"));
    }

    #[test]
    fn validation_catches_oversized_day_count() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.days = usize::MAX;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.days"));

        cfg.simulation.days = MAX_DAYS;
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validation_catches_initial_level_above_capacity() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.battery.initial_level_kwh = 20.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.initial_level_kwh"));
    }

    #[test]
    fn validation_catches_bad_distribution() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.consumption.summer.shape = -1.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "consumption.summer"));
    }

    #[test]
    fn validation_catches_bad_decomposition() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.decomposition.solar_peak_hour = 24.0;
        cfg.decomposition.solar_spread_hours = 0.0;
        cfg.decomposition.consumption_noise_std = -0.1;
        let errors = cfg.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
    }

    #[test]
    fn summer_seed_is_offset() {
        let mut cfg = ScenarioConfig::baseline();
        assert_eq!(cfg.seed_for(Season::Winter), None);
        cfg.simulation.seed = Some(10);
        assert_eq!(cfg.seed_for(Season::Winter), Some(10));
        assert_eq!(cfg.seed_for(Season::Summer), Some(10 + SUMMER_SEED_OFFSET));
    }

    #[test]
    fn build_scenario_surfaces_invalid_distribution() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.solar.winter.scale = 0.0;
        let err = cfg.build_scenario(Season::Winter, HourlyProfile::uniform());
        assert!(matches!(err, Err(SimError::InvalidDistribution { .. })));
        assert!(
            cfg.build_scenario(Season::Summer, HourlyProfile::uniform())
                .is_ok()
        );
    }
}
