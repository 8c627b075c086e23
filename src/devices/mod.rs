//! Household components: PV array, consumption, and battery storage.

/// Home battery state and hourly transition.
pub mod battery;
/// Profile-weighted household consumption with hourly noise.
pub mod household;
/// Gaussian-bell solar production.
pub mod solar;
pub mod types;

pub use battery::Battery;
pub use household::HouseholdLoad;
pub use solar::SolarArray;
pub use types::{HOURS_PER_DAY, HourlyCurve, HourlyDecomposer};
