//! Common types and traits for the household energy series.

use rand::Rng;

/// Hours in one simulated day.
pub const HOURS_PER_DAY: usize = 24;

/// Energy per hour of one day (kWh), index 0 is midnight.
pub type HourlyCurve = [f64; HOURS_PER_DAY];

/// Spreads a daily energy total over the 24 hours of the day.
///
/// Implementations may consume randomness for intra-day variation; callers
/// pass the scenario's random source so a seeded run stays reproducible.
pub trait HourlyDecomposer {
    /// Returns the hourly curve for a day that totals `daily_total_kwh`.
    fn decompose<R: Rng + ?Sized>(&self, daily_total_kwh: f64, rng: &mut R) -> HourlyCurve;
}
