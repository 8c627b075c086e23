//! Normalized 24-hour consumption shape and its estimator.

pub mod estimator;

pub use estimator::{ProfileError, estimate_from_path, estimate_from_reader, load_or_fallback};

use crate::devices::types::HOURS_PER_DAY;

/// Generic residential weights with an evening peak, used when no
/// calibration data can be read.
const GENERIC_RESIDENTIAL: [f64; HOURS_PER_DAY] = [
    0.2, 0.2, 0.2, 0.2, 0.3, 0.8, 1.2, 1.0, 0.8, 0.6, 0.5, 0.5, //
    0.6, 0.7, 0.8, 0.9, 1.2, 1.8, 2.5, 2.8, 2.5, 2.0, 1.0, 0.5,
];

/// Fractional share of daily consumption per hour of day.
///
/// Always exactly 24 non-negative entries summing to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyProfile([f64; HOURS_PER_DAY]);

impl HourlyProfile {
    /// Every hour gets 1/24 of the day.
    pub fn uniform() -> Self {
        Self([1.0 / HOURS_PER_DAY as f64; HOURS_PER_DAY])
    }

    /// Built-in evening-peaking household shape.
    pub fn generic_residential() -> Self {
        Self::from_weights(&GENERIC_RESIDENTIAL)
    }

    /// Normalizes arbitrary bucket weights into a profile.
    ///
    /// Fewer than 24 weights are repeated cyclically up to 24, extra weights
    /// are dropped. Negative or non-finite weights count as 0. A zero total
    /// (including no weights at all) gives the uniform profile.
    pub fn from_weights(weights: &[f64]) -> Self {
        if weights.is_empty() {
            return Self::uniform();
        }

        let mut buckets = [0.0; HOURS_PER_DAY];
        for (h, bucket) in buckets.iter_mut().enumerate() {
            let w = weights[h % weights.len()];
            *bucket = if w.is_finite() { w.max(0.0) } else { 0.0 };
        }

        let total: f64 = buckets.iter().sum();
        if total <= 0.0 {
            return Self::uniform();
        }
        for bucket in &mut buckets {
            *bucket /= total;
        }
        Self(buckets)
    }

    /// Share of the day at `hour` (0..24).
    pub fn share(&self, hour: usize) -> f64 {
        self.0[hour]
    }

    pub fn as_array(&self) -> &[f64; HOURS_PER_DAY] {
        &self.0
    }
}

impl Default for HourlyProfile {
    fn default() -> Self {
        Self::generic_residential()
    }
}
