use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::devices::types::{HOURS_PER_DAY, HourlyCurve, HourlyDecomposer};
use crate::error::SimError;
use crate::profile::HourlyProfile;

/// Default standard deviation of the per-hour consumption multiplier.
pub const DEFAULT_NOISE_STD: f64 = 0.1;

/// A household whose daily consumption follows a learned hourly profile.
///
/// `HouseholdLoad` distributes a daily consumption total according to an
/// [`HourlyProfile`] and multiplies every hour by an independent
/// `Normal(1, noise_std)` factor to model intra-day randomness. Hours that the
/// noise drives below zero are clamped to zero, so the curve only sums to the
/// daily total on average.
///
/// # Examples
///
/// ```
/// use home_energy_sim::devices::{HouseholdLoad, HourlyDecomposer};
/// use home_energy_sim::profile::HourlyProfile;
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let load = HouseholdLoad::new(HourlyProfile::uniform(), 0.0).unwrap();
/// let curve = load.decompose(24.0, &mut StdRng::seed_from_u64(1));
/// assert!(curve.iter().all(|&kwh| (kwh - 1.0).abs() < 1e-12));
/// ```
#[derive(Debug, Clone)]
pub struct HouseholdLoad {
    /// Share of the day per hour.
    pub profile: HourlyProfile,

    /// Standard deviation of the multiplicative noise.
    pub noise_std: f64,

    noise: Normal<f64>,
}

impl HouseholdLoad {
    /// Creates a household load.
    ///
    /// # Arguments
    ///
    /// * `profile` - Normalized hourly consumption shape
    /// * `noise_std` - Standard deviation of the per-hour multiplier (0 disables noise)
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidDecomposition`] if `noise_std` is negative or
    /// not finite.
    pub fn new(profile: HourlyProfile, noise_std: f64) -> Result<Self, SimError> {
        if !noise_std.is_finite() || noise_std < 0.0 {
            return Err(SimError::InvalidDecomposition {
                reason: format!("consumption noise std must be finite and >= 0, got {noise_std}"),
            });
        }
        let noise = Normal::new(1.0, noise_std).map_err(|e| SimError::InvalidDecomposition {
            reason: e.to_string(),
        })?;

        Ok(Self {
            profile,
            noise_std,
            noise,
        })
    }
}

impl HourlyDecomposer for HouseholdLoad {
    /// Draws a fresh 24-hour noise vector and applies it to the scaled profile.
    fn decompose<R: Rng + ?Sized>(&self, daily_total_kwh: f64, rng: &mut R) -> HourlyCurve {
        let mut curve = [0.0; HOURS_PER_DAY];
        for (h, kwh) in curve.iter_mut().enumerate() {
            let multiplier = self.noise.sample(rng);
            *kwh = (self.profile.share(h) * daily_total_kwh * multiplier).max(0.0);
        }
        curve
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn noiseless_load_follows_profile() {
        let profile = HourlyProfile::generic_residential();
        let load = HouseholdLoad::new(profile, 0.0).expect("valid noise");
        let curve = load.decompose(18.5, &mut StdRng::seed_from_u64(1));
        for (h, kwh) in curve.iter().enumerate() {
            assert!((kwh - profile.share(h) * 18.5).abs() < 1e-12);
        }
    }

    #[test]
    fn hours_are_non_negative_under_heavy_noise() {
        // With std 3.0 most multipliers are negative somewhere in the day.
        let load = HouseholdLoad::new(HourlyProfile::uniform(), 3.0).expect("valid noise");
        let mut rng = StdRng::seed_from_u64(5);
        let mut clamped = 0;
        for _ in 0..200 {
            let curve = load.decompose(10.0, &mut rng);
            assert!(curve.iter().all(|&kwh| kwh >= 0.0));
            clamped += curve.iter().filter(|&&kwh| kwh == 0.0).count();
        }
        assert!(clamped > 0, "noise should have been clamped at least once");
    }

    #[test]
    fn noise_is_redrawn_every_day() {
        let load = HouseholdLoad::new(HourlyProfile::uniform(), 0.1).expect("valid noise");
        let mut rng = StdRng::seed_from_u64(9);
        let day1 = load.decompose(12.0, &mut rng);
        let day2 = load.decompose(12.0, &mut rng);
        assert_ne!(day1, day2);
    }

    #[test]
    fn noise_averages_out_to_daily_total() {
        let load = HouseholdLoad::new(HourlyProfile::generic_residential(), 0.1)
            .expect("valid noise");
        let mut rng = StdRng::seed_from_u64(21);
        let days = 2000;
        let mean_total = (0..days)
            .map(|_| load.decompose(9.0, &mut rng).iter().sum::<f64>())
            .sum::<f64>()
            / days as f64;
        assert!((mean_total - 9.0).abs() < 0.05, "mean daily total {mean_total}");
    }

    #[test]
    fn rejects_negative_noise() {
        assert!(HouseholdLoad::new(HourlyProfile::uniform(), -0.1).is_err());
        assert!(HouseholdLoad::new(HourlyProfile::uniform(), f64::INFINITY).is_err());
    }
}
