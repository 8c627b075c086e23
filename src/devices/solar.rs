use rand::Rng;

use crate::devices::types::{HOURS_PER_DAY, HourlyCurve, HourlyDecomposer};
use crate::error::SimError;

/// Default hour at which the solar bell peaks.
pub const DEFAULT_PEAK_HOUR: f64 = 13.0;

/// Default standard deviation of the solar bell, in hours.
pub const DEFAULT_SPREAD_HOURS: f64 = 2.5;

/// A rooftop PV array whose daily yield follows a fixed Gaussian bell.
///
/// `SolarArray` spreads a daily production total over the day with weights
/// `exp(-(h - peak)^2 / (2 * spread^2))`, normalized so the hourly values sum
/// back to the daily total. It consumes no randomness: all day-to-day
/// variability comes from the sampled daily total.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarArray {
    /// Hour of day with the highest output.
    pub peak_hour: f64,

    /// Standard deviation of the bell in hours.
    pub spread_hours: f64,

    /// Bell weights normalized to sum to 1, `None` if they underflow to zero.
    shape: Option<HourlyCurve>,
}

impl SolarArray {
    /// Creates a PV array with the given bell.
    ///
    /// # Arguments
    ///
    /// * `peak_hour` - Hour of day the bell is centered on
    /// * `spread_hours` - Standard deviation of the bell (must be > 0)
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidDecomposition`] for a non-finite peak or a
    /// non-positive spread.
    pub fn new(peak_hour: f64, spread_hours: f64) -> Result<Self, SimError> {
        if !peak_hour.is_finite() {
            return Err(SimError::InvalidDecomposition {
                reason: format!("solar peak hour must be finite, got {peak_hour}"),
            });
        }
        if !spread_hours.is_finite() || spread_hours <= 0.0 {
            return Err(SimError::InvalidDecomposition {
                reason: format!("solar spread must be finite and > 0, got {spread_hours}"),
            });
        }

        Ok(Self {
            peak_hour,
            spread_hours,
            shape: normalized_bell(peak_hour, spread_hours),
        })
    }
}

impl Default for SolarArray {
    fn default() -> Self {
        Self {
            peak_hour: DEFAULT_PEAK_HOUR,
            spread_hours: DEFAULT_SPREAD_HOURS,
            shape: normalized_bell(DEFAULT_PEAK_HOUR, DEFAULT_SPREAD_HOURS),
        }
    }
}

fn normalized_bell(peak_hour: f64, spread_hours: f64) -> Option<HourlyCurve> {
    let mut bell = [0.0; HOURS_PER_DAY];
    for (h, w) in bell.iter_mut().enumerate() {
        let d = h as f64 - peak_hour;
        *w = (-(d * d) / (2.0 * spread_hours * spread_hours)).exp();
    }
    let total: f64 = bell.iter().sum();
    if total <= 0.0 {
        return None;
    }
    for w in &mut bell {
        *w /= total;
    }
    Some(bell)
}

impl HourlyDecomposer for SolarArray {
    /// Scales the normalized bell to `daily_total_kwh`.
    ///
    /// Returns an all-zero curve when the bell underflows.
    fn decompose<R: Rng + ?Sized>(&self, daily_total_kwh: f64, _rng: &mut R) -> HourlyCurve {
        let Some(shape) = &self.shape else {
            return [0.0; HOURS_PER_DAY];
        };
        shape.map(|w| w * daily_total_kwh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0)
    }

    #[test]
    fn curve_sums_to_daily_total() {
        let pv = SolarArray::default();
        for total in [0.0, 0.5, 3.3, 18.0, 120.0] {
            let curve = pv.decompose(total, &mut rng());
            let sum: f64 = curve.iter().sum();
            assert!((sum - total).abs() < 1e-9 * total.max(1.0), "{sum} vs {total}");
        }
    }

    #[test]
    fn peaks_at_one_pm_and_is_symmetric() {
        let curve = SolarArray::default().decompose(10.0, &mut rng());
        let peak = (0..HOURS_PER_DAY)
            .max_by(|&a, &b| curve[a].total_cmp(&curve[b]))
            .unwrap_or(0);
        assert_eq!(peak, 13);
        assert!((curve[10] - curve[16]).abs() < 1e-12);
        assert!(curve[0] < 1e-6);
    }

    #[test]
    fn does_not_consume_randomness() {
        let mut a = rng();
        let mut b = rng();
        SolarArray::default().decompose(5.0, &mut a);
        assert_eq!(a.random::<u64>(), b.random::<u64>());
    }

    #[test]
    fn underflowing_bell_gives_zero_curve() {
        // Tiny spread centered between hours: every weight underflows.
        let pv = SolarArray::new(13.5, 0.01).expect("valid parameters");
        let curve = pv.decompose(10.0, &mut rng());
        assert!(curve.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn rejects_bad_spread() {
        assert!(SolarArray::new(13.0, 0.0).is_err());
        assert!(SolarArray::new(13.0, -1.0).is_err());
        assert!(SolarArray::new(f64::NAN, 2.5).is_err());
    }
}
