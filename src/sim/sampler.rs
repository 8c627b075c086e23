//! Daily total sampler: season-fitted distributions clamped at zero.

use rand::Rng;
use rand_distr::{Distribution, Gamma, Weibull};
use serde::Deserialize;

use crate::error::{Series, SimError};

/// Continuous distribution family a season triple was fitted with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionFamily {
    /// `location + scale * Gamma(shape, 1)`.
    #[default]
    Gamma,
    /// `location + scale * Weibull(shape, 1)`.
    WeibullMin,
}

/// Fitted (shape, location, scale) triple for one series in one season.
///
/// # Examples
///
/// ```
/// use home_energy_sim::sim::sampler::SeasonParameters;
///
/// let p = SeasonParameters::gamma(2.6, 3.37, 2.23);
/// assert!(p.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeasonParameters {
    /// Distribution family, gamma unless stated otherwise.
    #[serde(default)]
    pub family: DistributionFamily,
    /// Shape parameter (must be > 0).
    pub shape: f64,
    /// Location shift in kWh, may be negative.
    pub location: f64,
    /// Scale in kWh (must be > 0).
    pub scale: f64,
}

impl SeasonParameters {
    /// Gamma-family triple.
    pub const fn gamma(shape: f64, location: f64, scale: f64) -> Self {
        Self {
            family: DistributionFamily::Gamma,
            shape,
            location,
            scale,
        }
    }

    /// Checks the triple, returning the first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        if !self.shape.is_finite() || self.shape <= 0.0 {
            return Err(format!("shape must be finite and > 0, got {}", self.shape));
        }
        if !self.location.is_finite() {
            return Err(format!("location must be finite, got {}", self.location));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(format!("scale must be finite and > 0, got {}", self.scale));
        }
        Ok(())
    }

    /// Builds a sampler for `series`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidDistribution`] when the triple is malformed.
    pub fn sampler(&self, series: Series) -> Result<DailySampler, SimError> {
        let invalid = |reason: String| SimError::InvalidDistribution { series, reason };
        self.validate().map_err(invalid)?;

        let standard = match self.family {
            DistributionFamily::Gamma => {
                StandardDraw::Gamma(Gamma::new(self.shape, 1.0).map_err(|e| invalid(e.to_string()))?)
            }
            DistributionFamily::WeibullMin => StandardDraw::Weibull(
                Weibull::new(1.0, self.shape).map_err(|e| invalid(e.to_string()))?,
            ),
        };

        Ok(DailySampler {
            standard,
            location: self.location,
            scale: self.scale,
        })
    }
}

#[derive(Debug, Clone)]
enum StandardDraw {
    Gamma(Gamma<f64>),
    Weibull(Weibull<f64>),
}

/// Draws non-negative daily energy totals (kWh) from one validated triple.
///
/// Solar and consumption each get their own sampler; their draws are
/// independent of each other.
#[derive(Debug, Clone)]
pub struct DailySampler {
    standard: StandardDraw,
    location: f64,
    scale: f64,
}

impl DailySampler {
    /// Draws one daily total, floored at 0.
    ///
    /// The fitted location can be negative, so the raw draw can be too.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let standard = match &self.standard {
            StandardDraw::Gamma(d) => d.sample(rng),
            StandardDraw::Weibull(d) => d.sample(rng),
        };
        (self.location + self.scale * standard).max(0.0)
    }
}
