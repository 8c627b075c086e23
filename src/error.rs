//! Error types surfaced by scenario construction.

use std::fmt;

use thiserror::Error;

/// The energy series a distribution parameter set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Solar,
    Consumption,
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Series::Solar => write!(f, "solar"),
            Series::Consumption => write!(f, "consumption"),
        }
    }
}

/// Structurally invalid simulation input.
///
/// These are caller contract violations: a scenario cannot be built from
/// them, so they are reported before the first simulated hour.
#[derive(Debug, Error)]
pub enum SimError {
    /// A (shape, location, scale) triple that cannot parameterize a draw.
    #[error("invalid {series} distribution parameters: {reason}")]
    InvalidDistribution { series: Series, reason: String },
    /// A bad solar bell width or consumption noise deviation.
    #[error("invalid decomposition parameters: {reason}")]
    InvalidDecomposition { reason: String },
}
