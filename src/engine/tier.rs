//! Tier selection by series length.

use std::fmt;

use crate::core::{ModelKind, MIN_OBSERVATIONS};
use crate::error::{ForecastError, Result};

/// Shortest series that starts at the Holt-Winters tier.
pub const HOLT_WINTERS_MIN_LENGTH: usize = 12;
/// Shortest series that starts at the SARIMA tier.
pub const SARIMA_MIN_LENGTH: usize = 24;

/// One of the ordered fitting strategies, most to least sophisticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Sarima,
    HoltWinters,
    SimpleEs,
    MovingAverage,
}

impl Tier {
    /// The tier tried when this one fails. `None` for the terminal tier.
    pub fn fallback(self) -> Option<Tier> {
        match self {
            Tier::Sarima => Some(Tier::HoltWinters),
            Tier::HoltWinters => Some(Tier::SimpleEs),
            Tier::SimpleEs => Some(Tier::MovingAverage),
            Tier::MovingAverage => None,
        }
    }

    /// Model family reported when this tier succeeds.
    pub fn model_kind(self) -> ModelKind {
        match self {
            Tier::Sarima => ModelKind::Sarimax,
            Tier::HoltWinters => ModelKind::HoltWinters,
            Tier::SimpleEs => ModelKind::SimpleExponentialSmoothing,
            Tier::MovingAverage => ModelKind::MovingAverage,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.model_kind(), f)
    }
}

/// Starting tier for a series of `n` observations.
///
/// The moving average is never a starting tier; it is only reached through
/// fallback.
pub fn select_tier(n: usize) -> Result<Tier> {
    match n {
        n if n >= SARIMA_MIN_LENGTH => Ok(Tier::Sarima),
        n if n >= HOLT_WINTERS_MIN_LENGTH => Ok(Tier::HoltWinters),
        n if n >= MIN_OBSERVATIONS => Ok(Tier::SimpleEs),
        n => Err(ForecastError::InsufficientData {
            needed: MIN_OBSERVATIONS,
            got: n,
        }),
    }
}
