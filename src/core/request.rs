//! Forecast request and its validation.

use crate::core::time_series::{TimeSeries, MIN_OBSERVATIONS};
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shortest supported forecast horizon, in months.
pub const MIN_HORIZON: usize = 1;
/// Longest supported forecast horizon, in months.
pub const MAX_HORIZON: usize = 12;
/// Lowest supported confidence level.
pub const MIN_CONFIDENCE: f64 = 0.5;
/// Highest supported confidence level.
pub const MAX_CONFIDENCE: f64 = 0.99;

/// What the series measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Electricity,
    Gas,
    SharedBudget,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Electricity => write!(f, "electricity"),
            Target::Gas => write!(f, "gas"),
            Target::SharedBudget => write!(f, "shared_budget"),
        }
    }
}

fn default_horizon() -> usize {
    3
}

fn default_confidence() -> f64 {
    0.95
}

/// A forecast request as received from a caller.
///
/// Nothing is checked until [`ForecastRequest::validate`] runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub target: Target,
    /// ISO-8601 dates, oldest first.
    pub historical_dates: Vec<String>,
    pub historical_values: Vec<f64>,
    #[serde(default = "default_horizon")]
    pub horizon_months: usize,
    #[serde(default = "default_confidence")]
    pub confidence_level: f64,
    #[serde(default)]
    pub cost_per_unit: Option<f64>,
}

impl ForecastRequest {
    /// Create a request with the default horizon (3) and confidence (0.95).
    pub fn new<S: Into<String>>(
        target: Target,
        historical_dates: impl IntoIterator<Item = S>,
        historical_values: Vec<f64>,
    ) -> Self {
        Self {
            target,
            historical_dates: historical_dates.into_iter().map(Into::into).collect(),
            historical_values,
            horizon_months: default_horizon(),
            confidence_level: default_confidence(),
            cost_per_unit: None,
        }
    }

    pub fn with_horizon(mut self, horizon_months: usize) -> Self {
        self.horizon_months = horizon_months;
        self
    }

    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    pub fn with_cost_per_unit(mut self, cost_per_unit: f64) -> Self {
        self.cost_per_unit = Some(cost_per_unit);
        self
    }

    /// Check the request and build the series the engine consumes.
    pub fn validate(&self) -> Result<ValidatedRequest> {
        let n = self.historical_values.len();
        if n < MIN_OBSERVATIONS {
            return Err(ForecastError::InsufficientData {
                needed: MIN_OBSERVATIONS,
                got: n,
            });
        }
        if self.historical_dates.len() != n {
            return Err(ForecastError::DimensionMismatch {
                expected: n,
                got: self.historical_dates.len(),
            });
        }

        let mut params = ForecastParams::new(self.horizon_months, self.confidence_level)?;
        if let Some(cost) = self.cost_per_unit {
            params = params.with_cost_per_unit(cost)?;
        }

        let series = TimeSeries::from_iso(&self.historical_dates, self.historical_values.clone())?;

        Ok(ValidatedRequest {
            target: self.target,
            series,
            params,
        })
    }
}

/// Forecast settings shared by every tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastParams {
    horizon: usize,
    confidence_level: f64,
    cost_per_unit: Option<f64>,
}

impl ForecastParams {
    /// Create validated forecast settings.
    pub fn new(horizon: usize, confidence_level: f64) -> Result<Self> {
        if !(MIN_HORIZON..=MAX_HORIZON).contains(&horizon) {
            return Err(ForecastError::InvalidParameter(format!(
                "horizon must be between {} and {} months, got {}",
                MIN_HORIZON, MAX_HORIZON, horizon
            )));
        }
        if !(MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&confidence_level) {
            return Err(ForecastError::InvalidParameter(format!(
                "confidence level must be between {} and {}, got {}",
                MIN_CONFIDENCE, MAX_CONFIDENCE, confidence_level
            )));
        }
        Ok(Self {
            horizon,
            confidence_level,
            cost_per_unit: None,
        })
    }

    /// Attach a non-negative cost per unit.
    pub fn with_cost_per_unit(mut self, cost_per_unit: f64) -> Result<Self> {
        if !cost_per_unit.is_finite() || cost_per_unit < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "cost per unit must be a non-negative number, got {}",
                cost_per_unit
            )));
        }
        self.cost_per_unit = Some(cost_per_unit);
        Ok(self)
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    pub fn cost_per_unit(&self) -> Option<f64> {
        self.cost_per_unit
    }
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub target: Target,
    pub series: TimeSeries,
    pub params: ForecastParams,
}
