//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};
use crate::models::arima::{SarimaGridConfig, SeasonalOrder};
use crate::models::baseline::DEFAULT_WINDOW;

/// Days between consecutive forecast dates.
pub const DEFAULT_STEP_DAYS: i64 = 30;

/// Configuration for [`ForecastEngine`](crate::engine::ForecastEngine).
///
/// `Default` reproduces the service behaviour: an 8-candidate SARIMA grid
/// with seasonal order (1, 0, 1, 12), a 3-point moving average and 30-day
/// forecast steps.
///
/// # Example
/// ```
/// use utility_forecast::config::EngineConfig;
///
/// let config: EngineConfig =
///     serde_json::from_str(r#"{"step_days": 31, "grid": {"parallel": false}}"#).unwrap();
/// assert_eq!(config.step_days, 31);
/// assert_eq!(config.moving_average_window, 3);
/// assert!(!config.grid.parallel);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// SARIMA tier grid search.
    pub grid: SarimaGridConfig,
    /// Trailing window of the terminal moving-average tier.
    pub moving_average_window: usize,
    /// Days added per forecast step.
    pub step_days: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid: SarimaGridConfig::default(),
            moving_average_window: DEFAULT_WINDOW,
            step_days: DEFAULT_STEP_DAYS,
        }
    }
}

impl EngineConfig {
    /// Replace the SARIMA grid configuration.
    pub fn with_grid(mut self, grid: SarimaGridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Set the seasonal order used by every SARIMA candidate.
    pub fn with_seasonal_order(mut self, seasonal: SeasonalOrder) -> Self {
        self.grid.seasonal = seasonal;
        self
    }

    /// Fit SARIMA candidates in parallel or sequentially.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.grid.parallel = parallel;
        self
    }

    pub fn with_moving_average_window(mut self, window: usize) -> Self {
        self.moving_average_window = window;
        self
    }

    pub fn with_step_days(mut self, step_days: i64) -> Self {
        self.step_days = step_days;
        self
    }

    /// Check every setting is usable.
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        if self.moving_average_window == 0 {
            return Err(ForecastError::InvalidParameter(
                "moving average window must be positive".to_string(),
            ));
        }
        if self.step_days <= 0 {
            return Err(ForecastError::InvalidParameter(format!(
                "step_days must be positive, got {}",
                self.step_days
            )));
        }
        Ok(())
    }
}
