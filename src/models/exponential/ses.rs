//! Simple Exponential Smoothing (SES) forecasting model.
//!
//! SES is suitable for forecasting data with no clear trend or seasonality.

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::intervals::widening_interval;
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::population_std_dev;

/// Simple Exponential Smoothing forecaster.
///
/// The model equation is:
/// `level_t = α × y_t + (1-α) × level_{t-1}`
///
/// where α (alpha) is the smoothing parameter (0 < α < 1). Forecasts are flat
/// at the final level. Intervals widen with `sqrt(step)` around the in-sample
/// residual standard deviation.
///
/// σ excludes the first observation, which seeds the level and always has a
/// zero residual. Including it would narrow the bounds on short series.
///
/// # Example
/// ```
/// use utility_forecast::core::TimeSeries;
/// use utility_forecast::models::exponential::SimpleExponentialSmoothing;
/// use utility_forecast::models::Forecaster;
///
/// let ts = TimeSeries::from_iso(
///     &["2024-01-01", "2024-02-01", "2024-03-01", "2024-04-01"],
///     vec![10.0, 12.0, 11.0, 13.0],
/// )
/// .unwrap();
///
/// let mut model = SimpleExponentialSmoothing::auto();
/// model.fit(&ts).unwrap();
///
/// let forecast = model.predict(3).unwrap();
/// assert_eq!(forecast.horizon(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SimpleExponentialSmoothing {
    /// Smoothing parameter (0 < alpha < 1).
    alpha: Option<f64>,
    /// Whether to optimize alpha automatically.
    optimize: bool,
    /// Current level state.
    level: Option<f64>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    /// Standard deviation of one-step residuals.
    residual_std: Option<f64>,
}

impl SimpleExponentialSmoothing {
    /// Create a new SES model with a fixed smoothing parameter.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: Some(alpha.clamp(0.0001, 0.9999)),
            optimize: false,
            level: None,
            fitted: None,
            residuals: None,
            residual_std: None,
        }
    }

    /// Create a new SES model with automatic alpha optimization.
    ///
    /// Alpha will be chosen to minimize the sum of squared one-step errors.
    pub fn auto() -> Self {
        Self {
            alpha: None,
            optimize: true,
            level: None,
            fitted: None,
            residuals: None,
            residual_std: None,
        }
    }

    /// Get the smoothing parameter.
    pub fn alpha(&self) -> Option<f64> {
        self.alpha
    }

    /// Get the current level.
    pub fn level(&self) -> Option<f64> {
        self.level
    }

    /// Standard deviation of the in-sample residuals.
    pub fn residual_std(&self) -> Option<f64> {
        self.residual_std
    }

    fn calculate_sse(values: &[f64], alpha: f64) -> f64 {
        let mut level = values[0];
        let mut sse = 0.0;
        for &y in &values[1..] {
            let error = y - level;
            sse += error * error;
            level = alpha * y + (1.0 - alpha) * level;
        }
        sse
    }

    fn optimize_alpha(values: &[f64]) -> f64 {
        let config = NelderMeadConfig::default().with_max_iter(500);
        let result = nelder_mead(
            |params| Self::calculate_sse(values, params[0]),
            &[0.5],
            Some(&[(0.0001, 0.9999)]),
            config,
        );
        result.optimal_point[0].clamp(0.0001, 0.9999)
    }
}

impl Default for SimpleExponentialSmoothing {
    fn default() -> Self {
        Self::auto()
    }
}

impl Forecaster for SimpleExponentialSmoothing {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.values();
        if values.len() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: values.len(),
            });
        }

        if self.optimize {
            self.alpha = Some(Self::optimize_alpha(values));
        }
        let alpha = self.alpha.ok_or(ForecastError::FitRequired)?;

        // Initialize level with first observation
        let mut level = values[0];
        let mut fitted = Vec::with_capacity(values.len());
        let mut residuals = Vec::with_capacity(values.len());
        fitted.push(level);
        residuals.push(0.0);

        for &y in &values[1..] {
            fitted.push(level);
            residuals.push(y - level);
            level = alpha * y + (1.0 - alpha) * level;
        }

        // The first residual is zero by construction and carries no information.
        let residual_std = population_std_dev(&residuals[1..]);
        if !level.is_finite() || !residual_std.is_finite() {
            return Err(ForecastError::ComputationError(
                "exponential smoothing state is not finite".to_string(),
            ));
        }

        self.level = Some(level);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        self.residual_std = Some(residual_std);

        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let level = self.level.ok_or(ForecastError::FitRequired)?;
        Ok(Forecast::from_values(vec![level; horizon]))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let sigma = self.residual_std.ok_or(ForecastError::FitRequired)?;
        let point = self.predict(horizon)?.into_parts().0;
        Ok(widening_interval(point, sigma, level))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "SimpleExponentialSmoothing"
    }
}
