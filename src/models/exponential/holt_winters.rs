//! Holt-Winters forecasting model.
//!
//! Also known as triple exponential smoothing, this model handles
//! data with both trend and seasonality. Only the additive form is provided.

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::intervals::widening_interval;
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::population_std_dev;

/// Longest seasonal period the model adapts to.
pub const MAX_SEASONAL_PERIOD: usize = 12;

/// Additive Holt-Winters forecaster.
///
/// The model equations:
/// - Level: `l_t = α(y_t - s_{t-m}) + (1-α)(l_{t-1} + b_{t-1})`
/// - Trend: `b_t = β(l_t - l_{t-1}) + (1-β)b_{t-1}`
/// - Seasonal: `s_t = γ(y_t - l_t) + (1-γ)s_{t-m}`
/// - Forecast: `ŷ_{t+h} = l_t + h*b_t + s_{t+h-m}`
///
/// The first season initialises the state; residuals are taken from the
/// remaining observations. The interval σ is therefore not a σ over fitted
/// values at every point: the seeded season would contribute zero residuals
/// and narrow the bounds.
#[derive(Debug, Clone)]
pub struct HoltWinters {
    /// Level smoothing parameter (0 < alpha < 1).
    alpha: Option<f64>,
    /// Trend smoothing parameter (0 < beta < 1).
    beta: Option<f64>,
    /// Seasonal smoothing parameter (0 < gamma < 1).
    gamma: Option<f64>,
    seasonal_period: usize,
    optimize: bool,
    level: Option<f64>,
    trend: Option<f64>,
    seasonals: Option<Vec<f64>>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    residual_std: Option<f64>,
    n: usize,
}

impl HoltWinters {
    /// Create a model with fixed smoothing parameters.
    pub fn new(alpha: f64, beta: f64, gamma: f64, seasonal_period: usize) -> Self {
        Self {
            alpha: Some(alpha.clamp(0.0001, 0.9999)),
            beta: Some(beta.clamp(0.0001, 0.9999)),
            gamma: Some(gamma.clamp(0.0001, 0.9999)),
            seasonal_period,
            optimize: false,
            level: None,
            trend: None,
            seasonals: None,
            fitted: None,
            residuals: None,
            residual_std: None,
            n: 0,
        }
    }

    /// Create a model whose smoothing parameters are optimized on fit.
    pub fn auto(seasonal_period: usize) -> Self {
        Self {
            alpha: None,
            beta: None,
            gamma: None,
            seasonal_period,
            optimize: true,
            level: None,
            trend: None,
            seasonals: None,
            fitted: None,
            residuals: None,
            residual_std: None,
            n: 0,
        }
    }

    /// Seasonal period adapted to the series length: `min(12, n / 2)`.
    pub fn adaptive_period(n: usize) -> usize {
        MAX_SEASONAL_PERIOD.min(n / 2)
    }

    /// Optimized model with the period adapted to `n` observations.
    pub fn for_length(n: usize) -> Self {
        Self::auto(Self::adaptive_period(n))
    }

    pub fn alpha(&self) -> Option<f64> {
        self.alpha
    }

    pub fn beta(&self) -> Option<f64> {
        self.beta
    }

    pub fn gamma(&self) -> Option<f64> {
        self.gamma
    }

    pub fn seasonal_period(&self) -> usize {
        self.seasonal_period
    }

    pub fn level(&self) -> Option<f64> {
        self.level
    }

    pub fn trend(&self) -> Option<f64> {
        self.trend
    }

    pub fn seasonals(&self) -> Option<&[f64]> {
        self.seasonals.as_deref()
    }

    /// Population standard deviation of the post-initialisation residuals.
    pub fn residual_std(&self) -> Option<f64> {
        self.residual_std
    }

    /// Initialize level, trend and seasonal indices from the first two seasons.
    fn initialize_state(values: &[f64], period: usize) -> (f64, f64, Vec<f64>) {
        let first_season = &values[..period];
        let level = first_season.iter().sum::<f64>() / period as f64;

        let trend = (0..period)
            .map(|i| (values[period + i] - values[i]) / period as f64)
            .sum::<f64>()
            / period as f64;

        let mut seasonals: Vec<f64> = first_season.iter().map(|y| y - level).collect();
        // Seasonal indices sum to zero
        let adjustment = seasonals.iter().sum::<f64>() / period as f64;
        seasonals.iter_mut().for_each(|s| *s -= adjustment);

        (level, trend, seasonals)
    }

    /// Run the smoothing recursions, calling `on_step(t, forecast)` for every
    /// observation after the first season. Returns the final state.
    fn smooth<F>(
        values: &[f64],
        period: usize,
        (alpha, beta, gamma): (f64, f64, f64),
        mut on_step: F,
    ) -> (f64, f64, Vec<f64>)
    where
        F: FnMut(usize, f64),
    {
        let (mut level, mut trend, mut seasonals) = Self::initialize_state(values, period);

        for (t, &y) in values.iter().enumerate().skip(period) {
            let season_idx = t % period;
            let s = seasonals[season_idx];
            on_step(t, level + trend + s);

            let level_prev = level;
            level = alpha * (y - s) + (1.0 - alpha) * (level_prev + trend);
            trend = beta * (level - level_prev) + (1.0 - beta) * trend;
            seasonals[season_idx] = gamma * (y - level) + (1.0 - gamma) * s;
        }

        (level, trend, seasonals)
    }

    fn calculate_sse(values: &[f64], params: (f64, f64, f64), period: usize) -> f64 {
        let mut sse = 0.0;
        Self::smooth(values, period, params, |t, forecast| {
            sse += (values[t] - forecast).powi(2);
        });
        sse
    }

    fn optimize_params(values: &[f64], period: usize) -> (f64, f64, f64) {
        let bounds = [(0.0001, 0.9999); 3];
        let result = nelder_mead(
            |p| Self::calculate_sse(values, (p[0], p[1], p[2]), period),
            &[0.3, 0.1, 0.1],
            Some(&bounds),
            NelderMeadConfig::default(),
        );

        let p = &result.optimal_point;
        (
            p[0].clamp(0.0001, 0.9999),
            p[1].clamp(0.0001, 0.9999),
            p[2].clamp(0.0001, 0.9999),
        )
    }
}

impl Default for HoltWinters {
    fn default() -> Self {
        Self::auto(MAX_SEASONAL_PERIOD)
    }
}

impl Forecaster for HoltWinters {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.values();
        let period = self.seasonal_period;

        if period < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal period must be at least 2, got {}",
                period
            )));
        }
        if values.len() < 2 * period {
            return Err(ForecastError::InsufficientData {
                needed: 2 * period,
                got: values.len(),
            });
        }

        self.n = values.len();

        if self.optimize {
            let (alpha, beta, gamma) = Self::optimize_params(values, period);
            self.alpha = Some(alpha);
            self.beta = Some(beta);
            self.gamma = Some(gamma);
        }

        let alpha = self.alpha.ok_or(ForecastError::FitRequired)?;
        let beta = self.beta.ok_or(ForecastError::FitRequired)?;
        let gamma = self.gamma.ok_or(ForecastError::FitRequired)?;

        // First season has no fitted values (used for initialization)
        let mut fitted = values[..period].to_vec();
        let mut residuals = vec![0.0; period];
        let (level, trend, seasonals) =
            Self::smooth(values, period, (alpha, beta, gamma), |t, forecast| {
                fitted.push(forecast);
                residuals.push(values[t] - forecast);
            });

        let residual_std = population_std_dev(&residuals[period..]);
        let state_is_finite = level.is_finite()
            && trend.is_finite()
            && seasonals.iter().all(|s| s.is_finite())
            && residual_std.is_finite();
        if !state_is_finite {
            return Err(ForecastError::ComputationError(
                "Holt-Winters state is not finite".to_string(),
            ));
        }

        self.level = Some(level);
        self.trend = Some(trend);
        self.seasonals = Some(seasonals);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        self.residual_std = Some(residual_std);

        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let level = self.level.ok_or(ForecastError::FitRequired)?;
        let trend = self.trend.ok_or(ForecastError::FitRequired)?;
        let seasonals = self.seasonals.as_ref().ok_or(ForecastError::FitRequired)?;
        let period = self.seasonal_period;

        let predictions = (1..=horizon)
            .map(|h| level + h as f64 * trend + seasonals[(self.n + h - 1) % period])
            .collect();

        Ok(Forecast::from_values(predictions))
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
        "HoltWinters(additive)"
    }
}
