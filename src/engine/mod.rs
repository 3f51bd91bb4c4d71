//! The tiered forecast engine.
//!
//! A request is validated, a starting tier is chosen from the series length,
//! and tiers are tried in order until one succeeds. The moving-average tier
//! closes the cascade and cannot fail, so every valid request gets a forecast.

pub mod fitters;
pub mod postprocess;
pub mod tier;

use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::core::{ForecastParams, ForecastRequest, ForecastResponse, Target, TimeSeries};
use crate::error::Result;

pub use fitters::{
    FitOutcome, FitResult, HoltWintersFitter, MovingAverageFitter, SarimaFitter, SimpleEsFitter,
    TierFitter,
};
pub use tier::{select_tier, Tier};

/// Tiered forecast engine.
///
/// Holds only configuration, so one engine can serve concurrent requests.
///
/// # Example
/// ```
/// use utility_forecast::core::{ForecastRequest, ModelKind, Target};
/// use utility_forecast::engine::ForecastEngine;
///
/// let request = ForecastRequest::new(
///     Target::Electricity,
///     ["2024-01-01", "2024-02-01", "2024-03-01", "2024-04-01", "2024-05-01"],
///     vec![320.0, 310.0, 290.0, 280.0, 300.0],
/// )
/// .with_horizon(2)
/// .with_cost_per_unit(0.25);
///
/// let response = ForecastEngine::default().forecast(&request).unwrap();
/// assert_eq!(response.predicted_values.len(), 2);
/// assert!(response.predicted_costs.is_some());
/// assert!(matches!(
///     response.model.name,
///     ModelKind::SimpleExponentialSmoothing | ModelKind::MovingAverage
/// ));
/// ```
pub struct ForecastEngine {
    config: EngineConfig,
    fallible: Vec<Box<dyn TierFitter>>,
    terminal: MovingAverageFitter,
}

impl ForecastEngine {
    /// Create an engine from a validated configuration.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let fallible: Vec<Box<dyn TierFitter>> = vec![
            Box::new(SarimaFitter::new(config.grid.clone())),
            Box::new(HoltWintersFitter),
            Box::new(SimpleEsFitter),
        ];
        Self::with_fitters(config, fallible)
    }

    /// Engine over an explicit set of fallible tiers. A tier with no fitter
    /// in the list goes straight to the moving average.
    pub(crate) fn with_fitters(config: EngineConfig, fallible: Vec<Box<dyn TierFitter>>) -> Self {
        let terminal = MovingAverageFitter::new(config.moving_average_window);
        Self {
            config,
            fallible,
            terminal,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate a request and forecast it.
    ///
    /// Only client-input errors are returned; model failures degrade to a
    /// simpler tier instead.
    pub fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResponse> {
        info!(
            utility = %request.target,
            series_length = request.historical_values.len(),
            horizon = request.horizon_months,
            "forecast request received"
        );
        let validated = request.validate()?;
        self.forecast_series(validated.target, &validated.series, &validated.params)
    }

    /// Forecast an already validated series.
    pub fn forecast_series(
        &self,
        target: Target,
        series: &TimeSeries,
        params: &ForecastParams,
    ) -> Result<ForecastResponse> {
        let fit = self.fit(series, params)?;
        let model_name = fit.model.name;
        let response = postprocess::assemble(target, series, params, fit, self.config.step_days);

        info!(utility = %target, model = %model_name, horizon = response.horizon(), "forecast completed");
        Ok(response)
    }

    /// Run the cascade alone, without post-processing.
    pub fn fit(&self, series: &TimeSeries, params: &ForecastParams) -> Result<FitResult> {
        let start = select_tier(series.len())?;
        info!(tier = %start, series_length = series.len(), "selected starting tier");

        let mut tier = Some(start);
        while let Some(current) = tier {
            let Some(fitter) = self.fallible.iter().find(|f| f.tier() == current) else {
                break;
            };
            match fitter.fit(series, params) {
                FitOutcome::Success(fit) => return Ok(fit),
                FitOutcome::Failure(reason) => {
                    tier = current.fallback();
                    warn!(
                        tier = %current,
                        next = %tier.unwrap_or(self.terminal.tier()),
                        reason = %reason,
                        "tier failed, degrading"
                    );
                }
            }
        }

        Ok(self.terminal.fit(series, params))
    }
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

impl std::fmt::Debug for ForecastEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tiers: Vec<Tier> = self.fallible.iter().map(|t| t.tier()).collect();
        f.debug_struct("ForecastEngine")
            .field("config", &self.config)
            .field("tiers", &tiers)
            .finish()
    }
}
