//! Tier fitters: one fitting strategy per tier, each producing a forecast
//! with intervals and a model description.

use crate::core::{Forecast, ForecastParams, ModelInfo, ModelKind, TimeSeries};
use crate::engine::tier::Tier;
use crate::error::{ForecastError, Result};
use crate::models::arima::{SarimaGridConfig, SarimaGridSearch};
use crate::models::baseline::MovingAverage;
use crate::models::constant_interval;
use crate::models::exponential::{HoltWinters, SimpleExponentialSmoothing};
use crate::models::Forecaster;

/// A fitted forecast before post-processing.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    /// Point forecast with lower and upper bounds.
    pub forecast: Forecast,
    /// Description of the model that produced it.
    pub model: ModelInfo,
}

/// Outcome of one tier attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum FitOutcome {
    Success(FitResult),
    /// The tier could not produce a forecast; the cascade moves on.
    Failure(ForecastError),
}

impl From<Result<FitResult>> for FitOutcome {
    fn from(result: Result<FitResult>) -> Self {
        match result {
            Ok(fit) => FitOutcome::Success(fit),
            Err(e) => FitOutcome::Failure(e),
        }
    }
}

/// A fallible tier in the cascade.
pub trait TierFitter: Send + Sync {
    /// The tier this fitter implements.
    fn tier(&self) -> Tier;

    /// Fit the series and forecast `params.horizon()` steps.
    fn fit(&self, series: &TimeSeries, params: &ForecastParams) -> FitOutcome;
}

/// Seasonal ARIMA tier: AIC grid search with model-native intervals.
#[derive(Debug, Clone, Default)]
pub struct SarimaFitter {
    search: SarimaGridSearch,
}

impl SarimaFitter {
    pub fn new(config: SarimaGridConfig) -> Self {
        Self {
            search: SarimaGridSearch::new(config),
        }
    }

    fn try_fit(&self, series: &TimeSeries, params: &ForecastParams) -> Result<FitResult> {
        let best = self.search.search(series)?;
        let forecast = best
            .model
            .predict_with_intervals(params.horizon(), params.confidence_level())?;

        let mut model = ModelInfo::new(ModelKind::Sarimax)
            .with_parameter("order", best.order.to_vec())
            .with_parameter("seasonal_order", best.order.seasonal.to_vec())
            .with_stat("aic", best.aic)
            .with_stat("series_length", series.len() as f64)
            .with_stat("candidates_fitted", best.candidates_fitted as f64);
        if let Some(sigma2) = best.model.sigma2() {
            model = model.with_stat("sigma2", sigma2);
        }

        Ok(FitResult { forecast, model })
    }
}

impl TierFitter for SarimaFitter {
    fn tier(&self) -> Tier {
        Tier::Sarima
    }

    fn fit(&self, series: &TimeSeries, params: &ForecastParams) -> FitOutcome {
        self.try_fit(series, params).into()
    }
}

/// Holt-Winters tier: additive trend and season, period adapted to length.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoltWintersFitter;

impl HoltWintersFitter {
    fn try_fit(&self, series: &TimeSeries, params: &ForecastParams) -> Result<FitResult> {
        let mut hw = HoltWinters::for_length(series.len());
        hw.fit(series)?;
        let forecast = hw.predict_with_intervals(params.horizon(), params.confidence_level())?;

        let mut model = ModelInfo::new(ModelKind::HoltWinters)
            .with_parameter("trend", "add")
            .with_parameter("seasonal", "add")
            .with_parameter("seasonal_periods", hw.seasonal_period())
            .with_stat("series_length", series.len() as f64);
        for (name, value) in [
            ("smoothing_level", hw.alpha()),
            ("smoothing_trend", hw.beta()),
            ("smoothing_seasonal", hw.gamma()),
        ] {
            if let Some(value) = value {
                model = model.with_parameter(name, value);
            }
        }
        if let Some(std) = hw.residual_std() {
            model = model.with_stat("residual_std", std);
        }

        Ok(FitResult { forecast, model })
    }
}

impl TierFitter for HoltWintersFitter {
    fn tier(&self) -> Tier {
        Tier::HoltWinters
    }

    fn fit(&self, series: &TimeSeries, params: &ForecastParams) -> FitOutcome {
        self.try_fit(series, params).into()
    }
}

/// Simple exponential smoothing tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleEsFitter;

impl SimpleEsFitter {
    fn try_fit(&self, series: &TimeSeries, params: &ForecastParams) -> Result<FitResult> {
        let mut ses = SimpleExponentialSmoothing::auto();
        ses.fit(series)?;
        let forecast = ses.predict_with_intervals(params.horizon(), params.confidence_level())?;

        let mut model = ModelInfo::new(ModelKind::SimpleExponentialSmoothing)
            .with_stat("series_length", series.len() as f64);
        if let Some(alpha) = ses.alpha() {
            model = model.with_parameter("smoothing_level", alpha);
        }
        if let Some(std) = ses.residual_std() {
            model = model.with_stat("residual_std", std);
        }

        Ok(FitResult { forecast, model })
    }
}

impl TierFitter for SimpleEsFitter {
    fn tier(&self) -> Tier {
        Tier::SimpleEs
    }

    fn fit(&self, series: &TimeSeries, params: &ForecastParams) -> FitOutcome {
        self.try_fit(series, params).into()
    }
}

/// Terminal moving-average tier. Always produces a forecast.
#[derive(Debug, Clone, Copy)]
pub struct MovingAverageFitter {
    window: usize,
}

impl MovingAverageFitter {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    pub fn tier(&self) -> Tier {
        Tier::MovingAverage
    }

    /// Fit the trailing mean and forecast `params.horizon()` steps.
    pub fn fit(&self, series: &TimeSeries, params: &ForecastParams) -> FitResult {
        let ma = MovingAverage::from_series(series, self.window);
        // Set by from_series
        let mean = ma.mean().unwrap_or_default();
        let std = ma.std().unwrap_or_default();

        let forecast = constant_interval(
            vec![mean; params.horizon()],
            std,
            params.confidence_level(),
        );
        let model = ModelInfo::new(ModelKind::MovingAverage)
            .with_parameter("window", ma.window())
            .with_stat("series_length", series.len() as f64)
            .with_stat("mean", mean)
            .with_stat("std", std);

        FitResult { forecast, model }
    }
}

impl Default for MovingAverageFitter {
    fn default() -> Self {
        Self::new(crate::models::baseline::DEFAULT_WINDOW)
    }
}
