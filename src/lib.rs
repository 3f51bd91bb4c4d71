//! # utility-forecast
//!
//! Tiered monthly forecasting for household utility metrics.
//!
//! A series is fitted with the most sophisticated model its length supports
//! and degrades to simpler models when a fit fails:
//!
//! 1. Seasonal ARIMA, selected by AIC over a small order grid (24+ points)
//! 2. Holt-Winters with additive trend and season (12+ points)
//! 3. Simple exponential smoothing (3+ points)
//! 4. Moving average, which always succeeds
//!
//! Every forecast carries prediction intervals, is clamped to be
//! non-negative, and can be converted to costs.
//!
//! ```
//! use utility_forecast::prelude::*;
//!
//! let dates: Vec<String> = (0..15)
//!     .map(|i| format!("{}-{:02}-01", 2023 + i / 12, i % 12 + 1))
//!     .collect();
//! let values: Vec<f64> = (0..15).map(|i| 100.0 + 10.0 * (i % 6) as f64).collect();
//!
//! let request = ForecastRequest::new(Target::Gas, dates, values).with_horizon(6);
//! let response = ForecastEngine::default().forecast(&request).unwrap();
//!
//! assert_eq!(response.predicted_dates.len(), 6);
//! assert!(response.predicted_values.iter().all(|v| *v >= 0.0));
//! ```

#![allow(clippy::upper_case_acronyms)]

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod models;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::core::{
        Forecast, ForecastParams, ForecastRequest, ForecastResponse, ModelInfo, ModelKind, Target,
        TimeSeries,
    };
    pub use crate::engine::{ForecastEngine, Tier};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::Forecaster;
}
