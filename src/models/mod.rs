//! Forecasting models.

mod intervals;
mod traits;

pub mod arima;
pub mod baseline;
pub mod exponential;

pub use intervals::{constant_interval, widening_interval};
pub use traits::{BoxedForecaster, Forecaster};
