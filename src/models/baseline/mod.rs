//! Baseline forecasting models.
//!
//! Simple methods that always produce a forecast and close the cascade.

mod sma;

pub use sma::{MovingAverage, DEFAULT_WINDOW};
