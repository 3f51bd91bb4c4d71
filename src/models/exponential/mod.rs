//! Exponential smoothing models.
//!
//! This module provides the smoothing tiers of the cascade:
//! - Holt-Winters with additive trend and seasonality
//! - Simple Exponential Smoothing (SES)

mod holt_winters;
mod ses;

pub use holt_winters::{HoltWinters, MAX_SEASONAL_PERIOD};
pub use ses::SimpleExponentialSmoothing;
