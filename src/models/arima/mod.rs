//! Seasonal ARIMA models.
//!
//! This module provides:
//! - SARIMA(p, d, q)(P, D, Q)\[s\] estimated by conditional sum of squares
//! - Lag-polynomial helpers for differencing and MA(∞) weights
//! - An AIC grid search over candidate orders

mod grid;
mod model;
mod polynomial;

pub use grid::{GridSearchResult, SarimaGridConfig, SarimaGridSearch};
pub use model::{ModelOrder, SeasonalOrder, DEFAULT_MAX_ITER, SARIMA};
pub use polynomial::{ar_polynomial, differencing_polynomial, ma_polynomial, poly_mul, psi_weights};
