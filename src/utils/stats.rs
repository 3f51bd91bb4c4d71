//! Statistical utility functions.

use crate::error::{ForecastError, Result};
use statrs::distribution::{ContinuousCDF, Normal};

/// z-score used by the residual-based intervals at high confidence.
pub const Z_HIGH_CONFIDENCE: f64 = 1.96;
/// z-score used by the residual-based intervals below 95% confidence.
pub const Z_LOW_CONFIDENCE: f64 = 1.645;

/// Two-tier z-score approximation for smoothing and baseline intervals.
///
/// Returns 1.96 for `confidence >= 0.95` and 1.645 otherwise. This is not a
/// continuous quantile function.
pub fn two_tier_z_score(confidence: f64) -> f64 {
    if confidence >= 0.95 {
        Z_HIGH_CONFIDENCE
    } else {
        Z_LOW_CONFIDENCE
    }
}

/// Two-sided standard normal quantile for a central interval at `level`.
///
/// # Example
/// ```
/// use utility_forecast::utils::stats::normal_quantile;
///
/// let z = normal_quantile(0.95).unwrap();
/// assert!((z - 1.96).abs() < 0.001);
/// ```
pub fn normal_quantile(level: f64) -> Result<f64> {
    if !(level > 0.0 && level < 1.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "interval level must be in (0, 1), got {}",
            level
        )));
    }
    let normal =
        Normal::new(0.0, 1.0).map_err(|e| ForecastError::ComputationError(e.to_string()))?;
    Ok(normal.inverse_cdf(1.0 - (1.0 - level) / 2.0))
}

/// Largest absolute value in a slice.
fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

/// Calculate the mean of a slice.
///
/// Falls back to summing values scaled by their largest magnitude when the
/// plain sum overflows.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        return sum / n;
    }
    let scale = max_abs(values);
    if !scale.is_finite() {
        return sum / n;
    }
    scale * (values.iter().map(|v| v / scale).sum::<f64>() / n)
}

/// Root of the centered sum of squares over `denominator`.
fn spread(values: &[f64], denominator: f64) -> f64 {
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    if sum_sq.is_finite() {
        return (sum_sq / denominator).sqrt();
    }

    // Squares overflowed: compute on the unit scale
    let scale = max_abs(values);
    if !scale.is_finite() {
        return (sum_sq / denominator).sqrt();
    }
    let scaled: Vec<f64> = values.iter().map(|v| v / scale).collect();
    let m = mean(&scaled);
    let sum_sq: f64 = scaled.iter().map(|x| (x - m).powi(2)).sum();
    scale * (sum_sq / denominator).sqrt()
}

/// Sample standard deviation (n-1 denominator).
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    spread(values, (values.len() - 1) as f64)
}

/// Population standard deviation (n denominator).
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    spread(values, values.len() as f64)
}
