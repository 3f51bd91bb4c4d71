//! Residual-based prediction intervals shared by the smoothing and baseline
//! models.

use crate::core::Forecast;
use crate::utils::stats::two_tier_z_score;

/// Intervals that widen with the square root of the step.
///
/// The half-width at step `i` (0-indexed) is `z * sigma * sqrt(i + 1)`, with
/// `z` from [`two_tier_z_score`].
pub fn widening_interval(point: Vec<f64>, sigma: f64, confidence: f64) -> Forecast {
    let z = two_tier_z_score(confidence);
    let (lower, upper) = point
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let half_width = z * sigma * ((i + 1) as f64).sqrt();
            (p - half_width, p + half_width)
        })
        .unzip();
    Forecast::from_values_with_intervals(point, lower, upper)
}

/// Intervals with the same width at every step.
pub fn constant_interval(point: Vec<f64>, sigma: f64, confidence: f64) -> Forecast {
    let half_width = two_tier_z_score(confidence) * sigma;
    let lower = point.iter().map(|p| p - half_width).collect();
    let upper = point.iter().map(|p| p + half_width).collect();
    Forecast::from_values_with_intervals(point, lower, upper)
}
