//! Forecast result structure for holding predictions.

use crate::error::{ForecastError, Result};

/// Point predictions with optional prediction interval bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    point: Vec<f64>,
    lower: Option<Vec<f64>>,
    upper: Option<Vec<f64>>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecast from point predictions.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            point: values,
            lower: None,
            upper: None,
        }
    }

    /// Create a forecast with prediction intervals.
    pub fn from_values_with_intervals(values: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>) -> Self {
        Self {
            point: values,
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Get the forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Point predictions.
    pub fn point(&self) -> &[f64] {
        &self.point
    }

    pub fn has_lower(&self) -> bool {
        self.lower.is_some()
    }

    pub fn has_upper(&self) -> bool {
        self.upper.is_some()
    }

    /// Lower interval bounds.
    pub fn lower(&self) -> Result<&[f64]> {
        self.lower
            .as_deref()
            .ok_or_else(|| ForecastError::ComputationError("forecast has no lower bounds".into()))
    }

    /// Upper interval bounds.
    pub fn upper(&self) -> Result<&[f64]> {
        self.upper
            .as_deref()
            .ok_or_else(|| ForecastError::ComputationError("forecast has no upper bounds".into()))
    }

    /// Width of the interval at each step.
    pub fn interval_widths(&self) -> Result<Vec<f64>> {
        let lower = self.lower()?;
        let upper = self.upper()?;
        Ok(upper.iter().zip(lower).map(|(u, l)| u - l).collect())
    }

    /// Whether every point and bound is finite.
    pub fn is_finite(&self) -> bool {
        let finite = |s: &[f64]| s.iter().all(|v| v.is_finite());
        finite(&self.point)
            && self.lower.as_deref().map_or(true, finite)
            && self.upper.as_deref().map_or(true, finite)
    }

    /// Clamp points and bounds to be non-negative.
    ///
    /// Clamping is monotone, so `lower <= point <= upper` survives it.
    pub fn clamp_non_negative(mut self) -> Self {
        let clamp = |s: &mut Vec<f64>| s.iter_mut().for_each(|v| *v = v.max(0.0));
        clamp(&mut self.point);
        if let Some(lower) = self.lower.as_mut() {
            clamp(lower);
        }
        if let Some(upper) = self.upper.as_mut() {
            clamp(upper);
        }
        self
    }

    /// Split into `(point, lower, upper)`.
    ///
    /// Missing bounds collapse onto the point forecast.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let lower = self.lower.unwrap_or_else(|| self.point.clone());
        let upper = self.upper.unwrap_or_else(|| self.point.clone());
        (self.point, lower, upper)
    }
}
