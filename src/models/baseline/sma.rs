//! Trailing moving-average forecaster.

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::intervals::constant_interval;
use crate::models::Forecaster;
use crate::utils::stats::{mean, std_dev};

/// Default trailing window.
pub const DEFAULT_WINDOW: usize = 3;

/// Moving Average forecaster.
///
/// Predicts every future step as the mean of the last `window` observations.
/// The window shrinks to the series length for short series. Bounds are
/// constant across steps and use the sample standard deviation of the whole
/// series.
///
/// # Example
/// ```
/// use utility_forecast::core::TimeSeries;
/// use utility_forecast::models::baseline::MovingAverage;
///
/// let ts = TimeSeries::from_iso(
///     &["2024-01-01", "2024-02-01", "2024-03-01", "2024-04-01"],
///     vec![4.0, 8.0, 10.0, 12.0],
/// )
/// .unwrap();
///
/// let model = MovingAverage::from_series(&ts, 3);
/// assert_eq!(model.window(), 3);
/// assert_eq!(model.mean(), Some(10.0));
/// ```
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: usize,
    last_mean: Option<f64>,
    std: Option<f64>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

impl MovingAverage {
    /// Create a new moving average with the given window (at least 1).
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            last_mean: None,
            std: None,
            fitted: None,
            residuals: None,
        }
    }

    /// Fit directly from a series. Never fails: `TimeSeries` is non-empty and
    /// finite by construction.
    pub fn from_series(series: &TimeSeries, window: usize) -> Self {
        let mut model = Self::new(window);
        model.fit_values(series.values());
        model
    }

    /// Effective window size. Equals the configured window until fitted on a
    /// shorter series.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Trailing mean used as the point forecast.
    pub fn mean(&self) -> Option<f64> {
        self.last_mean
    }

    /// Sample standard deviation of the fitted series.
    pub fn std(&self) -> Option<f64> {
        self.std
    }

    fn fit_values(&mut self, values: &[f64]) {
        let n = values.len();
        self.window = self.window.min(n).max(1);

        let last_mean = mean(&values[n.saturating_sub(self.window)..]);
        // Fewer than two points carry no spread
        let std = if n < 2 { 0.0 } else { std_dev(values) };

        // Rolling mean of the preceding window; the first point predicts itself
        let fitted: Vec<f64> = (0..n)
            .map(|i| {
                if i == 0 {
                    values[0]
                } else {
                    mean(&values[i.saturating_sub(self.window)..i])
                }
            })
            .collect();
        let residuals = values.iter().zip(&fitted).map(|(y, f)| y - f).collect();

        self.last_mean = Some(last_mean);
        self.std = Some(std);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
    }
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl Forecaster for MovingAverage {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        if series.is_empty() {
            return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
        }
        self.fit_values(series.values());
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let mean = self.last_mean.ok_or(ForecastError::FitRequired)?;
        Ok(Forecast::from_values(vec![mean; horizon]))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let sigma = self.std.ok_or(ForecastError::FitRequired)?;
        let point = self.predict(horizon)?.into_parts().0;
        Ok(constant_interval(point, sigma, level))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "MovingAverage"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn make_series(values: Vec<f64>) -> TimeSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let dates = (0..values.len())
            .map(|i| base + Duration::days(30 * i as i64))
            .collect();
        TimeSeries::new(dates, values).unwrap()
    }

    #[test]
    fn moving_average_uses_trailing_window() {
        let ts = make_series(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        let mut model = MovingAverage::new(3);
        model.fit(&ts).unwrap();

        let forecast = model.predict(3).unwrap();
        for p in forecast.point() {
            assert_relative_eq!(*p, 9.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn moving_average_window_shrinks_to_series() {
        let ts = make_series(vec![2.0, 4.0, 6.0]);
        let model = MovingAverage::from_series(&ts, 12);
        assert_eq!(model.window(), 3);
        assert_relative_eq!(model.mean().unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn moving_average_zero_window_becomes_one() {
        let ts = make_series(vec![2.0, 4.0, 6.0]);
        let model = MovingAverage::from_series(&ts, 0);
        assert_eq!(model.window(), 1);
        assert_relative_eq!(model.mean().unwrap(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn moving_average_interval_uses_sample_std() {
        let values = vec![10.0, 12.0, 14.0, 13.0, 11.0];
        let ts = make_series(values.clone());
        let model = MovingAverage::from_series(&ts, 3);

        let expected_std = std_dev(&values);
        assert_relative_eq!(model.std().unwrap(), expected_std, epsilon = 1e-12);

        let forecast = model.predict_with_intervals(4, 0.95).unwrap();
        for w in forecast.interval_widths().unwrap() {
            assert_relative_eq!(w, 2.0 * 1.96 * expected_std, epsilon = 1e-10);
        }

        let narrow = model.predict_with_intervals(1, 0.8).unwrap();
        assert_relative_eq!(
            narrow.interval_widths().unwrap()[0],
            2.0 * 1.645 * expected_std,
            epsilon = 1e-10
        );
    }

    #[test]
    fn moving_average_constant_series_is_flat() {
        let ts = make_series(vec![7.5; 3]);
        let model = MovingAverage::from_series(&ts, DEFAULT_WINDOW);

        let forecast = model.predict_with_intervals(4, 0.95).unwrap();
        assert_eq!(forecast.point(), &[7.5; 4]);
        assert_eq!(forecast.lower().unwrap(), &[7.5; 4]);
        assert_eq!(forecast.upper().unwrap(), &[7.5; 4]);
    }

    #[test]
    fn moving_average_fitted_values() {
        let ts = make_series(vec![3.0, 5.0, 7.0, 9.0]);
        let model = MovingAverage::from_series(&ts, 2);

        assert_eq!(model.fitted_values().unwrap(), &[3.0, 3.0, 4.0, 6.0]);
        assert_eq!(model.residuals().unwrap(), &[0.0, 2.0, 3.0, 3.0]);
    }

    #[test]
    fn moving_average_requires_fit() {
        let model = MovingAverage::default();
        assert_eq!(model.window(), DEFAULT_WINDOW);
        assert!(matches!(model.predict(2), Err(ForecastError::FitRequired)));
        assert!(!model.is_fitted());
    }
}
