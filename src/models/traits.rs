//! Forecaster trait defining the common interface for all models.

use crate::core::{Forecast, TimeSeries};
use crate::error::Result;

/// Common interface for all forecasting models.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to the time series data.
    fn fit(&mut self, series: &TimeSeries) -> Result<()>;

    /// Generate point predictions for the specified horizon.
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    /// Generate predictions with the model's own interval rule at `level`.
    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast>;

    /// Get the fitted values (in-sample predictions).
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Get the residuals (actual - fitted).
    fn residuals(&self) -> Option<&[f64]>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

/// Type alias for boxed forecaster trait objects.
pub type BoxedForecaster = Box<dyn Forecaster + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::baseline::MovingAverage;
    use crate::models::exponential::{HoltWinters, SimpleExponentialSmoothing};
    use chrono::{Duration, NaiveDate};

    fn make_series(n: usize) -> TimeSeries {
        let base = NaiveDate::from_ymd_opt(2022, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let dates = (0..n).map(|i| base + Duration::days(30 * i as i64)).collect();
        let values = (0..n)
            .map(|i| 50.0 + 5.0 * (i as f64 * 0.8).sin() + i as f64)
            .collect();
        TimeSeries::new(dates, values).unwrap()
    }

    #[test]
    fn boxed_forecasters_fit_and_predict() {
        let ts = make_series(16);
        let mut models: Vec<BoxedForecaster> = vec![
            Box::new(HoltWinters::auto(8)),
            Box::new(SimpleExponentialSmoothing::auto()),
            Box::new(MovingAverage::new(3)),
        ];

        for model in models.iter_mut() {
            assert!(!model.is_fitted(), "{} fitted too early", model.name());
            model.fit(&ts).unwrap();
            assert!(model.is_fitted());

            let forecast = model.predict_with_intervals(4, 0.95).unwrap();
            assert_eq!(forecast.horizon(), 4);
            assert!(forecast.has_lower() && forecast.has_upper());
        }
    }

    #[test]
    fn residuals_cover_the_series() {
        let ts = make_series(10);
        let mut model: BoxedForecaster = Box::new(SimpleExponentialSmoothing::auto());
        assert!(model.residuals().is_none());

        model.fit(&ts).unwrap();
        assert_eq!(model.residuals().unwrap().len(), 10);
        assert_eq!(model.fitted_values().unwrap().len(), 10);
    }
}
