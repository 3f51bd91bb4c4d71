//! Seasonal ARIMA model estimated by conditional sum of squares.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::arima::polynomial::{
    ar_polynomial, differencing_polynomial, ma_polynomial, poly_mul, psi_weights,
};
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::normal_quantile;

/// Default iteration cap for coefficient estimation.
pub const DEFAULT_MAX_ITER: usize = 50;

/// Seasonal part of a SARIMA order, (P, D, Q)\[s\].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalOrder {
    /// Seasonal AR order (P).
    pub p: usize,
    /// Seasonal differencing order (D).
    pub d: usize,
    /// Seasonal MA order (Q).
    pub q: usize,
    /// Seasonal period.
    pub s: usize,
}

impl SeasonalOrder {
    pub fn new(p: usize, d: usize, q: usize, s: usize) -> Self {
        Self { p, d, q, s }
    }

    /// No seasonal component.
    pub fn none() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn is_seasonal(&self) -> bool {
        self.p > 0 || self.d > 0 || self.q > 0
    }

    /// `[P, D, Q, s]`.
    pub fn to_vec(self) -> Vec<usize> {
        vec![self.p, self.d, self.q, self.s]
    }
}

impl Default for SeasonalOrder {
    fn default() -> Self {
        Self::new(1, 0, 1, 12)
    }
}

/// Model order (p, d, q)(P, D, Q)\[s\].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOrder {
    /// Non-seasonal AR order.
    pub p: usize,
    /// Non-seasonal differencing order.
    pub d: usize,
    /// Non-seasonal MA order.
    pub q: usize,
    /// Seasonal component.
    pub seasonal: SeasonalOrder,
}

impl ModelOrder {
    pub fn new(p: usize, d: usize, q: usize, seasonal: SeasonalOrder) -> Self {
        Self { p, d, q, seasonal }
    }

    /// Non-seasonal ARIMA(p, d, q).
    pub fn non_seasonal(p: usize, d: usize, q: usize) -> Self {
        Self::new(p, d, q, SeasonalOrder::none())
    }

    /// Number of estimated coefficients (AR, MA, seasonal AR, seasonal MA).
    pub fn num_coefficients(&self) -> usize {
        self.p + self.q + self.seasonal.p + self.seasonal.q
    }

    /// Parameters counted by AIC: coefficients plus the innovation variance.
    pub fn num_params(&self) -> usize {
        self.num_coefficients() + 1
    }

    /// Degree of the full autoregressive polynomial, differencing included.
    /// The residual recursion starts at this index.
    pub fn ar_degree(&self) -> usize {
        self.p + self.d + self.seasonal.s * (self.seasonal.p + self.seasonal.d)
    }

    /// `[p, d, q]`.
    pub fn to_vec(self) -> Vec<usize> {
        vec![self.p, self.d, self.q]
    }
}

impl fmt::Display for ModelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SARIMA({},{},{})", self.p, self.d, self.q)?;
        if self.seasonal.is_seasonal() {
            write!(
                f,
                "({},{},{})[{}]",
                self.seasonal.p, self.seasonal.d, self.seasonal.q, self.seasonal.s
            )?;
        }
        Ok(())
    }
}

/// Multiplicative seasonal ARIMA without constant term.
///
/// The model is `φ(B) Φ(B^s) (1-B)^d (1-B^s)^D y_t = θ(B) Θ(B^s) e_t`, fitted
/// on the original scale. Coefficients are estimated by minimizing the
/// conditional sum of squares with Nelder-Mead and are not constrained to
/// the stationary or invertible region.
///
/// Prediction intervals come from the MA(∞) form of the fitted model:
/// `var_h = σ² Σ_{j<h} ψ_j²`.
#[derive(Debug, Clone)]
pub struct SARIMA {
    order: ModelOrder,
    max_iter: usize,
    ar_coefficients: Vec<f64>,
    ma_coefficients: Vec<f64>,
    seasonal_ar_coefficients: Vec<f64>,
    seasonal_ma_coefficients: Vec<f64>,
    /// Full AR polynomial, differencing included.
    ar_poly: Vec<f64>,
    /// Full MA polynomial.
    ma_poly: Vec<f64>,
    values: Option<Vec<f64>>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    sigma2: Option<f64>,
    aic: Option<f64>,
}

impl SARIMA {
    /// Create an unfitted model with the given order.
    pub fn new(order: ModelOrder) -> Self {
        Self {
            order,
            max_iter: DEFAULT_MAX_ITER,
            ar_coefficients: vec![],
            ma_coefficients: vec![],
            seasonal_ar_coefficients: vec![],
            seasonal_ma_coefficients: vec![],
            ar_poly: vec![1.0],
            ma_poly: vec![1.0],
            values: None,
            fitted: None,
            residuals: None,
            sigma2: None,
            aic: None,
        }
    }

    /// Cap the optimizer iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn order(&self) -> ModelOrder {
        self.order
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    pub fn seasonal_ar_coefficients(&self) -> &[f64] {
        &self.seasonal_ar_coefficients
    }

    pub fn seasonal_ma_coefficients(&self) -> &[f64] {
        &self.seasonal_ma_coefficients
    }

    /// Akaike information criterion of the fit.
    pub fn aic(&self) -> Option<f64> {
        self.aic
    }

    /// Innovation variance, `CSS / n_eff`.
    pub fn sigma2(&self) -> Option<f64> {
        self.sigma2
    }

    /// Split a flat parameter vector into (AR, MA, seasonal AR, seasonal MA).
    fn split_params(order: &ModelOrder, params: &[f64]) -> [Vec<f64>; 4] {
        let sizes = [order.p, order.q, order.seasonal.p, order.seasonal.q];
        let mut offset = 0;
        sizes.map(|size| {
            let block = params[offset..offset + size].to_vec();
            offset += size;
            block
        })
    }

    /// Full (AR, MA) lag polynomials for a parameter vector.
    fn polynomials(order: &ModelOrder, params: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let [ar, ma, sar, sma] = Self::split_params(order, params);
        let s = order.seasonal.s;

        let ar_poly = [
            ar_polynomial(&sar, s),
            differencing_polynomial(order.d, 1),
            differencing_polynomial(order.seasonal.d, s),
        ]
        .iter()
        .fold(ar_polynomial(&ar, 1), |acc, factor| poly_mul(&acc, factor));
        let ma_poly = poly_mul(&ma_polynomial(&ma, 1), &ma_polynomial(&sma, s));

        (ar_poly, ma_poly)
    }

    /// Conditional residuals of `a(B) y_t = m(B) e_t`.
    ///
    /// Residuals before the AR degree are conditioned to zero.
    fn css_residuals(values: &[f64], ar_poly: &[f64], ma_poly: &[f64]) -> Vec<f64> {
        let n = values.len();
        let start = ar_poly.len() - 1;
        let mut residuals = vec![0.0; n];

        for t in start..n {
            let mut pred = 0.0;
            for (i, a) in ar_poly.iter().enumerate().skip(1) {
                pred -= a * values[t - i];
            }
            for (j, m) in ma_poly.iter().enumerate().skip(1).take_while(|(j, _)| *j <= t) {
                pred += m * residuals[t - j];
            }
            residuals[t] = values[t] - pred;
        }

        residuals
    }

    fn calculate_css(values: &[f64], order: &ModelOrder, params: &[f64]) -> f64 {
        let (ar_poly, ma_poly) = Self::polynomials(order, params);
        let start = ar_poly.len() - 1;
        Self::css_residuals(values, &ar_poly, &ma_poly)[start..]
            .iter()
            .map(|e| e * e)
            .sum()
    }

    /// Small decaying starting values within each coefficient block.
    fn initial_params(order: &ModelOrder) -> Vec<f64> {
        [order.p, order.q, order.seasonal.p, order.seasonal.q]
            .iter()
            .flat_map(|&size| (0..size).map(|i| 0.1 / (i + 1) as f64))
            .collect()
    }

    fn estimate_parameters(&self, values: &[f64]) -> Vec<f64> {
        let initial = Self::initial_params(&self.order);
        if initial.is_empty() {
            return initial;
        }

        let order = self.order;
        let result = nelder_mead(
            |params| Self::calculate_css(values, &order, params),
            &initial,
            None,
            NelderMeadConfig::default().with_max_iter(self.max_iter),
        );
        result.optimal_point
    }
}

impl Forecaster for SARIMA {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.values();
        let order = self.order;

        if order.seasonal.is_seasonal() && order.seasonal.s < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal period must be at least 2, got {}",
                order.seasonal.s
            )));
        }

        let start = order.ar_degree();
        let k = order.num_params();
        // Need more conditional residuals than parameters
        if values.len() <= start + k {
            return Err(ForecastError::InsufficientData {
                needed: start + k + 1,
                got: values.len(),
            });
        }

        let params = self.estimate_parameters(values);
        let (ar_poly, ma_poly) = Self::polynomials(&order, &params);
        let residuals = Self::css_residuals(values, &ar_poly, &ma_poly);

        let n_eff = (values.len() - start) as f64;
        let css: f64 = residuals[start..].iter().map(|e| e * e).sum();
        let sigma2 = css / n_eff;
        let ll = -0.5 * n_eff * (1.0 + (2.0 * std::f64::consts::PI * sigma2).ln());
        let aic = -2.0 * ll + 2.0 * k as f64;

        if !sigma2.is_finite() || !aic.is_finite() {
            return Err(ForecastError::ComputationError(format!(
                "{} produced a non-finite fit (sigma2 = {}, aic = {})",
                order, sigma2, aic
            )));
        }

        let fitted = values.iter().zip(&residuals).map(|(y, e)| y - e).collect();
        let [ar, ma, sar, sma] = Self::split_params(&order, &params);

        self.ar_coefficients = ar;
        self.ma_coefficients = ma;
        self.seasonal_ar_coefficients = sar;
        self.seasonal_ma_coefficients = sma;
        self.ar_poly = ar_poly;
        self.ma_poly = ma_poly;
        self.values = Some(values.to_vec());
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        self.sigma2 = Some(sigma2);
        self.aic = Some(aic);

        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let values = self.values.as_ref().ok_or(ForecastError::FitRequired)?;
        let residuals = self.residuals.as_ref().ok_or(ForecastError::FitRequired)?;
        let n = values.len();

        let mut extended = values.clone();
        let mut extended_residuals = residuals.clone();

        for _ in 0..horizon {
            let t = extended.len();
            let mut pred = 0.0;
            for (i, a) in self.ar_poly.iter().enumerate().skip(1) {
                pred -= a * extended[t - i];
            }
            // Future innovations are zero
            for (j, m) in self.ma_poly.iter().enumerate().skip(1).take_while(|(j, _)| *j <= t) {
                pred += m * extended_residuals[t - j];
            }
            extended.push(pred);
            extended_residuals.push(0.0);
        }

        let predictions = extended.split_off(n);
        if predictions.iter().any(|p| !p.is_finite()) {
            return Err(ForecastError::ComputationError(format!(
                "{} produced non-finite forecasts",
                self.order
            )));
        }

        Ok(Forecast::from_values(predictions))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let sigma2 = self.sigma2.ok_or(ForecastError::FitRequired)?;
        let point = self.predict(horizon)?.into_parts().0;
        let z = normal_quantile(level)?;

        let psi = psi_weights(&self.ar_poly, &self.ma_poly, horizon);
        let mut cumulative = 0.0;
        let (lower, upper): (Vec<f64>, Vec<f64>) = point
            .iter()
            .zip(&psi)
            .map(|(p, w)| {
                cumulative += w * w;
                let se = (sigma2 * cumulative).sqrt();
                (p - z * se, p + z * se)
            })
            .unzip();

        let forecast = Forecast::from_values_with_intervals(point, lower, upper);
        if !forecast.is_finite() {
            return Err(ForecastError::ComputationError(format!(
                "{} produced non-finite prediction intervals",
                self.order
            )));
        }
        Ok(forecast)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "SARIMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn make_series(values: Vec<f64>) -> TimeSeries {
        let base = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let dates = (0..values.len())
            .map(|i| base + Duration::days(30 * i as i64))
            .collect();
        TimeSeries::new(dates, values).unwrap()
    }

    /// Deterministic noise in [-0.5, 0.5).
    fn lcg_noise(n: usize, seed: u64) -> Vec<f64> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (state >> 33) as f64 / (1u64 << 31) as f64 - 0.5
            })
            .collect()
    }

    fn seasonal_data(n: usize) -> Vec<f64> {
        let noise = lcg_noise(n, 7);
        (0..n)
            .map(|i| {
                let t = i as f64;
                200.0 + 0.8 * t + 40.0 * (2.0 * std::f64::consts::PI * t / 12.0).cos() + 5.0 * noise[i]
            })
            .collect()
    }

    #[test]
    fn order_counts() {
        let order = ModelOrder::new(2, 1, 2, SeasonalOrder::default());
        assert_eq!(order.num_coefficients(), 6);
        assert_eq!(order.num_params(), 7);
        assert_eq!(order.ar_degree(), 2 + 1 + 12);
        assert_eq!(order.to_vec(), vec![2, 1, 2]);
        assert_eq!(order.seasonal.to_vec(), vec![1, 0, 1, 12]);
        assert_eq!(order.to_string(), "SARIMA(2,1,2)(1,0,1)[12]");
        assert_eq!(ModelOrder::non_seasonal(1, 0, 0).to_string(), "SARIMA(1,0,0)");
    }

    #[test]
    fn polynomials_combine_all_factors() {
        let order = ModelOrder::new(1, 1, 1, SeasonalOrder::new(1, 0, 1, 4));
        let (ar, ma) = SARIMA::polynomials(&order, &[0.5, 0.3, 0.2, 0.1]);

        // (1 - 0.5B)(1 - 0.2B^4)(1 - B)
        assert_eq!(ar.len(), 7);
        assert_relative_eq!(ar[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(ar[1], -1.5, epsilon = 1e-12);
        assert_relative_eq!(ar[2], 0.5, epsilon = 1e-12);
        assert_relative_eq!(ar[4], -0.2, epsilon = 1e-12);
        assert_relative_eq!(ar[5], 0.3, epsilon = 1e-12);
        assert_relative_eq!(ar[6], -0.1, epsilon = 1e-12);

        // (1 + 0.3B)(1 + 0.1B^4)
        assert_eq!(ma.len(), 6);
        assert_relative_eq!(ma[1], 0.3, epsilon = 1e-12);
        assert_relative_eq!(ma[4], 0.1, epsilon = 1e-12);
        assert_relative_eq!(ma[5], 0.03, epsilon = 1e-12);
    }

    #[test]
    fn css_residuals_known_values() {
        // AR(1), phi = 0.5
        let residuals = SARIMA::css_residuals(&[1.0, 2.0, 3.0], &[1.0, -0.5], &[1.0]);
        assert_eq!(residuals, vec![0.0, 1.5, 2.0]);

        // MA(1), theta = 0.5: e_t = y_t - 0.5 e_{t-1}
        let residuals = SARIMA::css_residuals(&[1.0, 2.0, 3.0], &[1.0], &[1.0, 0.5]);
        assert_eq!(residuals, vec![1.0, 1.5, 2.25]);
    }

    #[test]
    fn random_walk_has_closed_form_fit() {
        let ts = make_series(vec![1.0, 2.0, 4.0, 7.0, 11.0]);
        let mut model = SARIMA::new(ModelOrder::non_seasonal(0, 1, 0));
        model.fit(&ts).unwrap();

        // Residuals are the first differences 1, 2, 3, 4
        assert_relative_eq!(model.sigma2().unwrap(), 7.5, epsilon = 1e-12);

        let forecast = model.predict_with_intervals(3, 0.95).unwrap();
        assert_eq!(forecast.point(), &[11.0, 11.0, 11.0]);

        let z = normal_quantile(0.95).unwrap();
        for (h, w) in forecast.interval_widths().unwrap().iter().enumerate() {
            assert_relative_eq!(*w, 2.0 * z * (7.5 * (h + 1) as f64).sqrt(), epsilon = 1e-9);
        }
    }

    #[test]
    fn ar1_coefficient_is_recovered() {
        let noise = lcg_noise(200, 42);
        let mut values = vec![0.0];
        for t in 1..200 {
            values.push(0.7 * values[t - 1] + noise[t]);
        }
        let ts = make_series(values);

        let mut model = SARIMA::new(ModelOrder::non_seasonal(1, 0, 0)).with_max_iter(200);
        model.fit(&ts).unwrap();

        let phi = model.ar_coefficients()[0];
        assert!((phi - 0.7).abs() < 0.1, "phi = {}", phi);
    }

    #[test]
    fn seasonal_model_fits_monthly_data() {
        let ts = make_series(seasonal_data(36));
        let mut model = SARIMA::new(ModelOrder::new(1, 1, 1, SeasonalOrder::default()));
        model.fit(&ts).unwrap();

        assert!(model.aic().unwrap().is_finite());
        assert_eq!(model.seasonal_ar_coefficients().len(), 1);
        assert_eq!(model.seasonal_ma_coefficients().len(), 1);

        let forecast = model.predict_with_intervals(12, 0.9).unwrap();
        assert_eq!(forecast.horizon(), 12);
        let lower = forecast.lower().unwrap();
        let upper = forecast.upper().unwrap();
        for (i, p) in forecast.point().iter().enumerate() {
            assert!(lower[i] <= *p && *p <= upper[i]);
        }
        let widths = forecast.interval_widths().unwrap();
        assert!(widths.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn short_series_is_rejected() {
        let ts = make_series(seasonal_data(20));
        let mut model = SARIMA::new(ModelOrder::new(2, 1, 2, SeasonalOrder::default()));
        assert!(matches!(
            model.fit(&ts),
            Err(ForecastError::InsufficientData { needed: 23, got: 20 })
        ));
    }

    #[test]
    fn zero_variance_fit_fails() {
        // Differencing a straight line leaves a constant; a second difference is zero
        let ts = make_series((0..10).map(|i| i as f64).collect());
        let mut model = SARIMA::new(ModelOrder::non_seasonal(0, 2, 0));
        assert!(matches!(
            model.fit(&ts),
            Err(ForecastError::ComputationError(_))
        ));
    }

    #[test]
    fn seasonal_period_must_be_valid() {
        let ts = make_series(seasonal_data(30));
        let mut model = SARIMA::new(ModelOrder::new(1, 0, 1, SeasonalOrder::new(1, 0, 1, 1)));
        assert!(matches!(
            model.fit(&ts),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn requires_fit() {
        let model = SARIMA::new(ModelOrder::non_seasonal(1, 0, 1));
        assert!(matches!(model.predict(3), Err(ForecastError::FitRequired)));
        assert!(matches!(
            model.predict_with_intervals(3, 0.95),
            Err(ForecastError::FitRequired)
        ));
        assert!(model.aic().is_none());
        assert_eq!(model.name(), "SARIMA");
    }
}
