//! Seasonal ARIMA order selection by exhaustive AIC grid search.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::models::arima::model::{ModelOrder, SeasonalOrder, DEFAULT_MAX_ITER, SARIMA};
use crate::models::Forecaster;

/// Configuration for the SARIMA grid search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SarimaGridConfig {
    /// Non-seasonal AR orders to try.
    pub ar_orders: Vec<usize>,
    /// Non-seasonal differencing orders to try.
    pub diff_orders: Vec<usize>,
    /// Non-seasonal MA orders to try.
    pub ma_orders: Vec<usize>,
    /// Seasonal order shared by every candidate.
    pub seasonal: SeasonalOrder,
    /// Optimizer iteration cap per candidate.
    pub max_iter: usize,
    /// Fit candidates on the rayon thread pool.
    pub parallel: bool,
}

impl Default for SarimaGridConfig {
    fn default() -> Self {
        Self {
            ar_orders: vec![1, 2],
            diff_orders: vec![0, 1],
            ma_orders: vec![1, 2],
            seasonal: SeasonalOrder::default(),
            max_iter: DEFAULT_MAX_ITER,
            parallel: true,
        }
    }
}

impl SarimaGridConfig {
    /// Set the non-seasonal order grid.
    pub fn with_orders(
        mut self,
        ar_orders: Vec<usize>,
        diff_orders: Vec<usize>,
        ma_orders: Vec<usize>,
    ) -> Self {
        self.ar_orders = ar_orders;
        self.diff_orders = diff_orders;
        self.ma_orders = ma_orders;
        self
    }

    /// Set the seasonal order.
    pub fn with_seasonal(mut self, seasonal: SeasonalOrder) -> Self {
        self.seasonal = seasonal;
        self
    }

    /// Set the optimizer iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Run candidates sequentially or in parallel.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Candidate orders in grid order: p, then d, then q, ascending as listed.
    pub fn candidates(&self) -> Vec<ModelOrder> {
        let mut candidates = Vec::new();
        for &p in &self.ar_orders {
            for &d in &self.diff_orders {
                for &q in &self.ma_orders {
                    candidates.push(ModelOrder::new(p, d, q, self.seasonal));
                }
            }
        }
        candidates
    }

    /// Check the grid is searchable.
    pub fn validate(&self) -> Result<()> {
        if self.ar_orders.is_empty() || self.diff_orders.is_empty() || self.ma_orders.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "SARIMA order grid must not be empty".to_string(),
            ));
        }
        if self.seasonal.s < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal period must be at least 2, got {}",
                self.seasonal.s
            )));
        }
        if self.max_iter == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_iter must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Winning candidate of a grid search.
#[derive(Debug, Clone)]
pub struct GridSearchResult {
    /// Fitted winning model.
    pub model: SARIMA,
    /// Winning order.
    pub order: ModelOrder,
    /// AIC of the winning model.
    pub aic: f64,
    /// Number of candidates that fitted successfully.
    pub candidates_fitted: usize,
    /// Number of candidates tried.
    pub candidates_tried: usize,
}

/// Exhaustive AIC search over a SARIMA order grid.
///
/// Every candidate is fitted independently; a failing candidate is logged
/// and skipped. Results are reduced in grid order, so the lowest AIC wins and
/// ties go to the first candidate in the grid regardless of which thread
/// finished first.
#[derive(Debug, Clone, Default)]
pub struct SarimaGridSearch {
    config: SarimaGridConfig,
}

impl SarimaGridSearch {
    pub fn new(config: SarimaGridConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SarimaGridConfig {
        &self.config
    }

    fn fit_candidate(&self, series: &TimeSeries, order: ModelOrder) -> Result<SARIMA> {
        let mut model = SARIMA::new(order).with_max_iter(self.config.max_iter);
        model.fit(series)?;
        Ok(model)
    }

    /// Fit every candidate and return the one with the lowest AIC.
    pub fn search(&self, series: &TimeSeries) -> Result<GridSearchResult> {
        let candidates = self.config.candidates();

        let fit = |order: &ModelOrder| (*order, self.fit_candidate(series, *order));
        let results: Vec<(ModelOrder, Result<SARIMA>)> = if self.config.parallel {
            candidates.par_iter().map(fit).collect()
        } else {
            candidates.iter().map(fit).collect()
        };

        let mut best: Option<(SARIMA, f64)> = None;
        let mut candidates_fitted = 0;

        for (order, result) in results {
            let model = match result {
                Ok(model) => model,
                Err(e) => {
                    debug!(%order, error = %e, "SARIMA candidate failed");
                    continue;
                }
            };
            let Some(aic) = model.aic() else {
                continue;
            };
            candidates_fitted += 1;

            let is_better = best.as_ref().map_or(true, |(_, best_aic)| aic < *best_aic);
            if is_better {
                best = Some((model, aic));
            }
        }

        let (model, aic) = best.ok_or_else(|| {
            ForecastError::ComputationError(format!(
                "none of the {} SARIMA candidates could be fitted",
                candidates.len()
            ))
        })?;
        let order = model.order();

        info!(%order, aic, candidates_fitted, "selected SARIMA order");

        Ok(GridSearchResult {
            model,
            order,
            aic,
            candidates_fitted,
            candidates_tried: candidates.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn make_series(n: usize) -> TimeSeries {
        let base = NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let dates = (0..n).map(|i| base + Duration::days(30 * i as i64)).collect();
        let values = (0..n)
            .map(|i| {
                let t = i as f64;
                300.0
                    + 1.5 * t
                    + 60.0 * (2.0 * std::f64::consts::PI * t / 12.0).sin()
                    + 4.0 * (t * 2.3).cos()
            })
            .collect();
        TimeSeries::new(dates, values).unwrap()
    }

    #[test]
    fn default_grid_has_eight_candidates_in_order() {
        let config = SarimaGridConfig::default();
        let candidates = config.candidates();
        assert_eq!(candidates.len(), 8);

        let orders: Vec<Vec<usize>> = candidates.iter().map(|c| c.to_vec()).collect();
        assert_eq!(
            orders,
            vec![
                vec![1, 0, 1],
                vec![1, 0, 2],
                vec![1, 1, 1],
                vec![1, 1, 2],
                vec![2, 0, 1],
                vec![2, 0, 2],
                vec![2, 1, 1],
                vec![2, 1, 2],
            ]
        );
        assert!(candidates.iter().all(|c| c.seasonal == SeasonalOrder::new(1, 0, 1, 12)));
    }

    #[test]
    fn search_picks_lowest_aic() {
        let series = make_series(36);
        let search = SarimaGridSearch::default();
        let result = search.search(&series).unwrap();

        assert!(result.aic.is_finite());
        assert!(result.candidates_fitted >= 1);
        assert_eq!(result.candidates_tried, 8);
        assert_eq!(result.model.order(), result.order);

        // No other candidate beats the winner
        for order in search.config().candidates() {
            if let Ok(model) = search.fit_candidate(&series, order) {
                assert!(model.aic().unwrap() >= result.aic);
            }
        }
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let series = make_series(30);
        let parallel = SarimaGridSearch::new(SarimaGridConfig::default())
            .search(&series)
            .unwrap();
        let sequential = SarimaGridSearch::new(SarimaGridConfig::default().with_parallel(false))
            .search(&series)
            .unwrap();

        assert_eq!(parallel.order, sequential.order);
        assert_eq!(parallel.aic, sequential.aic);
        assert_eq!(parallel.candidates_fitted, sequential.candidates_fitted);
    }

    #[test]
    fn search_fails_when_no_candidate_fits() {
        // Too short for any seasonal candidate
        let series = make_series(10);
        let result = SarimaGridSearch::default().search(&series);
        assert!(matches!(result, Err(ForecastError::ComputationError(_))));
    }

    #[test]
    fn validate_rejects_bad_grids() {
        assert!(SarimaGridConfig::default().validate().is_ok());
        assert!(SarimaGridConfig::default()
            .with_orders(vec![], vec![0], vec![1])
            .validate()
            .is_err());
        assert!(SarimaGridConfig::default()
            .with_seasonal(SeasonalOrder::new(1, 0, 1, 1))
            .validate()
            .is_err());
        assert!(SarimaGridConfig::default().with_max_iter(0).validate().is_err());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: SarimaGridConfig =
            serde_json::from_str(r#"{"ar_orders": [1], "parallel": false}"#).unwrap();
        assert_eq!(config.ar_orders, vec![1]);
        assert_eq!(config.diff_orders, vec![0, 1]);
        assert!(!config.parallel);
        assert_eq!(config.candidates().len(), 4);
    }
}
