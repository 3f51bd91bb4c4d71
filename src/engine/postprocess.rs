//! Turns a tier's fit into the response shape: dates, clamping and costs.

use chrono::{Duration, NaiveDateTime, Utc};

use crate::core::{ConfidenceInterval, ForecastParams, ForecastResponse, Target, TimeSeries};
use crate::engine::fitters::FitResult;

/// Forecast dates: `last + step_days * i` for `i` in `1..=horizon`.
pub fn forecast_dates(last: NaiveDateTime, horizon: usize, step_days: i64) -> Vec<NaiveDateTime> {
    (1..=horizon as i64)
        .map(|i| last + Duration::days(step_days * i))
        .collect()
}

/// `value * cost_per_unit` for each value, when a cost is supplied.
pub fn predicted_costs(values: &[f64], cost_per_unit: Option<f64>) -> Option<Vec<f64>> {
    cost_per_unit.map(|cost| values.iter().map(|v| v * cost).collect())
}

/// Build the response for a successful fit.
///
/// Values and both bounds are clamped to be non-negative whatever the tier.
pub fn assemble(
    target: Target,
    series: &TimeSeries,
    params: &ForecastParams,
    fit: FitResult,
    step_days: i64,
) -> ForecastResponse {
    let (predicted_values, lower, upper) = fit.forecast.clamp_non_negative().into_parts();
    let predicted_dates = forecast_dates(series.last_date(), predicted_values.len(), step_days);
    let predicted_costs = predicted_costs(&predicted_values, params.cost_per_unit());

    ForecastResponse {
        target,
        model: fit.model,
        predicted_dates,
        predicted_values,
        confidence_interval: ConfidenceInterval { lower, upper },
        predicted_costs,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Forecast, ModelInfo, ModelKind};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn dates_step_thirty_days() {
        let dates = forecast_dates(date(2024, 1, 1), 3, 30);
        assert_eq!(dates, vec![date(2024, 1, 31), date(2024, 3, 1), date(2024, 3, 31)]);
    }

    #[test]
    fn costs_only_with_cost_per_unit() {
        assert_eq!(predicted_costs(&[1.0, 2.0], None), None);
        assert_eq!(predicted_costs(&[1.0, 2.0], Some(2.5)), Some(vec![2.5, 5.0]));
    }

    #[test]
    fn assemble_clamps_every_sequence() {
        let series = TimeSeries::from_iso(&["2024-01-01", "2024-02-01", "2024-03-01"], vec![1.0, 1.0, 1.0])
            .unwrap();
        let params = ForecastParams::new(2, 0.95)
            .unwrap()
            .with_cost_per_unit(3.0)
            .unwrap();
        let fit = FitResult {
            forecast: Forecast::from_values_with_intervals(
                vec![-1.0, 2.0],
                vec![-4.0, -1.0],
                vec![-0.5, 5.0],
            ),
            model: ModelInfo::new(ModelKind::MovingAverage),
        };

        let response = assemble(Target::Electricity, &series, &params, fit, 30);

        assert_eq!(response.predicted_values, vec![0.0, 2.0]);
        assert_eq!(response.confidence_interval.lower, vec![0.0, 0.0]);
        assert_eq!(response.confidence_interval.upper, vec![0.0, 5.0]);
        assert_eq!(response.predicted_costs, Some(vec![0.0, 6.0]));
        assert_eq!(response.predicted_dates, vec![date(2024, 3, 31), date(2024, 4, 30)]);
        assert_eq!(response.target, Target::Electricity);
    }
}
