//! Model description and forecast response types.

use crate::core::request::Target;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Version tag attached to every [`ModelInfo`].
pub const MODEL_VERSION: &str = "1.0";

/// The model family that produced a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "SARIMAX")]
    Sarimax,
    #[serde(rename = "Holt-Winters")]
    HoltWinters,
    #[serde(rename = "Simple Exponential Smoothing")]
    SimpleExponentialSmoothing,
    #[serde(rename = "Moving Average")]
    MovingAverage,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Sarimax => write!(f, "SARIMAX"),
            ModelKind::HoltWinters => write!(f, "Holt-Winters"),
            ModelKind::SimpleExponentialSmoothing => write!(f, "Simple Exponential Smoothing"),
            ModelKind::MovingAverage => write!(f, "Moving Average"),
        }
    }
}

/// A model parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Count(usize),
    Real(f64),
    Text(String),
    /// An order tuple such as `(p, d, q)`.
    Order(Vec<usize>),
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        ParamValue::Count(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Real(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<Vec<usize>> for ParamValue {
    fn from(value: Vec<usize>) -> Self {
        ParamValue::Order(value)
    }
}

/// Descriptive information about the fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: ModelKind,
    pub version: String,
    pub parameters: BTreeMap<String, ParamValue>,
    pub fit_stats: BTreeMap<String, f64>,
}

impl ModelInfo {
    pub fn new(name: ModelKind) -> Self {
        Self {
            name,
            version: MODEL_VERSION.to_string(),
            parameters: BTreeMap::new(),
            fit_stats: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(name.to_string(), value.into());
        self
    }

    pub fn with_stat(mut self, name: &str, value: f64) -> Self {
        self.fit_stats.insert(name.to_string(), value);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ParamValue> {
        self.parameters.get(name)
    }

    pub fn stat(&self, name: &str) -> Option<f64> {
        self.fit_stats.get(name).copied()
    }
}

/// Lower and upper prediction interval bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// The result returned to the caller for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub target: Target,
    pub model: ModelInfo,
    pub predicted_dates: Vec<NaiveDateTime>,
    pub predicted_values: Vec<f64>,
    pub confidence_interval: ConfidenceInterval,
    /// Present only when a cost per unit was supplied.
    pub predicted_costs: Option<Vec<f64>>,
    pub created_at: DateTime<Utc>,
}

impl ForecastResponse {
    pub fn horizon(&self) -> usize {
        self.predicted_values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_kind_display_matches_wire_names() {
        assert_eq!(ModelKind::Sarimax.to_string(), "SARIMAX");
        assert_eq!(ModelKind::HoltWinters.to_string(), "Holt-Winters");
        assert_eq!(
            ModelKind::SimpleExponentialSmoothing.to_string(),
            "Simple Exponential Smoothing"
        );
        assert_eq!(ModelKind::MovingAverage.to_string(), "Moving Average");
    }

    #[test]
    fn model_info_builder_records_parameters_and_stats() {
        let info = ModelInfo::new(ModelKind::Sarimax)
            .with_parameter("order", vec![1, 1, 2])
            .with_parameter("trend", "add")
            .with_parameter("window", 3usize)
            .with_parameter("smoothing_level", 0.4)
            .with_stat("aic", 123.4);

        assert_eq!(info.version, MODEL_VERSION);
        assert_eq!(info.parameter("order"), Some(&ParamValue::Order(vec![1, 1, 2])));
        assert_eq!(info.parameter("trend"), Some(&ParamValue::Text("add".into())));
        assert_eq!(info.parameter("window"), Some(&ParamValue::Count(3)));
        assert_eq!(info.parameter("smoothing_level"), Some(&ParamValue::Real(0.4)));
        assert_eq!(info.stat("aic"), Some(123.4));
        assert_eq!(info.stat("bic"), None);
    }
}
