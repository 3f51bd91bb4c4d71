//! Core data structures for time series forecasting.

mod forecast;
mod request;
mod response;
mod time_series;

pub use forecast::Forecast;
pub use request::{
    ForecastParams, ForecastRequest, Target, ValidatedRequest, MAX_CONFIDENCE, MAX_HORIZON,
    MIN_CONFIDENCE, MIN_HORIZON,
};
pub use response::{
    ConfidenceInterval, ForecastResponse, ModelInfo, ModelKind, ParamValue, MODEL_VERSION,
};
pub use time_series::{parse_iso_date, TimeSeries, MAX_ABS_VALUE, MIN_OBSERVATIONS};
