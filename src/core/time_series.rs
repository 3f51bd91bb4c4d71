//! TimeSeries data structure for representing historical observations.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Minimum number of observations any forecast needs.
pub const MIN_OBSERVATIONS: usize = 3;

/// Largest accepted magnitude for an observation. Squared residuals and
/// interval bounds stay finite below it.
pub const MAX_ABS_VALUE: f64 = 1e100;

/// An immutable univariate time series.
///
/// Construction guarantees:
/// - `dates.len() == values.len() >= MIN_OBSERVATIONS`
/// - dates are strictly increasing
/// - every value is finite with magnitude at most [`MAX_ABS_VALUE`]
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    dates: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a validated time series.
    pub fn new(dates: Vec<NaiveDateTime>, values: Vec<f64>) -> Result<Self> {
        if values.len() < MIN_OBSERVATIONS {
            return Err(ForecastError::InsufficientData {
                needed: MIN_OBSERVATIONS,
                got: values.len(),
            });
        }

        if dates.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: values.len(),
                got: dates.len(),
            });
        }

        // Validate dates are strictly increasing
        for i in 1..dates.len() {
            if dates[i] <= dates[i - 1] {
                return Err(ForecastError::TimestampError(format!(
                    "dates must be strictly increasing (index {})",
                    i
                )));
            }
        }

        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "value at index {} is not finite",
                index
            )));
        }

        if let Some(index) = values.iter().position(|v| v.abs() > MAX_ABS_VALUE) {
            return Err(ForecastError::InvalidParameter(format!(
                "value at index {} exceeds the supported magnitude {:e}",
                index, MAX_ABS_VALUE
            )));
        }

        Ok(Self { dates, values })
    }

    /// Create a time series from ISO-8601 date strings.
    pub fn from_iso<S: AsRef<str>>(dates: &[S], values: Vec<f64>) -> Result<Self> {
        let parsed = dates
            .iter()
            .map(|d| parse_iso_date(d.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(parsed, values)
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: a valid series holds at least [`MIN_OBSERVATIONS`] points.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDateTime] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The most recent observation date.
    pub fn last_date(&self) -> NaiveDateTime {
        // Non-empty by construction.
        self.dates[self.dates.len() - 1]
    }
}

/// Parse an ISO-8601 date or date-time.
///
/// Accepts `2024-01-31`, `2024-01-31T10:00:00` and RFC 3339 timestamps with an
/// offset, which are normalised to UTC.
pub fn parse_iso_date(raw: &str) -> Result<NaiveDateTime> {
    let trimmed = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    if let Ok(datetime) = trimmed.parse::<NaiveDateTime>() {
        return Ok(datetime);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.naive_utc());
    }

    Err(ForecastError::TimestampError(format!(
        "could not parse '{}' as an ISO-8601 date",
        raw
    )))
}
