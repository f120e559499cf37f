//! Series data structures for monthly price observations.

use crate::error::{ForecastError, Result};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single raw observation as delivered by the external store.
///
/// `value` is `None` when the month has a row but no recorded price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl RawObservation {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

/// A cleaned price series.
///
/// Invariants, established by [`crate::clean::clean_series`] and checked by
/// the constructor:
/// - dates are strictly increasing with no duplicates
/// - values are finite and strictly positive
/// - dates and values have equal length
#[derive(Debug, Clone, PartialEq)]
pub struct CleanSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl CleanSeries {
    /// Create a clean series, validating its invariants.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::ShapeMismatch {
                expected: dates.len(),
                got: values.len(),
            });
        }
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(ForecastError::InvalidParameter(
                    "dates must be strictly increasing".to_string(),
                ));
            }
        }
        if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(ForecastError::InvalidParameter(
                "values must be finite and strictly positive".to_string(),
            ));
        }
        Ok(Self { dates, values })
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Observation dates, strictly increasing.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Observation values, parallel to [`Self::dates`].
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Last observed date, if any.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Mean of all values.
    pub fn mean_value(&self) -> f64 {
        crate::utils::stats::mean(&self.values)
    }

    /// Extract an owned sub-series over `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> Result<CleanSeries> {
        if start > end || end > self.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "invalid slice range {start}..{end} for series of length {}",
                self.len()
            )));
        }
        Ok(CleanSeries {
            dates: self.dates[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        })
    }

    /// Iterate over `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// Compute the dates for an `horizon`-step monthly forecast.
///
/// Each date advances the last observed date by 1..=horizon calendar months,
/// preserving the day of month where the target month has that day and
/// clamping to the month's last day otherwise (`2024-01-31` + 1 month is
/// `2024-02-29` in a leap year).
pub fn forecast_dates(last_date: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    (1..=horizon as u32)
        .filter_map(|i| last_date.checked_add_months(Months::new(i)))
        .collect()
}
