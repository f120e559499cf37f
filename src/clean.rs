//! Series cleaning: null/zero removal, 3-sigma outlier rejection,
//! sorting and deduplication.

use crate::core::{CleanSeries, RawObservation};
use crate::error::{ForecastError, Result};
use crate::utils::stats::{mean, std_dev};
use tracing::debug;

/// Multiplier for the standard-deviation outlier band.
pub const OUTLIER_SIGMA: f64 = 3.0;

/// Minimum number of points a cleaned series must have: two for training
/// plus one for the held-out test point.
pub const MIN_CLEAN_POINTS: usize = 3;

/// Normalize raw observations into a [`CleanSeries`].
///
/// Steps, in order: drop null values, drop values at or below zero, drop
/// values outside `mean ± 3σ` of the surviving set, sort by date, and
/// deduplicate dates keeping the last-seen value. When the surviving values
/// have zero (or undefined) standard deviation the outlier filter is a
/// no-op.
///
/// # Errors
/// [`ForecastError::InsufficientData`] if fewer than [`MIN_CLEAN_POINTS`]
/// observations remain.
pub fn clean_series(observations: &[RawObservation]) -> Result<CleanSeries> {
    let mut kept: Vec<(chrono::NaiveDate, f64)> = observations
        .iter()
        .filter_map(|obs| obs.value.map(|v| (obs.date, v)))
        .filter(|&(_, v)| v.is_finite() && v > 0.0)
        .collect();

    let values: Vec<f64> = kept.iter().map(|&(_, v)| v).collect();
    let center = mean(&values);
    let sigma = std_dev(&values);
    // With one survivor (or none) sigma is NaN; treat it like the
    // zero-variance case and keep everything.
    if sigma.is_finite() && sigma > 0.0 {
        kept.retain(|&(_, v)| {
            v >= center - OUTLIER_SIGMA * sigma && v <= center + OUTLIER_SIGMA * sigma
        });
    }

    kept.sort_by_key(|&(date, _)| date);
    // Stable sort preserves input order within a date, so keeping the last
    // entry per date keeps the last-seen duplicate.
    let mut dates = Vec::with_capacity(kept.len());
    let mut cleaned = Vec::with_capacity(kept.len());
    for (date, value) in kept {
        if dates.last() == Some(&date) {
            *cleaned.last_mut().unwrap() = value;
        } else {
            dates.push(date);
            cleaned.push(value);
        }
    }

    debug!(
        raw = observations.len(),
        cleaned = dates.len(),
        "cleaned series"
    );

    if dates.len() < MIN_CLEAN_POINTS {
        return Err(ForecastError::InsufficientData {
            needed: MIN_CLEAN_POINTS,
            got: dates.len(),
        });
    }

    CleanSeries::new(dates, cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn obs(y: i32, m: u32, value: Option<f64>) -> RawObservation {
        RawObservation::new(date(y, m), value)
    }

    #[test]
    fn drops_nulls_and_non_positive_values() {
        let raw = vec![
            obs(2024, 1, Some(100.0)),
            obs(2024, 2, None),
            obs(2024, 3, Some(0.0)),
            obs(2024, 4, Some(-5.0)),
            obs(2024, 5, Some(102.0)),
            obs(2024, 6, Some(104.0)),
        ];
        let series = clean_series(&raw).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.values(), &[100.0, 102.0, 104.0]);
    }

    #[test]
    fn rejects_three_sigma_outliers() {
        let mut raw: Vec<RawObservation> = (0..24)
            .map(|i| obs(2023 + i / 12, ((i % 12) + 1) as u32, Some(100.0 + i as f64)))
            .collect();
        // Inject a value ten times the running mean.
        raw[10].value = Some(1100.0);

        let series = clean_series(&raw).unwrap();
        assert_eq!(series.len(), 23);
        assert!(series.values().iter().all(|&v| v < 200.0));
    }

    #[test]
    fn zero_variance_series_keeps_all_points() {
        let raw: Vec<RawObservation> =
            (1..=6).map(|m| obs(2024, m, Some(250.0))).collect();
        let series = clean_series(&raw).unwrap();
        assert_eq!(series.len(), 6);
    }

    #[test]
    fn sorts_by_date_and_keeps_last_duplicate() {
        let raw = vec![
            obs(2024, 3, Some(103.0)),
            obs(2024, 1, Some(101.0)),
            obs(2024, 2, Some(90.0)),
            obs(2024, 2, Some(102.0)), // later entry for the same month wins
        ];
        let series = clean_series(&raw).unwrap();
        assert_eq!(series.dates(), &[date(2024, 1), date(2024, 2), date(2024, 3)]);
        assert_eq!(series.values(), &[101.0, 102.0, 103.0]);
    }

    #[test]
    fn fails_below_minimum_points() {
        let raw = vec![obs(2024, 1, Some(100.0)), obs(2024, 2, Some(101.0))];
        assert_eq!(
            clean_series(&raw),
            Err(ForecastError::InsufficientData { needed: 3, got: 2 })
        );
    }

    #[test]
    fn cleaning_is_idempotent() {
        let raw: Vec<RawObservation> = (1..=12)
            .map(|m| obs(2024, m, Some(100.0 + m as f64 * 3.0)))
            .collect();
        let once = clean_series(&raw).unwrap();

        let recleaned_input: Vec<RawObservation> = once
            .iter()
            .map(|(d, v)| RawObservation::new(d, Some(v)))
            .collect();
        let twice = clean_series(&recleaned_input).unwrap();
        assert_eq!(once, twice);
    }
}
