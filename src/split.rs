//! Train/test partitioning for accuracy evaluation.

use crate::core::CleanSeries;
use crate::error::{ForecastError, Result};

/// Maximum held-out test size, matching the production forecast horizon.
pub const MAX_TEST_POINTS: usize = 3;

/// Minimum number of training points needed to fit a model.
pub const MIN_TRAIN_POINTS: usize = 2;

/// A clean series partitioned into a training prefix and a held-out suffix.
#[derive(Debug, Clone)]
pub struct SplitSeries {
    pub train: CleanSeries,
    pub test: CleanSeries,
}

/// Compute the held-out test size for a series of length `n`.
///
/// Scales with series length (one fifth of it, rounded down) but stays
/// within `1..=3` so the evaluation horizon never exceeds the production
/// forecast horizon.
pub fn test_size(n: usize) -> usize {
    (n / 5).clamp(1, MAX_TEST_POINTS)
}

/// Partition `series` into training prefix and test suffix.
///
/// # Errors
/// [`ForecastError::InsufficientTrainingData`] if fewer than
/// [`MIN_TRAIN_POINTS`] points would remain for training.
pub fn split(series: &CleanSeries) -> Result<SplitSeries> {
    let n = series.len();
    let test = test_size(n);
    let train = n - test;
    if train < MIN_TRAIN_POINTS {
        return Err(ForecastError::InsufficientTrainingData {
            needed: MIN_TRAIN_POINTS,
            got: train,
        });
    }

    Ok(SplitSeries {
        train: series.slice(0, train)?,
        test: series.slice(train, n)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(n: usize) -> CleanSeries {
        let base = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let dates: Vec<NaiveDate> = (0..n)
            .map(|i| base.checked_add_months(chrono::Months::new(i as u32)).unwrap())
            .collect();
        let values: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        CleanSeries::new(dates, values).unwrap()
    }

    #[test]
    fn test_size_scales_and_saturates() {
        assert_eq!(test_size(3), 1);
        assert_eq!(test_size(4), 1);
        assert_eq!(test_size(5), 1);
        assert_eq!(test_size(10), 2);
        assert_eq!(test_size(15), 3);
        assert_eq!(test_size(100), 3);
    }

    #[test]
    fn split_sizes_sum_to_length() {
        for n in 3..40 {
            let parts = split(&series(n)).unwrap();
            assert_eq!(parts.train.len() + parts.test.len(), n);
            assert_eq!(parts.test.len(), test_size(n));
            assert!(parts.train.len() >= MIN_TRAIN_POINTS);
        }
    }

    #[test]
    fn split_preserves_order() {
        let parts = split(&series(10)).unwrap();
        assert_eq!(parts.train.values(), &(0..8).map(|i| 100.0 + i as f64).collect::<Vec<_>>()[..]);
        assert_eq!(parts.test.values(), &[108.0, 109.0]);
        assert!(parts.train.last_date().unwrap() < parts.test.dates()[0]);
    }

    #[test]
    fn minimum_viable_series_splits() {
        let parts = split(&series(3)).unwrap();
        assert_eq!(parts.train.len(), 2);
        assert_eq!(parts.test.len(), 1);
    }
}
