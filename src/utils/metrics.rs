//! Accuracy metrics for forecast evaluation.

use crate::error::{ForecastError, Result};

/// Calculate the root-mean-square error between actual and predicted values.
///
/// # Arguments
/// * `actual` - Held-out observed values
/// * `predicted` - Predictions for the same horizon
///
/// # Errors
/// Returns [`ForecastError::ShapeMismatch`] if the slices differ in length.
/// The lengths agree whenever the split and fit contracts are honored.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    if actual.len() != predicted.len() {
        return Err(ForecastError::ShapeMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Ok(0.0);
    }

    let mse: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64;

    Ok(mse.sqrt())
}
