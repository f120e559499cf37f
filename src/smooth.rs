//! Monotonic-change smoothing of model outputs.
//!
//! Raw one-step ARIMA extrapolations on thin monthly price data can swing
//! unrealistically; the clamp encodes the domain prior that monthly price
//! moves are gradual.

/// Maximum per-step change rate applied to every model output.
pub const MAX_CHANGE_RATE: f64 = 0.15;

/// Clamp each prediction to within `max_change_rate` of a rolling anchor.
///
/// The anchor starts at the final value of `reference` (or the first raw
/// prediction when the reference is empty) and is replaced by each clamped
/// output, so the bound compounds step over step instead of always measuring
/// against the original anchor. Output length equals input length.
pub fn smooth(reference: &[f64], predictions: &[f64], max_change_rate: f64) -> Vec<f64> {
    if predictions.is_empty() {
        return Vec::new();
    }

    let mut anchor = reference.last().copied().unwrap_or(predictions[0]);
    predictions
        .iter()
        .map(|&pred| {
            let low = anchor * (1.0 - max_change_rate);
            let high = anchor * (1.0 + max_change_rate);
            let clamped = pred.min(high).max(low);
            anchor = clamped;
            clamped
        })
        .collect()
}
