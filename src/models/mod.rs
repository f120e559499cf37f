//! Model specifications and the two-step fit protocol.
//!
//! The engine selects a model family from the series length, attempts the
//! fit, and falls back to the simple family explicitly when the first
//! attempt fails. The fallback is a separate, testable step rather than
//! exception-driven control flow.

mod arima;
mod diff;
mod sarima;

pub use arima::Arima;
pub use diff::{difference, integrate, seasonal_difference, seasonal_integrate};
pub use sarima::Sarima;

use crate::error::{ForecastError, Result};
use serde::Serialize;
use tracing::debug;

/// Minimum series length at which the seasonal family is selected.
pub const SEASONAL_MIN_POINTS: usize = 12;

/// Semi-annual seasonal period assumed for commodity pricing.
pub const SEASONAL_PERIOD: usize = 6;

/// Default non-seasonal order for both families.
pub const DEFAULT_ORDER: (usize, usize, usize) = (1, 1, 0);

/// Default seasonal order for the seasonal family.
pub const DEFAULT_SEASONAL_ORDER: (usize, usize, usize) = (1, 1, 0);

/// Model family tag exposed in reports and on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModelFamily {
    #[serde(rename = "SIMPLE")]
    Simple,
    #[serde(rename = "SEASONAL")]
    Seasonal,
}

/// Specification of a model to fit, fixed for the duration of one fit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSpec {
    /// Non-seasonal ARIMA with `(p, d, q)` order.
    Simple { order: (usize, usize, usize) },
    /// Seasonal ARIMA with an additional `(P, D, Q)` order at `period`.
    Seasonal {
        order: (usize, usize, usize),
        seasonal_order: (usize, usize, usize),
        period: usize,
    },
}

impl ModelSpec {
    /// Length-derived default specification.
    ///
    /// Sequences of [`SEASONAL_MIN_POINTS`] or more select the seasonal
    /// family to capture the assumed semi-annual pattern; shorter sequences
    /// get the simple family.
    pub fn default_for_len(n: usize) -> Self {
        if n >= SEASONAL_MIN_POINTS {
            ModelSpec::Seasonal {
                order: DEFAULT_ORDER,
                seasonal_order: DEFAULT_SEASONAL_ORDER,
                period: SEASONAL_PERIOD,
            }
        } else {
            ModelSpec::Simple {
                order: DEFAULT_ORDER,
            }
        }
    }

    /// The specification used when a fit attempt fails.
    pub fn fallback() -> Self {
        ModelSpec::Simple {
            order: DEFAULT_ORDER,
        }
    }

    /// Family tag of this specification.
    pub fn family(&self) -> ModelFamily {
        match self {
            ModelSpec::Simple { .. } => ModelFamily::Simple,
            ModelSpec::Seasonal { .. } => ModelFamily::Seasonal,
        }
    }
}

/// A fitted model, opaque to callers beyond its forecasting capability.
trait FittedModel {
    /// Length of the sequence the model was fitted on.
    fn fitted_len(&self) -> usize;

    /// Point predictions extending past the end of the fitted sequence.
    fn forecast(&self, steps: usize) -> Vec<f64>;
}

impl FittedModel for Arima {
    fn fitted_len(&self) -> usize {
        self.len()
    }

    fn forecast(&self, steps: usize) -> Vec<f64> {
        Arima::forecast(self, steps)
    }
}

impl FittedModel for Sarima {
    fn fitted_len(&self) -> usize {
        self.len()
    }

    fn forecast(&self, steps: usize) -> Vec<f64> {
        Sarima::forecast(self, steps)
    }
}

/// Result of a successful fit: the fitted model handle plus the spec
/// actually used, which may be the fallback rather than the request.
pub struct FitResult {
    spec: ModelSpec,
    model: Box<dyn FittedModel + Send + Sync>,
}

impl FitResult {
    /// The specification that produced this fit.
    pub fn spec(&self) -> ModelSpec {
        self.spec
    }

    /// Point predictions for the index range `start..=end`.
    ///
    /// Indices count from the beginning of the fitted sequence; the range
    /// must lie at or past its end (the evaluation fit predicts the held-out
    /// test horizon this way).
    pub fn predict(&self, start: usize, end: usize) -> Result<Vec<f64>> {
        let n = self.model.fitted_len();
        if start < n {
            return Err(ForecastError::InvalidParameter(format!(
                "prediction range must start at or past the fitted length {n}, got {start}"
            )));
        }
        if end < start {
            return Err(ForecastError::InvalidParameter(format!(
                "prediction range end {end} precedes start {start}"
            )));
        }
        let steps = end + 1 - n;
        let full = self.model.forecast(steps);
        Ok(full[start - n..].to_vec())
    }

    /// Point predictions for `steps` values past the end of the fitted
    /// sequence.
    pub fn forecast(&self, steps: usize) -> Vec<f64> {
        self.model.forecast(steps)
    }
}

/// Outcome of a single fit attempt.
pub enum FitOutcome {
    /// The model fitted successfully.
    Fitted(FitResult),
    /// The fit failed; the caller decides whether to fall back.
    Failed(String),
}

/// Attempt to fit `spec` on `values`. Never falls back on its own.
pub fn try_fit(values: &[f64], spec: ModelSpec) -> FitOutcome {
    let fitted: Result<Box<dyn FittedModel + Send + Sync>> = match spec {
        ModelSpec::Simple { order } => Arima::fit(values, order)
            .map(|m| Box::new(m) as Box<dyn FittedModel + Send + Sync>),
        ModelSpec::Seasonal {
            order,
            seasonal_order,
            period,
        } => Sarima::fit(values, order, seasonal_order, period)
            .map(|m| Box::new(m) as Box<dyn FittedModel + Send + Sync>),
    };

    match fitted {
        Ok(model) => FitOutcome::Fitted(FitResult { spec, model }),
        Err(err) => FitOutcome::Failed(err.to_string()),
    }
}

/// Fit `spec` on `values`, explicitly falling back to the simple family when
/// the first attempt fails.
///
/// # Errors
/// [`ForecastError::ModelFit`] when the fallback fails as well (or when the
/// request already was the fallback and failed).
pub fn fit_with_fallback(values: &[f64], spec: ModelSpec) -> Result<FitResult> {
    let reason = match try_fit(values, spec) {
        FitOutcome::Fitted(fit) => return Ok(fit),
        FitOutcome::Failed(reason) => reason,
    };

    let fallback = ModelSpec::fallback();
    if spec == fallback {
        return Err(ForecastError::ModelFit(reason));
    }

    debug!(requested = ?spec.family(), %reason, "fit failed, retrying with fallback");
    match try_fit(values, fallback) {
        FitOutcome::Fitted(fit) => Ok(fit),
        FitOutcome::Failed(fallback_reason) => Err(ForecastError::ModelFit(format!(
            "{reason}; fallback also failed: {fallback_reason}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trending(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + 1.5 * i as f64).collect()
    }

    #[test]
    fn selection_threshold_at_twelve_points() {
        assert_eq!(ModelSpec::default_for_len(11).family(), ModelFamily::Simple);
        assert_eq!(
            ModelSpec::default_for_len(12).family(),
            ModelFamily::Seasonal
        );
    }

    #[test]
    fn default_seasonal_spec_parameters() {
        match ModelSpec::default_for_len(24) {
            ModelSpec::Seasonal {
                order,
                seasonal_order,
                period,
            } => {
                assert_eq!(order, (1, 1, 0));
                assert_eq!(seasonal_order, (1, 1, 0));
                assert_eq!(period, 6);
            }
            other => panic!("expected seasonal spec, got {other:?}"),
        }
    }

    #[test]
    fn try_fit_simple_succeeds() {
        let outcome = try_fit(&trending(10), ModelSpec::fallback());
        match outcome {
            FitOutcome::Fitted(fit) => assert_eq!(fit.spec().family(), ModelFamily::Simple),
            FitOutcome::Failed(reason) => panic!("unexpected failure: {reason}"),
        }
    }

    #[test]
    fn try_fit_seasonal_fails_on_short_series_without_fallback() {
        let spec = ModelSpec::default_for_len(12);
        assert!(matches!(
            try_fit(&trending(12), spec),
            FitOutcome::Failed(_)
        ));
    }

    #[test]
    fn fallback_recovers_failed_seasonal_fit() {
        let values = trending(12);
        let spec = ModelSpec::default_for_len(values.len());
        let fit = fit_with_fallback(&values, spec).unwrap();
        assert_eq!(fit.spec().family(), ModelFamily::Simple);
    }

    #[test]
    fn fallback_is_not_retried_against_itself() {
        let result = fit_with_fallback(&[100.0], ModelSpec::fallback());
        assert!(matches!(result, Err(ForecastError::ModelFit(_))));
    }

    #[test]
    fn predict_covers_out_of_sample_range() {
        let values = trending(10);
        let fit = fit_with_fallback(&values, ModelSpec::fallback()).unwrap();

        let predictions = fit.predict(10, 12).unwrap();
        assert_eq!(predictions.len(), 3);
        assert_eq!(predictions, fit.forecast(3));
    }

    #[test]
    fn predict_rejects_in_sample_start() {
        let fit = fit_with_fallback(&trending(10), ModelSpec::fallback()).unwrap();
        assert!(matches!(
            fit.predict(5, 12),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(matches!(
            fit.predict(12, 10),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn seasonal_fit_succeeds_on_long_series() {
        let values: Vec<f64> = (0..36)
            .map(|i| 200.0 + i as f64 + 5.0 * (i % 6) as f64)
            .collect();
        let spec = ModelSpec::default_for_len(values.len());
        let fit = fit_with_fallback(&values, spec).unwrap();
        assert_eq!(fit.spec().family(), ModelFamily::Seasonal);
        assert_eq!(fit.forecast(3).len(), 3);
    }

    #[test]
    fn model_family_serializes_to_wire_tags() {
        assert_eq!(
            serde_json::to_string(&ModelFamily::Simple).unwrap(),
            "\"SIMPLE\""
        );
        assert_eq!(
            serde_json::to_string(&ModelFamily::Seasonal).unwrap(),
            "\"SEASONAL\""
        );
    }
}
