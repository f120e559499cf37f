//! Error types for the forecasting engine.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while producing a forecast.
///
/// Every variant is recovered at the request boundary and turned into a
/// failure response; none of them should escape the [`crate::api`] layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Requested series key is not part of the configured catalog.
    #[error("unknown series key: {0}")]
    InvalidKey(String),

    /// The store returned zero observations for the series.
    #[error("no observations available for this series")]
    NoData,

    /// Too few points survive cleaning to split into train and test.
    #[error("insufficient data after cleaning: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// The train/test split leaves too few training points.
    #[error("insufficient training data: need at least {needed}, got {got}")]
    InsufficientTrainingData { needed: usize, got: usize },

    /// Both the requested model and the fallback failed to fit.
    #[error("model fitting failed: {0}")]
    ModelFit(String),

    /// Held-out actuals and predictions differ in length.
    #[error("shape mismatch: expected {expected} values, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// A caller violated an internal API contract.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
