//! Request/response types for the reporting surface.
//!
//! HTTP transport, authentication and storage stay with the host; this
//! module defines the wire shapes and recovers every engine error into the
//! failure response so no request can crash the host process.

use crate::core::{ForecastReport, PricePoint, RawObservation};
use crate::engine::ForecastEngine;
use crate::models::ModelFamily;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// An incoming forecast request.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub series_key: String,
}

/// Per-series payload of a successful response.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesPayload {
    pub history: Vec<PricePoint>,
    pub test_pred: Vec<PricePoint>,
    pub forecast: Vec<PricePoint>,
    pub rmse: f64,
    pub avg_price: f64,
    pub data_points: usize,
    pub model_used: ModelFamily,
}

/// Response envelope, keyed on `success`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Success {
        success: bool,
        data: HashMap<String, SeriesPayload>,
        series_name: String,
        avg_rmse: f64,
    },
    Failure {
        success: bool,
        error: String,
    },
}

impl PredictResponse {
    fn success(key: &str, series_name: &str, report: ForecastReport) -> Self {
        let rmse = round2(report.rmse);
        let payload = SeriesPayload {
            history: report
                .history
                .iter()
                .map(|(date, value)| PricePoint::new(date, value))
                .collect(),
            test_pred: report.test_prediction,
            forecast: report.forecast,
            rmse,
            avg_price: round2(report.avg_price),
            data_points: report.data_points,
            model_used: report.model_used,
        };
        PredictResponse::Success {
            success: true,
            data: HashMap::from([(key.to_string(), payload)]),
            series_name: series_name.to_string(),
            avg_rmse: rmse,
        }
    }

    fn failure(error: String) -> Self {
        PredictResponse::Failure {
            success: false,
            error,
        }
    }

    /// Whether this is a success response.
    pub fn is_success(&self) -> bool {
        matches!(self, PredictResponse::Success { .. })
    }
}

/// Run a forecast request against the engine and package the outcome.
///
/// Never returns an error: every [`crate::error::ForecastError`] becomes the
/// failure response shape.
pub fn predict(
    engine: &ForecastEngine,
    request: &PredictRequest,
    observations: &[RawObservation],
) -> PredictResponse {
    match engine.forecast_series(&request.series_key, observations) {
        Ok(report) => {
            let name = engine
                .catalog()
                .display_name(&request.series_key)
                .unwrap_or(request.series_key.as_str())
                .to_string();
            PredictResponse::success(&request.series_key, &name, report)
        }
        Err(err) => {
            warn!(key = %request.series_key, error = %err, "forecast request failed");
            PredictResponse::failure(err.to_string())
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
