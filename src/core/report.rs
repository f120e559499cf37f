//! Forecast report returned to the caller.

use crate::core::series::CleanSeries;
use crate::models::ModelFamily;
use chrono::NaiveDate;
use serde::Serialize;

/// A dated value, used for history, test predictions and forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// The complete result of one forecast request.
///
/// Assembled once per request and handed to the caller; never persisted.
#[derive(Debug, Clone)]
pub struct ForecastReport {
    /// Cleaned history the models were fitted on.
    pub history: CleanSeries,
    /// Smoothed predictions over the held-out test horizon.
    pub test_prediction: Vec<PricePoint>,
    /// Smoothed production forecast, exactly three steps.
    pub forecast: Vec<PricePoint>,
    /// Root-mean-square error of the test predictions.
    pub rmse: f64,
    /// Mean of all cleaned values.
    pub avg_price: f64,
    /// Number of cleaned observations.
    pub data_points: usize,
    /// Family of the production fit, after any fallback.
    pub model_used: ModelFamily,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_point_serializes_date_as_iso() {
        let point = PricePoint::new(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(), 412.5);
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["date"], "2024-03-31");
        assert_eq!(json["value"], 412.5);
    }
}
