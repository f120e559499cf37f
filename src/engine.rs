//! Forecast orchestration: cleaning, splitting, the two fit stages,
//! smoothing and evaluation.

use crate::clean::clean_series;
use crate::config::SeriesCatalog;
use crate::core::{forecast_dates, ForecastReport, PricePoint, RawObservation};
use crate::error::{ForecastError, Result};
use crate::models::{fit_with_fallback, ModelSpec};
use crate::smooth::{smooth, MAX_CHANGE_RATE};
use crate::split::split;
use crate::utils::metrics::rmse;
use tracing::{debug, info};

/// Number of months the production forecast extends past the last
/// observation. The held-out evaluation window is capped at the same value.
pub const FORECAST_HORIZON: usize = 3;

/// The forecasting engine for a configured set of series.
///
/// Holds only immutable configuration; every request recomputes both fit
/// stages from scratch and owns its full data graph, so a single engine can
/// serve concurrent requests without shared mutable state.
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    catalog: SeriesCatalog,
}

impl ForecastEngine {
    pub fn new(catalog: SeriesCatalog) -> Self {
        Self { catalog }
    }

    /// The configured series catalog.
    pub fn catalog(&self) -> &SeriesCatalog {
        &self.catalog
    }

    /// Produce a forecast report for one series.
    ///
    /// `observations` is the full, unfiltered history the store holds for
    /// `key`; all cleaning happens here. Errors follow the taxonomy in
    /// [`crate::error::ForecastError`] and leave no partial results.
    pub fn forecast_series(
        &self,
        key: &str,
        observations: &[RawObservation],
    ) -> Result<ForecastReport> {
        if !self.catalog.contains(key) {
            return Err(ForecastError::InvalidKey(key.to_string()));
        }
        if observations.is_empty() {
            return Err(ForecastError::NoData);
        }

        let history = clean_series(observations)?;
        info!(
            key,
            raw = observations.len(),
            cleaned = history.len(),
            "series cleaned"
        );

        let parts = split(&history)?;
        debug!(
            train = parts.train.len(),
            test = parts.test.len(),
            "series split"
        );

        // Evaluation stage: fit on the training prefix, predict the held-out
        // horizon, and score the smoothed predictions.
        let eval_spec = ModelSpec::default_for_len(parts.train.len());
        let eval_fit = fit_with_fallback(parts.train.values(), eval_spec)?;
        let raw_test_pred = eval_fit.predict(
            parts.train.len(),
            parts.train.len() + parts.test.len() - 1,
        )?;
        let test_pred = smooth(parts.train.values(), &raw_test_pred, MAX_CHANGE_RATE);
        let score = rmse(parts.test.values(), &test_pred)?;
        debug!(
            rmse = score,
            eval_model = ?eval_fit.spec().family(),
            "evaluation fit scored"
        );

        // Production stage: independent fit on the full series for the
        // delivered forecast.
        let full_spec = ModelSpec::default_for_len(history.len());
        let full_fit = fit_with_fallback(history.values(), full_spec)?;
        let raw_forecast = full_fit.forecast(FORECAST_HORIZON);
        let forecast = smooth(history.values(), &raw_forecast, MAX_CHANGE_RATE);

        // A non-empty clean series always has a last date.
        let last_date = history
            .last_date()
            .ok_or(ForecastError::NoData)?;
        let dates = forecast_dates(last_date, FORECAST_HORIZON);

        let report = ForecastReport {
            avg_price: history.mean_value(),
            data_points: history.len(),
            model_used: full_fit.spec().family(),
            test_prediction: paired(parts.test.dates(), &test_pred),
            forecast: paired(&dates, &forecast),
            rmse: score,
            history,
        };
        info!(
            key,
            rmse = report.rmse,
            model = ?report.model_used,
            "forecast assembled"
        );
        Ok(report)
    }
}

fn paired(dates: &[chrono::NaiveDate], values: &[f64]) -> Vec<PricePoint> {
    dates
        .iter()
        .zip(values.iter())
        .map(|(&date, &value)| PricePoint::new(date, value))
        .collect()
}
