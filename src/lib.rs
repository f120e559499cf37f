//! # concrete-forecast
//!
//! Short-horizon forecasting of monthly commodity price series.
//!
//! Given the raw, possibly sparse history of one series, the engine cleans
//! it (null/zero removal, 3-sigma outlier rejection, deduplication) and fits
//! an ARIMA-family model twice: once on a training prefix scored against a
//! held-out suffix, and once on the full series for the delivered forecast.
//! Every model output passes through a ±15% per-step smoothing clamp, and the
//! result is a three-month forecast together with the validated RMSE.
//!
//! ```
//! use chrono::{Months, NaiveDate};
//! use concrete_forecast::prelude::*;
//!
//! let engine = ForecastEngine::new(SeriesCatalog::from_entries([
//!     ("riverton", "Riverton"),
//! ]));
//!
//! let base = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
//! let observations: Vec<RawObservation> = (0..18)
//!     .map(|i| RawObservation::new(
//!         base.checked_add_months(Months::new(i)).unwrap(),
//!         Some(400.0 + i as f64 * 2.5),
//!     ))
//!     .collect();
//!
//! let report = engine.forecast_series("riverton", &observations).unwrap();
//! assert_eq!(report.forecast.len(), 3);
//! assert!(report.rmse >= 0.0);
//! ```

pub mod api;
pub mod clean;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod models;
pub mod smooth;
pub mod split;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::api::{predict, PredictRequest, PredictResponse};
    pub use crate::config::SeriesCatalog;
    pub use crate::core::{CleanSeries, ForecastReport, PricePoint, RawObservation};
    pub use crate::engine::{ForecastEngine, FORECAST_HORIZON};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{ModelFamily, ModelSpec};
}
