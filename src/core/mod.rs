//! Core data structures for price series and forecast results.

mod report;
mod series;

pub use report::{ForecastReport, PricePoint};
pub use series::{forecast_dates, CleanSeries, RawObservation};
