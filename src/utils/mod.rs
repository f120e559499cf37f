//! Utility functions shared by the forecasting engine.

pub mod metrics;
pub mod optimization;
pub mod stats;

pub use metrics::rmse;
pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use stats::{mean, std_dev, variance};
