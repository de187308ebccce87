//! Forecasting models.

mod traits;

pub mod arima;
pub mod sequence;

pub use traits::Forecaster;
