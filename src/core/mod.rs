//! Core data structures for time series forecasting.

mod forecast;
mod frame;
mod time_series;

pub use forecast::Forecast;
pub use frame::{ForecastFrame, PREDICTIONS_COLUMN, VALUE_COLUMN};
pub use time_series::{MissingValuePolicy, TimeSeries};
