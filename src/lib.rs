//! # forecast-kit
//!
//! Helpers for a univariate forecasting workflow: ARIMA order search,
//! stationarity testing, rolling sequence-model forecasts, accuracy
//! metrics and SVG charts of the results.
//!
//! ```
//! use forecast_kit::prelude::*;
//! use chrono::{TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let values: Vec<f64> = (0..90).map(|i| 20.0 + (i as f64 * 0.25).sin()).collect();
//! let series = TimeSeries::daily(start, values).unwrap();
//! let (train, test) = series.split_at(80).unwrap();
//!
//! let results = gs_arima(&train, 0, 2, 2);
//! let order = results.best().map(|row| row.order()).unwrap_or_default();
//!
//! let mut model = ARIMA::with_order(order);
//! model.fit(&train).unwrap();
//! let preds = model.predict(test.len()).unwrap();
//!
//! let err = mape(test.values(), preds.primary()).unwrap();
//! assert!(err.is_finite());
//! ```

#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod models;
pub mod plot;
pub mod transform;
pub mod utils;
pub mod validation;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Forecast, ForecastFrame, TimeSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::arima::{gs_arima, ArimaOrder, ARIMA};
    pub use crate::models::sequence::{generate_predictions, SequenceModel, SequenceWindow};
    pub use crate::models::Forecaster;
    pub use crate::plot::{plot_arima_data, plot_arima_data_zoomed, plot_test_predictions};
    pub use crate::utils::{calculate_metrics, mape, AccuracyMetrics};
    pub use crate::validation::{adf_test, interpret_dftest, AdfConfig};
}
