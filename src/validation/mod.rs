//! Stationarity diagnostics.
//!
//! # Example
//!
//! ```
//! use forecast_kit::validation::{adf_test, interpret_dftest, AdfConfig};
//!
//! let series: Vec<f64> = (0..60).map(|i| ((i * 7919) % 61) as f64 / 61.0).collect();
//! if let Ok(result) = adf_test(&series, &AdfConfig::default()) {
//!     println!("{}", interpret_dftest(&result));
//! }
//! ```

pub mod stationarity;

pub use stationarity::{
    adf_test, interpret_dftest, AdfConfig, AdfResult, AutoLag, CriticalValues,
    DickeyFullerSummary,
};
