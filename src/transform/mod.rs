//! Data transformations for time series.
//!
//! # Example
//!
//! ```
//! use forecast_kit::transform::normalize;
//!
//! let train = normalize(&[1.0, 2.0, 3.0, 4.0, 5.0]);
//! let test = train.transform(&[6.0]);
//! assert_eq!(test, vec![1.25]);
//! ```

pub mod scale;

pub use scale::{normalize, standardize, ScaleResult};
