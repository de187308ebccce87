//! ARIMA (Autoregressive Integrated Moving Average) models.
//!
//! This module provides:
//! - ARIMA(p, d, q) fitted by conditional sum of squares
//! - Differencing helpers
//! - A grid search over `(p, q)` ranked by AIC

mod diff;
mod grid_search;
mod model;

pub use diff::{difference, integrate};
pub use grid_search::{
    grid_search, gs_arima, GridSearchConfig, GridSearchResults, GridSearchRow, SkippedCandidate,
    GRID_SEARCH_MAX_ITER,
};
pub use model::{ArimaOrder, ARIMA, DEFAULT_MAX_ITER};
