//! Forecast charts rendered to SVG.
//!
//! Figures are rendered in memory; call [`Figure::save`] to write them to
//! disk.

mod arima;
mod figure;
mod predictions;

pub use arima::{plot_arima_data, plot_arima_data_zoomed, ZoomWindow};
pub use figure::{Figure, FigureConfig, LegendPosition, TAB_BLUE, TAB_CYAN, TAB_ORANGE};
pub use predictions::plot_test_predictions;
