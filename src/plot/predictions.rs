//! Actual vs. predicted chart for a test frame.

use crate::core::{ForecastFrame, PREDICTIONS_COLUMN, VALUE_COLUMN};
use crate::error::{ForecastError, Result};
use crate::plot::figure::{
    fit_range, render, to_days, Figure, FigureConfig, Labels, Layer, TAB_BLUE, TAB_ORANGE,
};

/// Plot the `value` and `predictions` columns of `frame` against its index.
///
/// # Arguments
/// * `frame` - Test frame holding both columns
/// * `x_label` - X axis description
/// * `y_label` - Y axis description
/// * `title` - Chart title
///
/// # Returns
/// A 1000x800 `Figure` with "Actual price" and "Predicted price" lines.
///
/// # Errors
/// * `MissingColumn` if either column is absent
/// * `EmptyData` if the frame has no rows
/// * `PlotError` if rendering fails
///
/// # Example
/// ```
/// use forecast_kit::core::{ForecastFrame, TimeSeries};
/// use forecast_kit::plot::plot_test_predictions;
/// use chrono::{TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
/// let test = TimeSeries::daily(start, vec![1.0, 1.1, 1.3]).unwrap();
/// let frame = ForecastFrame::from_predictions(&test, &[1.05, 1.12, 1.2]).unwrap();
///
/// let figure = plot_test_predictions(&frame, "Date", "Price", "Test set").unwrap();
/// assert!(figure.svg().contains("Predicted price"));
/// ```
pub fn plot_test_predictions(
    frame: &ForecastFrame,
    x_label: &str,
    y_label: &str,
    title: &str,
) -> Result<Figure> {
    let actual = frame.require_column(VALUE_COLUMN)?;
    let predicted = frame.require_column(PREDICTIONS_COLUMN)?;
    if frame.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let layers = [
        Layer::new("Actual price", frame.index(), actual, TAB_BLUE, 3),
        Layer::new("Predicted price", frame.index(), predicted, TAB_ORANGE, 3),
    ];

    let index = frame.index();
    let (first, last) = (to_days(index[0]), to_days(index[index.len() - 1]));
    let x_range = if last > first {
        (first, last)
    } else {
        (first - 1.0, last + 1.0)
    };
    let y_range = fit_range(actual.iter().chain(predicted).copied())
        .ok_or(ForecastError::MissingValues)?;

    render(
        &FigureConfig::test_predictions(),
        Labels {
            title,
            x: x_label,
            y: y_label,
        },
        &layers,
        x_range,
        y_range,
    )
}
