//! Train / test / prediction charts for ARIMA forecasts.

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::models::arima::ArimaOrder;
use crate::plot::figure::{
    fit_range, render, to_days, Figure, FigureConfig, Labels, Layer, TAB_CYAN, TAB_ORANGE,
};
use plotters::prelude::BLACK;

/// Visible window of [`plot_arima_data_zoomed`].
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomWindow {
    /// Training points shown before the test period.
    pub lookback: usize,
    /// Fixed y-range; fitted to the visible data when `None`.
    pub y_range: Option<(f64, f64)>,
}

impl Default for ZoomWindow {
    fn default() -> Self {
        Self {
            lookback: 20,
            y_range: None,
        }
    }
}

impl ZoomWindow {
    pub fn with_lookback(mut self, lookback: usize) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn with_y_range(mut self, min: f64, max: f64) -> Self {
        self.y_range = Some((min, max));
        self
    }
}

/// The three layers shared by both ARIMA charts.
fn arima_layers(
    train: &TimeSeries,
    test: &TimeSeries,
    test_preds: &[f64],
    order: ArimaOrder,
    data_width: u32,
) -> Result<Vec<Layer>> {
    if train.is_empty() || test.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    // Predictions are indexed by the daily-regularized test period
    let daily_test = test.as_daily()?;
    if daily_test.len() != test_preds.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: daily_test.len(),
            got: test_preds.len(),
        });
    }

    Ok(vec![
        Layer::new(
            "Training data",
            train.timestamps(),
            train.values(),
            TAB_CYAN,
            data_width,
        ),
        Layer::new(
            "Testing data",
            test.timestamps(),
            test.values(),
            TAB_ORANGE,
            data_width,
        ),
        Layer::new(
            format!("Predicted {order}"),
            daily_test.timestamps(),
            test_preds,
            BLACK,
            3,
        ),
    ])
}

fn x_span(layers: &[Layer]) -> (f64, f64) {
    let (lo, hi) = layers
        .iter()
        .flat_map(|l| l.points.iter().map(|(x, _)| *x))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

/// Plot training data, testing data and test-period predictions.
///
/// Training data is drawn in cyan, testing data in orange and the
/// predictions as a thick black line on the daily test index. The legend
/// label of the predictions names `order`.
///
/// # Arguments
/// * `train` - Training data
/// * `test` - Testing data
/// * `test_preds` - One prediction per day of the test period
/// * `title`, `x_label`, `y_label` - Chart text
/// * `order` - Order of the model that produced `test_preds`
///
/// # Errors
/// * `EmptyData` if either series is empty
/// * `DimensionMismatch` if `test_preds` does not match the daily test index
/// * `PlotError` if rendering fails
pub fn plot_arima_data(
    train: &TimeSeries,
    test: &TimeSeries,
    test_preds: &[f64],
    title: &str,
    x_label: &str,
    y_label: &str,
    order: ArimaOrder,
) -> Result<Figure> {
    let layers = arima_layers(train, test, test_preds, order, 1)?;
    let x_range = x_span(&layers);
    let y_range = fit_range(layers.iter().flat_map(|l| l.points.iter().map(|(_, y)| *y)))
        .ok_or(ForecastError::MissingValues)?;

    render(
        &FigureConfig::arima(),
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

/// Days-since-epoch window from the `lookback`-th last training timestamp
/// to the last test timestamp.
fn zoom_x_range(train: &TimeSeries, test: &TimeSeries, lookback: usize) -> Result<(f64, f64)> {
    let timestamps = train.timestamps();
    if timestamps.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    let first = timestamps[timestamps.len().saturating_sub(lookback.max(1))];
    let last = test.end().ok_or(ForecastError::EmptyData)?;

    let (lo, hi) = (to_days(first), to_days(last));
    Ok(if hi > lo { (lo, hi) } else { (lo - 1.0, hi + 1.0) })
}

/// [`plot_arima_data`] zoomed on the end of training and the test period.
///
/// The x-range runs from the `zoom.lookback`-th last training timestamp to
/// the last test timestamp. Every layer is drawn thick.
///
/// # Arguments
/// Same as [`plot_arima_data`], plus:
/// * `zoom` - Lookback and optional fixed y-range
///
/// # Returns
/// The rendered `Figure`; errors as for [`plot_arima_data`], plus
/// `InvalidParameter` for a y-range that is not increasing.
pub fn plot_arima_data_zoomed(
    train: &TimeSeries,
    test: &TimeSeries,
    test_preds: &[f64],
    title: &str,
    x_label: &str,
    y_label: &str,
    order: ArimaOrder,
    zoom: &ZoomWindow,
) -> Result<Figure> {
    let layers = arima_layers(train, test, test_preds, order, 3)?;
    let x_range = zoom_x_range(train, test, zoom.lookback)?;

    let y_range = match zoom.y_range {
        Some((lo, hi)) if lo < hi => (lo, hi),
        Some((lo, hi)) => {
            return Err(ForecastError::InvalidParameter(format!(
                "y-range must be increasing, got ({lo}, {hi})"
            )))
        }
        None => fit_range(layers.iter().flat_map(|l| {
            l.points
                .iter()
                .filter(|(x, _)| (x_range.0..=x_range.1).contains(x))
                .map(|(_, y)| *y)
        }))
        .ok_or(ForecastError::MissingValues)?,
    };

    render(
        &FigureConfig::arima_zoomed(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn series(offset_days: i64, values: Vec<f64>) -> TimeSeries {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap() + Duration::days(offset_days);
        TimeSeries::daily(start, values).unwrap()
    }

    fn fixture() -> (TimeSeries, TimeSeries, Vec<f64>) {
        let train = series(0, (0..40).map(|i| 1.0 + (i as f64 * 0.2).sin() * 0.3).collect());
        let test = series(40, (0..10).map(|i| 1.2 + i as f64 * 0.01).collect());
        let preds = vec![1.25; 10];
        (train, test, preds)
    }

    #[test]
    fn full_plot_contains_all_layers() {
        let (train, test, preds) = fixture();
        let figure = plot_arima_data(
            &train,
            &test,
            &preds,
            "Daily price",
            "Date",
            "Price",
            ArimaOrder::new(1, 0, 1),
        )
        .unwrap();

        assert_eq!(figure.size(), (1000, 600));
        let svg = figure.svg();
        assert!(svg.contains("Training data"));
        assert!(svg.contains("Testing data"));
        assert!(svg.contains("Predicted ARIMA(1, 0, 1)"));
        assert!(svg.contains("Daily price"));
    }

    #[test]
    fn zoomed_plot_uses_configured_range() {
        let (train, test, preds) = fixture();
        let zoom = ZoomWindow::default().with_y_range(0.85, 2.1);
        let figure = plot_arima_data_zoomed(
            &train,
            &test,
            &preds,
            "Zoomed",
            "Date",
            "Price",
            ArimaOrder::new(2, 1, 0),
            &zoom,
        )
        .unwrap();

        assert!(figure.svg().contains("Predicted ARIMA(2, 1, 0)"));
        assert_eq!(figure.title(), "Zoomed");
    }

    #[test]
    fn zoomed_plot_fits_range_by_default() {
        let (train, test, preds) = fixture();
        let zoom = ZoomWindow::default().with_lookback(100);
        assert!(plot_arima_data_zoomed(
            &train,
            &test,
            &preds,
            "Zoomed",
            "Date",
            "Price",
            ArimaOrder::new(0, 0, 0),
            &zoom,
        )
        .is_ok());
    }

    #[test]
    fn rejects_inverted_y_range() {
        let (train, test, preds) = fixture();
        let zoom = ZoomWindow::default().with_y_range(2.0, 1.0);
        assert!(matches!(
            plot_arima_data_zoomed(
                &train,
                &test,
                &preds,
                "t",
                "x",
                "y",
                ArimaOrder::new(1, 0, 0),
                &zoom
            ),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn predictions_must_match_daily_test_index() {
        let (train, test, _) = fixture();
        assert!(matches!(
            plot_arima_data(&train, &test, &[1.0; 3], "t", "x", "y", ArimaOrder::new(1, 0, 0)),
            Err(ForecastError::DimensionMismatch {
                expected: 10,
                got: 3
            })
        ));
    }

    /// Every `YYYY-MM-DD` tick label in an SVG document.
    fn tick_dates(svg: &str) -> Vec<NaiveDate> {
        svg.split(['<', '>'])
            .filter_map(|token| NaiveDate::parse_from_str(token.trim(), "%Y-%m-%d").ok())
            .collect()
    }

    #[test]
    fn zoom_window_spans_lookback_to_test_end() {
        let (train, test, _) = fixture();
        let (lo, hi) = zoom_x_range(&train, &test, 20).unwrap();

        assert_eq!(lo, to_days(train.timestamps()[train.len() - 20]));
        assert_eq!(hi, to_days(test.end().unwrap()));

        // Lookback past the start of training clamps to the first point
        let (lo, _) = zoom_x_range(&train, &test, 500).unwrap();
        assert_eq!(lo, to_days(train.timestamps()[0]));
    }

    #[test]
    fn zoomed_ticks_stay_inside_window() {
        let (train, test, preds) = fixture();
        let figure = plot_arima_data_zoomed(
            &train,
            &test,
            &preds,
            "Zoomed",
            "Date",
            "Price",
            ArimaOrder::new(1, 0, 0),
            &ZoomWindow::default(),
        )
        .unwrap();

        let first = train.timestamps()[train.len() - 20].date_naive();
        let last = test.end().unwrap().date_naive();
        let ticks = tick_dates(figure.svg());

        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|d| (first..=last).contains(d)), "{ticks:?}");
        // Training starts 20 days before the window
        assert!(ticks.iter().all(|d| *d > train.timestamps()[0].date_naive()));
    }

    #[test]
    fn zoom_defaults() {
        let zoom = ZoomWindow::default();
        assert_eq!(zoom.lookback, 20);
        assert_eq!(zoom.y_range, None);
    }
}
