//! Accuracy metrics for forecast evaluation.

use crate::error::{ForecastError, Result};
use crate::utils::stats::mean;

/// Accuracy metrics for evaluating forecast performance.
#[derive(Debug, Clone)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error (None if zeros in actual)
    pub mape: Option<f64>,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
    /// Mean Absolute Scaled Error (None if insufficient data)
    pub mase: Option<f64>,
    /// R-squared (coefficient of determination)
    pub r_squared: f64,
}

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }
    Ok(())
}

/// Mean Absolute Percentage Error, in percent.
///
/// `mean(|(actual - predicted) / actual|) * 100`
///
/// Zeros in `actual` are not guarded against: the result follows IEEE
/// arithmetic and becomes infinite (or NaN when the error is also zero).
/// Use [`calculate_metrics`] for a guarded variant.
///
/// # Example
/// ```
/// use forecast_kit::utils::mape;
///
/// let err = mape(&[100.0, 200.0], &[110.0, 180.0]).unwrap();
/// assert!((err - 10.0).abs() < 1e-12);
/// ```
pub fn mape(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;
    Ok(100.0 * mean_pointwise(actual, predicted, |a, p| ((a - p) / a).abs()))
}

/// All accuracy metrics at once.
///
/// Unlike [`mape`], the MAPE field is `None` when an actual value is zero.
/// MASE scales by the in-sample naive (or seasonal naive, with
/// `seasonal_period`) error and is `None` when that error is zero or the
/// series is too short.
pub fn calculate_metrics(
    actual: &[f64],
    predicted: &[f64],
    seasonal_period: Option<usize>,
) -> Result<AccuracyMetrics> {
    check_lengths(actual, predicted)?;

    let mse = mse(actual, predicted);
    let center = mean(actual);
    let ss_tot: f64 = actual.iter().map(|a| (a - center).powi(2)).sum();
    let r_squared = if ss_tot == 0.0 {
        1.0
    } else {
        1.0 - mse * actual.len() as f64 / ss_tot
    };

    Ok(AccuracyMetrics {
        mae: mae(actual, predicted),
        mse,
        rmse: mse.sqrt(),
        mape: if actual.contains(&0.0) {
            None
        } else {
            mape(actual, predicted).ok()
        },
        smape: smape(actual, predicted),
        mase: mase(actual, predicted, seasonal_period.unwrap_or(1)),
        r_squared,
    })
}

fn mase(actual: &[f64], predicted: &[f64], period: usize) -> Option<f64> {
    if actual.len() <= period {
        return None;
    }
    let naive = mae(&actual[period..], &actual[..actual.len() - period]);
    (naive > 0.0).then(|| mae(actual, predicted) / naive)
}

/// Mean of `f(actual, predicted)` over paired points; NaN on empty or
/// mismatched input.
fn mean_pointwise(actual: &[f64], predicted: &[f64], f: impl Fn(f64, f64) -> f64) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }
    let total: f64 = actual.iter().zip(predicted).map(|(&a, &p)| f(a, p)).sum();
    total / actual.len() as f64
}

/// Mean absolute error.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    mean_pointwise(actual, predicted, |a, p| (a - p).abs())
}

/// Mean squared error.
pub fn mse(actual: &[f64], predicted: &[f64]) -> f64 {
    mean_pointwise(actual, predicted, |a, p| (a - p).powi(2))
}

pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    mse(actual, predicted).sqrt()
}

/// Symmetric MAPE in percent. A pair of zeros contributes no error.
pub fn smape(actual: &[f64], predicted: &[f64]) -> f64 {
    100.0
        * mean_pointwise(actual, predicted, |a, p| match a.abs() + p.abs() {
            d if d == 0.0 => 0.0,
            d => 2.0 * (a - p).abs() / d,
        })
}
