//! Scalers for preparing sequence-model inputs.
//!
//! Both scalers return the fitted parameters with the scaled data so that
//! test data can be transformed the same way and predictions mapped back.

use crate::utils::stats::{mean, std_dev};

/// Scaled data plus the `(center, scale)` pair that produced it.
///
/// `scaled = (x - center) / scale`
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleResult {
    /// Transformed data
    pub data: Vec<f64>,
    /// Subtracted before scaling (minimum or mean)
    pub center: f64,
    /// Divisor (range or standard deviation); never zero
    pub scale: f64,
}

impl ScaleResult {
    fn identity() -> Self {
        Self {
            data: Vec::new(),
            center: 0.0,
            scale: 1.0,
        }
    }

    /// Recover the original values of `data`.
    pub fn inverse(&self) -> Vec<f64> {
        self.inverse_transform(&self.data)
    }

    /// Scale new values with the fitted parameters.
    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .map(|&x| (x - self.center) / self.scale)
            .collect()
    }

    /// Map scaled values (e.g. model predictions) back to the original units.
    pub fn inverse_transform(&self, scaled: &[f64]) -> Vec<f64> {
        scaled
            .iter()
            .map(|&x| x * self.scale + self.center)
            .collect()
    }
}

/// Min-max scaling to `[0, 1]`.
///
/// A constant series maps to zeros.
///
/// # Example
/// ```
/// use forecast_kit::transform::normalize;
///
/// let scaled = normalize(&[10.0, 15.0, 20.0]);
/// assert_eq!(scaled.data, vec![0.0, 0.5, 1.0]);
/// assert_eq!(scaled.inverse_transform(&[0.25]), vec![12.5]);
/// ```
pub fn normalize(series: &[f64]) -> ScaleResult {
    if series.is_empty() {
        return ScaleResult::identity();
    }

    let min = series.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let scale = if range < 1e-10 { 1.0 } else { range };

    ScaleResult {
        data: series.iter().map(|&x| (x - min) / scale).collect(),
        center: min,
        scale,
    }
}

/// Z-score scaling with the sample standard deviation.
///
/// A constant series (or a single value) keeps unit scale.
pub fn standardize(series: &[f64]) -> ScaleResult {
    if series.is_empty() {
        return ScaleResult::identity();
    }

    let center = mean(series);
    let std = std_dev(series);
    // NaN for a single value
    let scale = if std.is_finite() && std >= 1e-10 { std } else { 1.0 };

    ScaleResult {
        data: series.iter().map(|&x| (x - center) / scale).collect(),
        center,
        scale,
    }
}
