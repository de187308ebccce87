//! Least-squares window regressor.

use crate::error::{ForecastError, Result};
use crate::models::sequence::rolling::SequenceModel;
use crate::models::sequence::window::{check_width, SequenceWindow};
use crate::utils::ols::{ols_fit, OLSResult};

/// Predicts each feature of the next row as an affine function of the
/// flattened `n_input x n_features` window.
///
/// One OLS regression per feature with `1 + n_input * n_features`
/// coefficients (intercept first).
#[derive(Debug, Clone)]
pub struct LinearSequenceModel {
    n_input: usize,
    n_features: usize,
    fits: Vec<OLSResult>,
}

impl LinearSequenceModel {
    /// Fit on consecutive rows of `train`.
    pub fn fit(train: &[Vec<f64>], n_input: usize) -> Result<Self> {
        if n_input == 0 {
            return Err(ForecastError::InvalidParameter(
                "n_input must be positive".to_string(),
            ));
        }
        let n_features = train.first().map(Vec::len).ok_or(ForecastError::EmptyData)?;
        if n_features == 0 {
            return Err(ForecastError::InvalidParameter(
                "rows must have at least one feature".to_string(),
            ));
        }
        for row in train {
            check_width(row, n_features)?;
        }
        if train.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ForecastError::MissingValues);
        }

        let k = 1 + n_input * n_features;
        let needed = n_input + k + 1;
        if train.len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: train.len(),
            });
        }

        let design: Vec<Vec<f64>> = train
            .windows(n_input + 1)
            .map(|w| design_row(w[..n_input].iter().map(Vec::as_slice)))
            .collect();

        let fits = (0..n_features)
            .map(|j| {
                let target: Vec<f64> = train[n_input..].iter().map(|row| row[j]).collect();
                ols_fit(&design, &target)
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(n_input, n_features, samples = design.len(), "window regressor fitted");

        Ok(Self {
            n_input,
            n_features,
            fits,
        })
    }

    /// Fit on a single-feature series.
    pub fn fit_univariate(series: &[f64], n_input: usize) -> Result<Self> {
        let rows: Vec<Vec<f64>> = series.iter().map(|&v| vec![v]).collect();
        Self::fit(&rows, n_input)
    }

    pub fn n_input(&self) -> usize {
        self.n_input
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Coefficients for one output feature, intercept first.
    pub fn coefficients(&self, feature: usize) -> Option<&[f64]> {
        self.fits.get(feature).map(|fit| fit.coefficients.as_slice())
    }
}

impl SequenceModel for LinearSequenceModel {
    fn predict_next(&self, window: &SequenceWindow) -> Result<Vec<f64>> {
        if window.n_input() != self.n_input {
            return Err(ForecastError::DimensionMismatch {
                expected: self.n_input,
                got: window.n_input(),
            });
        }
        if window.n_features() != self.n_features {
            return Err(ForecastError::DimensionMismatch {
                expected: self.n_features,
                got: window.n_features(),
            });
        }

        let row = design_row(window.rows());
        self.fits.iter().map(|fit| fit.predict_row(&row)).collect()
    }
}

fn design_row<'a>(rows: impl Iterator<Item = &'a [f64]>) -> Vec<f64> {
    std::iter::once(1.0)
        .chain(rows.flat_map(|r| r.iter().copied()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sequence::rolling::generate_univariate_predictions;
    use approx::assert_relative_eq;

    // y_t = 1 + 0.5 * y_{t-1}
    fn ar1(n: usize) -> Vec<f64> {
        let mut series = vec![10.0];
        for i in 1..n {
            series.push(1.0 + 0.5 * series[i - 1]);
        }
        series
    }

    #[test]
    fn recovers_ar1_coefficients() {
        let model = LinearSequenceModel::fit_univariate(&ar1(12), 1).unwrap();
        let coefs = model.coefficients(0).unwrap();

        assert_relative_eq!(coefs[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(coefs[1], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn rolls_forward_along_the_recursion() {
        let series = ar1(20);
        let (train, test) = series.split_at(12);
        let model = LinearSequenceModel::fit_univariate(train, 1).unwrap();

        let preds = generate_univariate_predictions(train, test.len(), 1, &model).unwrap();

        for (p, a) in preds.iter().zip(test) {
            assert_relative_eq!(*p, *a, epsilon = 1e-6);
        }
    }

    #[test]
    fn multi_feature_fit() {
        // Two sinusoids: each is an exact linear function of its last two values
        let row = |i: usize| vec![(i as f64 * 0.7).sin(), (i as f64 * 0.3).cos()];
        let train: Vec<Vec<f64>> = (0..30).map(row).collect();
        let model = LinearSequenceModel::fit(&train, 2).unwrap();

        assert_eq!(model.n_features(), 2);
        assert_eq!(model.coefficients(1).unwrap().len(), 5);

        let window = SequenceWindow::from_rows(&train[28..], 2).unwrap();
        let next = model.predict_next(&window).unwrap();
        let expected = row(30);
        assert_relative_eq!(next[0], expected[0], epsilon = 1e-6);
        assert_relative_eq!(next[1], expected[1], epsilon = 1e-6);
    }

    #[test]
    fn rejects_short_training_data() {
        assert!(matches!(
            LinearSequenceModel::fit_univariate(&[1.0, 2.0, 3.0], 1),
            Err(ForecastError::InsufficientData { needed: 4, got: 3 })
        ));
        assert!(matches!(
            LinearSequenceModel::fit(&[], 1),
            Err(ForecastError::EmptyData)
        ));
    }

    #[test]
    fn collinear_windows_fail() {
        // A straight line makes consecutive lags collinear with the intercept
        let line: Vec<f64> = (0..20).map(|i| 3.0 + 2.0 * i as f64).collect();
        assert!(matches!(
            LinearSequenceModel::fit_univariate(&line, 2),
            Err(ForecastError::ComputationError(_))
        ));
    }

    #[test]
    fn window_shape_must_match() {
        let series: Vec<f64> = (0..20)
            .map(|i| (i as f64 * 0.9).sin() + (i as f64 * 0.37).cos())
            .collect();
        let model = LinearSequenceModel::fit_univariate(&series, 2).unwrap();
        let window = SequenceWindow::from_rows(&[vec![1.0]], 1).unwrap();

        assert!(matches!(
            model.predict_next(&window),
            Err(ForecastError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }
}
