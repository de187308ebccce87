//! Recursive multi-step forecasting with a one-step sequence model.

use crate::error::{ForecastError, Result};
use crate::models::sequence::window::{check_width, SequenceWindow};

/// A model that maps an input window to the next row.
///
/// Any `Fn(&SequenceWindow) -> Result<Vec<f64>>` closure is a
/// `SequenceModel`, so externally trained networks can be wrapped in a
/// closure.
pub trait SequenceModel {
    /// Predict the row that follows `window`.
    fn predict_next(&self, window: &SequenceWindow) -> Result<Vec<f64>>;
}

impl<F> SequenceModel for F
where
    F: Fn(&SequenceWindow) -> Result<Vec<f64>>,
{
    fn predict_next(&self, window: &SequenceWindow) -> Result<Vec<f64>> {
        self(window)
    }
}

/// Roll a one-step model forward `len_test` steps.
///
/// The last `n_input` rows of `train` seed the window. Each step predicts a
/// row, records it, drops the oldest row of the window and appends the
/// prediction.
///
/// # Arguments
/// * `train` - Rows of `n_features` values, oldest first
/// * `len_test` - Number of steps to forecast
/// * `n_input` - Window length fed to the model
/// * `n_features` - Width of every row
/// * `model` - One-step model
///
/// # Returns
/// `len_test` predicted rows in forecast order.
///
/// # Errors
/// * `InvalidParameter` if `n_input` or `n_features` is zero
/// * `InsufficientData` if `train` has fewer than `n_input` rows
/// * `DimensionMismatch` if a seed row or a prediction is not `n_features` wide
///
/// # Example
/// ```
/// use forecast_kit::models::sequence::{generate_predictions, SequenceWindow};
///
/// let train: Vec<Vec<f64>> = (1..=5).map(|v| vec![v as f64]).collect();
/// // Persistence model: repeat the latest row
/// let model = |w: &SequenceWindow| -> forecast_kit::Result<Vec<f64>> {
///     Ok(vec![w.latest().map_or(0.0, |row| row[0])])
/// };
///
/// let preds = generate_predictions(&train, 3, 2, 1, &model).unwrap();
/// assert_eq!(preds, vec![vec![5.0], vec![5.0], vec![5.0]]);
/// ```
pub fn generate_predictions<M>(
    train: &[Vec<f64>],
    len_test: usize,
    n_input: usize,
    n_features: usize,
    model: &M,
) -> Result<Vec<Vec<f64>>>
where
    M: SequenceModel + ?Sized,
{
    if n_input == 0 {
        return Err(ForecastError::InvalidParameter(
            "n_input must be positive".to_string(),
        ));
    }
    if n_features == 0 {
        return Err(ForecastError::InvalidParameter(
            "n_features must be positive".to_string(),
        ));
    }
    if train.len() < n_input {
        return Err(ForecastError::InsufficientData {
            needed: n_input,
            got: train.len(),
        });
    }

    let mut window = SequenceWindow::from_rows(&train[train.len() - n_input..], n_features)?;
    let mut predictions = Vec::with_capacity(len_test);

    for step in 0..len_test {
        let prediction = model.predict_next(&window)?;
        check_width(&prediction, n_features)?;
        tracing::trace!(step, ?prediction, "sequence step");

        predictions.push(prediction.clone());
        window.push(prediction)?;
    }

    Ok(predictions)
}

/// Single-feature convenience over [`generate_predictions`].
pub fn generate_univariate_predictions<M>(
    train: &[f64],
    len_test: usize,
    n_input: usize,
    model: &M,
) -> Result<Vec<f64>>
where
    M: SequenceModel + ?Sized,
{
    let rows: Vec<Vec<f64>> = train.iter().map(|&v| vec![v]).collect();
    let predictions = generate_predictions(&rows, len_test, n_input, 1, model)?;
    Ok(predictions.into_iter().map(|row| row[0]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn model<F>(f: F) -> F
    where
        F: Fn(&SequenceWindow) -> Result<Vec<f64>>,
    {
        f
    }

    fn column(values: &[f64]) -> Vec<Vec<f64>> {
        values.iter().map(|&v| vec![v]).collect()
    }

    #[test]
    fn output_length_matches_len_test() {
        let model = model(|w| Ok(vec![w.flatten().iter().sum::<f64>()]));
        let preds = generate_predictions(&column(&[1.0, 2.0, 3.0]), 7, 2, 1, &model).unwrap();
        assert_eq!(preds.len(), 7);
    }

    #[test]
    fn window_carries_predictions_forward() {
        // Sum of the window: 2+3=5, 3+5=8, 5+8=13
        let model = model(|w| Ok(vec![w.flatten().iter().sum::<f64>()]));
        let preds = generate_predictions(&column(&[1.0, 2.0, 3.0]), 3, 2, 1, &model).unwrap();
        assert_eq!(preds, vec![vec![5.0], vec![8.0], vec![13.0]]);
    }

    #[test]
    fn model_sees_expected_windows() {
        let seen = RefCell::new(Vec::new());
        let model = model(|w| {
            seen.borrow_mut().push(w.flatten());
            Ok(vec![w.flatten()[0] * 10.0, 0.0])
        });
        let train = vec![vec![1.0, 0.0], vec![2.0, 0.0], vec![3.0, 0.0]];

        generate_predictions(&train, 2, 2, 2, &model).unwrap();

        let seen = seen.into_inner();
        assert_eq!(seen[0], vec![2.0, 0.0, 3.0, 0.0]);
        assert_eq!(seen[1], vec![3.0, 0.0, 20.0, 0.0]);
    }

    #[test]
    fn zero_len_test_is_empty() {
        let model = model(|_| Ok(vec![0.0]));
        let preds = generate_predictions(&column(&[1.0, 2.0]), 0, 2, 1, &model).unwrap();
        assert!(preds.is_empty());
    }

    #[test]
    fn rejects_invalid_arguments() {
        let model = model(|_| Ok(vec![0.0]));
        let train = column(&[1.0, 2.0]);

        assert!(matches!(
            generate_predictions(&train, 1, 0, 1, &model),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(matches!(
            generate_predictions(&train, 1, 3, 1, &model),
            Err(ForecastError::InsufficientData { needed: 3, got: 2 })
        ));
        assert!(matches!(
            generate_predictions(&train, 1, 2, 2, &model),
            Err(ForecastError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn rejects_wrong_prediction_width() {
        let model = model(|_| Ok(vec![0.0, 1.0]));
        assert!(matches!(
            generate_predictions(&column(&[1.0, 2.0]), 1, 1, 1, &model),
            Err(ForecastError::DimensionMismatch { expected: 1, got: 2 })
        ));
    }

    #[test]
    fn model_errors_propagate() {
        let model = model(|_| Err(ForecastError::FitRequired));
        assert_eq!(
            generate_predictions(&column(&[1.0]), 2, 1, 1, &model),
            Err(ForecastError::FitRequired)
        );
    }

    #[test]
    fn univariate_wrapper() {
        let model = model(|w| Ok(vec![w.latest().map_or(0.0, |r| r[0]) + 1.0]));
        let preds = generate_univariate_predictions(&[4.0, 5.0], 3, 1, &model).unwrap();
        assert_eq!(preds, vec![6.0, 7.0, 8.0]);
    }

    #[test]
    fn works_with_trait_objects() {
        let model = model(|_| Ok(vec![1.5]));
        let boxed: Box<dyn SequenceModel> = Box::new(model);
        let preds = generate_predictions(&column(&[0.0]), 2, 1, 1, boxed.as_ref()).unwrap();
        assert_eq!(preds, vec![vec![1.5], vec![1.5]]);
    }
}
