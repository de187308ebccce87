//! Property-based tests for metrics, rolling forecasts and grid search.

use chrono::{TimeZone, Utc};
use forecast_kit::core::TimeSeries;
use forecast_kit::models::arima::gs_arima;
use forecast_kit::models::sequence::{generate_predictions, SequenceWindow};
use forecast_kit::utils::mape;
use forecast_kit::Result;
use proptest::prelude::*;

fn make_ts(values: &[f64]) -> TimeSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    TimeSeries::daily(start, values.to_vec()).unwrap()
}

/// Strictly positive values, so MAPE stays finite.
fn positive_values(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..1000.0_f64, min_len..max_len)
}

/// Mean of the window per feature.
fn mean_model(window: &SequenceWindow) -> Result<Vec<f64>> {
    let n = window.n_input() as f64;
    Ok((0..window.n_features())
        .map(|j| window.feature(j).map_or(0.0, |col| col.iter().sum::<f64>() / n))
        .collect())
}

proptest! {
    #[test]
    fn mape_of_perfect_forecast_is_zero(actual in positive_values(1, 50)) {
        prop_assert_eq!(mape(&actual, &actual).unwrap(), 0.0);
    }

    #[test]
    fn mape_is_non_negative_and_finite(
        (actual, predicted) in (1usize..50).prop_flat_map(|n| (
            prop::collection::vec(1.0..1000.0_f64, n),
            prop::collection::vec(-1000.0..1000.0_f64, n),
        ))
    ) {
        let err = mape(&actual, &predicted).unwrap();
        prop_assert!(err >= 0.0);
        prop_assert!(err.is_finite());
    }

    #[test]
    fn mape_scales_with_relative_error(actual in positive_values(1, 30), factor in 0.0..2.0_f64) {
        let predicted: Vec<f64> = actual.iter().map(|a| a * (1.0 + factor)).collect();
        let err = mape(&actual, &predicted).unwrap();
        prop_assert!((err - factor * 100.0).abs() < 1e-6);
    }

    #[test]
    fn rolling_output_has_len_test_rows(
        n_input in 1usize..8,
        n_features in 1usize..4,
        extra in 0usize..10,
        len_test in 0usize..25,
    ) {
        let train: Vec<Vec<f64>> = (0..n_input + extra)
            .map(|i| (0..n_features).map(|j| (i * (j + 1)) as f64).collect())
            .collect();

        let preds = generate_predictions(&train, len_test, n_input, n_features, &mean_model).unwrap();
        prop_assert_eq!(preds.len(), len_test);
        prop_assert!(preds.iter().all(|row| row.len() == n_features));
    }

    #[test]
    fn rolling_mean_model_stays_within_seed_range(seed in prop::collection::vec(-100.0..100.0_f64, 3..10)) {
        let train: Vec<Vec<f64>> = seed.iter().map(|&v| vec![v]).collect();
        let lo = seed.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = seed.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let preds = generate_predictions(&train, 10, 3, 1, &mean_model).unwrap();
        for row in preds {
            prop_assert!(row[0] >= lo - 1e-9 && row[0] <= hi + 1e-9);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn grid_search_accounts_for_every_candidate(
        values in prop::collection::vec(10.0..20.0_f64, 40..60),
        n_p in 1usize..3,
        n_q in 1usize..3,
    ) {
        let results = gs_arima(&make_ts(&values), 0, n_p, n_q);
        prop_assert_eq!(results.len() + results.skipped().len(), n_p * n_q);
        if let Some(best) = results.best() {
            prop_assert!(results.iter().all(|r| best.aic <= r.aic));
        }
    }
}
