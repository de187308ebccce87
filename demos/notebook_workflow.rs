//! Full forecasting workflow on a synthetic daily price series.
//!
//! Grid-search progress is logged at `info`; override with `RUST_LOG`.
//! Charts are written to the system temp directory.

use chrono::{TimeZone, Utc};
use forecast_kit::core::{ForecastFrame, TimeSeries};
use forecast_kit::models::arima::{difference, gs_arima, ARIMA};
use forecast_kit::models::sequence::{generate_univariate_predictions, LinearSequenceModel};
use forecast_kit::models::Forecaster;
use forecast_kit::plot::{plot_arima_data, plot_arima_data_zoomed, plot_test_predictions, ZoomWindow};
use forecast_kit::transform::normalize;
use forecast_kit::utils::mape;
use forecast_kit::validation::{adf_test, interpret_dftest, AdfConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn synthetic_prices(n: usize) -> Vec<f64> {
    let mut state: u64 = 7;
    let mut level = 1.1;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let shock = (state >> 11) as f64 / (1u64 << 53) as f64 - 0.5;
            level += 0.003 + 0.03 * shock;
            level
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forecast_kit=info".into()),
        )
        .init();

    let start = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).single().ok_or("bad start date")?;
    let series = TimeSeries::daily(start, synthetic_prices(300))?.with_name("price");
    let (train, test) = series.split_at(270)?;
    let out_dir = std::env::temp_dir();

    println!("ADF on levels:");
    println!("{}", interpret_dftest(&adf_test(train.values(), &AdfConfig::default())?));
    println!("ADF on first differences:");
    let diffs = difference(train.values(), 1);
    println!("{}", interpret_dftest(&adf_test(&diffs, &AdfConfig::default())?));

    let results = gs_arima(&train, 1, 4, 4);
    println!("\n{results}");
    for skipped in results.skipped() {
        println!("skipped {}: {}", skipped.order, skipped.error);
    }
    let best = results.best().ok_or("no candidate could be fitted")?;
    println!("best: {} (AIC {:.3})", best.model, best.aic);

    let mut model = ARIMA::with_order(best.order());
    model.fit(&train)?;
    let arima_preds = model.predict(test.len())?.into_values();
    println!("ARIMA MAPE: {:.3}%", mape(test.values(), &arima_preds)?);

    plot_arima_data(&train, &test, &arima_preds, "Daily price", "Date", "Price", model.order())?
        .save(out_dir.join("arima.svg"))?;
    plot_arima_data_zoomed(
        &train,
        &test,
        &arima_preds,
        "Daily price (zoomed)",
        "Date",
        "Price",
        model.order(),
        &ZoomWindow::default(),
    )?
    .save(out_dir.join("arima_zoomed.svg"))?;

    let n_input = 10;
    let scaler = normalize(train.values());
    let sequence_model = LinearSequenceModel::fit_univariate(&scaler.data, n_input)?;
    let scaled = generate_univariate_predictions(&scaler.data, test.len(), n_input, &sequence_model)?;
    let seq_preds = scaler.inverse_transform(&scaled);
    println!("Sequence model MAPE: {:.3}%", mape(test.values(), &seq_preds)?);

    let frame = ForecastFrame::from_predictions(&test, &seq_preds)?;
    plot_test_predictions(&frame, "Date", "Price", "Test set predictions")?
        .save(out_dir.join("test_predictions.svg"))?;

    println!("charts written to {}", out_dir.display());
    Ok(())
}
