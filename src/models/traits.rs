//! Forecaster trait defining the common interface for fitted models.

use crate::core::{Forecast, TimeSeries};
use crate::error::Result;

/// Common interface for time-indexed forecasting models.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to the time series data.
    fn fit(&mut self, series: &TimeSeries) -> Result<()>;

    /// Generate predictions for the specified horizon.
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    /// Generate predictions with confidence intervals.
    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let _ = level;
        self.predict(horizon)
    }

    /// In-sample one-step predictions.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Residuals (actual - fitted).
    fn residuals(&self) -> Option<&[f64]>;

    fn name(&self) -> &str;

    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::arima::ARIMA;
    use chrono::{TimeZone, Utc};

    fn series(n: usize) -> TimeSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let values = (0..n).map(|i| 5.0 + (i as f64 * 0.4).cos()).collect();
        TimeSeries::daily(start, values).unwrap()
    }

    #[test]
    fn trait_object_fit_predict() {
        let mut model: Box<dyn Forecaster> = Box::new(ARIMA::new(1, 0, 0));
        model.fit(&series(40)).unwrap();

        assert!(model.is_fitted());
        assert_eq!(model.predict(6).unwrap().horizon(), 6);
        assert!(model.residuals().is_some());
    }

    #[test]
    fn trait_object_with_intervals() {
        let mut model: Box<dyn Forecaster> = Box::new(ARIMA::new(0, 1, 1));
        model.fit(&series(40)).unwrap();

        let forecast = model.predict_with_intervals(4, 0.9).unwrap();
        assert!(forecast.has_lower() && forecast.has_upper());
    }
}
