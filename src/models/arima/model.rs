//! ARIMA (Autoregressive Integrated Moving Average) model.

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::arima::diff::{difference, integrate};
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::quantile_normal;
use std::fmt;

/// Default cap on optimizer iterations.
pub const DEFAULT_MAX_ITER: usize = 1000;

/// ARIMA order `(p, d, q)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArimaOrder {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Whether the model carries a mean term (only for undifferenced data).
    pub fn has_mean(&self) -> bool {
        self.d == 0
    }

    /// Estimated parameters: AR + MA + mean (if any) + innovation variance.
    pub fn num_params(&self) -> usize {
        self.p + self.q + usize::from(self.has_mean()) + 1
    }

    /// Shortest series the order can be fitted to.
    pub fn min_len(&self) -> usize {
        self.d + self.p.max(self.q) + 2
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({}, {}, {})", self.p, self.d, self.q)
    }
}

impl From<(usize, usize, usize)> for ArimaOrder {
    fn from((p, d, q): (usize, usize, usize)) -> Self {
        Self::new(p, d, q)
    }
}

/// ARIMA forecasting model fitted by conditional sum of squares.
///
/// ARIMA(p, d, q) combines:
/// - AR(p): Autoregressive component
/// - I(d): Differencing for stationarity
/// - MA(q): Moving average component
///
/// # Example
/// ```
/// use forecast_kit::core::TimeSeries;
/// use forecast_kit::models::arima::ARIMA;
/// use forecast_kit::models::Forecaster;
/// use chrono::{TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let values: Vec<f64> = (0..60).map(|i| 10.0 + (i as f64 * 0.4).sin()).collect();
/// let series = TimeSeries::daily(start, values).unwrap();
///
/// let mut model = ARIMA::new(1, 0, 1);
/// model.fit(&series).unwrap();
/// assert!(model.aic().unwrap().is_finite());
/// assert_eq!(model.predict(7).unwrap().horizon(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct ARIMA {
    order: ArimaOrder,
    max_iter: usize,
    ar_coefficients: Vec<f64>,
    ma_coefficients: Vec<f64>,
    /// Mean of the undifferenced series; zero when `d > 0`.
    mean: f64,
    original: Option<Vec<f64>>,
    differenced: Option<Vec<f64>>,
    /// Fitted values on the differenced scale.
    fitted_diff: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    sigma2: Option<f64>,
    aic: Option<f64>,
    bic: Option<f64>,
    converged: bool,
}

impl ARIMA {
    /// Create a new ARIMA model.
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self::with_order(ArimaOrder::new(p, d, q))
    }

    pub fn with_order(order: ArimaOrder) -> Self {
        Self {
            order,
            max_iter: DEFAULT_MAX_ITER,
            ar_coefficients: vec![],
            ma_coefficients: vec![],
            mean: 0.0,
            original: None,
            differenced: None,
            fitted_diff: None,
            residuals: None,
            sigma2: None,
            aic: None,
            bic: None,
            converged: false,
        }
    }

    /// Set the optimizer iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    /// Estimated mean (always zero for differenced models).
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Innovation variance estimate.
    pub fn sigma2(&self) -> Option<f64> {
        self.sigma2
    }

    pub fn aic(&self) -> Option<f64> {
        self.aic
    }

    pub fn bic(&self) -> Option<f64> {
        self.bic
    }

    /// Whether the optimizer converged within the iteration cap.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// One-step residuals of the recursion, zero before the burn-in.
    fn css_residuals(diff_series: &[f64], ar: &[f64], ma: &[f64], mean: f64) -> Vec<f64> {
        let n = diff_series.len();
        let start = ar.len().max(ma.len());
        let mut residuals = vec![0.0; n];

        for t in start..n {
            let mut pred = mean;
            for (i, phi) in ar.iter().enumerate() {
                pred += phi * (diff_series[t - 1 - i] - mean);
            }
            for (i, theta) in ma.iter().enumerate() {
                pred += theta * residuals[t - 1 - i];
            }
            residuals[t] = diff_series[t] - pred;
        }

        residuals
    }

    fn css(diff_series: &[f64], ar: &[f64], ma: &[f64], mean: f64) -> f64 {
        let start = ar.len().max(ma.len());
        if diff_series.len() <= start {
            return f64::MAX;
        }
        Self::css_residuals(diff_series, ar, ma, mean)[start..]
            .iter()
            .map(|r| r * r)
            .sum()
    }

    /// Minimize the conditional sum of squares.
    ///
    /// Parameter layout: `[mean?, ar_1..ar_p, ma_1..ma_q]`.
    fn estimate_parameters(&mut self, diff_series: &[f64]) {
        let ArimaOrder { p, q, .. } = self.order;
        let offset = usize::from(self.order.has_mean());
        let sample_mean = diff_series.iter().sum::<f64>() / diff_series.len() as f64;
        let mean_init = if self.order.has_mean() { sample_mean } else { 0.0 };

        if p == 0 && q == 0 {
            self.mean = mean_init;
            self.ar_coefficients = vec![];
            self.ma_coefficients = vec![];
            self.converged = true;
            return;
        }

        let mut initial = Vec::with_capacity(offset + p + q);
        let mut bounds = Vec::with_capacity(offset + p + q);
        if self.order.has_mean() {
            initial.push(mean_init);
            bounds.push((f64::NEG_INFINITY, f64::INFINITY));
        }
        // Small decaying starts keep the first simplex inside the stationary region
        initial.extend((0..p).map(|i| 0.1 / (i + 1) as f64));
        initial.extend((0..q).map(|i| 0.1 / (i + 1) as f64));
        bounds.extend(std::iter::repeat((-0.99, 0.99)).take(p + q));

        let config = NelderMeadConfig::default().with_max_iter(self.max_iter);
        let has_mean = self.order.has_mean();

        let result = nelder_mead(
            |params| {
                let mean = if has_mean { params[0] } else { 0.0 };
                let ar = &params[offset..offset + p];
                let ma = &params[offset + p..];
                Self::css(diff_series, ar, ma, mean)
            },
            &initial,
            Some(&bounds),
            &config,
        );

        tracing::debug!(
            order = %self.order,
            iterations = result.iterations,
            converged = result.converged,
            css = result.optimal_value,
            "css optimization finished"
        );

        let point = result.optimal_point;
        self.mean = if has_mean { point[0] } else { 0.0 };
        self.ar_coefficients = point[offset..offset + p].to_vec();
        self.ma_coefficients = point[offset + p..].to_vec();
        self.converged = result.converged;
    }

    fn calculate_fitted(&mut self, diff_series: &[f64]) -> Result<()> {
        let start = self.order.p.max(self.order.q);
        let residuals = Self::css_residuals(
            diff_series,
            &self.ar_coefficients,
            &self.ma_coefficients,
            self.mean,
        );

        let fitted: Vec<f64> = diff_series
            .iter()
            .zip(residuals.iter())
            .enumerate()
            .map(|(t, (y, r))| if t < start { f64::NAN } else { y - r })
            .collect();

        let effective = &residuals[start..];
        let n_eff = effective.len() as f64;
        let sigma2 = effective.iter().map(|r| r * r).sum::<f64>() / n_eff;

        let k = self.order.num_params() as f64;
        let ll = -0.5 * n_eff * (1.0 + sigma2.ln() + (2.0 * std::f64::consts::PI).ln());
        let aic = -2.0 * ll + 2.0 * k;
        let bic = -2.0 * ll + k * n_eff.ln();

        if !aic.is_finite() {
            return Err(ForecastError::ComputationError(format!(
                "{} produced a non-finite AIC (residual variance {sigma2})",
                self.order
            )));
        }

        self.sigma2 = Some(sigma2);
        self.aic = Some(aic);
        self.bic = Some(bic);
        self.fitted_diff = Some(fitted);
        self.residuals = Some(residuals);
        Ok(())
    }

    /// MA(∞) weights of the integrated process, `psi_0 = 1`.
    fn psi_weights(&self, horizon: usize) -> Vec<f64> {
        // AR polynomial (1 - Σ φ_i B^i) times (1 - B)^d
        let mut poly = vec![1.0];
        poly.extend(self.ar_coefficients.iter().map(|phi| -phi));
        for _ in 0..self.order.d {
            let mut next = vec![0.0; poly.len() + 1];
            for (i, c) in poly.iter().enumerate() {
                next[i] += c;
                next[i + 1] -= c;
            }
            poly = next;
        }
        let phi: Vec<f64> = poly[1..].iter().map(|c| -c).collect();

        let mut psi = vec![0.0; horizon];
        if horizon == 0 {
            return psi;
        }
        psi[0] = 1.0;
        for j in 1..horizon {
            let mut value = self.ma_coefficients.get(j - 1).copied().unwrap_or(0.0);
            for (i, phi_i) in phi.iter().enumerate().take(j) {
                value += phi_i * psi[j - 1 - i];
            }
            psi[j] = value;
        }
        psi
    }
}

impl Default for ARIMA {
    fn default() -> Self {
        Self::with_order(ArimaOrder::default())
    }
}

impl Forecaster for ARIMA {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.values();
        let min_len = self.order.min_len();

        if values.len() < min_len {
            return Err(ForecastError::InsufficientData {
                needed: min_len,
                got: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::MissingValues);
        }

        let diff_series = difference(values, self.order.d);
        self.estimate_parameters(&diff_series);
        self.calculate_fitted(&diff_series)?;

        self.original = Some(values.to_vec());
        self.differenced = Some(diff_series);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let original = self.original.as_ref().ok_or(ForecastError::FitRequired)?;
        let diff_series = self
            .differenced
            .as_ref()
            .ok_or(ForecastError::FitRequired)?;
        let residuals = self.residuals.as_ref().ok_or(ForecastError::FitRequired)?;

        if horizon == 0 {
            return Ok(Forecast::new());
        }

        let mut extended = diff_series.clone();
        let mut shocks = residuals.clone();

        for _ in 0..horizon {
            let t = extended.len();
            let mut pred = self.mean;
            for (i, phi) in self.ar_coefficients.iter().enumerate() {
                if t > i {
                    pred += phi * (extended[t - 1 - i] - self.mean);
                }
            }
            for (i, theta) in self.ma_coefficients.iter().enumerate() {
                if t > i {
                    pred += theta * shocks[t - 1 - i];
                }
            }
            extended.push(pred);
            // Future shocks have zero expectation
            shocks.push(0.0);
        }

        let forecast_diff = extended[diff_series.len()..].to_vec();
        let predictions = integrate(&forecast_diff, original, self.order.d);

        Ok(Forecast::from_values(predictions))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        if !(0.0..1.0).contains(&level) {
            return Err(ForecastError::InvalidParameter(format!(
                "confidence level must be in [0, 1), got {level}"
            )));
        }
        let forecast = self.predict(horizon)?;
        if horizon == 0 {
            return Ok(forecast);
        }

        let sigma2 = self.sigma2.ok_or(ForecastError::FitRequired)?;
        let z = quantile_normal((1.0 + level) / 2.0);

        let mut cumulative = 0.0;
        let half_widths: Vec<f64> = self
            .psi_weights(horizon)
            .iter()
            .map(|psi| {
                cumulative += psi * psi;
                z * (sigma2 * cumulative).sqrt()
            })
            .collect();

        let point = forecast.into_values();
        let lower = point.iter().zip(&half_widths).map(|(p, w)| p - w).collect();
        let upper = point.iter().zip(&half_widths).map(|(p, w)| p + w).collect();

        Ok(Forecast::from_values_with_intervals(point, lower, upper))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted_diff.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "ARIMA"
    }
}
