//! Augmented Dickey-Fuller unit-root test.
//!
//! Regression with a constant:
//!
//! `Δy_t = α + β·y_{t-1} + Σ_{i=1..k} γ_i·Δy_{t-i} + ε_t`
//!
//! The test statistic is the t-ratio of `β`. Under the null hypothesis the
//! series has a unit root; small p-values indicate stationarity.

use crate::error::{ForecastError, Result};
use crate::utils::ols::{ols_fit, OLSResult};
use crate::utils::stats::cdf_normal;
use std::fmt;

/// How the number of lagged differences is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoLag {
    /// Minimize AIC over `0..=max_lag`.
    #[default]
    Aic,
    /// Minimize BIC over `0..=max_lag`.
    Bic,
    /// Use exactly `max_lag` lagged differences.
    Fixed,
}

/// Configuration for [`adf_test`].
#[derive(Debug, Clone, Default)]
pub struct AdfConfig {
    /// Largest lag considered. Defaults to `ceil(12 * (n / 100)^(1/4))`.
    pub max_lag: Option<usize>,
    /// Lag selection strategy.
    pub autolag: AutoLag,
}

impl AdfConfig {
    pub fn with_max_lag(mut self, max_lag: usize) -> Self {
        self.max_lag = Some(max_lag);
        self
    }

    pub fn with_autolag(mut self, autolag: AutoLag) -> Self {
        self.autolag = autolag;
        self
    }
}

/// Critical values at common significance levels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CriticalValues {
    /// Critical value at 1% significance
    pub cv_1pct: f64,
    /// Critical value at 5% significance
    pub cv_5pct: f64,
    /// Critical value at 10% significance
    pub cv_10pct: f64,
}

/// Outcome of an Augmented Dickey-Fuller test.
#[derive(Debug, Clone, PartialEq)]
pub struct AdfResult {
    /// t-ratio of the lagged level coefficient.
    pub statistic: f64,
    /// MacKinnon approximate p-value.
    pub p_value: f64,
    /// Number of lagged differences in the final regression.
    pub used_lag: usize,
    /// Observations used by the final regression.
    pub n_obs: usize,
    /// MacKinnon (2010) critical values for `n_obs`.
    pub critical_values: CriticalValues,
    /// Best information criterion found during lag selection.
    pub ic_best: Option<f64>,
}

impl AdfResult {
    /// Whether the unit-root null is rejected at `significance`.
    pub fn is_stationary(&self, significance: f64) -> bool {
        self.p_value < significance
    }
}

/// Run the Augmented Dickey-Fuller test (constant, no trend).
///
/// # Errors
/// * `InsufficientData` if the series is too short for the requested lags
/// * `MissingValues` if the series contains NaN or infinite values
/// * `ComputationError` if the regression is singular (e.g. constant series)
pub fn adf_test(series: &[f64], config: &AdfConfig) -> Result<AdfResult> {
    let n = series.len();
    if n < 6 {
        return Err(ForecastError::InsufficientData { needed: 6, got: n });
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::MissingValues);
    }

    let default_lag = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    let lag_cap = n / 2 - 2;
    let max_lag = config.max_lag.unwrap_or(default_lag).min(lag_cap);

    let diff: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

    let (used_lag, ic_best) = match config.autolag {
        AutoLag::Fixed => (max_lag, None),
        AutoLag::Aic | AutoLag::Bic => {
            // Every candidate uses the sample that the largest lag allows.
            let (design, y) = adf_design(series, &diff, max_lag);
            let mut best: Option<(usize, f64)> = None;
            for lag in 0..=max_lag {
                let sub: Vec<Vec<f64>> = design.iter().map(|row| row[..lag + 2].to_vec()).collect();
                let fit = match ols_fit(&sub, &y) {
                    Ok(fit) => fit,
                    Err(err) => {
                        tracing::debug!(lag, %err, "adf lag candidate skipped");
                        continue;
                    }
                };
                let ic = match config.autolag {
                    AutoLag::Bic => fit.bic(),
                    _ => fit.aic(),
                };
                if best.map_or(true, |(_, b)| ic < b) {
                    best = Some((lag, ic));
                }
            }
            let (lag, ic) = best.ok_or_else(|| {
                ForecastError::ComputationError("no ADF lag could be fitted".to_string())
            })?;
            (lag, Some(ic))
        }
    };

    let (design, y) = adf_design(series, &diff, used_lag);
    let fit: OLSResult = ols_fit(&design, &y)?;
    let statistic = fit.t_stat(1).ok_or_else(|| {
        ForecastError::ComputationError("degenerate ADF regression".to_string())
    })?;

    let n_obs = y.len();
    tracing::debug!(statistic, used_lag, n_obs, "adf regression fitted");

    Ok(AdfResult {
        statistic,
        p_value: mackinnon_p_value(statistic),
        used_lag,
        n_obs,
        critical_values: mackinnon_critical_values(n_obs),
        ic_best,
    })
}

/// Build the ADF design with `lags` lagged differences.
///
/// Columns: `[1, y_{t-1}, Δy_{t-1}, ..., Δy_{t-lags}]`; target `Δy_t`.
fn adf_design(series: &[f64], diff: &[f64], lags: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut design = Vec::with_capacity(diff.len().saturating_sub(lags));
    let mut y = Vec::with_capacity(diff.len().saturating_sub(lags));

    // diff[t] = series[t + 1] - series[t]
    for t in lags..diff.len() {
        let mut row = Vec::with_capacity(lags + 2);
        row.push(1.0);
        row.push(series[t]);
        row.extend((1..=lags).map(|i| diff[t - i]));
        design.push(row);
        y.push(diff[t]);
    }

    (design, y)
}

/// MacKinnon (1994) approximate p-value for the constant-only case.
fn mackinnon_p_value(stat: f64) -> f64 {
    const TAU_MAX: f64 = 2.74;
    const TAU_MIN: f64 = -18.83;
    const TAU_STAR: f64 = -1.61;
    const SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
    const LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

    if stat.is_nan() {
        return f64::NAN;
    }
    if stat > TAU_MAX {
        return 1.0;
    }
    if stat < TAU_MIN {
        return 0.0;
    }

    let coefs: &[f64] = if stat <= TAU_STAR { &SMALL_P } else { &LARGE_P };
    cdf_normal(polyval(coefs, stat))
}

/// MacKinnon (2010) critical values for the constant-only case.
fn mackinnon_critical_values(n_obs: usize) -> CriticalValues {
    let inv = 1.0 / n_obs as f64;
    CriticalValues {
        cv_1pct: polyval(&[-3.43035, -6.5393, -16.786, -79.433], inv),
        cv_5pct: polyval(&[-2.86154, -2.8903, -4.234, -40.040], inv),
        cv_10pct: polyval(&[-2.56677, -1.5384, -2.809, 0.0], inv),
    }
}

/// `c[0] + c[1]·x + c[2]·x² + ...`
fn polyval(coefs: &[f64], x: f64) -> f64 {
    coefs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// The headline figures of an ADF test as a labeled two-entry series.
#[derive(Debug, Clone, PartialEq)]
pub struct DickeyFullerSummary {
    entries: [(&'static str, f64); 2],
}

impl DickeyFullerSummary {
    pub const TEST_STATISTIC: &'static str = "Test Statistic";
    pub const P_VALUE: &'static str = "p-value";

    pub fn test_statistic(&self) -> f64 {
        self.entries[0].1
    }

    pub fn p_value(&self) -> f64 {
        self.entries[1].1
    }

    /// Look up an entry by label.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| *v)
    }

    /// Iterate over `(label, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries.iter().copied()
    }
}

impl fmt::Display for DickeyFullerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.entries.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        for (i, (label, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{label:<width$} {value:>12.6}")?;
        }
        Ok(())
    }
}

impl From<&AdfResult> for DickeyFullerSummary {
    fn from(result: &AdfResult) -> Self {
        interpret_dftest(result)
    }
}

/// Label the first two figures of an ADF result.
///
/// # Example
/// ```
/// use forecast_kit::validation::{adf_test, interpret_dftest, AdfConfig};
///
/// let mut state: u64 = 1;
/// let series: Vec<f64> = (0..120)
///     .map(|_| {
///         state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
///         (state >> 40) as f64 / (1u64 << 24) as f64
///     })
///     .collect();
/// let result = adf_test(&series, &AdfConfig::default()).unwrap();
/// let summary = interpret_dftest(&result);
///
/// assert_eq!(summary.get("Test Statistic"), Some(result.statistic));
/// assert_eq!(summary.get("p-value"), Some(result.p_value));
/// ```
pub fn interpret_dftest(result: &AdfResult) -> DickeyFullerSummary {
    DickeyFullerSummary {
        entries: [
            (DickeyFullerSummary::TEST_STATISTIC, result.statistic),
            (DickeyFullerSummary::P_VALUE, result.p_value),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn shocks(n: usize, seed: u64) -> Vec<f64> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((state >> 33) as f64 / (1u64 << 31) as f64) - 0.5
            })
            .collect()
    }

    fn white_noise(n: usize) -> Vec<f64> {
        shocks(n, 7)
    }

    // Drifting walk: the level wanders far from any fixed mean.
    fn random_walk(n: usize) -> Vec<f64> {
        shocks(n, 42)
            .iter()
            .scan(0.0, |level, e| {
                *level += 0.1 + e;
                Some(*level)
            })
            .collect()
    }

    #[test]
    fn adf_rejects_unit_root_for_white_noise() {
        let result = adf_test(&white_noise(200), &AdfConfig::default()).unwrap();

        assert!(result.statistic < result.critical_values.cv_1pct);
        assert!(result.p_value < 0.01);
        assert!(result.is_stationary(0.05));
    }

    #[test]
    fn adf_keeps_unit_root_for_random_walk() {
        let result = adf_test(&random_walk(300), &AdfConfig::default()).unwrap();

        assert!(result.p_value > 0.05);
        assert!(!result.is_stationary(0.05));
    }

    #[test]
    fn adf_fixed_lag_is_used_verbatim() {
        let config = AdfConfig::default()
            .with_max_lag(3)
            .with_autolag(AutoLag::Fixed);
        let result = adf_test(&white_noise(100), &config).unwrap();

        assert_eq!(result.used_lag, 3);
        assert_eq!(result.n_obs, 100 - 1 - 3);
        assert!(result.ic_best.is_none());
    }

    #[test]
    fn adf_autolag_stays_within_bounds() {
        let config = AdfConfig::default().with_max_lag(4);
        let result = adf_test(&random_walk(120), &config).unwrap();

        assert!(result.used_lag <= 4);
        assert!(result.ic_best.is_some());
    }

    #[test]
    fn adf_short_series() {
        assert!(matches!(
            adf_test(&[1.0, 2.0, 3.0], &AdfConfig::default()),
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn adf_rejects_missing_values() {
        let mut series = white_noise(50);
        series[10] = f64::NAN;
        assert!(matches!(
            adf_test(&series, &AdfConfig::default()),
            Err(ForecastError::MissingValues)
        ));
    }

    #[test]
    fn adf_constant_series_is_singular() {
        let series = vec![3.0; 50];
        assert!(adf_test(&series, &AdfConfig::default()).is_err());
    }

    #[test]
    fn mackinnon_p_value_matches_reference_points() {
        // Known values from the MacKinnon surface (constant, one variable)
        assert_relative_eq!(mackinnon_p_value(-2.86), 0.0502, epsilon = 1e-3);
        assert_relative_eq!(mackinnon_p_value(-3.43), 0.0100, epsilon = 1e-3);
        assert_eq!(mackinnon_p_value(5.0), 1.0);
        assert_eq!(mackinnon_p_value(-25.0), 0.0);
    }

    #[test]
    fn mackinnon_critical_values_approach_asymptotic() {
        let cv = mackinnon_critical_values(1_000_000);
        assert_relative_eq!(cv.cv_1pct, -3.43035, epsilon = 1e-4);
        assert_relative_eq!(cv.cv_5pct, -2.86154, epsilon = 1e-4);
        assert_relative_eq!(cv.cv_10pct, -2.56677, epsilon = 1e-4);

        let small = mackinnon_critical_values(50);
        assert!(small.cv_1pct < small.cv_5pct && small.cv_5pct < small.cv_10pct);
        assert!(small.cv_5pct < cv.cv_5pct);
    }

    #[test]
    fn summary_holds_exactly_statistic_and_p_value() {
        let result = AdfResult {
            statistic: -3.5,
            p_value: 0.008,
            used_lag: 2,
            n_obs: 97,
            critical_values: CriticalValues::default(),
            ic_best: None,
        };
        let summary = interpret_dftest(&result);

        let labels: Vec<&str> = summary.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Test Statistic", "p-value"]);
        assert_eq!(summary.test_statistic(), -3.5);
        assert_eq!(summary.p_value(), 0.008);
        assert_eq!(summary.get("used lag"), None);
        assert_eq!(DickeyFullerSummary::from(&result), summary);
    }

    #[test]
    fn summary_display_aligns_labels() {
        let result = AdfResult {
            statistic: -1.25,
            p_value: 0.65,
            used_lag: 0,
            n_obs: 10,
            critical_values: CriticalValues::default(),
            ic_best: None,
        };
        let text = interpret_dftest(&result).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Test Statistic    -1.250000");
        assert_eq!(lines[1], "p-value            0.650000");
    }
}
