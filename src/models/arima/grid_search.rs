//! Exhaustive ARIMA order search ranked by AIC.

use crate::core::{MissingValuePolicy, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::arima::model::{ArimaOrder, ARIMA};
use crate::models::Forecaster;
use std::fmt;
use std::io::Write;

/// Optimizer iteration cap used for every candidate.
pub const GRID_SEARCH_MAX_ITER: usize = 5000;

/// Configuration for [`grid_search`].
#[derive(Debug, Clone)]
pub struct GridSearchConfig {
    /// Differencing order shared by every candidate.
    pub d: usize,
    /// AR orders tried are `0..n_p`.
    pub n_p: usize,
    /// MA orders tried are `0..n_q`.
    pub n_q: usize,
    /// Optimizer iteration cap per candidate.
    pub max_iter: usize,
    /// Treatment of the days that daily regularization leaves empty, and of
    /// any NaN already in the data.
    pub gap_policy: MissingValuePolicy,
}

impl Default for GridSearchConfig {
    fn default() -> Self {
        Self {
            d: 0,
            n_p: 3,
            n_q: 3,
            max_iter: GRID_SEARCH_MAX_ITER,
            gap_policy: MissingValuePolicy::Interpolate,
        }
    }
}

impl GridSearchConfig {
    pub fn new(d: usize, n_p: usize, n_q: usize) -> Self {
        Self {
            d,
            n_p,
            n_q,
            ..Default::default()
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_gap_policy(mut self, policy: MissingValuePolicy) -> Self {
        self.gap_policy = policy;
        self
    }

    /// Candidate orders in sweep order: `p` outer, `q` inner.
    pub fn candidates(&self) -> impl Iterator<Item = ArimaOrder> + '_ {
        (0..self.n_p).flat_map(move |p| (0..self.n_q).map(move |q| ArimaOrder::new(p, self.d, q)))
    }
}

/// One successfully fitted candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSearchRow {
    /// Label such as `ARIMA(1, 0, 2)`.
    pub model: String,
    pub p: usize,
    pub d: usize,
    pub q: usize,
    pub aic: f64,
}

impl GridSearchRow {
    pub fn order(&self) -> ArimaOrder {
        ArimaOrder::new(self.p, self.d, self.q)
    }
}

/// A candidate that could not be fitted.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCandidate {
    pub order: ArimaOrder,
    pub error: ForecastError,
}

/// Outcome of a grid search: fitted rows in sweep order plus skipped candidates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridSearchResults {
    rows: Vec<GridSearchRow>,
    skipped: Vec<SkippedCandidate>,
}

impl GridSearchResults {
    /// Fitted rows in sweep order.
    pub fn rows(&self) -> &[GridSearchRow] {
        &self.rows
    }

    pub fn skipped(&self) -> &[SkippedCandidate] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridSearchRow> {
        self.rows.iter()
    }

    /// Row with the lowest AIC; ties keep the earliest in sweep order.
    pub fn best(&self) -> Option<&GridSearchRow> {
        self.rows.iter().fold(None, |best: Option<&GridSearchRow>, row| match best {
            Some(b) if b.aic <= row.aic => Some(b),
            _ => Some(row),
        })
    }

    /// Rows ordered by ascending AIC.
    pub fn sorted_by_aic(&self) -> Vec<&GridSearchRow> {
        let mut rows: Vec<&GridSearchRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| a.aic.total_cmp(&b.aic));
        rows
    }

    /// Write the rows as CSV with a `model,p,d,q,AIC` header.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "model,p,d,q,AIC")?;
        for row in &self.rows {
            // Labels contain commas
            writeln!(
                writer,
                "\"{}\",{},{},{},{}",
                row.model, row.p, row.d, row.q, row.aic
            )?;
        }
        Ok(())
    }

    fn push_row(&mut self, order: ArimaOrder, aic: f64) {
        self.rows.push(GridSearchRow {
            model: order.to_string(),
            p: order.p,
            d: order.d,
            q: order.q,
            aic,
        });
    }
}

impl<'a> IntoIterator for &'a GridSearchResults {
    type Item = &'a GridSearchRow;
    type IntoIter = std::slice::Iter<'a, GridSearchRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl fmt::Display for GridSearchResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|r| r.model.len())
            .max()
            .unwrap_or(0)
            .max("model".len());

        write!(f, "{:<width$} {:>3} {:>3} {:>3} {:>12}", "model", "p", "d", "q", "AIC")?;
        for row in &self.rows {
            write!(
                f,
                "\n{:<width$} {:>3} {:>3} {:>3} {:>12.4}",
                row.model, row.p, row.d, row.q, row.aic
            )?;
        }
        Ok(())
    }
}

/// Grid-search ARIMA orders with `p in 0..n_p` and `q in 0..n_q`.
///
/// Shorthand for [`grid_search`] with the default iteration cap and gap
/// interpolation.
///
/// # Arguments
/// * `train` - Training series, regularized to daily frequency before fitting
/// * `d` - Differencing order shared by every candidate
/// * `n_p` - Number of AR orders tried (`0..n_p`)
/// * `n_q` - Number of MA orders tried (`0..n_q`)
///
/// # Returns
/// `GridSearchResults` with one row per fitted candidate, in sweep order,
/// and the candidates that failed.
pub fn gs_arima(train: &TimeSeries, d: usize, n_p: usize, n_q: usize) -> GridSearchResults {
    grid_search(train, &GridSearchConfig::new(d, n_p, n_q))
}

/// Fit every candidate order and record its AIC.
///
/// The training series is regularized to daily frequency first and the
/// resulting gaps are handled by `config.gap_policy`. A candidate that fails to fit is logged and recorded in
/// [`GridSearchResults::skipped`]; the sweep always runs to completion.
///
/// # Example
/// ```
/// use forecast_kit::core::TimeSeries;
/// use forecast_kit::models::arima::gs_arima;
/// use chrono::{TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let values: Vec<f64> = (0..80).map(|i| 5.0 + (i as f64 * 0.3).sin()).collect();
/// let train = TimeSeries::daily(start, values).unwrap();
///
/// let results = gs_arima(&train, 0, 2, 2);
/// assert!(results.len() <= 4);
/// if let Some(best) = results.best() {
///     println!("best: {} (AIC {:.2})", best.model, best.aic);
/// }
/// ```
pub fn grid_search(train: &TimeSeries, config: &GridSearchConfig) -> GridSearchResults {
    let mut results = GridSearchResults::default();

    let prepared = regularize(train, config.gap_policy);

    for order in config.candidates() {
        tracing::info!("Fitting model: {order}...");

        let outcome = prepared
            .as_ref()
            .map_err(Clone::clone)
            .and_then(|series| fit_candidate(series, order, config.max_iter));

        match outcome {
            Ok(aic) => {
                results.push_row(order, aic);
                tracing::info!("... done");
            }
            Err(error) => {
                tracing::warn!(%order, %error, "skipping candidate");
                results.skipped.push(SkippedCandidate { order, error });
            }
        }
    }

    results
}

fn regularize(train: &TimeSeries, policy: MissingValuePolicy) -> Result<TimeSeries> {
    train.as_daily()?.sanitized(policy)
}

fn fit_candidate(series: &TimeSeries, order: ArimaOrder, max_iter: usize) -> Result<f64> {
    let mut model = ARIMA::with_order(order).with_max_iter(max_iter);
    model.fit(series)?;
    model
        .aic()
        .filter(|aic| aic.is_finite())
        .ok_or_else(|| ForecastError::ComputationError(format!("{order} has no finite AIC")))
}
