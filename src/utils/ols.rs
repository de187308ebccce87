//! Ordinary Least Squares (OLS) regression.
//!
//! Solves the normal equations with a Cholesky factorization. Used by the
//! ADF regression and by the window regressor of the sequence models.

use crate::error::{ForecastError, Result};

/// Fitted OLS regression.
#[derive(Debug, Clone)]
pub struct OLSResult {
    /// Coefficients, one per design column (intercept column included if supplied).
    pub coefficients: Vec<f64>,
    /// Standard errors of the coefficients.
    pub std_errors: Vec<f64>,
    /// Residuals `y - X @ beta`.
    pub residuals: Vec<f64>,
    /// Residual sum of squares.
    pub rss: f64,
    /// Number of observations.
    pub n_obs: usize,
}

impl OLSResult {
    /// Predict for a single design row.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(self.coefficients.iter())
            .map(|(x, b)| x * b)
            .sum())
    }

    /// Number of regressors.
    pub fn num_params(&self) -> usize {
        self.coefficients.len()
    }

    /// t-statistic of coefficient `index`.
    pub fn t_stat(&self, index: usize) -> Option<f64> {
        let beta = self.coefficients.get(index)?;
        let se = self.std_errors.get(index)?;
        if *se > 0.0 && se.is_finite() {
            Some(beta / se)
        } else {
            None
        }
    }

    /// Gaussian log-likelihood evaluated at the ML variance `rss / n`.
    pub fn log_likelihood(&self) -> f64 {
        let n = self.n_obs as f64;
        -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + (self.rss / n).ln() + 1.0)
    }

    /// Akaike information criterion.
    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.num_params() as f64
    }

    /// Bayesian information criterion.
    pub fn bic(&self) -> f64 {
        -2.0 * self.log_likelihood() + (self.n_obs as f64).ln() * self.num_params() as f64
    }
}

/// Fit `y = X @ beta` by least squares.
///
/// # Arguments
/// * `design` - Design matrix in row-major form; every row has the same width
/// * `y` - Target values (one per design row)
pub fn ols_fit(design: &[Vec<f64>], y: &[f64]) -> Result<OLSResult> {
    let n = y.len();
    if design.len() != n {
        return Err(ForecastError::DimensionMismatch {
            expected: n,
            got: design.len(),
        });
    }

    let k = design.first().map(|r| r.len()).unwrap_or(0);
    if k == 0 {
        return Err(ForecastError::InvalidParameter(
            "design matrix has no columns".into(),
        ));
    }
    if n <= k {
        return Err(ForecastError::InsufficientData {
            needed: k + 1,
            got: n,
        });
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];

    for (row, &y_obs) in design.iter().zip(y.iter()) {
        if row.len() != k {
            return Err(ForecastError::DimensionMismatch {
                expected: k,
                got: row.len(),
            });
        }
        for i in 0..k {
            xty[i] += row[i] * y_obs;
            for j in 0..=i {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..k {
        for j in (i + 1)..k {
            xtx[i][j] = xtx[j][i];
        }
    }

    let l = cholesky(&xtx).ok_or_else(|| {
        ForecastError::ComputationError(
            "OLS regression failed: matrix not positive definite".into(),
        )
    })?;

    let coefficients = cholesky_solve(&l, &xty);

    let residuals: Vec<f64> = design
        .iter()
        .zip(y.iter())
        .map(|(row, &y_obs)| {
            y_obs
                - row
                    .iter()
                    .zip(coefficients.iter())
                    .map(|(x, b)| x * b)
                    .sum::<f64>()
        })
        .collect();
    let rss: f64 = residuals.iter().map(|r| r * r).sum();
    let sigma_sq = rss / (n - k) as f64;

    // diag((X'X)^-1) via one solve per unit vector
    let std_errors = (0..k)
        .map(|i| {
            let mut e = vec![0.0; k];
            e[i] = 1.0;
            let col = cholesky_solve(&l, &e);
            (sigma_sq * col[i]).max(0.0).sqrt()
        })
        .collect();

    Ok(OLSResult {
        coefficients,
        std_errors,
        residuals,
        rss,
        n_obs: n,
    })
}

/// Cholesky decomposition `A = L @ L'` of a symmetric positive definite matrix.
fn cholesky(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 1e-12 * a[i][i].abs().max(1.0) {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    Some(l)
}

/// Solve `L @ L' @ x = b` given the Cholesky factor.
fn cholesky_solve(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();

    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    x
}
