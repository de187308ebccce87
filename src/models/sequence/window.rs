//! Fixed-size input window for one-step sequence models.

use crate::error::{ForecastError, Result};
use std::collections::VecDeque;

/// An `n_input x n_features` sliding buffer of rows, oldest first.
///
/// Pushing a row drops the oldest one, so the window always holds exactly
/// `n_input` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceWindow {
    rows: VecDeque<Vec<f64>>,
    n_features: usize,
}

impl SequenceWindow {
    /// Build a window from `rows`, validating every row's width.
    pub fn from_rows(rows: &[Vec<f64>], n_features: usize) -> Result<Self> {
        if rows.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if n_features == 0 {
            return Err(ForecastError::InvalidParameter(
                "n_features must be positive".to_string(),
            ));
        }
        for row in rows {
            check_width(row, n_features)?;
        }

        Ok(Self {
            rows: rows.iter().cloned().collect(),
            n_features,
        })
    }

    /// Number of rows (time steps) in the window.
    pub fn n_input(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Rows from oldest to newest.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Most recent row.
    pub fn latest(&self) -> Option<&[f64]> {
        self.rows.back().map(Vec::as_slice)
    }

    /// Append `row` and drop the oldest row, which is returned.
    pub fn push(&mut self, row: Vec<f64>) -> Result<Vec<f64>> {
        check_width(&row, self.n_features)?;
        self.rows.push_back(row);
        self.rows
            .pop_front()
            .ok_or_else(|| ForecastError::ComputationError("window lost its rows".to_string()))
    }

    /// Row-major flattening, i.e. the `1 x n_input x n_features` batch.
    pub fn flatten(&self) -> Vec<f64> {
        self.rows.iter().flatten().copied().collect()
    }

    /// Values of one feature across the window, oldest first.
    pub fn feature(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.n_features {
            return None;
        }
        Some(self.rows.iter().map(|row| row[index]).collect())
    }
}

pub(crate) fn check_width(row: &[f64], n_features: usize) -> Result<()> {
    if row.len() != n_features {
        return Err(ForecastError::DimensionMismatch {
            expected: n_features,
            got: row.len(),
        });
    }
    Ok(())
}
