//! A timestamp-indexed table of named numeric columns.

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// Column holding observed values.
pub const VALUE_COLUMN: &str = "value";
/// Column holding model predictions.
pub const PREDICTIONS_COLUMN: &str = "predictions";

/// Timestamp index plus named columns, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastFrame {
    index: Vec<DateTime<Utc>>,
    columns: Vec<(String, Vec<f64>)>,
}

impl ForecastFrame {
    /// Create a frame with the given index and no columns.
    pub fn new(index: Vec<DateTime<Utc>>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Build the usual evaluation frame: observed test values plus predictions.
    pub fn from_predictions(test: &TimeSeries, predictions: &[f64]) -> Result<Self> {
        Self::new(test.timestamps().to_vec())
            .with_column(VALUE_COLUMN, test.values().to_vec())?
            .with_column(PREDICTIONS_COLUMN, predictions.to_vec())
    }

    /// Add (or replace) a column. Its length must match the index.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        self.insert(name, values)?;
        Ok(self)
    }

    /// Add (or replace) a column in place.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        if values.len() != self.index.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.index.len(),
                got: values.len(),
            });
        }

        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name, values)),
        }
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Like [`column`](Self::column), but a missing column is an error.
    pub fn require_column(&self, name: &str) -> Result<&[f64]> {
        self.column(name)
            .ok_or_else(|| ForecastError::MissingColumn(name.to_string()))
    }
}
