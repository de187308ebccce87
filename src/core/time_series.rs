//! TimeSeries data structure for representing temporal data.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, DurationRound, Utc};
use std::collections::HashMap;

/// Policy for handling missing values (NaN/Inf).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MissingValuePolicy {
    /// Drop observations with missing values.
    Drop,
    /// Fill with a specific value.
    Fill(f64),
    /// Forward fill (use previous valid value).
    ForwardFill,
    /// Linear interpolation between valid neighbours, edges filled.
    Interpolate,
    /// Return error if missing values found.
    Error,
}

/// A univariate time series with strictly increasing UTC timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    name: Option<String>,
    frequency: Option<Duration>,
}

impl TimeSeries {
    /// Create a univariate time series.
    ///
    /// Timestamps must be strictly increasing and match the value count.
    pub fn univariate(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(ForecastError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }

        if values.len() != timestamps.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }

        Ok(Self {
            timestamps,
            values,
            name: None,
            frequency: None,
        })
    }

    /// Create a daily series starting at `start`.
    pub fn daily(start: DateTime<Utc>, values: Vec<f64>) -> Result<Self> {
        let timestamps = (0..values.len())
            .map(|i| start + Duration::days(i as i64))
            .collect();
        let mut series = Self::univariate(timestamps, values)?;
        series.frequency = Some(Duration::days(1));
        Ok(series)
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Get the display name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Get timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Get values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// First timestamp, if any.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.timestamps.first().copied()
    }

    /// Last timestamp, if any.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Get frequency, when known.
    pub fn frequency(&self) -> Option<Duration> {
        self.frequency
    }

    /// Iterate over `(timestamp, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Extract a slice of the time series.
    pub fn slice(&self, start: usize, end: usize) -> Result<TimeSeries> {
        if start > end {
            return Err(ForecastError::InvalidParameter(
                "start must be <= end".to_string(),
            ));
        }
        if end > self.len() {
            return Err(ForecastError::IndexOutOfBounds {
                index: end,
                size: self.len(),
            });
        }

        Ok(TimeSeries {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
            name: self.name.clone(),
            frequency: self.frequency,
        })
    }

    /// Split into a training part of `train_len` observations and the remainder.
    pub fn split_at(&self, train_len: usize) -> Result<(TimeSeries, TimeSeries)> {
        Ok((self.slice(0, train_len)?, self.slice(train_len, self.len())?))
    }

    /// Check if series has missing values (NaN or Inf).
    pub fn has_missing_values(&self) -> bool {
        self.values.iter().any(|v| !v.is_finite())
    }

    /// Return a sanitized copy with missing values handled.
    pub fn sanitized(&self, policy: MissingValuePolicy) -> Result<TimeSeries> {
        match policy {
            MissingValuePolicy::Error => {
                if self.has_missing_values() {
                    return Err(ForecastError::MissingValues);
                }
                Ok(self.clone())
            }
            MissingValuePolicy::Drop => {
                let (timestamps, values) = self.iter().filter(|(_, v)| v.is_finite()).unzip();
                Ok(TimeSeries {
                    timestamps,
                    values,
                    name: self.name.clone(),
                    frequency: self.frequency,
                })
            }
            MissingValuePolicy::Fill(fill_value) => Ok(self.with_values(
                self.values
                    .iter()
                    .map(|&v| if v.is_finite() { v } else { fill_value })
                    .collect(),
            )),
            MissingValuePolicy::ForwardFill => {
                let mut result = Vec::with_capacity(self.len());
                let mut last_valid = None;
                for &v in &self.values {
                    if v.is_finite() {
                        last_valid = Some(v);
                        result.push(v);
                    } else {
                        result.push(last_valid.unwrap_or(v));
                    }
                }
                Ok(self.with_values(result))
            }
            MissingValuePolicy::Interpolate => Ok(self.interpolated(true)),
        }
    }

    /// Return a copy with linear interpolation for NaN values.
    pub fn interpolated(&self, fill_edges: bool) -> TimeSeries {
        self.with_values(interpolate_series(&self.values, fill_edges))
    }

    /// Reindex onto a regular daily grid.
    ///
    /// Timestamps are floored to midnight UTC. Days absent from the input are
    /// inserted as NaN; several observations on the same day keep the last.
    pub fn as_daily(&self) -> Result<TimeSeries> {
        if self.is_empty() {
            return Ok(TimeSeries {
                timestamps: vec![],
                values: vec![],
                name: self.name.clone(),
                frequency: Some(Duration::days(1)),
            });
        }

        let day = Duration::days(1);
        let floor = |t: &DateTime<Utc>| {
            t.duration_trunc(day)
                .map_err(|e| ForecastError::TimestampError(e.to_string()))
        };

        let mut by_day: HashMap<DateTime<Utc>, f64> = HashMap::with_capacity(self.len());
        for (t, v) in self.iter() {
            by_day.insert(floor(&t)?, v);
        }

        let first = floor(&self.timestamps[0])?;
        let last = floor(&self.timestamps[self.len() - 1])?;
        let n_days = (last - first).num_days() as usize + 1;

        let mut timestamps = Vec::with_capacity(n_days);
        let mut values = Vec::with_capacity(n_days);
        for i in 0..n_days {
            let t = first + Duration::days(i as i64);
            timestamps.push(t);
            values.push(by_day.get(&t).copied().unwrap_or(f64::NAN));
        }

        Ok(TimeSeries {
            timestamps,
            values,
            name: self.name.clone(),
            frequency: Some(day),
        })
    }

    fn with_values(&self, values: Vec<f64>) -> TimeSeries {
        TimeSeries {
            timestamps: self.timestamps.clone(),
            values,
            name: self.name.clone(),
            frequency: self.frequency,
        }
    }
}

/// Linear interpolation for a series with NaN values.
fn interpolate_series(values: &[f64], fill_edges: bool) -> Vec<f64> {
    let mut result = values.to_vec();
    let n = result.len();

    let mut i = 0;
    while i < n {
        if !result[i].is_finite() {
            let start = i;
            while i < n && !result[i].is_finite() {
                i += 1;
            }
            let end = i;

            let left = if start > 0 { Some(result[start - 1]) } else { None };
            let right = if end < n { Some(result[end]) } else { None };

            match (left, right) {
                (Some(l), Some(r)) => {
                    let segments = (end - start + 1) as f64;
                    for (j, idx) in (start..end).enumerate() {
                        let t = (j + 1) as f64 / segments;
                        result[idx] = l + t * (r - l);
                    }
                }
                (Some(l), None) if fill_edges => result[start..end].fill(l),
                (None, Some(r)) if fill_edges => result[start..end].fill(r),
                _ => {}
            }
        } else {
            i += 1;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn univariate_rejects_unsorted_timestamps() {
        let result = TimeSeries::univariate(vec![day(2), day(1)], vec![1.0, 2.0]);
        assert!(matches!(result, Err(ForecastError::TimestampError(_))));
    }

    #[test]
    fn univariate_rejects_length_mismatch() {
        let result = TimeSeries::univariate(vec![day(1), day(2)], vec![1.0]);
        assert!(matches!(
            result,
            Err(ForecastError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn daily_constructor_sets_frequency() {
        let ts = TimeSeries::daily(day(1), vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(ts.len(), 3);
        assert_eq!(ts.timestamps()[2], day(3));
        assert_eq!(ts.frequency(), Some(Duration::days(1)));
    }

    #[test]
    fn as_daily_inserts_gaps_as_nan() {
        let ts = TimeSeries::univariate(vec![day(1), day(2), day(5)], vec![1.0, 2.0, 5.0]).unwrap();
        let daily = ts.as_daily().unwrap();

        assert_eq!(daily.len(), 5);
        assert_eq!(daily.values()[0], 1.0);
        assert!(daily.values()[2].is_nan());
        assert!(daily.values()[3].is_nan());
        assert_eq!(daily.values()[4], 5.0);
    }

    #[test]
    fn as_daily_floors_intraday_timestamps() {
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 1, 16, 0, 0).unwrap();
        let t3 = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
        let ts = TimeSeries::univariate(vec![t1, t2, t3], vec![1.0, 1.5, 2.0]).unwrap();

        let daily = ts.as_daily().unwrap();
        assert_eq!(daily.timestamps(), &[day(1), day(2)]);
        assert_eq!(daily.values(), &[1.5, 2.0]);
    }

    #[test]
    fn interpolation_fills_interior_gap() {
        let ts = TimeSeries::univariate(
            vec![day(1), day(2), day(3), day(4)],
            vec![1.0, f64::NAN, f64::NAN, 4.0],
        )
        .unwrap();
        let filled = ts.interpolated(false);
        assert_relative_eq!(filled.values()[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(filled.values()[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn sanitize_policies() {
        let ts = TimeSeries::univariate(
            vec![day(1), day(2), day(3)],
            vec![f64::NAN, 2.0, f64::NAN],
        )
        .unwrap();

        assert!(matches!(
            ts.sanitized(MissingValuePolicy::Error),
            Err(ForecastError::MissingValues)
        ));
        assert_eq!(ts.sanitized(MissingValuePolicy::Drop).unwrap().len(), 1);
        assert_eq!(
            ts.sanitized(MissingValuePolicy::Fill(0.0)).unwrap().values(),
            &[0.0, 2.0, 0.0]
        );
        let ff = ts.sanitized(MissingValuePolicy::ForwardFill).unwrap();
        assert!(ff.values()[0].is_nan());
        assert_eq!(ff.values()[2], 2.0);
        assert_eq!(
            ts.sanitized(MissingValuePolicy::Interpolate).unwrap().values(),
            &[2.0, 2.0, 2.0]
        );
    }

    #[test]
    fn split_at_partitions_series() {
        let ts = TimeSeries::daily(day(1), (0..10).map(|i| i as f64).collect()).unwrap();
        let (train, test) = ts.split_at(7).unwrap();
        assert_eq!(train.len(), 7);
        assert_eq!(test.len(), 3);
        assert_eq!(test.start(), Some(day(8)));
        assert!(ts.split_at(11).is_err());
    }
}
