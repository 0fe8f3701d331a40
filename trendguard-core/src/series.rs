//! Append-Only Trend Series
//!
//! ## Overview
//!
//! A series is the time-ordered list of samples the upstream trending task
//! produces for one monitored quantity: one point per monitoring cycle, with
//! an optional error bar. The engine only ever reads series; the producer
//! appends.
//!
//! ## Layout
//!
//! ```text
//! index:   0        1        2   ...   n-2        n-1
//!        ┌────────┬────────┬──────────┬──────────┬────────┐
//!        │ (x,y)  │ (x,y)  │   ...    │ (x,y)    │ (x,y,e)│
//!        └────────┴────────┴──────────┴──────────┴────────┘
//!        └──────────── baseline window ─────────┘   └ judged
//! ```
//!
//! The newest point is the one being judged; statistics for relative
//! thresholds are computed over the points before it.
//!
//! ## Usage Example
//!
//! ```rust
//! use trendguard_core::series::{Series, SeriesPoint};
//!
//! let mut trend = Series::new();
//! trend.push(SeriesPoint::new(1_700_000_000.0, 0.93));
//! trend.push(SeriesPoint::with_error(1_700_000_060.0, 0.95, 0.01));
//!
//! assert_eq!(trend.len(), 2);
//! assert_eq!(trend.last().map(|p| p.y), Some(0.95));
//! ```

use alloc::vec::Vec;

/// One sample of a trend
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesPoint {
    /// Time (seconds since epoch) or cycle index
    pub x: f64,
    /// Monitored value
    pub y: f64,
    /// Error bar on the value, when the producer attaches one
    pub y_error: Option<f64>,
}

impl SeriesPoint {
    /// Point without an error bar
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, y_error: None }
    }

    /// Point with an error bar
    pub const fn with_error(x: f64, y: f64, y_error: f64) -> Self {
        Self { x, y, y_error: Some(y_error) }
    }

    /// Error bar clamped to be non-negative, zero when absent
    pub fn error_or_zero(&self) -> f64 {
        match self.y_error {
            Some(e) if e > 0.0 => e,
            _ => 0.0,
        }
    }
}

/// Time-ordered, append-only sequence of samples
///
/// ## Internal Invariants
///
/// - Points are never removed or reordered once pushed
/// - `last()` is the sample judged by the evaluator
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Series {
    points: Vec<SeriesPoint>,
}

impl Series {
    /// Creates a new empty series
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Series of values with x set to the point index
    ///
    /// Convenient for cycle-indexed trends and for tests.
    pub fn from_values(values: &[f64]) -> Self {
        values
            .iter()
            .enumerate()
            .map(|(i, &y)| SeriesPoint::new(i as f64, y))
            .collect()
    }

    /// Appends a sample
    pub fn push(&mut self, point: SeriesPoint) {
        self.points.push(point);
    }

    /// Get number of stored samples
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if series is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get the most recent sample
    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// Gets a sample by index (0 = oldest)
    pub fn get(&self, index: usize) -> Option<&SeriesPoint> {
        self.points.get(index)
    }

    /// All samples, oldest first
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Iterate over samples from oldest to newest
    pub fn iter(&self) -> core::slice::Iter<'_, SeriesPoint> {
        self.points.iter()
    }

    /// Smallest and largest y value, `None` for an empty series
    pub fn y_extent(&self) -> Option<(f64, f64)> {
        let mut iter = self.points.iter().map(|p| p.y);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }
}

impl FromIterator<SeriesPoint> for Series {
    fn from_iter<I: IntoIterator<Item = SeriesPoint>>(iter: I) -> Self {
        Self { points: iter.into_iter().collect() }
    }
}

impl Extend<SeriesPoint> for Series {
    fn extend<I: IntoIterator<Item = SeriesPoint>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a SeriesPoint;
    type IntoIter = core::slice::Iter<'a, SeriesPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
