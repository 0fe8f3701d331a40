//! Threshold-trend recorder
//!
//! Remembers, per series, the ranges that were actually applied at each
//! evaluated sample. Rate-dependent and relative thresholds move from cycle
//! to cycle; the recorded history is what the overlay draws as dashed and
//! dotted lines on top of the value trend.

use alloc::{collections::BTreeMap, string::String, vec::Vec};

use crate::thresholds::{Range, ResolvedThresholds};

/// Range applied at one sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdTrendPoint {
    /// x value of the judged sample
    pub x: f64,
    /// Applied range
    pub range: Range,
}

/// Per-series history of applied Bad and Medium ranges
#[derive(Debug, Clone, Default)]
pub struct ThresholdTrendRecorder {
    bad: BTreeMap<String, Vec<ThresholdTrendPoint>>,
    medium: BTreeMap<String, Vec<ThresholdTrendPoint>>,
}

impl ThresholdTrendRecorder {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append whichever ranges are present in `thresholds`
    pub fn record(&mut self, id: &str, x: f64, thresholds: &ResolvedThresholds) {
        if let Some(range) = thresholds.bad {
            push(&mut self.bad, id, ThresholdTrendPoint { x, range });
        }
        if let Some(range) = thresholds.medium {
            push(&mut self.medium, id, ThresholdTrendPoint { x, range });
        }
    }

    /// Recorded Bad ranges of series `id`, oldest first
    pub fn bad(&self, id: &str) -> &[ThresholdTrendPoint] {
        self.bad.get(id).map_or(&[], Vec::as_slice)
    }

    /// Recorded Medium ranges of series `id`, oldest first
    pub fn medium(&self, id: &str) -> &[ThresholdTrendPoint] {
        self.medium.get(id).map_or(&[], Vec::as_slice)
    }

    /// True if any range was recorded for series `id`
    pub fn has_series(&self, id: &str) -> bool {
        self.bad.contains_key(id) || self.medium.contains_key(id)
    }

    /// True if nothing was recorded at all
    pub fn is_empty(&self) -> bool {
        self.bad.is_empty() && self.medium.is_empty()
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.bad.clear();
        self.medium.clear();
    }
}

fn push(map: &mut BTreeMap<String, Vec<ThresholdTrendPoint>>, id: &str, point: ThresholdTrendPoint) {
    match map.get_mut(id) {
        Some(points) => points.push(point),
        None => {
            map.insert(String::from(id), alloc::vec![point]);
        }
    }
}
