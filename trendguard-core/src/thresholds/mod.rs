//! Acceptance Thresholds with Operating-Condition Dependence
//!
//! ## Overview
//!
//! Each monitored plot has a [`ThresholdSpec`]: an ordered list of
//! [`CalibrationPoint`]s. A point pairs a reference operating condition
//! (typically the interaction rate in Hz) with a Bad range and an optional
//! Medium range:
//!
//! ```text
//!  value
//!    ▲          Bad range at 10 kHz       Bad range at 20 kHz
//!    │    8 ┤                              ┌──┐
//!    │    5 ┤       ┌──┐                   │  │
//!    │      │       │  │  Medium (1,4)     │  │  Medium (2,6)
//!    │    0 ┤───────┴──┴───────────────────┴──┴────────▶ rate
//!    │             10k                    20k
//! ```
//!
//! Between two anchors the ranges are interpolated linearly; outside the
//! outermost anchors the nearest anchor's ranges are used unchanged.
//!
//! ## Fixed Thresholds
//!
//! A spec written without any condition (`"0,5;1,4"`) is a single
//! unconditional point and applies at every operating condition.
//!
//! ## Relative Thresholds
//!
//! The same numbers can also mean offsets from the trend's own recent
//! mean; see [`ThresholdsMode`](crate::config::ThresholdsMode). The spec
//! itself is agnostic: it only stores and interpolates numbers.

mod interpolate;
mod parse;

use alloc::vec::Vec;

/// Closed interval `[min, max]` of acceptable values
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl Range {
    /// Create a range from its bounds
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range used when a configured bound cannot be parsed
    pub const fn zero() -> Self {
        Self { min: 0.0, max: 0.0 }
    }

    /// True if `value` lies inside the range, bounds included
    pub fn contains(&self, value: f64) -> bool {
        !(value < self.min || value > self.max)
    }

    /// Apply `f` to both bounds
    pub fn map<F: Fn(f64) -> f64>(self, f: F) -> Self {
        Self { min: f(self.min), max: f(self.max) }
    }

    /// Blend two ranges bound by bound: `self*(1-fraction) + other*fraction`
    pub fn lerp(&self, other: &Range, fraction: f64) -> Self {
        Self {
            min: self.min * (1.0 - fraction) + other.min * fraction,
            max: self.max * (1.0 - fraction) + other.max * fraction,
        }
    }
}

impl From<(f64, f64)> for Range {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

/// One configured operating point
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationPoint {
    /// Operating condition (Hz) the ranges were tuned for; `None` for fixed thresholds
    pub reference_condition: Option<f64>,
    /// Outside this range the verdict is Bad
    pub bad: Range,
    /// Outside this range (but inside `bad`) the verdict is Medium
    pub medium: Option<Range>,
}

impl CalibrationPoint {
    /// Point valid at every operating condition
    pub fn unconditional(bad: Range, medium: Option<Range>) -> Self {
        Self { reference_condition: None, bad, medium }
    }

    /// Point anchored at `condition` (already in Hz)
    pub fn at(condition: f64, bad: Range, medium: Option<Range>) -> Self {
        Self { reference_condition: Some(condition), bad, medium }
    }
}

/// Ranges resolved for one operating condition
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolvedThresholds {
    /// Bad range; without it no verdict is possible
    pub bad: Option<Range>,
    /// Medium range, evaluated only when the value passes the Bad check
    pub medium: Option<Range>,
}

impl ResolvedThresholds {
    /// Thresholds that allow no verdict
    pub const fn none() -> Self {
        Self { bad: None, medium: None }
    }

    /// Apply `f` to every bound of every present range
    pub fn map<F: Fn(f64) -> f64>(self, f: F) -> Self {
        Self {
            bad: self.bad.map(|r| r.map(&f)),
            medium: self.medium.map(|r| r.map(&f)),
        }
    }
}

/// Calibration points for one plot
///
/// ## Invariants
///
/// - If any point has no reference condition it is the only point
/// - Points keep configuration order; resolution does not depend on it
///   except for the first-wins tie-break between equal conditions
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdSpec {
    points: Vec<CalibrationPoint>,
}

impl ThresholdSpec {
    /// Spec with no points; resolves to no thresholds at all
    pub const fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Build a spec from points, enforcing the unconditional-point invariant
    ///
    /// Unconditional points mixed with conditional ones are dropped (they
    /// could never be selected); among several unconditional points the
    /// first is kept.
    pub fn from_points(points: Vec<CalibrationPoint>) -> Self {
        let has_conditional = points.iter().any(|p| p.reference_condition.is_some());
        if has_conditional {
            let before = points.len();
            let points: Vec<_> = points
                .into_iter()
                .filter(|p| p.reference_condition.is_some())
                .collect();
            if points.len() != before {
                log_warn!(
                    "Ignoring {} threshold entries without reference condition",
                    before - points.len()
                );
            }
            Self { points }
        } else {
            Self { points: points.into_iter().take(1).collect() }
        }
    }

    /// Fixed thresholds valid at every operating condition
    pub fn fixed(bad: Range, medium: Option<Range>) -> Self {
        Self { points: alloc::vec![CalibrationPoint::unconditional(bad, medium)] }
    }

    /// Configured points, in configuration order
    pub fn points(&self) -> &[CalibrationPoint] {
        &self.points
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if nothing was configured
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True if the ranges depend on the operating condition
    pub fn is_condition_dependent(&self) -> bool {
        self.points.iter().any(|p| p.reference_condition.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn range_bounds_are_inclusive() {
        let range = Range::new(10.0, 20.0);
        assert!(range.contains(10.0));
        assert!(range.contains(20.0));
        assert!(!range.contains(9.999));
        assert!(!range.contains(20.001));
    }

    #[test]
    fn range_lerp_blends_each_bound() {
        let low = Range::new(0.0, 1.0);
        let high = Range::new(2.0, 3.0);
        assert_eq!(low.lerp(&high, 0.5), Range::new(1.0, 2.0));
        assert_eq!(low.lerp(&high, 0.0), low);
        assert_eq!(low.lerp(&high, 1.0), high);
    }

    #[test]
    fn mixed_points_keep_conditional_only() {
        let spec = ThresholdSpec::from_points(vec![
            CalibrationPoint::unconditional(Range::new(0.0, 1.0), None),
            CalibrationPoint::at(10_000.0, Range::new(0.0, 2.0), None),
        ]);
        assert_eq!(spec.len(), 1);
        assert_eq!(spec.points()[0].reference_condition, Some(10_000.0));
    }

    #[test]
    fn several_unconditional_points_keep_first() {
        let spec = ThresholdSpec::from_points(vec![
            CalibrationPoint::unconditional(Range::new(0.0, 1.0), None),
            CalibrationPoint::unconditional(Range::new(0.0, 2.0), None),
        ]);
        assert_eq!(spec.len(), 1);
        assert_eq!(spec.points()[0].bad, Range::new(0.0, 1.0));
        assert!(!spec.is_condition_dependent());
    }
}
