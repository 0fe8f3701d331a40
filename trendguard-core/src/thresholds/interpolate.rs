//! Threshold interpolation between calibration points
//!
//! ## Algorithm
//!
//! For an operating condition `c`:
//!
//! 1. `low`  = the point with the greatest reference condition `<= c`
//! 2. `high` = the point with the smallest reference condition `>= c`
//! 3. Both found and distinct: blend bound by bound with
//!    `fraction = (c - low) / (high - low)`
//! 4. Otherwise use `low`, else `high`, else the first point
//!
//! Step 4 means no extrapolation: outside the configured span the nearest
//! anchor applies unchanged, like a lookup table clamped at its edges.
//!
//! ## Tie-Break
//!
//! The scan uses strict comparisons, so among points sharing a reference
//! condition the first one in configuration order wins.
//!
//! ## Medium Range
//!
//! Medium is blended only when both anchors define one. Between an anchor
//! with a Medium range and one without, there is no Medium range.

use super::{CalibrationPoint, ResolvedThresholds, ThresholdSpec};

impl ThresholdSpec {
    /// Resolve the Bad and Medium ranges for `condition` (Hz)
    ///
    /// An empty spec resolves to [`ResolvedThresholds::none`]. A spec with a
    /// single unconditional point resolves to that point whatever the
    /// condition.
    pub fn resolve(&self, condition: f64) -> ResolvedThresholds {
        let Some(first) = self.points().first() else {
            return ResolvedThresholds::none();
        };

        let (low, high) = self.bracket(condition);

        let point = match (low, high) {
            (Some((low_c, low)), Some((high_c, high))) if high_c != low_c => {
                return blend(low, high, (condition - low_c) / (high_c - low_c));
            }
            (Some((_, low)), _) => low,
            (None, Some((_, high))) => high,
            (None, None) => first,
        };

        ResolvedThresholds { bad: Some(point.bad), medium: point.medium }
    }

    /// Nearest anchors at or below and at or above `condition`
    fn bracket(&self, condition: f64) -> (Option<(f64, &CalibrationPoint)>, Option<(f64, &CalibrationPoint)>) {
        let mut low: Option<(f64, &CalibrationPoint)> = None;
        let mut high: Option<(f64, &CalibrationPoint)> = None;

        for point in self.points() {
            let Some(reference) = point.reference_condition else {
                continue;
            };

            if reference <= condition && low.map_or(true, |(best, _)| reference > best) {
                low = Some((reference, point));
            }
            if reference >= condition && high.map_or(true, |(best, _)| reference < best) {
                high = Some((reference, point));
            }
        }

        (low, high)
    }
}

fn blend(low: &CalibrationPoint, high: &CalibrationPoint, fraction: f64) -> ResolvedThresholds {
    let medium = match (low.medium, high.medium) {
        (Some(lo), Some(hi)) => Some(lo.lerp(&hi, fraction)),
        _ => None,
    };

    ResolvedThresholds {
        bad: Some(low.bad.lerp(&high.bad, fraction)),
        medium,
    }
}
