//! Baseline statistics for relative thresholds
//!
//! The newest point of a trend is the one under judgement, so the baseline
//! is taken from the points before it:
//!
//! ```text
//! index:   0   1   2   3   4   5
//! y:       1   2   3   4   5   6
//!                  └─────────┘ └ judged
//!                  window (w = 3)
//! ```
//!
//! With `w` points requested and `n` points in the series the window covers
//! indices `n-1-w ..= n-2`, or every point but the last when `w` is `All` or
//! exceeds what is available.
//!
//! The spread reported is the standard error of the mean:
//!
//! ```text
//! se = sqrt( Σ (y - mean)² / (N · (N - 1)) )
//! ```

use crate::{
    config::AveragingWindow,
    constants::MIN_BASELINE_POINTS,
    errors::{TrendError, TrendResult},
    series::Series,
};

/// Mean and standard error of the mean over a baseline window
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrendStatistics {
    /// Arithmetic mean of the window
    pub mean: f64,
    /// Standard error of the mean
    pub std_error_of_mean: f64,
    /// Number of points in the window
    pub samples: usize,
}

impl TrendStatistics {
    /// Statistics over the baseline window, `None` with fewer than two points
    pub fn compute(series: &Series, window: AveragingWindow) -> Option<Self> {
        Self::try_compute(series, window).ok()
    }

    /// Same as [`compute`](Self::compute), reporting how many points were available
    pub fn try_compute(series: &Series, window: AveragingWindow) -> TrendResult<Self> {
        let end = series.len().saturating_sub(1);
        let start = match window {
            AveragingWindow::Last(w) if w > 0 => end.saturating_sub(w),
            _ => 0,
        };

        let values = &series.points()[start..end];
        let samples = values.len();
        if samples < MIN_BASELINE_POINTS {
            return Err(TrendError::InsufficientStatistics {
                required: MIN_BASELINE_POINTS,
                available: samples,
            });
        }

        let n = samples as f64;
        let mean = values.iter().map(|p| p.y).sum::<f64>() / n;
        let sum_sq = values
            .iter()
            .map(|p| {
                let d = p.y - mean;
                d * d
            })
            .sum::<f64>();

        Ok(Self {
            mean,
            std_error_of_mean: libm::sqrt(sum_sq / ((n - 1.0) * n)),
            samples,
        })
    }

    /// `mean + bound·|mean|`
    pub fn relative_to_mean(&self, bound: f64) -> f64 {
        self.mean + bound * libm::fabs(self.mean)
    }

    /// `mean + bound·sqrt(se² + last_error²)`
    ///
    /// `last_error` is the error bar of the judged point; negative values
    /// count as zero.
    pub fn relative_to_spread(&self, bound: f64, last_error: f64) -> f64 {
        let last_error = last_error.max(0.0);
        let sigma = libm::sqrt(
            self.std_error_of_mean * self.std_error_of_mean + last_error * last_error,
        );
        self.mean + bound * sigma
    }
}
