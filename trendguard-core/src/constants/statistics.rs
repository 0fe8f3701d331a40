//! Baseline Statistics Requirements

/// Minimum number of baseline points for a mean and its standard error.
///
/// The sample standard deviation divides by `N - 1`, so fewer than two
/// points leave it undefined.
pub const MIN_BASELINE_POINTS: usize = 2;

/// Minimum number of points a series needs before it can be judged.
pub const MIN_SERIES_POINTS: usize = 1;
