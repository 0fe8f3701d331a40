//! Time-Related Constants

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Trend x values are seconds since epoch; condition lookups use milliseconds.
pub const X_UNITS_TO_MS: f64 = 1000.0;

// ===== CONDITION PROVIDER REFRESH =====

/// Default minimum interval between two refreshes of a condition source (milliseconds).
///
/// Rate calibration objects change slowly compared to the monitoring cycle;
/// fetching them at most once a minute keeps the remote store unloaded.
pub const DEFAULT_CONDITION_REFRESH_MS: u64 = 60 * MS_PER_SECOND;
