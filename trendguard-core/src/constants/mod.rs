//! Constants for TrendGuard Core
//!
//! Centralized constants used throughout the engine. Numeric values that
//! change behavior (scaling factors, margins, minimum sample counts) live
//! here with a note on where they come from.
//!
//! ## Organization
//!
//! - **Thresholds**: configuration grammar and condition scaling
//! - **Statistics**: baseline window requirements
//! - **Time**: conversions and provider refresh intervals
//! - **Overlay**: rendering data for threshold lines
//! - **Keys**: configuration key names

/// Threshold configuration grammar and operating-condition scaling.
pub mod thresholds;

/// Baseline statistics requirements.
pub mod statistics;

/// Time-related constants for conversions and refresh intervals.
pub mod time;

/// Threshold overlay geometry.
pub mod overlay;

/// Configuration key names.
pub mod keys;

// Re-export commonly used constants for convenience
pub use thresholds::{CONDITION_SCALE, ENTRY_SEPARATOR, LEVEL_SEPARATOR, BOUND_SEPARATOR, CONDITION_SEPARATOR};
pub use statistics::MIN_BASELINE_POINTS;
pub use time::{MS_PER_SECOND, DEFAULT_CONDITION_REFRESH_MS};
pub use overlay::OVERLAY_RANGE_MARGIN;
