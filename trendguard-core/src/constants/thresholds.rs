//! Threshold Configuration Grammar
//!
//! A threshold configuration value looks like
//! `10:0,5;1,4|20:0,8;2,6` - a list of calibration entries, each with an
//! optional reference condition, a Bad range and an optional Medium range.

// ===== DELIMITERS =====

/// Separates calibration entries.
pub const ENTRY_SEPARATOR: char = '|';

/// Separates the reference condition from the ranges of one entry.
pub const CONDITION_SEPARATOR: char = ':';

/// Separates the Bad range from the Medium range.
///
/// In the legacy per-level keys the same character separates entries.
pub const LEVEL_SEPARATOR: char = ';';

/// Separates the minimum from the maximum of a range.
pub const BOUND_SEPARATOR: char = ',';

// ===== CONDITION SCALING =====

/// Multiplier applied to configured reference conditions.
///
/// Conditions are written in kHz in the configuration and compared against
/// provider values in Hz.
pub const CONDITION_SCALE: f64 = 1000.0;

// ===== SYNTHETIC CONDITION =====

/// Starting value of the synthetic decaying condition (Hz).
///
/// Only used by the explicitly labelled test stand-in provider.
pub const SYNTHETIC_CONDITION_START_HZ: f64 = 1_000_000.0;

/// Per-point decay factor of the synthetic condition.
pub const SYNTHETIC_CONDITION_DECAY: f64 = 0.9;
