//! Error Types for Trend Evaluation
//!
//! ## Design Philosophy
//!
//! Nothing in this crate is allowed to take the monitoring host down. Every
//! error below is recovered inside the engine, and the worst visible outcome
//! of a cycle is an aggregate quality of [`Quality::Null`](crate::Quality::Null).
//! The types still exist so that each stage can use `?` and the evaluator
//! can decide in one place how a failure maps to "no verdict".
//!
//! 1. **Small Size**: Variants carry only numbers and `&'static str`, so the
//!    enum stays `Copy` and cheap to return from hot paths.
//!
//! 2. **No Heap Allocation**: The offending configuration text is logged at
//!    the point of failure rather than stored in the error.
//!
//! ## Error Categories
//!
//! ### Configuration
//! - `InvalidThresholds`: a bound is not a number; the bound degrades to `(0,0)`
//! - `InvalidCondition`: a reference condition is not a number; the entry is dropped
//! - `InvalidParameter`: a scalar setting (mode, window) could not be parsed
//!
//! ### Per-cycle exclusions
//! - `MissingThresholds`: no Bad range resolvable for a series this cycle
//! - `InsufficientStatistics`: relative mode active but fewer than 2 baseline points
//! - `EmptySeries`: the plot yielded no usable points
//! - `InvalidValue`: the newest sample is NaN or infinite
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use trendguard_core::TrendError;
//!
//! fn describe(error: TrendError) -> &'static str {
//!     match error {
//!         TrendError::MissingThresholds
//!         | TrendError::InsufficientStatistics { .. } => "excluded this cycle",
//!         TrendError::EmptySeries => "skipped",
//!         _ => "logged and degraded",
//!     }
//! }
//! # assert_eq!(describe(TrendError::EmptySeries), "skipped");
//! ```

use thiserror_no_std::Error;

/// Result type for evaluation stages
pub type TrendResult<T> = Result<T, TrendError>;

/// Evaluation errors - kept small and `Copy`
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum TrendError {
    /// A threshold bound could not be converted to a number
    #[error("Cannot convert {level} thresholds to numbers")]
    InvalidThresholds {
        /// Quality level of the offending range ("Bad" or "Medium")
        level: &'static str,
    },

    /// A reference operating condition could not be converted to a number
    #[error("Cannot convert reference condition to a number")]
    InvalidCondition,

    /// A scalar configuration value could not be interpreted
    #[error("Invalid value for configuration key {key}")]
    InvalidParameter {
        /// Configuration key holding the bad value
        key: &'static str,
    },

    /// No Bad range could be resolved for the series
    #[error("No Bad thresholds available")]
    MissingThresholds,

    /// Relative thresholds need a baseline of at least `required` points
    #[error("Insufficient statistics: need {required}, have {available}")]
    InsufficientStatistics {
        /// Minimum number of baseline samples
        required: usize,
        /// Samples actually available in the averaging window
        available: usize,
    },

    /// Plot yielded no series or a series without points
    #[error("Series is empty")]
    EmptySeries,

    /// Newest sample is not a finite number
    #[error("Invalid value: not a valid number")]
    InvalidValue,
}

#[cfg(feature = "defmt")]
impl defmt::Format for TrendError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidThresholds { level } =>
                defmt::write!(fmt, "Invalid {} thresholds", level),
            Self::InvalidCondition =>
                defmt::write!(fmt, "Invalid reference condition"),
            Self::InvalidParameter { key } =>
                defmt::write!(fmt, "Invalid parameter {}", key),
            Self::MissingThresholds =>
                defmt::write!(fmt, "No Bad thresholds"),
            Self::InsufficientStatistics { required, available } =>
                defmt::write!(fmt, "Need {} points, have {}", required, available),
            Self::EmptySeries =>
                defmt::write!(fmt, "Empty series"),
            Self::InvalidValue =>
                defmt::write!(fmt, "Invalid value"),
        }
    }
}
