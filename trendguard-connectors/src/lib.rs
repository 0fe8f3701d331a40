//! Operating-Condition Sources for TrendGuard
//!
//! ## Overview
//!
//! Rate-dependent thresholds need the interaction rate at the time of each
//! judged sample. The rate is not part of the monitored trend; it lives in
//! an external store that publishes a calibration per channel (a list of
//! `(timestamp, rate)` samples covering the current fill).
//!
//! This crate provides the adapters that fetch such calibrations and plug
//! into [`trendguard_core::CachedConditionProvider`] through the
//! [`ConditionSource`](trendguard_core::ConditionSource) trait. The provider
//! owns caching and refresh policy; a source only knows how to fetch.
//!
//! ### HTTP
//!
//! **When to use:**
//! - The calibration store exposes a REST endpoint
//! - Firewall-friendly environments
//!
//! **Characteristics:**
//! - One blocking `GET` per refresh, bounded by a request timeout
//! - Bounded retries with exponential backoff on transport errors, 5xx and 429
//! - Client errors (4xx) are not retried
//!
//! ## Failure Semantics
//!
//! Every failure is reported to the provider as a
//! [`ConditionError`](trendguard_core::ConditionError). The provider keeps the
//! previous calibration, and the evaluator falls back to the last condition
//! seen in the activity. A dead endpoint therefore degrades threshold
//! accuracy but never blocks evaluation.
//!
//! ## Example Usage
//!
//! ```no_run
//! use trendguard_connectors::http::{HttpConditionSource, HttpConfig};
//! use trendguard_core::{time::SystemTime, CachedConditionProvider};
//!
//! let config = HttpConfig::new("https://calib.example.org", "ctp/rates")
//!     .channel("T0VTX")
//!     .timeout_secs(5)
//!     .max_retries(2);
//! let source = HttpConditionSource::new(config)?;
//!
//! let provider = CachedConditionProvider::new(source, SystemTime)
//!     .with_refresh_interval(60_000);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{AuthMethod, HttpConditionSource, HttpConfig, HttpError};

use thiserror::Error;
use trendguard_core::ConditionError;

/// Common connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// No attempt produced an answer
    #[error("Timeout")]
    Timeout,

    /// Source configuration rejected before any request
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Answer is not a calibration object
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl From<&ConnectorError> for ConditionError {
    fn from(err: &ConnectorError) -> Self {
        match err {
            ConnectorError::InvalidPayload(_) => ConditionError::InvalidCalibration,
            _ => ConditionError::Unavailable,
        }
    }
}

/// Request statistics common to all sources
#[derive(Debug, Default, Clone)]
pub struct ConnectionStats {
    /// Fetches that produced a calibration
    pub fetches_ok: u64,
    /// Fetches that failed after all retries
    pub fetches_failed: u64,
    /// Retries issued
    pub retries: u64,
    /// Bytes received
    pub bytes_received: u64,
    /// Last error message
    pub last_error: Option<String>,
}
