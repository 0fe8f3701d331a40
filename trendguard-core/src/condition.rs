//! Operating-Condition Providers
//!
//! ## Overview
//!
//! ```text
//!  ┌─────────────────┐  fetch (slow, rare)  ┌──────────────────────────┐
//!  │ ConditionSource │ ───────────────────▶ │ CachedConditionProvider  │
//!  │ (remote store)  │                      │   RateCalibration cache  │
//!  └─────────────────┘                      └────────────┬─────────────┘
//!                                                        │ rate_at(ts) (every cycle)
//!                                                        ▼
//!                                                  TrendEvaluator
//! ```
//!
//! The evaluator asks for a condition once per series per cycle. Fetching a
//! calibration object is comparatively slow, so the caching provider fetches
//! at most once per refresh interval and keeps answering from the last good
//! calibration in between, and when a refresh fails.
//!
//! ## Providers
//!
//! - [`FixedCondition`]: constant value, for detectors whose thresholds do
//!   not depend on the rate, or for replaying a known run
//! - [`CachedConditionProvider`]: production provider over a [`ConditionSource`]
//! - [`SyntheticDecayCondition`]: test-only stand-in producing a decaying rate

use alloc::vec::Vec;
use thiserror_no_std::Error;

use crate::{
    constants::{
        thresholds::{SYNTHETIC_CONDITION_DECAY, SYNTHETIC_CONDITION_START_HZ},
        DEFAULT_CONDITION_REFRESH_MS,
    },
    time::{TimeSource, Timestamp},
    traits::{ConditionProvider, ConditionSource, SampleContext},
};

/// Condition provider and source failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionError {
    /// The backing source could not be reached or did not answer in time
    #[error("Condition source unavailable")]
    Unavailable,

    /// The backing source answered with something that is not a calibration
    #[error("Malformed calibration object")]
    InvalidCalibration,

    /// The calibration object holds no samples
    #[error("Calibration object is empty")]
    EmptyCalibration,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConditionError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Unavailable => defmt::write!(fmt, "Condition source unavailable"),
            Self::InvalidCalibration => defmt::write!(fmt, "Malformed calibration"),
            Self::EmptyCalibration => defmt::write!(fmt, "Empty calibration"),
        }
    }
}

/// Time-ordered rate samples with linear interpolation between them
///
/// ## Internal Invariants
///
/// - At least one sample
/// - Sorted by timestamp
/// - Every rate is finite
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RateCalibration {
    samples: Vec<(Timestamp, f64)>,
}

impl RateCalibration {
    /// Build from `(timestamp_ms, rate_hz)` samples in any order
    pub fn from_samples(mut samples: Vec<(Timestamp, f64)>) -> Result<Self, ConditionError> {
        if samples.is_empty() {
            return Err(ConditionError::EmptyCalibration);
        }
        if samples.iter().any(|(_, rate)| !rate.is_finite()) {
            return Err(ConditionError::InvalidCalibration);
        }
        samples.sort_by_key(|(ts, _)| *ts);
        Ok(Self { samples })
    }

    /// Rate at `ts`, flat before the first and after the last sample
    pub fn rate_at(&self, ts: Timestamp) -> f64 {
        let index = self.samples.partition_point(|(t, _)| *t <= ts);

        match (index.checked_sub(1).map(|i| self.samples[i]), self.samples.get(index)) {
            (Some((t0, r0)), Some(&(t1, r1))) => {
                let fraction = (ts - t0) as f64 / (t1 - t0) as f64;
                r0 + (r1 - r0) * fraction
            }
            (Some((_, r)), None) | (None, Some(&(_, r))) => r,
            (None, None) => 0.0,
        }
    }

    /// Samples, oldest first
    pub fn samples(&self) -> &[(Timestamp, f64)] {
        &self.samples
    }

    /// Covered time span `(first, last)`
    pub fn span(&self) -> (Timestamp, Timestamp) {
        let first = self.samples.first().map_or(0, |(t, _)| *t);
        let last = self.samples.last().map_or(0, |(t, _)| *t);
        (first, last)
    }
}

/// Constant operating condition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedCondition {
    value: f64,
}

impl FixedCondition {
    /// Always answer `value` (Hz)
    pub const fn new(value: f64) -> Self {
        Self { value }
    }
}

impl ConditionProvider for FixedCondition {
    fn condition(&mut self, _sample: &SampleContext) -> nb::Result<f64, ConditionError> {
        Ok(self.value)
    }
}

/// Provider answering from a periodically refreshed [`RateCalibration`]
///
/// ## Refresh Policy
///
/// - A fetch is attempted on first use and then at most once per interval
/// - The fetch runs synchronously inside `condition` and blocks the caller
///   for as long as the source takes
/// - A failed fetch keeps the previous calibration
/// - Before any successful fetch the provider reports the failure
///   (`nb::Error::Other`), or `WouldBlock` if no fetch was attempted yet
pub struct CachedConditionProvider<S: ConditionSource, T: TimeSource> {
    source: S,
    clock: T,
    refresh_interval_ms: u64,
    calibration: Option<RateCalibration>,
    last_attempt: Option<Timestamp>,
    last_error: Option<ConditionError>,
}

impl<S: ConditionSource, T: TimeSource> CachedConditionProvider<S, T> {
    /// Provider with the default refresh interval
    pub fn new(source: S, clock: T) -> Self {
        Self {
            source,
            clock,
            refresh_interval_ms: DEFAULT_CONDITION_REFRESH_MS,
            calibration: None,
            last_attempt: None,
            last_error: None,
        }
    }

    /// Set the minimum interval between two fetches
    pub fn with_refresh_interval(mut self, refresh_interval_ms: u64) -> Self {
        self.refresh_interval_ms = refresh_interval_ms;
        self
    }

    /// Currently cached calibration
    pub fn calibration(&self) -> Option<&RateCalibration> {
        self.calibration.as_ref()
    }

    /// Mutable access to the clock
    pub fn clock_mut(&mut self) -> &mut T {
        &mut self.clock
    }

    /// Mutable access to the source
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    fn refresh_due(&self, now: Timestamp) -> bool {
        match self.last_attempt {
            None => true,
            // A clock that went backwards also triggers a refresh
            Some(last) => now < last || now - last >= self.refresh_interval_ms,
        }
    }

    /// Fetch a new calibration if the refresh interval has elapsed
    pub fn refresh_if_due(&mut self) {
        let now = self.clock.now();
        if !self.refresh_due(now) {
            return;
        }
        self.last_attempt = Some(now);

        match self.source.fetch() {
            Ok(calibration) => {
                log_debug!(
                    "Fetched rate calibration with {} samples",
                    calibration.samples().len()
                );
                self.calibration = Some(calibration);
                self.last_error = None;
            }
            Err(err) => {
                log_warn!("Cannot refresh rate calibration: {}", err);
                self.last_error = Some(err);
            }
        }
    }
}

impl<S: ConditionSource, T: TimeSource> ConditionProvider for CachedConditionProvider<S, T> {
    fn condition(&mut self, sample: &SampleContext) -> nb::Result<f64, ConditionError> {
        self.refresh_if_due();

        match (&self.calibration, self.last_error) {
            (Some(calibration), _) => Ok(calibration.rate_at(sample.timestamp_ms())),
            (None, Some(err)) => Err(nb::Error::Other(err)),
            (None, None) => Err(nb::Error::WouldBlock),
        }
    }

    fn reset(&mut self) {
        self.calibration = None;
        self.last_attempt = None;
        self.last_error = None;
    }
}

/// Decaying synthetic rate: `1e6 · 0.9^(n-1)` for a series of `n` points
///
/// Test-only stand-in for a real provider. It reproduces the behaviour of
/// deployments that had no rate source wired in, and exists so that
/// rate-dependent thresholds can be exercised without a calibration store.
/// Do not use it in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticDecayCondition;

impl SyntheticDecayCondition {
    /// Synthetic rate for a series of `points` points
    pub fn rate_for(points: usize) -> f64 {
        let exponent = points.saturating_sub(1) as f64;
        SYNTHETIC_CONDITION_START_HZ * libm::pow(SYNTHETIC_CONDITION_DECAY, exponent)
    }
}

impl ConditionProvider for SyntheticDecayCondition {
    fn condition(&mut self, sample: &SampleContext) -> nb::Result<f64, ConditionError> {
        Ok(Self::rate_for(sample.points))
    }
}
