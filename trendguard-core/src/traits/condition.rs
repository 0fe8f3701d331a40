//! Operating-Condition Traits
//!
//! Thresholds may depend on an external operating condition, typically the
//! instantaneous interaction rate. Two roles are separated:
//!
//! - [`ConditionProvider`]: answers "what was the condition for this sample"
//!   on every evaluation; cheap except when it refreshes from a source
//! - [`ConditionSource`]: fetches a whole [`RateCalibration`] from wherever
//!   it lives (remote store, file, test fixture); blocking and may be slow
//!
//! A caching provider sits between the two and decides when a fetch is
//! worth doing. The fetch runs synchronously inside `condition`, so a
//! refreshing cycle takes as long as the source's timeout and retries allow.
//!
//! ## Common Patterns
//!
//! ```rust
//! use trendguard_core::traits::{ConditionProvider, SampleContext};
//!
//! fn condition_or_zero<P: ConditionProvider>(provider: &mut P, sample: &SampleContext) -> f64 {
//!     match provider.condition(sample) {
//!         Ok(value) => value,
//!         Err(nb::Error::WouldBlock) => 0.0, // nothing fetched yet
//!         Err(nb::Error::Other(_)) => 0.0,   // source failed
//!     }
//! }
//! ```

use crate::{
    condition::{ConditionError, RateCalibration},
    time::{x_to_timestamp, Timestamp},
};

/// The sample whose operating condition is requested
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleContext {
    /// x value of the newest point (seconds since epoch)
    pub x: f64,
    /// Number of points in the series, newest included
    pub points: usize,
}

impl SampleContext {
    /// Context for the newest point of a series
    pub const fn new(x: f64, points: usize) -> Self {
        Self { x, points }
    }

    /// Sample time in milliseconds since epoch
    pub fn timestamp_ms(&self) -> Timestamp {
        x_to_timestamp(self.x)
    }
}

/// Operating condition for one sample
///
/// ## Error Handling
///
/// - `nb::Error::WouldBlock` - No value available yet (nothing fetched)
/// - `nb::Error::Other(e)` - The backing source failed
///
/// The evaluator treats both as "unavailable" and falls back to the last
/// condition it obtained during the activity.
pub trait ConditionProvider {
    /// Condition (Hz) at the time of `sample`
    ///
    /// ## Contract
    ///
    /// - May block while refreshing from a [`ConditionSource`], for at most
    ///   the source's own timeout and retry budget
    /// - Returning the same value for repeated calls is allowed
    fn condition(&mut self, sample: &SampleContext) -> nb::Result<f64, ConditionError>;

    /// Drop anything cached for the previous activity
    ///
    /// Default implementation does nothing.
    fn reset(&mut self) {}
}

impl<P: ConditionProvider + ?Sized> ConditionProvider for &mut P {
    fn condition(&mut self, sample: &SampleContext) -> nb::Result<f64, ConditionError> {
        (**self).condition(sample)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

impl<P: ConditionProvider + ?Sized> ConditionProvider for alloc::boxed::Box<P> {
    fn condition(&mut self, sample: &SampleContext) -> nb::Result<f64, ConditionError> {
        (**self).condition(sample)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Backing store of rate calibration objects
///
/// ## Example Implementation
///
/// ```rust
/// use trendguard_core::condition::{ConditionError, RateCalibration};
/// use trendguard_core::traits::ConditionSource;
///
/// struct StaticSource(Vec<(u64, f64)>);
///
/// impl ConditionSource for StaticSource {
///     fn fetch(&mut self) -> Result<RateCalibration, ConditionError> {
///         RateCalibration::from_samples(self.0.clone())
///     }
/// }
/// ```
pub trait ConditionSource {
    /// Fetch the current calibration object
    fn fetch(&mut self) -> Result<RateCalibration, ConditionError>;
}
