//! Time Source Abstraction
//!
//! Condition providers cache remote calibration objects and refresh them no
//! more often than a minimum interval. Deciding when that interval has
//! elapsed needs a clock, and tests need to control it.
//!
//! ## Common Implementations
//!
//! - `SystemTime`: Wall clock time (requires `std`)
//! - `FixedTime`: Controllable time for testing

use crate::time::Timestamp;

/// Source of time for the system
///
/// ## Example Implementation
///
/// ```rust
/// use trendguard_core::traits::TimeSource;
/// use trendguard_core::time::Timestamp;
///
/// struct RunClock {
///     run_start_ms: Timestamp,
///     elapsed_ms: Timestamp,
/// }
///
/// impl TimeSource for RunClock {
///     fn now(&self) -> Timestamp {
///         self.run_start_ms + self.elapsed_ms
///     }
/// }
/// ```
pub trait TimeSource {
    /// Get current timestamp in milliseconds since epoch
    ///
    /// Wall clocks can be adjusted and may go backwards; interval
    /// bookkeeping built on them must tolerate that.
    fn now(&self) -> Timestamp;
}
