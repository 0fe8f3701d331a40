//! Time handling
//!
//! Two notions of time meet in the engine:
//! - Trend x values: seconds since epoch, as written by the trending task
//! - Timestamps: milliseconds since epoch, used by condition sources and
//!   for refresh bookkeeping
//!
//! Clocks are abstracted behind [`TimeSource`] so that refresh intervals can
//! be tested deterministically with [`FixedTime`].

use crate::constants::time::X_UNITS_TO_MS;
pub use crate::traits::TimeSource;

/// Timestamp in milliseconds since epoch
pub type Timestamp = u64;

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Clock stopped at `timestamp`
    pub const fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Move the clock to `timestamp`
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move the clock forward
    pub fn advance(&mut self, ms: u64) {
        self.timestamp = self.timestamp.saturating_add(ms);
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

/// Convert a trend x value (seconds) to a timestamp
///
/// Negative and non-finite values map to 0.
pub fn x_to_timestamp(x: f64) -> Timestamp {
    let ms = x * X_UNITS_TO_MS;
    if ms.is_finite() && ms > 0.0 {
        ms as Timestamp
    } else {
        0
    }
}
