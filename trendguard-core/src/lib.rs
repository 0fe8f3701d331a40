//! Core evaluation engine for TrendGuard
//!
//! Judges monitoring trends (one scalar per cycle: a rate, an efficiency, a
//! mean occupancy) against acceptance thresholds that may depend on an
//! external operating condition such as the instantaneous interaction rate.
//!
//! Key constraints:
//! - One evaluation per monitoring cycle, driven by the host
//! - Configuration typos never block the host (fail open, but logged)
//! - All mutable state is scoped to one activity (a data-taking run)
//!
//! ```no_run
//! use trendguard_core::{
//!     Activity, FixedCondition, MonitorObject, Parameters, PlotBatch, Quality, Series,
//!     TrendEvaluator,
//! };
//!
//! let mut parameters = Parameters::new();
//! parameters.set("thresholds:Efficiency", "0.8,1.0;0.9,1.0");
//!
//! let mut evaluator = TrendEvaluator::new(parameters, FixedCondition::new(0.0));
//! evaluator.start_of_activity(&Activity::default());
//!
//! let series = Series::from_values(&[0.95, 0.97, 0.85]);
//! let mut batch = PlotBatch::new();
//! batch.insert("Efficiency".into(), MonitorObject::graph("MCH/Trends/Efficiency", series));
//!
//! match evaluator.evaluate(&batch) {
//!     Quality::Good => {}, // All trends inside their ranges
//!     _ => {}, // Raise an alarm
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod macros;

pub mod condition;
pub mod config;
pub mod constants;
pub mod errors;
pub mod evaluator;
pub mod overlay;
pub mod plot;
pub mod quality;
pub mod recorder;
pub mod series;
pub mod stats;
pub mod thresholds;
pub mod time;
pub mod traits;

// Public API
pub use condition::{
    CachedConditionProvider, ConditionError, FixedCondition, RateCalibration,
    SyntheticDecayCondition,
};
pub use config::{Activity, AveragingWindow, EvaluatorConfig, Parameters, ThresholdsMode};
pub use errors::{TrendError, TrendResult};
pub use evaluator::{ActivityState, TrendEvaluator};
#[cfg(feature = "std")]
pub use evaluator::SharedEvaluator;
pub use overlay::{LineStyle, OverlayColor, OverlayLine, ThresholdOverlay};
pub use plot::{Canvas, DisplayObject, MonitorObject, PlotBatch, PlotLayout, Primitive};
pub use quality::Quality;
pub use recorder::{ThresholdTrendPoint, ThresholdTrendRecorder};
pub use series::{Series, SeriesPoint};
pub use stats::TrendStatistics;
pub use thresholds::{CalibrationPoint, Range, ResolvedThresholds, ThresholdSpec};
pub use traits::{ConditionProvider, ConditionSource, SampleContext};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
