//! Evaluator configuration
//!
//! ## Parameter Resolution
//!
//! Configuration arrives as string key/value pairs. A value may be given
//! globally and overridden for a class of activities:
//!
//! ```text
//! get(key, activity)
//!     │
//!     ├─ first override matching the activity that defines `key`
//!     │
//!     └─ otherwise the global value
//! ```
//!
//! An override matches when each of its selectors (run type, beam type) is
//! either unset or equal to the activity's value.
//!
//! ## Recognised Keys
//!
//! | Key | Values | Fallback |
//! |-----|--------|----------|
//! | `thresholdsMode` | `Fixed`/`ExpectedRange`, `Mean`/`DeviationFromMean`, `StdDeviation` | `ExpectedRange` |
//! | `nPointsForAverage` | integer or `all` | `all` |
//! | `sliceTrend` | `true`/`yes`/`1`, `false`/`no`/`0` | `false` |
//! | `thresholds:<plot>` | threshold grammar | no thresholds |
//!
//! ## Usage Example
//!
//! ```rust
//! use trendguard_core::config::{Activity, AveragingWindow, EvaluatorConfig, Parameters, ThresholdsMode};
//!
//! let mut parameters = Parameters::new();
//! parameters.set("thresholdsMode", "Mean");
//! parameters.set("nPointsForAverage", "10");
//! parameters.set_for_run_type("PHYSICS", "nPointsForAverage", "all");
//!
//! let physics = Activity::new(42, "PHYSICS", "pp");
//! let config = EvaluatorConfig::from_parameters(&parameters, &physics);
//! assert_eq!(config.mode, ThresholdsMode::DeviationFromMean);
//! assert_eq!(config.window, AveragingWindow::All);
//! ```

use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
    vec::Vec,
};
use core::{fmt, str::FromStr};

use crate::{
    constants::keys::{ALL_POINTS, N_POINTS_FOR_AVERAGE, SLICE_TREND, THRESHOLDS_MODE},
    errors::TrendError,
};

/// A bounded monitoring run defining the lifetime of cached state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Activity {
    /// Run number
    pub run_number: u32,
    /// Run type, e.g. `PHYSICS` or `COSMICS`
    pub run_type: String,
    /// Beam type, e.g. `pp` or `PbPb`
    pub beam_type: String,
}

impl Activity {
    /// Create an activity description
    pub fn new(run_number: u32, run_type: &str, beam_type: &str) -> Self {
        Self {
            run_number,
            run_type: run_type.to_string(),
            beam_type: beam_type.to_string(),
        }
    }
}

/// Values that apply only to matching activities
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivityOverride {
    /// Run type selector, any run type when unset
    #[cfg_attr(feature = "serde", serde(default))]
    pub run_type: Option<String>,
    /// Beam type selector, any beam type when unset
    #[cfg_attr(feature = "serde", serde(default))]
    pub beam_type: Option<String>,
    /// Overridden key/value pairs
    #[cfg_attr(feature = "serde", serde(default))]
    pub values: BTreeMap<String, String>,
}

impl ActivityOverride {
    fn matches(&self, activity: &Activity) -> bool {
        let run_type_ok = self.run_type.as_ref().map_or(true, |t| *t == activity.run_type);
        let beam_type_ok = self.beam_type.as_ref().map_or(true, |t| *t == activity.beam_type);
        run_type_ok && beam_type_ok
    }
}

/// String key/value configuration with activity-scoped overrides
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters {
    #[cfg_attr(feature = "serde", serde(default))]
    global: BTreeMap<String, String>,
    #[cfg_attr(feature = "serde", serde(default))]
    overrides: Vec<ActivityOverride>,
}

impl Parameters {
    /// Empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a global value
    pub fn set(&mut self, key: &str, value: &str) {
        self.global.insert(key.to_string(), value.to_string());
    }

    /// Set a value for activities of the given run type
    pub fn set_for_run_type(&mut self, run_type: &str, key: &str, value: &str) {
        self.set_for(Some(run_type), None, key, value);
    }

    /// Set a value for activities matching both selectors
    ///
    /// Values set with the same selectors accumulate in one override.
    pub fn set_for(&mut self, run_type: Option<&str>, beam_type: Option<&str>, key: &str, value: &str) {
        let run_type = run_type.map(str::to_string);
        let beam_type = beam_type.map(str::to_string);

        let position = self
            .overrides
            .iter()
            .position(|o| o.run_type == run_type && o.beam_type == beam_type);
        let entry = match position {
            Some(index) => &mut self.overrides[index],
            None => {
                self.overrides.push(ActivityOverride { run_type, beam_type, values: BTreeMap::new() });
                let last = self.overrides.len() - 1;
                &mut self.overrides[last]
            }
        };
        entry.values.insert(key.to_string(), value.to_string());
    }

    /// Value for `key`, activity overrides first, then the global value
    pub fn get(&self, key: &str, activity: Option<&Activity>) -> Option<&str> {
        activity
            .and_then(|activity| {
                self.overrides
                    .iter()
                    .filter(|o| o.matches(activity))
                    .find_map(|o| o.values.get(key))
            })
            .or_else(|| self.global.get(key))
            .map(String::as_str)
    }

    /// True if nothing is configured
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.overrides.iter().all(|o| o.values.is_empty())
    }
}

/// How configured bounds relate to the trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ThresholdsMode {
    /// Bounds are absolute values
    #[default]
    ExpectedRange,
    /// Bounds are fractions of the baseline mean: `mean + b·|mean|`
    DeviationFromMean,
    /// Bounds are multiples of the baseline spread: `mean + b·σ`
    StdDeviation,
}

impl ThresholdsMode {
    /// True if the mode needs baseline statistics
    pub const fn is_relative(&self) -> bool {
        !matches!(self, Self::ExpectedRange)
    }
}

impl FromStr for ThresholdsMode {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Fixed" | "ExpectedRange" => Ok(Self::ExpectedRange),
            "Mean" | "DeviationFromMean" => Ok(Self::DeviationFromMean),
            "StdDeviation" => Ok(Self::StdDeviation),
            _ => Err(TrendError::InvalidParameter { key: THRESHOLDS_MODE }),
        }
    }
}

impl fmt::Display for ThresholdsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpectedRange => f.write_str("ExpectedRange"),
            Self::DeviationFromMean => f.write_str("DeviationFromMean"),
            Self::StdDeviation => f.write_str("StdDeviation"),
        }
    }
}

/// Number of baseline points used by the relative modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AveragingWindow {
    /// Every point except the newest
    #[default]
    All,
    /// At most this many points before the newest
    Last(usize),
}

impl FromStr for AveragingWindow {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == ALL_POINTS {
            return Ok(Self::All);
        }
        match s.parse::<usize>() {
            Ok(0) => Ok(Self::All),
            Ok(n) => Ok(Self::Last(n)),
            Err(_) => Err(TrendError::InvalidParameter { key: N_POINTS_FOR_AVERAGE }),
        }
    }
}

impl fmt::Display for AveragingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_POINTS),
            Self::Last(n) => write!(f, "{}", n),
        }
    }
}

/// Lenient boolean: `true/yes/1` and `false/no/0`, any case
pub fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if ["true", "yes", "1"].iter().any(|t| value.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if ["false", "no", "0"].iter().any(|t| value.eq_ignore_ascii_case(t)) {
        Some(false)
    } else {
        None
    }
}

/// Scalar settings resolved once per activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvaluatorConfig {
    /// Interpretation of configured bounds
    pub mode: ThresholdsMode,
    /// Baseline window for relative modes
    pub window: AveragingWindow,
    /// Canvases carry one trend per pad
    pub slice_trend: bool,
}

impl EvaluatorConfig {
    /// Resolve the scalar settings for `activity`
    ///
    /// Invalid values are logged and replaced by their fallback.
    pub fn from_parameters(parameters: &Parameters, activity: &Activity) -> Self {
        let mut config = Self::default();

        if let Some(raw) = parameters.get(THRESHOLDS_MODE, Some(activity)) {
            match raw.parse() {
                Ok(mode) => config.mode = mode,
                Err(_) => log_warn!(
                    "Unknown value \"{}\" for {}, using {}",
                    raw, THRESHOLDS_MODE, config.mode
                ),
            }
        }
        log_info!("Thresholds mode: {}", config.mode);

        if let Some(raw) = parameters.get(N_POINTS_FOR_AVERAGE, Some(activity)) {
            match raw.parse() {
                Ok(window) => config.window = window,
                Err(_) => log_warn!(
                    "Invalid value \"{}\" for {}, averaging over all points",
                    raw, N_POINTS_FOR_AVERAGE
                ),
            }
        }
        log_info!("Averaging window: {} points", config.window);

        if let Some(raw) = parameters.get(SLICE_TREND, Some(activity)) {
            match parse_bool(raw) {
                Some(value) => config.slice_trend = value,
                None => log_warn!("Invalid value \"{}\" for {}, keeping false", raw, SLICE_TREND),
            }
        }

        config
    }
}
