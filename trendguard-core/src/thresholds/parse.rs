//! Threshold configuration parsing
//!
//! Grammar of a `thresholds:<plot>` value:
//!
//! ```text
//! spec       := entry ( '|' entry )*
//! entry      := [ condition ':' ] thresholds
//! thresholds := bad [ ';' medium ]
//! bad        := min ',' max
//! medium     := min ',' max
//! ```
//!
//! `condition` is written in kHz and stored in Hz. Empty tokens are skipped
//! and every token is trimmed, so `" 10 : 0 , 5 "` is accepted.
//!
//! Parsing never fails as a whole. A Bad range that cannot be read becomes
//! `(0,0)`, a Medium range that cannot be read is dropped, and an entry whose
//! condition cannot be read is skipped. Each of these is logged.
//!
//! The legacy per-level keys (`thresholdsBad:<plot>`, `thresholdsMedium:<plot>`)
//! hold `;`-separated lists of `[condition:]min,max` and are translated into
//! the same [`CalibrationPoint`] model.

use alloc::vec::Vec;
use core::fmt;

use super::{CalibrationPoint, Range, ThresholdSpec};
use crate::{
    config::{Activity, Parameters},
    constants::{
        keys::{THRESHOLDS_BAD_PREFIX, THRESHOLDS_MEDIUM_PREFIX, THRESHOLDS_PREFIX},
        BOUND_SEPARATOR, CONDITION_SCALE, CONDITION_SEPARATOR, ENTRY_SEPARATOR, LEVEL_SEPARATOR,
    },
    errors::{TrendError, TrendResult},
};

/// Split on `separator`, trim, drop empty tokens
fn tokens(text: &str, separator: char) -> impl Iterator<Item = &str> {
    text.split(separator).map(str::trim).filter(|t| !t.is_empty())
}

fn parse_range(text: &str, level: &'static str) -> TrendResult<Range> {
    let bounds: Vec<&str> = tokens(text, BOUND_SEPARATOR).collect();
    if bounds.len() != 2 {
        return Err(TrendError::InvalidThresholds { level });
    }
    let min = bounds[0].parse::<f64>().map_err(|_| TrendError::InvalidThresholds { level })?;
    let max = bounds[1].parse::<f64>().map_err(|_| TrendError::InvalidThresholds { level })?;
    Ok(Range::new(min, max))
}

/// Split `[condition:]rest` into the scaled condition and the rest
fn split_condition(entry: &str) -> TrendResult<(Option<f64>, &str)> {
    let parts: Vec<&str> = tokens(entry, CONDITION_SEPARATOR).collect();
    match parts.as_slice() {
        [rest] => Ok((None, rest)),
        [condition, rest] => {
            let condition = condition
                .parse::<f64>()
                .map_err(|_| TrendError::InvalidCondition)?;
            Ok((Some(condition * CONDITION_SCALE), rest))
        }
        _ => Err(TrendError::InvalidCondition),
    }
}

fn parse_entry(entry: &str, plot_name: &str) -> TrendResult<Option<CalibrationPoint>> {
    let (reference_condition, thresholds) = split_condition(entry)?;

    let levels: Vec<&str> = tokens(thresholds, LEVEL_SEPARATOR).collect();
    let Some(bad_text) = levels.first() else {
        return Ok(None);
    };

    let bad = parse_range(bad_text, "Bad").unwrap_or_else(|err| {
        log_error!(
            "{} for plot \"{}\", string is \"{}\"",
            err, plot_name, bad_text
        );
        Range::zero()
    });

    let medium = levels.get(1).and_then(|medium_text| {
        parse_range(medium_text, "Medium")
            .map_err(|err| {
                log_error!(
                    "{} for plot \"{}\", string is \"{}\"",
                    err, plot_name, medium_text
                );
            })
            .ok()
    });

    if levels.len() > 2 {
        log_warn!(
            "Ignoring {} extra threshold levels in entry \"{}\" of plot \"{}\"",
            levels.len() - 2, entry, plot_name
        );
    }

    Ok(Some(CalibrationPoint { reference_condition, bad, medium }))
}

impl ThresholdSpec {
    /// Parse a unified threshold configuration value
    ///
    /// Empty input yields an empty spec, which later resolves to no
    /// thresholds and therefore no verdict.
    pub fn parse(raw: &str, plot_name: &str) -> Self {
        let mut points = Vec::new();
        for entry in tokens(raw, ENTRY_SEPARATOR) {
            match parse_entry(entry, plot_name) {
                Ok(Some(point)) => points.push(point),
                Ok(None) => {}
                Err(err) => log_error!(
                    "{} for plot \"{}\", dropping entry \"{}\"",
                    err, plot_name, entry
                ),
            }
        }

        let spec = Self::from_points(points);
        spec.log_summary(plot_name);
        spec
    }

    /// Translate the legacy per-level configuration into the unified model
    ///
    /// Every Bad entry becomes a point; a Medium entry is attached to the Bad
    /// point with the same reference condition.
    pub fn parse_legacy(bad_raw: &str, medium_raw: &str, plot_name: &str) -> Self {
        let read_level = |raw: &str, level: &'static str| -> Vec<(Option<f64>, Range)> {
            let mut ranges = Vec::new();
            for entry in tokens(raw, LEVEL_SEPARATOR) {
                let parsed = split_condition(entry).map(|(condition, text)| {
                    let range = parse_range(text, level).unwrap_or_else(|err| {
                        log_error!(
                            "{} for plot \"{}\", string is \"{}\"",
                            err, plot_name, entry
                        );
                        Range::zero()
                    });
                    (condition, range)
                });
                match parsed {
                    Ok(item) => ranges.push(item),
                    Err(err) => log_error!(
                        "{} for plot \"{}\", dropping entry \"{}\"",
                        err, plot_name, entry
                    ),
                }
            }
            ranges
        };

        let bad = read_level(bad_raw, "Bad");
        let medium = read_level(medium_raw, "Medium");

        let points: Vec<CalibrationPoint> = bad
            .iter()
            .map(|&(reference_condition, bad)| CalibrationPoint {
                reference_condition,
                bad,
                medium: medium
                    .iter()
                    .find(|(condition, _)| *condition == reference_condition)
                    .map(|&(_, range)| range),
            })
            .collect();

        let orphans = medium
            .iter()
            .filter(|(condition, _)| !bad.iter().any(|(c, _)| c == condition))
            .count();
        if orphans > 0 {
            log_warn!(
                "Ignoring {} Medium thresholds of plot \"{}\" without matching Bad thresholds",
                orphans, plot_name
            );
        }

        let spec = Self::from_points(points);
        spec.log_summary(plot_name);
        spec
    }

    /// Read the thresholds of `plot_name` from the configuration
    ///
    /// Looks up `thresholds:<plot>` first, then the legacy
    /// `thresholdsBad:<plot>` / `thresholdsMedium:<plot>` pair. Keys are
    /// resolved for the activity first and globally as a fallback.
    pub fn from_parameters(parameters: &Parameters, plot_name: &str, activity: &Activity) -> Self {
        log_debug!("Initializing thresholds for \"{}\"", plot_name);

        let key = alloc::format!("{}{}", THRESHOLDS_PREFIX, plot_name);
        if let Some(raw) = parameters.get(&key, Some(activity)) {
            return Self::parse(raw, plot_name);
        }

        let bad_key = alloc::format!("{}{}", THRESHOLDS_BAD_PREFIX, plot_name);
        let medium_key = alloc::format!("{}{}", THRESHOLDS_MEDIUM_PREFIX, plot_name);
        match parameters.get(&bad_key, Some(activity)) {
            Some(bad_raw) => {
                let medium_raw = parameters.get(&medium_key, Some(activity)).unwrap_or("");
                Self::parse_legacy(bad_raw, medium_raw, plot_name)
            }
            None => Self::empty(),
        }
    }

    fn log_summary(&self, plot_name: &str) {
        log_debug!("Thresholds for \"{}\": {} points", plot_name, self.len());
        for point in self.points() {
            if let Some(condition) = point.reference_condition {
                log_debug!("  nominal rate: {} Hz", condition);
            }
            log_debug!("    Bad min: {}  max: {}", point.bad.min, point.bad.max);
            if let Some(medium) = point.medium {
                log_debug!("    Medium min: {}  max: {}", medium.min, medium.max);
            }
        }
    }
}

/// Writes the configuration grammar back, with conditions in kHz
impl fmt::Display for ThresholdSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, point) in self.points().iter().enumerate() {
            if index > 0 {
                write!(f, "{}", ENTRY_SEPARATOR)?;
            }
            if let Some(condition) = point.reference_condition {
                write!(f, "{}{}", condition / CONDITION_SCALE, CONDITION_SEPARATOR)?;
            }
            write!(f, "{}{}{}", point.bad.min, BOUND_SEPARATOR, point.bad.max)?;
            if let Some(medium) = point.medium {
                write!(f, "{}{}{}{}", LEVEL_SEPARATOR, medium.min, BOUND_SEPARATOR, medium.max)?;
            }
        }
        Ok(())
    }
}
