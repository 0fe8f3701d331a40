//! Trend Quality Evaluator
//!
//! ## Overview
//!
//! Once per monitoring cycle the host hands over a batch of monitor
//! objects. For every series extracted from them the evaluator judges the
//! newest point:
//!
//! ```text
//!  MonitorObject ──extract──▶ Series ─┬─ newest point (x, y, err)
//!                                     │
//!   thresholds:<base name> ──parse──▶ ThresholdSpec (cached per activity)
//!                                     │
//!   ConditionProvider ──condition──▶ resolve ──▶ (Bad, Medium)
//!                                     │
//!                  relative mode? ──▶ TrendStatistics ──▶ absolute ranges
//!                                     │
//!                                     ├──▶ ThresholdTrendRecorder
//!                                     └──▶ verdict ──▶ per-series quality
//! ```
//!
//! The cycle's result is the worst stored per-series quality, or
//! [`Quality::Null`] if no series got a verdict in this cycle.
//!
//! ## Failure Policy
//!
//! Nothing here returns an error to the host. A series without resolvable
//! Bad thresholds, without enough baseline points, with no points, or with
//! a non-finite newest value gets no verdict this cycle, and any verdict it
//! held from an earlier cycle is dropped so it cannot mask the current
//! state.
//!
//! ## Activity Scope
//!
//! Parsed thresholds, plot layouts, verdicts, recorded threshold trends and
//! the last operating condition all live in [`ActivityState`], which is
//! rebuilt at `start_of_activity` and cleared at `end_of_activity`.

use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
    vec::Vec,
};

use crate::{
    config::{Activity, EvaluatorConfig, Parameters, ThresholdsMode},
    constants::statistics::MIN_SERIES_POINTS,
    errors::{TrendError, TrendResult},
    overlay::ThresholdOverlay,
    plot::{MonitorObject, PlotBatch, PlotLayout},
    quality::Quality,
    recorder::ThresholdTrendRecorder,
    series::Series,
    stats::TrendStatistics,
    thresholds::{ResolvedThresholds, ThresholdSpec},
    traits::{ConditionProvider, SampleContext},
};

/// Everything the evaluator remembers during one activity
#[derive(Debug, Clone, Default)]
pub struct ActivityState {
    activity: Activity,
    config: EvaluatorConfig,
    specs: BTreeMap<String, ThresholdSpec>,
    layouts: BTreeMap<String, PlotLayout>,
    qualities: BTreeMap<String, Quality>,
    recorder: ThresholdTrendRecorder,
    last_condition: Option<f64>,
}

impl ActivityState {
    /// Fresh state for `activity`
    pub fn new(activity: Activity, config: EvaluatorConfig) -> Self {
        Self { activity, config, ..Self::default() }
    }

    /// Current activity
    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    /// Settings resolved for the activity
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Parsed thresholds, keyed by plot base name
    pub fn specs(&self) -> &BTreeMap<String, ThresholdSpec> {
        &self.specs
    }

    /// Classified layouts, keyed by monitor object name
    pub fn layouts(&self) -> &BTreeMap<String, PlotLayout> {
        &self.layouts
    }

    /// Last operating condition obtained from the provider
    pub fn last_condition(&self) -> Option<f64> {
        self.last_condition
    }

    /// Forget everything, keeping the resolved settings
    pub fn clear(&mut self) {
        self.activity = Activity::default();
        self.specs.clear();
        self.layouts.clear();
        self.qualities.clear();
        self.recorder.clear();
        self.last_condition = None;
    }
}

/// Judges trends against operating-condition dependent thresholds
pub struct TrendEvaluator<P: ConditionProvider> {
    parameters: Parameters,
    provider: P,
    state: ActivityState,
}

impl<P: ConditionProvider> TrendEvaluator<P> {
    /// Create an evaluator; settings are resolved for a default activity
    /// until [`start_of_activity`](Self::start_of_activity) is called
    pub fn new(parameters: Parameters, provider: P) -> Self {
        let config = EvaluatorConfig::from_parameters(&parameters, &Activity::default());
        Self {
            parameters,
            provider,
            state: ActivityState::new(Activity::default(), config),
        }
    }

    /// Begin an activity: resolve settings and drop all cached state
    pub fn start_of_activity(&mut self, activity: &Activity) {
        log_info!("Start of activity {}", activity.run_number);
        let config = EvaluatorConfig::from_parameters(&self.parameters, activity);
        self.state = ActivityState::new(activity.clone(), config);
        self.provider.reset();
    }

    /// End the activity: drop all cached state
    pub fn end_of_activity(&mut self) {
        log_info!("End of activity {}", self.state.activity.run_number);
        self.state.clear();
        self.provider.reset();
    }

    /// Judge the newest point of every series in `batch`
    ///
    /// Returns the worst per-series quality currently held, or
    /// [`Quality::Null`] if no series got a verdict in this call.
    pub fn evaluate(&mut self, batch: &PlotBatch) -> Quality {
        let mut judged = 0usize;
        for object in batch.values() {
            let series_list = self.extract(object);
            if series_list.is_empty() {
                log_debug!("No series in \"{}\"", object.name());
                continue;
            }

            for (index, series) in series_list {
                let id = object.series_id(index);
                match self.evaluate_series(object.base_name(), &id, series) {
                    Ok(quality) => {
                        log_debug!("{}: {}", id, quality);
                        self.state.qualities.insert(id, quality);
                        judged += 1;
                    }
                    Err(err) => {
                        log_debug!("{}: excluded from the verdict ({})", id, err);
                        self.state.qualities.remove(&id);
                    }
                }
            }
        }

        if judged == 0 {
            return Quality::Null;
        }
        self.aggregate()
    }

    /// Worst per-series quality currently held, across cycles
    pub fn aggregate(&self) -> Quality {
        Quality::worst(self.state.qualities.values().copied())
    }

    /// Verdict of series `id`, if it holds one
    pub fn series_quality(&self, id: &str) -> Option<Quality> {
        self.state.qualities.get(id).copied()
    }

    /// All held verdicts, keyed by series id
    pub fn qualities(&self) -> &BTreeMap<String, Quality> {
        &self.state.qualities
    }

    /// Recorded threshold trends
    pub fn thresholds_trend(&self) -> &ThresholdTrendRecorder {
        &self.state.recorder
    }

    /// Activity-scoped state
    pub fn state(&self) -> &ActivityState {
        &self.state
    }

    /// Settings in effect
    pub fn config(&self) -> &EvaluatorConfig {
        &self.state.config
    }

    /// Condition provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable access to the condition provider
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Rendering data for every series of `object`
    pub fn overlay(&self, object: &MonitorObject) -> Vec<ThresholdOverlay> {
        let series_list = self
            .state
            .layouts
            .get(object.name())
            .and_then(|layout| layout.extract(object.object()))
            .or_else(|| {
                PlotLayout::classify(object.object(), self.state.config.slice_trend)
                    .and_then(|layout| layout.extract(object.object()))
            })
            .unwrap_or_default();

        series_list
            .into_iter()
            .filter_map(|(index, series)| {
                let id = object.series_id(index);
                let quality = self.series_quality(&id).unwrap_or_default();
                ThresholdOverlay::build(&id, series, quality, &self.state.recorder)
            })
            .collect()
    }

    /// Series of `object`, classifying its layout if needed
    fn extract<'a>(&mut self, object: &'a MonitorObject) -> Vec<(usize, &'a Series)> {
        if let Some(layout) = self.state.layouts.get(object.name()) {
            if let Some(series) = layout.extract(object.object()) {
                return series;
            }
            log_debug!("Layout of \"{}\" changed, classifying again", object.name());
        }

        match PlotLayout::classify(object.object(), self.state.config.slice_trend) {
            Some(layout) => {
                self.state.layouts.insert(object.name().to_string(), layout);
                layout.extract(object.object()).unwrap_or_default()
            }
            None => {
                self.state.layouts.remove(object.name());
                Vec::new()
            }
        }
    }

    fn evaluate_series(&mut self, key: &str, id: &str, series: &Series) -> TrendResult<Quality> {
        if series.len() < MIN_SERIES_POINTS {
            return Err(TrendError::EmptySeries);
        }
        let last = *series.last().ok_or(TrendError::EmptySeries)?;
        if !last.y.is_finite() {
            return Err(TrendError::InvalidValue);
        }

        let thresholds = self.thresholds_for(key, series)?;
        self.state.recorder.record(id, last.x, &thresholds);

        let bad = thresholds.bad.ok_or(TrendError::MissingThresholds)?;

        let quality = if !bad.contains(last.y) {
            Quality::Bad
        } else if thresholds.medium.map_or(false, |medium| !medium.contains(last.y)) {
            Quality::Medium
        } else {
            Quality::Good
        };

        Ok(quality)
    }

    /// Absolute thresholds for the newest point of `series`
    fn thresholds_for(&mut self, key: &str, series: &Series) -> TrendResult<ResolvedThresholds> {
        let parameters = &self.parameters;
        let activity = &self.state.activity;
        let spec = self
            .state
            .specs
            .entry(key.to_string())
            .or_insert_with(|| ThresholdSpec::from_parameters(parameters, key, activity));

        let condition = if spec.is_condition_dependent() {
            let last_x = series.last().map_or(0.0, |p| p.x);
            let sample = SampleContext::new(last_x, series.len());
            match self.provider.condition(&sample) {
                Ok(condition) => {
                    self.state.last_condition = Some(condition);
                    condition
                }
                Err(err) => {
                    let fallback = self.state.last_condition.unwrap_or(0.0);
                    match err {
                        nb::Error::WouldBlock => log_warn!(
                            "Operating condition not available yet, using {} Hz",
                            fallback
                        ),
                        nb::Error::Other(e) => log_warn!(
                            "Operating condition unavailable ({}), using {} Hz",
                            e, fallback
                        ),
                    }
                    fallback
                }
            }
        } else {
            0.0
        };

        let resolved = spec.resolve(condition);
        if resolved.bad.is_none() {
            return Err(TrendError::MissingThresholds);
        }

        let mode = self.state.config.mode;
        if !mode.is_relative() {
            return Ok(resolved);
        }

        let stats = TrendStatistics::try_compute(series, self.state.config.window)?;
        let last_error = series.last().map_or(0.0, |p| p.error_or_zero());

        Ok(match mode {
            ThresholdsMode::DeviationFromMean => resolved.map(|b| stats.relative_to_mean(b)),
            ThresholdsMode::StdDeviation => resolved.map(|b| stats.relative_to_spread(b, last_error)),
            ThresholdsMode::ExpectedRange => resolved,
        })
    }
}

/// Evaluator shared between threads
///
/// Hosts that evaluate batches from several threads serialize access to
/// the single activity state through one mutex. Clones share the evaluator.
#[cfg(feature = "std")]
pub struct SharedEvaluator<P: ConditionProvider> {
    inner: std::sync::Arc<std::sync::Mutex<TrendEvaluator<P>>>,
}

#[cfg(feature = "std")]
impl<P: ConditionProvider> Clone for SharedEvaluator<P> {
    fn clone(&self) -> Self {
        Self { inner: std::sync::Arc::clone(&self.inner) }
    }
}

#[cfg(feature = "std")]
impl<P: ConditionProvider> SharedEvaluator<P> {
    /// Share `evaluator`
    pub fn new(evaluator: TrendEvaluator<P>) -> Self {
        Self { inner: std::sync::Arc::new(std::sync::Mutex::new(evaluator)) }
    }

    /// Run `f` with exclusive access to the evaluator
    ///
    /// A panic in another holder does not make the state unusable; the
    /// evaluator is taken over as it is.
    pub fn with<R>(&self, f: impl FnOnce(&mut TrendEvaluator<P>) -> R) -> R {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut guard)
    }

    /// See [`TrendEvaluator::start_of_activity`]
    pub fn start_of_activity(&self, activity: &Activity) {
        self.with(|evaluator| evaluator.start_of_activity(activity));
    }

    /// See [`TrendEvaluator::end_of_activity`]
    pub fn end_of_activity(&self) {
        self.with(|evaluator| evaluator.end_of_activity());
    }

    /// See [`TrendEvaluator::evaluate`]
    pub fn evaluate(&self, batch: &PlotBatch) -> Quality {
        self.with(|evaluator| evaluator.evaluate(batch))
    }

    /// See [`TrendEvaluator::series_quality`]
    pub fn series_quality(&self, id: &str) -> Option<Quality> {
        self.with(|evaluator| evaluator.series_quality(id))
    }
}
