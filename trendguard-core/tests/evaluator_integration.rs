//! Integration tests for the trend evaluator
//!
//! Drives the evaluator the way a monitoring host does: one activity, a
//! batch per cycle, verdicts and overlays read back between cycles.

mod common;

use trendguard_core::{
    Activity, CachedConditionProvider, ConditionError, FixedCondition, MonitorObject, Quality,
    RateCalibration, Range, Series, SeriesPoint, SyntheticDecayCondition, ThresholdsMode, TrendEvaluator,
};
use trendguard_core::time::FixedTime;
use trendguard_core::traits::ConditionSource;

use common::{
    batch, paired_canvas, parameters, physics_run, scenarios::Scenarios, single, TrendGenerator,
    CYCLE_S, RUN_START_S,
};

#[test]
fn test_scenarios_produce_expected_verdicts() {
    for scenario in [Scenarios::degrading_efficiency(), Scenarios::drifting_chamber()] {
        let mut evaluator = TrendEvaluator::new(scenario.parameters, FixedCondition::new(0.0));
        evaluator.start_of_activity(&physics_run(1));

        for (cycle, (plots, expected)) in scenario.cycles.iter().enumerate() {
            assert_eq!(
                evaluator.evaluate(plots),
                *expected,
                "scenario {} cycle {}",
                scenario.name,
                cycle
            );
        }
    }
}

#[test]
fn test_rate_dependent_thresholds_follow_condition() {
    // 10 kHz: (0,5)   20 kHz: (0,8)
    let parameters = parameters(&[("thresholds:Rate", "10:0,5;1,4|20:0,8;2,6")]);

    for (condition, value, expected) in [
        (10_000.0, 4.5, Quality::Medium),
        (10_000.0, 6.0, Quality::Bad),
        (15_000.0, 6.0, Quality::Medium),
        (15_000.0, 4.0, Quality::Good),
        (20_000.0, 7.0, Quality::Medium),
        (50_000.0, 7.9, Quality::Medium),
        (5_000.0, 3.0, Quality::Good),
    ] {
        let mut evaluator = TrendEvaluator::new(parameters.clone(), FixedCondition::new(condition));
        evaluator.start_of_activity(&physics_run(1));

        let verdict = evaluator.evaluate(&single("Rate", Series::from_values(&[value])));
        assert_eq!(verdict, expected, "condition {} value {}", condition, value);
    }
}

#[test]
fn test_interpolated_ranges_are_recorded() {
    let parameters = parameters(&[("thresholds:Rate", "10:0,5;1,4|20:0,8;2,6")]);
    let mut evaluator = TrendEvaluator::new(parameters, FixedCondition::new(15_000.0));
    evaluator.start_of_activity(&physics_run(1));

    evaluator.evaluate(&single("Rate", Series::from_values(&[3.0])));

    let recorder = evaluator.thresholds_trend();
    assert_eq!(recorder.bad("Rate_0")[0].range, Range::new(0.0, 6.5));
    assert_eq!(recorder.medium("Rate_0")[0].range, Range::new(1.5, 5.0));
}

#[test]
fn test_threshold_trend_grows_per_cycle() {
    let mut evaluator = TrendEvaluator::new(
        parameters(&[("thresholds:Rate", "-1,1"), ("thresholdsMode", "StdDeviation")]),
        FixedCondition::new(0.0),
    );
    evaluator.start_of_activity(&physics_run(1));
    assert_eq!(evaluator.config().mode, ThresholdsMode::StdDeviation);

    let mut generator = TrendGenerator::new(3);
    let mut series = generator.flat(50.0, 2.0, 3);
    for _ in 0..5 {
        series = TrendGenerator::with_last(series, 50.0);
        evaluator.evaluate(&single("Rate", series.clone()));
    }

    let bad = evaluator.thresholds_trend().bad("Rate_0");
    assert_eq!(bad.len(), 5);
    assert!(bad.windows(2).all(|w| w[1].x - w[0].x == CYCLE_S));
    assert!(bad.iter().all(|p| p.range.min < p.range.max));
}

#[test]
fn test_error_bars_widen_std_deviation_ranges() {
    let mut generator = TrendGenerator::new(5);
    let baseline = generator.flat_with_errors(50.0, 0.5, 1.0, 10);
    let next_x = baseline.last().map_or(RUN_START_S, |p| p.x + CYCLE_S);

    for (last_error, expected) in [(1.0, Quality::Bad), (3.0, Quality::Good)] {
        let mut evaluator = TrendEvaluator::new(
            parameters(&[("thresholds:Rate", "-2,2"), ("thresholdsMode", "StdDeviation")]),
            FixedCondition::new(0.0),
        );
        evaluator.start_of_activity(&physics_run(1));

        let mut series = baseline.clone();
        series.push(SeriesPoint::with_error(next_x, 53.0, last_error));
        assert_eq!(evaluator.evaluate(&single("Rate", series)), expected, "error {}", last_error);

        // Width is 4 sigma, and sigma is at least the error bar of the judged point
        let range = evaluator.thresholds_trend().bad("Rate_0")[0].range;
        assert!(range.max - range.min >= 4.0 * last_error);
    }
}

#[test]
fn test_threshold_trend_keyed_by_object_path() {
    let mut evaluator = TrendEvaluator::new(
        parameters(&[("thresholds:HitRate", "0,8")]),
        FixedCondition::new(0.0),
    );
    evaluator.start_of_activity(&physics_run(1));

    let object = MonitorObject::graph("DET/Trends/HitRate", Series::from_values(&[5.0]));
    let id = object.series_id(0);
    evaluator.evaluate(&batch(vec![object]));

    assert_eq!(id, "DET/Trends/HitRate_0");
    assert_eq!(evaluator.thresholds_trend().bad(&id).len(), 1);
    assert!(evaluator.thresholds_trend().bad("HitRate_0").is_empty());
}

#[test]
fn test_paired_canvas_prefers_error_graph() {
    let mut evaluator = TrendEvaluator::new(
        parameters(&[("thresholds:Mean", "0,10")]),
        FixedCondition::new(0.0),
    );
    evaluator.start_of_activity(&physics_run(1));

    // The plain graph is stale; the error-bar twin carries the latest value
    let plain = Series::from_values(&[5.0]);
    let with_errors = Series::from_values(&[5.0, 50.0]);
    let plots = batch(vec![MonitorObject::canvas("DET/Mean", paired_canvas(plain, with_errors))]);

    assert_eq!(evaluator.evaluate(&plots), Quality::Bad);
    assert_eq!(evaluator.qualities().len(), 1);
}

#[test]
fn test_missing_thresholds_never_block() {
    let mut evaluator = TrendEvaluator::new(
        parameters(&[("thresholds:Known", "0,10"), ("thresholds:Broken", "a,b")]),
        FixedCondition::new(0.0),
    );
    evaluator.start_of_activity(&physics_run(1));

    let plots = batch(vec![
        MonitorObject::graph("Known", Series::from_values(&[5.0])),
        MonitorObject::graph("Unknown", Series::from_values(&[1e9])),
        MonitorObject::graph("Broken", Series::from_values(&[0.0])),
    ]);

    // "Broken" degrades to (0,0): 0 is inside, so it is judged Good
    assert_eq!(evaluator.evaluate(&plots), Quality::Good);
    assert_eq!(evaluator.series_quality("Unknown_0"), None);
    assert_eq!(evaluator.series_quality("Broken_0"), Some(Quality::Good));
}

#[test]
fn test_overlay_after_bad_cycle() {
    let mut evaluator = TrendEvaluator::new(
        parameters(&[("thresholds:Rate", "0,10;2,8")]),
        FixedCondition::new(0.0),
    );
    evaluator.start_of_activity(&physics_run(1));

    let plots = single("Rate", Series::from_values(&[5.0, 5.0, 12.0]));
    assert_eq!(evaluator.evaluate(&plots), Quality::Bad);

    let overlays = evaluator.overlay(&plots["Rate"]);
    assert_eq!(overlays.len(), 1);
    let overlay = &overlays[0];
    assert!(overlay.series_color.is_some());
    assert_eq!(overlay.lines.len(), 4);
    // 0..12 widened by 10% of the span
    assert!((overlay.y_range.0 - -1.2).abs() < 1e-9);
    assert!((overlay.y_range.1 - 13.2).abs() < 1e-9);
}

struct CountingSource {
    fetches: usize,
    fail_after: usize,
}

impl ConditionSource for CountingSource {
    fn fetch(&mut self) -> Result<RateCalibration, ConditionError> {
        self.fetches += 1;
        if self.fetches > self.fail_after {
            return Err(ConditionError::Unavailable);
        }
        let start_ms = (RUN_START_S * 1000.0) as u64;
        RateCalibration::from_samples(vec![(start_ms, 10_000.0), (start_ms + 600_000, 20_000.0)])
    }
}

#[test]
fn test_cached_provider_drives_thresholds() {
    let source = CountingSource { fetches: 0, fail_after: 1 };
    let provider = CachedConditionProvider::new(source, FixedTime::new(0)).with_refresh_interval(60_000);
    let mut evaluator =
        TrendEvaluator::new(parameters(&[("thresholds:Rate", "10:0,5|20:0,8")]), provider);
    evaluator.start_of_activity(&physics_run(1));

    // Sample at run start: 10 kHz, range (0,5)
    let early = single("Rate", [SeriesPoint::new(RUN_START_S, 6.0)].into_iter().collect());
    assert_eq!(evaluator.evaluate(&early), Quality::Bad);

    // Five minutes in: 15 kHz, range (0,6.5)
    let mid = single("Rate", [SeriesPoint::new(RUN_START_S + 300.0, 6.0)].into_iter().collect());
    assert_eq!(evaluator.evaluate(&mid), Quality::Good);

    // Refresh fails: cached calibration keeps answering
    evaluator.provider_mut().clock_mut().advance(60_000);
    assert_eq!(evaluator.evaluate(&mid), Quality::Good);
    assert_eq!(evaluator.provider_mut().source_mut().fetches, 2);
}

#[test]
fn test_synthetic_condition_is_explicit() {
    // 1 point: 1 MHz, far above both anchors: (0,8)
    let mut evaluator = TrendEvaluator::new(
        parameters(&[("thresholds:Rate", "10:0,5|20:0,8")]),
        SyntheticDecayCondition,
    );
    evaluator.start_of_activity(&Activity::default());
    assert_eq!(evaluator.evaluate(&single("Rate", Series::from_values(&[7.0]))), Quality::Good);
}

#[test]
fn test_new_activity_starts_clean() {
    let mut evaluator = TrendEvaluator::new(
        parameters(&[("thresholds:Rate", "0,10")]),
        FixedCondition::new(0.0),
    );

    evaluator.start_of_activity(&physics_run(1));
    assert_eq!(evaluator.evaluate(&single("Rate", Series::from_values(&[50.0]))), Quality::Bad);

    evaluator.start_of_activity(&physics_run(2));
    assert_eq!(evaluator.aggregate(), Quality::Null);
    assert!(evaluator.thresholds_trend().is_empty());
    assert_eq!(evaluator.state().activity().run_number, 2);
}
