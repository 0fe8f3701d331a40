//! Rate-Dependent Thresholds Example
//!
//! This example follows one monitored trend through a fill whose interaction
//! rate decays from 20 kHz to 10 kHz, and shows how the acceptance range
//! for the trend moves with it.
//!
//! ## What You'll Learn
//!
//! - How to configure thresholds anchored at reference rates
//! - How a calibration source feeds the rate at each sample time
//! - How to read back verdicts, applied ranges and the overlay
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example rate_dependent_thresholds
//! ```

use trendguard_core::{
    time::FixedTime, traits::ConditionSource, Activity, CachedConditionProvider, ConditionError,
    MonitorObject, Parameters, PlotBatch, RateCalibration, Series, SeriesPoint, TrendEvaluator,
};

const FILL_START_S: f64 = 1_700_000_000.0;
const CYCLE_S: f64 = 60.0;
const CYCLES: usize = 12;

/// Linear decay of the interaction rate over the fill
struct DecayingFill;

impl ConditionSource for DecayingFill {
    fn fetch(&mut self) -> Result<RateCalibration, ConditionError> {
        let start_ms = (FILL_START_S * 1000.0) as u64;
        let end_ms = start_ms + (CYCLES as u64) * (CYCLE_S as u64) * 1000;
        RateCalibration::from_samples(vec![(start_ms, 20_000.0), (end_ms, 10_000.0)])
    }
}

fn main() {
    println!("TrendGuard Rate-Dependent Thresholds Example");
    println!("============================================\n");

    // Hit rate per chamber: (0,5) good enough at 10 kHz, (0,8) at 20 kHz
    let mut parameters = Parameters::new();
    parameters.set("thresholds:HitRate", "10:0,5;0,4|20:0,8;0,6");

    let provider = CachedConditionProvider::new(DecayingFill, FixedTime::new(0));
    let mut evaluator = TrendEvaluator::new(parameters, provider);
    evaluator.start_of_activity(&Activity::new(1, "PHYSICS", "PbPb"));

    // The hit rate falls more slowly than the interaction rate
    let mut series = Series::default();
    for cycle in 0..CYCLES {
        let x = FILL_START_S + cycle as f64 * CYCLE_S;
        let y = 7.0 - 0.15 * cycle as f64;
        series.push(SeriesPoint::new(x, y));

        let object = MonitorObject::graph("DET/Trends/HitRate", series.clone());
        let id = object.series_id(0);
        let mut batch = PlotBatch::new();
        batch.insert("HitRate".into(), object);
        let verdict = evaluator.evaluate(&batch);

        let applied = evaluator.thresholds_trend().bad(&id);
        let range = applied.last().map(|p| p.range);
        match range {
            Some(r) => println!(
                "  cycle {:>2}  value {:>5.2}  Bad range [{:.2}, {:.2}]  → {}",
                cycle, y, r.min, r.max, verdict
            ),
            None => println!("  cycle {:>2}  value {:>5.2}  no thresholds  → {}", cycle, y, verdict),
        }
    }

    println!("\nOverlay for the last cycle:");
    println!("---------------------------");
    let object = MonitorObject::graph("DET/Trends/HitRate", series);
    for overlay in evaluator.overlay(&object) {
        println!("  series {} (color {:?})", overlay.series_id, overlay.series_color);
        for line in &overlay.lines {
            println!("    {:?} {:?} line with {} vertices", line.color, line.style, line.points.len());
        }
        println!("    y axis [{:.2}, {:.2}]", overlay.y_range.0, overlay.y_range.1);
    }

    evaluator.end_of_activity();
}
