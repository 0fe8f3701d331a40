//! Pre-built monitoring scenarios
//!
//! Each scenario bundles a configuration, the cycles a host would feed and
//! the aggregate verdict expected after each cycle.

use trendguard_core::{MonitorObject, Parameters, PlotBatch, Quality};

use super::{batch, parameters, single, sliced_canvas, TrendGenerator};

/// Scenario with expectations
pub struct TestScenario {
    pub name: &'static str,
    pub parameters: Parameters,
    pub cycles: Vec<(PlotBatch, Quality)>,
}

/// Pre-built scenario definitions
pub struct Scenarios;

impl Scenarios {
    /// Efficiency trend with fixed limits, degrading over three cycles
    pub fn degrading_efficiency() -> TestScenario {
        let mut generator = TrendGenerator::new(7);
        let baseline = generator.flat(0.95, 0.005, 20);

        TestScenario {
            name: "degrading_efficiency",
            parameters: parameters(&[("thresholds:Efficiency", "0.8,1.0;0.9,1.0")]),
            cycles: vec![
                (
                    single("MCH/Trends/Efficiency", TrendGenerator::with_last(baseline.clone(), 0.95)),
                    Quality::Good,
                ),
                (
                    single("MCH/Trends/Efficiency", TrendGenerator::with_last(baseline.clone(), 0.85)),
                    Quality::Medium,
                ),
                (
                    single("MCH/Trends/Efficiency", TrendGenerator::with_last(baseline, 0.5)),
                    Quality::Bad,
                ),
            ],
        }
    }

    /// Occupancy per chamber on a sliced canvas; one chamber drifts away
    pub fn drifting_chamber() -> TestScenario {
        let mut generator = TrendGenerator::new(11);
        let chambers: Vec<_> = (0..4).map(|_| generator.flat(100.0, 1.0, 10)).collect();
        let mut drifted = chambers.clone();
        drifted[2] = TrendGenerator::with_last(drifted[2].clone(), 130.0);

        TestScenario {
            name: "drifting_chamber",
            parameters: parameters(&[
                ("thresholds:Occupancy", "-0.2,0.2;-0.1,0.1"),
                ("thresholdsMode", "Mean"),
                ("sliceTrend", "true"),
            ]),
            cycles: vec![
                (
                    batch(vec![MonitorObject::canvas("DET/Occupancy", sliced_canvas(chambers))]),
                    Quality::Good,
                ),
                (
                    batch(vec![MonitorObject::canvas("DET/Occupancy", sliced_canvas(drifted))]),
                    Quality::Bad,
                ),
            ],
        }
    }
}
