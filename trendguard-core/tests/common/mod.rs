//! Common test utilities and data generators for integration tests
//!
//! This module provides:
//! - Trend generators with deterministic noise
//! - Batch and parameter builders
//! - Pre-built monitoring scenarios with expected verdicts

#![allow(dead_code)]

use trendguard_core::{
    Activity, Canvas, MonitorObject, Parameters, PlotBatch, Primitive, Series, SeriesPoint,
};

pub mod scenarios;

/// Start of the generated trends (seconds since epoch)
pub const RUN_START_S: f64 = 1_700_000_000.0;

/// Seconds between two trend points
pub const CYCLE_S: f64 = 60.0;

/// Deterministic trend generator
pub struct TrendGenerator {
    seed: u32,
}

impl TrendGenerator {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// `points` samples around `level` with uniform noise of `noise` amplitude
    pub fn flat(&mut self, level: f64, noise: f64, points: usize) -> Series {
        (0..points)
            .map(|i| {
                let y = level + self.random_noise(noise);
                SeriesPoint::new(RUN_START_S + i as f64 * CYCLE_S, y)
            })
            .collect()
    }

    /// Like [`flat`](Self::flat) but every point carries `error`
    pub fn flat_with_errors(&mut self, level: f64, noise: f64, error: f64, points: usize) -> Series {
        (0..points)
            .map(|i| {
                let y = level + self.random_noise(noise);
                SeriesPoint::with_error(RUN_START_S + i as f64 * CYCLE_S, y, error)
            })
            .collect()
    }

    /// Append a final point at `value` after the existing points
    pub fn with_last(mut series: Series, value: f64) -> Series {
        let x = series.last().map_or(RUN_START_S, |p| p.x + CYCLE_S);
        series.push(SeriesPoint::new(x, value));
        series
    }

    fn random_float(&mut self) -> f64 {
        // Numerical Recipes LCG
        self.seed = self.seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (self.seed >> 8) as f64 / (1u32 << 24) as f64
    }

    fn random_noise(&mut self, amplitude: f64) -> f64 {
        (self.random_float() * 2.0 - 1.0) * amplitude
    }
}

/// Batch holding the given monitor objects
pub fn batch(objects: Vec<MonitorObject>) -> PlotBatch {
    objects.into_iter().map(|o| (o.name().to_string(), o)).collect()
}

/// Batch with one bare graph
pub fn single(name: &str, series: Series) -> PlotBatch {
    batch(vec![MonitorObject::graph(name, series)])
}

/// Canvas with one pad per series, each holding a `Graph` primitive
pub fn sliced_canvas(series: Vec<Series>) -> Canvas {
    series
        .into_iter()
        .enumerate()
        .fold(Canvas::new(), |canvas, (i, s)| {
            canvas.with(Primitive::pad(&format!("pad_{}", i), vec![Primitive::graph("Graph", s)]))
        })
}

/// Canvas with a plain graph followed by its error-bar twin
pub fn paired_canvas(plain: Series, with_errors: Series) -> Canvas {
    Canvas::new()
        .with(Primitive::graph("Graph", plain))
        .with(Primitive::other("Axis"))
        .with(Primitive::graph("Graph", with_errors))
}

/// Global parameters from key/value pairs
pub fn parameters(entries: &[(&str, &str)]) -> Parameters {
    let mut parameters = Parameters::new();
    for (key, value) in entries {
        parameters.set(key, value);
    }
    parameters
}

/// A physics run
pub fn physics_run(run_number: u32) -> Activity {
    Activity::new(run_number, "PHYSICS", "pp")
}
