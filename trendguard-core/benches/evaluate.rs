//! Evaluation cycle benchmarks
//!
//! Run with: cargo bench -p trendguard-core --bench evaluate

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use trendguard_core::{
    Activity, Canvas, FixedCondition, MonitorObject, Parameters, PlotBatch, Primitive, Series,
    ThresholdSpec, TrendEvaluator,
};

fn trend(points: usize) -> Series {
    let values: Vec<f64> = (0..points).map(|i| 100.0 + (i % 7) as f64 * 0.5).collect();
    Series::from_values(&values)
}

fn sliced_batch(pads: usize, points: usize) -> PlotBatch {
    let canvas = (0..pads).fold(Canvas::new(), |canvas, i| {
        canvas.with(Primitive::pad(&format!("pad_{}", i), vec![Primitive::graph("Graph", trend(points))]))
    });
    let mut batch = PlotBatch::new();
    batch.insert("Occupancy".into(), MonitorObject::canvas("DET/Occupancy", canvas));
    batch
}

/// Threshold resolution alone, for growing calibration tables
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for anchors in [1usize, 4, 16, 64] {
        let raw: Vec<String> = (1..=anchors)
            .map(|i| format!("{}:0,{};1,{}", i * 10, i * 2, i))
            .collect();
        let spec = ThresholdSpec::parse(&raw.join("|"), "Rate");

        group.bench_with_input(BenchmarkId::from_parameter(anchors), &spec, |b, spec| {
            b.iter(|| spec.resolve(black_box(anchors as f64 * 5_000.0)))
        });
    }
    group.finish();
}

/// One full cycle on a sliced canvas in each thresholds mode
fn bench_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation_cycle");

    for (mode, bounds) in [
        ("ExpectedRange", "10:90,110;95,105|20:80,120;90,110"),
        ("Mean", "-0.2,0.2;-0.1,0.1"),
        ("StdDeviation", "-5,5;-3,3"),
    ] {
        let mut parameters = Parameters::new();
        parameters.set("thresholds:Occupancy", bounds);
        parameters.set("thresholdsMode", mode);
        parameters.set("sliceTrend", "true");
        parameters.set("nPointsForAverage", "50");

        let batch = sliced_batch(16, 500);
        group.throughput(Throughput::Elements(16));

        let mut evaluator = TrendEvaluator::new(parameters, FixedCondition::new(15_000.0));
        evaluator.start_of_activity(&Activity::new(1, "PHYSICS", "pp"));

        group.bench_with_input(BenchmarkId::from_parameter(mode), &batch, |b, batch| {
            b.iter(|| evaluator.evaluate(black_box(batch)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_cycle);
criterion_main!(benches);
