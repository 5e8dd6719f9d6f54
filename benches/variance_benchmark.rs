//! Benchmark for explained variance chart layout and rendering.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pca_viz::prelude::*;

/// Geometrically decaying ratios that sum to one.
fn decaying_ratios(n: usize) -> Vec<f64> {
    let raw: Vec<f64> = (0..n).map(|i| 0.7f64.powi(i as i32)).collect();
    let total: f64 = raw.iter().sum();
    raw.iter().map(|r| r / total).collect()
}

fn variance_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("variance_chart");

    for size in [5, 20, 100, 500] {
        let ratios = decaying_ratios(size);

        group.bench_with_input(BenchmarkId::new("summary", size), &size, |b, _| {
            b.iter(|| VarianceSummary::from_ratios(black_box(&ratios), 0.8).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("render", size), &size, |b, _| {
            b.iter(|| {
                let chart = VarianceChart::new()
                    .ratios(black_box(&ratios))
                    .dimensions(800, 400)
                    .build()
                    .unwrap();

                chart.to_framebuffer().unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, variance_benchmark);
criterion_main!(benches);
