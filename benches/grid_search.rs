//! Benchmarks for the SARIMA grid search and the full cascade.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use utility_forecast::core::{ForecastParams, TimeSeries};
use utility_forecast::engine::ForecastEngine;
use utility_forecast::models::arima::{SarimaGridConfig, SarimaGridSearch};

fn generate_monthly(n: usize) -> TimeSeries {
    let dates: Vec<String> = (0..n)
        .map(|i| format!("{}-{:02}-01", 2000 + i / 12, i % 12 + 1))
        .collect();
    let values = (0..n)
        .map(|i| {
            let t = i as f64;
            400.0 + 0.8 * t
                + 90.0 * (2.0 * std::f64::consts::PI * t / 12.0).cos()
                + 6.0 * (t * 1.9).sin()
        })
        .collect();
    TimeSeries::from_iso(&dates, values).unwrap()
}

fn bench_grid_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("sarima_grid");

    for size in [24, 36, 60, 120].iter() {
        let series = generate_monthly(*size);

        group.bench_with_input(BenchmarkId::new("parallel", size), size, |b, _| {
            let search = SarimaGridSearch::new(SarimaGridConfig::default());
            b.iter(|| search.search(black_box(&series)))
        });

        group.bench_with_input(BenchmarkId::new("sequential", size), size, |b, _| {
            let search = SarimaGridSearch::new(SarimaGridConfig::default().with_parallel(false));
            b.iter(|| search.search(black_box(&series)))
        });
    }

    group.finish();
}

fn bench_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("cascade");
    let engine = ForecastEngine::default();
    let params = ForecastParams::new(6, 0.95).unwrap();

    for size in [5, 15, 36].iter() {
        let series = generate_monthly(*size);
        group.bench_with_input(BenchmarkId::new("fit", size), size, |b, _| {
            b.iter(|| engine.fit(black_box(&series), &params))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grid_search, bench_cascade);
criterion_main!(benches);
