//! Criterion benchmarks for sortino_core
//!
//! Run with: cargo bench -p sortino_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sortino_core::{
    ReturnMatrix, SimulationConfig, annualized_mean_returns, evaluate_with_means, run_simulation,
    sample_weights, select_best,
};

/// Synthetic daily returns: `years` of trading days for `assets` assets
fn synthetic_history(assets: usize, years: usize) -> ReturnMatrix {
    let mut rng = SmallRng::seed_from_u64(1);
    let periods = years * 252;
    let names = (0..assets).map(|i| format!("ASSET{i}")).collect();
    let columns = (0..assets)
        .map(|_| {
            (0..periods)
                .map(|_| rng.random_range(-0.03..0.03) + 0.0003)
                .collect()
        })
        .collect();
    ReturnMatrix::from_columns(names, columns).unwrap()
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for years in [1, 5, 20] {
        let returns = synthetic_history(10, years);
        let means = annualized_mean_returns(&returns, 252).unwrap();
        let weights = sample_weights(10, &mut SmallRng::seed_from_u64(2)).unwrap();

        group.bench_with_input(BenchmarkId::new("years", years), &years, |b, _| {
            b.iter(|| evaluate_with_means(black_box(&returns), &means, &weights, 0.02))
        });
    }

    group.finish();
}

fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_simulation");
    group.sample_size(10);

    let returns = synthetic_history(10, 10);
    for trials in [1_000, 10_000] {
        let config = SimulationConfig::new(trials, 0.02).with_seed(3);
        group.bench_with_input(BenchmarkId::new("trials", trials), &trials, |b, _| {
            b.iter(|| {
                let results = run_simulation(black_box(&returns), &config).unwrap();
                select_best(&results).unwrap().index
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_simulation);
criterion_main!(benches);
