//! Tests for the batched Monte Carlo driver

use super::{matrix, sample_history};
use crate::error::SimulationError;
use crate::progress::SimulationProgress;
use crate::simulation::{SimulationConfig, run_simulation, run_simulation_with_progress};

#[test]
fn test_default_config() {
    let config = SimulationConfig::default();
    assert_eq!(config.trial_count, 25_000);
    assert_eq!(config.risk_free_rate, 0.02);
    assert_eq!(config.periods_per_year, 252);
    assert_eq!(config.batch_size, SimulationConfig::DEFAULT_BATCH_SIZE);
}

#[test]
fn test_result_set_has_one_entry_per_trial() {
    let returns = sample_history();
    // 250 trials = two full batches and a partial one
    let config = SimulationConfig::new(250, 0.02).with_seed(1);
    let results = run_simulation(&returns, &config).unwrap();

    assert_eq!(results.len(), 250);
    for trial in &results {
        assert_eq!(trial.weights.len(), 3);
        let sum: f64 = trial.weights.iter().sum();
        assert!((sum - 1.0).abs() <= 1e-9);
        assert!(trial.annualized_return.is_finite());
        assert!(trial.annualized_volatility.is_finite());
    }
}

#[test]
fn test_sortino_property_holds_for_every_trial() {
    let returns = sample_history();
    let config = SimulationConfig::new(500, 0.02).with_seed(99);
    let results = run_simulation(&returns, &config).unwrap();

    for trial in &results {
        if trial.downside_deviation == 0.0 {
            assert_eq!(trial.sortino_ratio, f64::INFINITY);
        } else {
            assert!(trial.sortino_ratio.is_finite());
            assert_eq!(
                trial.sortino_ratio,
                (trial.annualized_return - 0.02) / trial.downside_deviation
            );
        }
    }
}

#[test]
fn test_same_seed_same_results() {
    let returns = sample_history();
    let config = SimulationConfig::new(1_000, 0.02).with_seed(2024);

    let first = run_simulation(&returns, &config).unwrap();
    let second = run_simulation(&returns, &config).unwrap();
    assert_eq!(first, second);

    let other = run_simulation(&returns, &config.clone().with_seed(2025)).unwrap();
    assert_ne!(first, other);
}

/// Batch seeds do not depend on which worker runs a batch, so the pool size
/// never changes the result set
#[cfg(feature = "parallel")]
#[test]
fn test_thread_count_does_not_change_results() {
    let returns = sample_history();
    let config = SimulationConfig::new(1_050, 0.02)
        .with_seed(77)
        .with_batch_size(50);

    let run_on = |threads: usize| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
            .install(|| run_simulation(&returns, &config))
            .unwrap()
    };

    let single = run_on(1);
    let pooled = run_on(4);
    assert_eq!(single.len(), 1_050);
    assert_eq!(single, pooled);
    assert_eq!(single, run_simulation(&returns, &config).unwrap());
}

/// Batches draw from their own seeded generators, so a longer run starts
/// with exactly the trials of a shorter one
#[test]
fn test_longer_run_extends_shorter_run() {
    let returns = sample_history();
    let short = run_simulation(&returns, &SimulationConfig::new(150, 0.02).with_seed(5)).unwrap();
    let long = run_simulation(&returns, &SimulationConfig::new(400, 0.02).with_seed(5)).unwrap();

    assert_eq!(short.trials(), &long.trials()[..150]);
}

#[test]
fn test_invalid_configs_rejected() {
    let returns = sample_history();
    let base = SimulationConfig::new(10, 0.02);

    let cases = [
        SimulationConfig::new(0, 0.02),
        base.clone().with_batch_size(0),
        base.clone().with_periods_per_year(0),
        SimulationConfig::new(10, f64::NAN),
    ];
    for config in cases {
        let result = run_simulation(&returns, &config);
        assert!(
            matches!(result, Err(SimulationError::InvalidInput(_))),
            "{config:?} gave {result:?}"
        );
    }
}

#[test]
fn test_single_period_history_rejected() {
    let returns = matrix(&[("A", &[0.01]), ("B", &[0.02])]);
    let result = run_simulation(&returns, &SimulationConfig::new(10, 0.02));
    assert!(matches!(result, Err(SimulationError::InvalidInput(_))));
}

#[test]
fn test_nan_aborts_run() {
    let returns = matrix(&[("A", &[0.01, 0.02, f64::NAN]), ("B", &[0.0, 0.01, 0.02])]);
    let result = run_simulation(&returns, &SimulationConfig::new(50, 0.02));

    match result {
        Err(SimulationError::Numerical(msg)) => assert!(msg.contains("trial"), "{msg}"),
        other => panic!("expected numerical error, got {other:?}"),
    }
}

#[test]
fn test_progress_counts_every_trial() {
    let returns = sample_history();
    let progress = SimulationProgress::new(0);
    let config = SimulationConfig::new(321, 0.02).with_seed(8);

    let results = run_simulation_with_progress(&returns, &config, Some(&progress)).unwrap();
    assert_eq!(results.len(), 321);
    assert_eq!(progress.total(), 321);
    assert_eq!(progress.completed(), 321);
    assert_eq!(progress.fraction(), 1.0);
}

#[test]
fn test_cancelled_run_stops() {
    let returns = sample_history();
    let progress = SimulationProgress::new(0);
    progress.cancel();

    let result =
        run_simulation_with_progress(&returns, &SimulationConfig::new(1_000, 0.02), Some(&progress));
    assert_eq!(result, Err(SimulationError::Cancelled));
    assert_eq!(progress.completed(), 0);

    progress.reset(0);
    assert!(!progress.is_cancelled());
    let result =
        run_simulation_with_progress(&returns, &SimulationConfig::new(10, 0.02), Some(&progress));
    assert!(result.is_ok());
}
