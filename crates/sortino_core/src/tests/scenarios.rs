//! End-to-end scenarios on small hand-built histories

use super::{matrix, weights};
use crate::error::SimulationError;
use crate::evaluate::evaluate;
use crate::model::{ResultSet, ReturnMatrix, TrialResult};
use crate::select::select_best;
use crate::simulation::{SimulationConfig, run_simulation};

/// Asset X earns a constant 1% per period, asset Y loses 1% every period.
/// Everything on X never dips below the target, so its ratio is unbounded
/// and it wins selection.
#[test]
fn test_riskless_asset_is_unbounded_and_selected() {
    let returns = matrix(&[
        ("X", &[0.01, 0.01, 0.01, 0.01]),
        ("Y", &[-0.01, -0.01, -0.01, -0.01]),
    ]);

    let all_x = evaluate(&returns, &weights(&[1.0, 0.0]), 252, 0.02).unwrap();
    assert_eq!(all_x.downside_deviation, 0.0);
    assert_eq!(all_x.sortino_ratio, f64::INFINITY);

    let mostly_y = weights(&[0.2, 0.8]);
    let mixed = evaluate(&returns, &mostly_y, 252, 0.02).unwrap();
    assert!(mixed.downside_deviation > 0.0);
    assert!(mixed.sortino_ratio.is_finite());

    let results = ResultSet::from_trials(vec![
        TrialResult::new(mixed, mostly_y),
        TrialResult::new(all_x, weights(&[1.0, 0.0])),
    ]);
    let best = select_best(&results).unwrap();
    assert_eq!(best.index, 1);
    assert_eq!(best.weights().as_slice(), &[1.0, 0.0]);
    assert!(best.is_unbounded());
}

/// A single asset forces the weight to 1, so the run's only trial must match
/// the closed-form statistics of that asset bit for bit.
#[test]
fn test_single_asset_single_trial() {
    let data = [0.012, -0.008, 0.004, 0.021, -0.015, 0.003];
    let returns = matrix(&[("SPY", &data)]);
    let config = SimulationConfig::new(1, 0.02).with_seed(17);

    let results = run_simulation(&returns, &config).unwrap();
    assert_eq!(results.len(), 1);
    let trial = &results.trials()[0];
    assert_eq!(trial.weights.as_slice(), &[1.0]);

    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    assert_eq!(trial.annualized_return, mean * 252.0);

    let var = data.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    assert_eq!(trial.annualized_volatility, var.sqrt() * 252f64.sqrt());

    let best = select_best(&results).unwrap();
    assert_eq!(best.index, 0);
}

#[test]
fn test_invalid_inputs_fail_fast() {
    let returns = matrix(&[("A", &[0.01, 0.02]), ("B", &[0.0, -0.01])]);

    let zero_trials = run_simulation(&returns, &SimulationConfig::new(0, 0.02));
    assert!(matches!(zero_trials, Err(SimulationError::InvalidInput(_))));

    let empty = ReturnMatrix::from_rows(vec!["A".into()], vec![]);
    assert!(matches!(empty, Err(SimulationError::InvalidInput(_))));

    let wrong_len = evaluate(&returns, &weights(&[0.2, 0.3, 0.5]), 252, 0.02);
    assert!(matches!(
        wrong_len,
        Err(SimulationError::DimensionMismatch {
            expected: 2,
            actual: 3
        })
    ));
}

/// Two copies of the same asset behave like the asset alone, whatever the split
#[test]
fn test_identical_assets_are_interchangeable() {
    let data = [0.010, -0.004, 0.006, -0.012, 0.003, 0.008, -0.002, 0.004];
    let single = matrix(&[("A", &data)]);
    let twin = matrix(&[("A", &data), ("B", &data)]);

    let alone = evaluate(&single, &weights(&[1.0]), 252, 0.02).unwrap();
    for split in [[0.5, 0.5], [0.1, 0.9], [0.73, 0.27], [0.0, 1.0]] {
        let m = evaluate(&twin, &weights(&split), 252, 0.02).unwrap();

        let close = |a: f64, b: f64| (a - b).abs() <= 1e-12 * a.abs().max(1.0);
        assert!(close(m.annualized_return, alone.annualized_return), "{split:?}");
        assert!(
            close(m.annualized_volatility, alone.annualized_volatility),
            "{split:?}"
        );
        assert!(close(m.downside_deviation, alone.downside_deviation), "{split:?}");
        assert!(
            (m.sortino_ratio - alone.sortino_ratio).abs() <= 1e-9,
            "{split:?}: {} vs {}",
            m.sortino_ratio,
            alone.sortino_ratio
        );
    }
}
