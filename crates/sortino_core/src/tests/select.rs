//! Tests for best-trial selection

use super::weights;
use crate::error::SimulationError;
use crate::model::{PortfolioMetrics, ResultSet, TrialResult};
use crate::select::select_best;

fn trial(sortino_ratio: f64, w: &[f64]) -> TrialResult {
    TrialResult::new(
        PortfolioMetrics {
            annualized_return: 0.05,
            annualized_volatility: 0.1,
            downside_deviation: if sortino_ratio.is_infinite() { 0.0 } else { 0.05 },
            sortino_ratio,
        },
        weights(w),
    )
}

#[test]
fn test_selects_maximum() {
    let results = ResultSet::from_trials(vec![
        trial(0.3, &[1.0, 0.0]),
        trial(1.7, &[0.5, 0.5]),
        trial(-0.4, &[0.0, 1.0]),
        trial(1.2, &[0.2, 0.8]),
    ]);

    let best = select_best(&results).unwrap();
    assert_eq!(best.index, 1);
    assert_eq!(best.sortino_ratio, 1.7);
    assert_eq!(best.weights().as_slice(), &[0.5, 0.5]);
    assert!(!best.is_unbounded());
    assert!(std::ptr::eq(best.trial, &results.trials()[1]));
}

#[test]
fn test_ties_go_to_first() {
    let results = ResultSet::from_trials(vec![
        trial(0.5, &[1.0, 0.0]),
        trial(0.9, &[0.3, 0.7]),
        trial(0.9, &[0.6, 0.4]),
    ]);
    assert_eq!(select_best(&results).unwrap().index, 1);
}

#[test]
fn test_first_unbounded_wins() {
    let results = ResultSet::from_trials(vec![
        trial(2.0, &[1.0, 0.0]),
        trial(f64::INFINITY, &[0.3, 0.7]),
        trial(5.0, &[0.6, 0.4]),
        trial(f64::INFINITY, &[0.1, 0.9]),
    ]);

    let best = select_best(&results).unwrap();
    assert_eq!(best.index, 1);
    assert!(best.is_unbounded());
}

#[test]
fn test_all_negative() {
    let results = ResultSet::from_trials(vec![
        trial(-3.0, &[1.0, 0.0]),
        trial(-0.2, &[0.3, 0.7]),
        trial(-1.0, &[0.6, 0.4]),
    ]);
    assert_eq!(select_best(&results).unwrap().index, 1);
}

#[test]
fn test_empty_result_set() {
    let results = ResultSet::default();
    assert_eq!(select_best(&results), Err(SimulationError::EmptyResult));
}
