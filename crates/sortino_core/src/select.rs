use crate::error::{Result, SimulationError};
use crate::model::{BestPortfolio, ResultSet};

/// Pick the trial with the highest Sortino ratio.
///
/// A later trial replaces the current best only when its ratio is strictly
/// greater, so ties (including several unbounded trials) go to the earliest
/// one in result-set order.
pub fn select_best(results: &ResultSet) -> Result<BestPortfolio<'_>> {
    let mut trials = results.iter().enumerate();
    let (first_idx, first) = trials.next().ok_or(SimulationError::EmptyResult)?;

    let (index, trial) = trials.fold((first_idx, first), |best, (idx, trial)| {
        if trial.sortino_ratio > best.1.sortino_ratio {
            (idx, trial)
        } else {
            best
        }
    });

    Ok(BestPortfolio { index, trial })
}
