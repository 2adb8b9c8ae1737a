//! Helpers for presenting a finished run: allocation tables and
//! cumulative-return series.

use crate::error::{Result, SimulationError};
use crate::model::WeightVector;

/// Weights below this share are left out of allocation tables
pub const DEFAULT_DISPLAY_THRESHOLD: f64 = 0.01;

/// One row of an allocation table
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationEntry<'a> {
    pub asset: &'a str,
    pub weight: f64,
}

/// Pair asset identifiers with their weights, keeping those above `min_weight`.
///
/// Rows stay in column order.
pub fn allocation_table<'a>(
    assets: &'a [String],
    weights: &WeightVector,
    min_weight: f64,
) -> Result<Vec<AllocationEntry<'a>>> {
    if assets.len() != weights.len() {
        return Err(SimulationError::DimensionMismatch {
            expected: assets.len(),
            actual: weights.len(),
        });
    }

    Ok(assets
        .iter()
        .zip(weights.iter())
        .filter(|(_, w)| *w > min_weight)
        .map(|(asset, weight)| AllocationEntry {
            asset: asset.as_str(),
            weight,
        })
        .collect())
}

/// Compounded return since the start of the series, one value per period
#[must_use]
pub fn cumulative_returns(period_returns: &[f64]) -> Vec<f64> {
    period_returns
        .iter()
        .scan(1.0, |growth, r| {
            *growth *= 1.0 + r;
            Some(*growth - 1.0)
        })
        .collect()
}
