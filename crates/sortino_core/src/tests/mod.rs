//! Tests for the sortino_core search engine
//!
//! Tests are organized by topic:
//! - `model` - Return matrix and weight vector construction
//! - `sampler` - Random allocation sampling
//! - `evaluate` - Per-allocation metrics
//! - `simulation` - Batched Monte Carlo driver, seeding, progress, cancellation
//! - `select` - Best-trial selection and tie-breaking
//! - `scenarios` - End-to-end scenarios on small hand-built histories
//! - `report` - Allocation tables and cumulative returns

mod scenarios;
mod select;
mod simulation;

use crate::model::{ReturnMatrix, WeightVector};

/// Build a matrix from named columns
pub(crate) fn matrix(columns: &[(&str, &[f64])]) -> ReturnMatrix {
    ReturnMatrix::from_columns(
        columns.iter().map(|(name, _)| name.to_string()).collect(),
        columns.iter().map(|(_, values)| values.to_vec()).collect(),
    )
    .unwrap()
}

pub(crate) fn weights(values: &[f64]) -> WeightVector {
    WeightVector::new(values.to_vec()).unwrap()
}

/// A few assets with mixed-sign daily returns over 12 periods
pub(crate) fn sample_history() -> ReturnMatrix {
    matrix(&[
        (
            "SPY",
            &[
                0.010, -0.004, 0.006, -0.012, 0.003, 0.008, -0.002, 0.004, -0.007, 0.011, 0.001,
                -0.003,
            ],
        ),
        (
            "TLT",
            &[
                -0.002, 0.003, -0.001, 0.004, 0.000, -0.003, 0.002, 0.001, 0.003, -0.004, 0.002,
                0.001,
            ],
        ),
        (
            "GLD",
            &[
                0.004, 0.002, -0.006, 0.001, 0.005, -0.002, 0.003, -0.001, 0.002, 0.000, -0.003,
                0.006,
            ],
        ),
    ])
}
