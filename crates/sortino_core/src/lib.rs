//! Sortino-ratio portfolio search library
//!
//! This crate samples random long-only allocations over a fixed set of assets,
//! scores each one against a matrix of historical per-period returns, and
//! picks the allocation with the highest Sortino ratio. It provides:
//! - Renormalized-uniform weight sampling
//! - Annualized return, downside deviation, Sortino ratio and volatility
//! - A seeded, batched Monte Carlo driver (parallel with the `parallel` feature)
//! - First-seen-wins selection of the best trial
//!
//! The crate never prints or logs; every failure is a [`SimulationError`].
//!
//! ```ignore
//! use sortino_core::{ReturnMatrix, SimulationConfig, run_simulation, select_best};
//!
//! let returns = ReturnMatrix::from_columns(assets, columns)?;
//! let config = SimulationConfig::new(25_000, 0.02).with_seed(7);
//! let results = run_simulation(&returns, &config)?;
//! let best = select_best(&results)?;
//! println!("sortino {:.2}", best.sortino_ratio);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod evaluate;
pub mod progress;
pub mod report;
pub mod sampler;
pub mod select;
pub mod simulation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{Result, SimulationError};
pub use evaluate::{
    AssetMeans, PortfolioEvaluation, TRADING_DAYS_PER_YEAR, annualized_mean_returns, evaluate,
    evaluate_detailed, evaluate_with_means, portfolio_period_returns,
};
pub use model::{
    BestPortfolio, FrontierPoint, PortfolioMetrics, ResultSet, ReturnMatrix, TrialResult,
    WeightVector,
};
pub use progress::SimulationProgress;
pub use sampler::sample_weights;
pub use select::select_best;
pub use simulation::{SimulationConfig, run_simulation, run_simulation_with_progress};
