//! Monte Carlo driver: sample allocations, evaluate them, collect the results.
//!
//! Trials are split into fixed-size batches. A master generator seeded from
//! [`SimulationConfig::seed`] hands out one seed per batch, and every batch
//! draws from its own `SmallRng`. Batches are concatenated in index order, so
//! the result set depends only on the inputs and the batch size, never on the
//! number of worker threads or on whether the `parallel` feature is enabled.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::evaluate::{
    AssetMeans, TRADING_DAYS_PER_YEAR, annualized_mean_returns, check_periods_per_year,
    check_risk_free_rate, evaluate_with_means,
};
use crate::model::{ResultSet, ReturnMatrix, TrialResult};
use crate::progress::SimulationProgress;
use crate::sampler::sample_weights;

/// Parameters of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of random allocations to evaluate
    pub trial_count: usize,
    /// Annualized risk-free rate, also the minimum acceptable return
    pub risk_free_rate: f64,
    pub periods_per_year: u32,
    /// Master seed; equal seeds give equal result sets
    pub seed: u64,
    /// Trials per independently seeded batch
    pub batch_size: usize,
}

impl SimulationConfig {
    pub const DEFAULT_BATCH_SIZE: usize = 100;

    #[must_use]
    pub fn new(trial_count: usize, risk_free_rate: f64) -> Self {
        Self {
            trial_count,
            risk_free_rate,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_periods_per_year(mut self, periods_per_year: u32) -> Self {
        self.periods_per_year = periods_per_year;
        self
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.trial_count == 0 {
            return Err(SimulationError::invalid("trial count must be positive"));
        }
        if self.batch_size == 0 {
            return Err(SimulationError::invalid("batch size must be positive"));
        }
        check_risk_free_rate(self.risk_free_rate)?;
        check_periods_per_year(self.periods_per_year)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trial_count: 25_000,
            risk_free_rate: 0.02,
            periods_per_year: TRADING_DAYS_PER_YEAR,
            seed: 0,
            batch_size: Self::DEFAULT_BATCH_SIZE,
        }
    }
}

/// Run `config.trial_count` trials against `returns`
pub fn run_simulation(returns: &ReturnMatrix, config: &SimulationConfig) -> Result<ResultSet> {
    run_simulation_with_progress(returns, config, None)
}

/// Run the simulation, reporting each finished trial to `progress` and
/// stopping with [`SimulationError::Cancelled`] once it is cancelled
pub fn run_simulation_with_progress(
    returns: &ReturnMatrix,
    config: &SimulationConfig,
    progress: Option<&SimulationProgress>,
) -> Result<ResultSet> {
    config.validate()?;
    if returns.period_count() < 2 {
        return Err(SimulationError::invalid(format!(
            "volatility needs at least two periods, got {}",
            returns.period_count()
        )));
    }

    if let Some(p) = progress {
        p.begin(config.trial_count);
    }

    let means = annualized_mean_returns(returns, config.periods_per_year)?;

    let num_batches = config.trial_count.div_ceil(config.batch_size);
    let mut master = SmallRng::seed_from_u64(config.seed);
    let batch_seeds: Vec<u64> = (0..num_batches).map(|_| master.next_u64()).collect();

    let run_batch = |i: usize| {
        let batch = BatchContext {
            returns,
            means: &means,
            config,
            progress,
            first_trial: i * config.batch_size,
        };
        let batch_len = if i == num_batches - 1 {
            config.trial_count - i * config.batch_size
        } else {
            config.batch_size
        };
        batch.run(batch_seeds[i], batch_len)
    };

    #[cfg(feature = "parallel")]
    let batches = (0..num_batches)
        .into_par_iter()
        .map(run_batch)
        .collect::<Result<Vec<_>>>()?;
    #[cfg(not(feature = "parallel"))]
    let batches = (0..num_batches)
        .map(run_batch)
        .collect::<Result<Vec<_>>>()?;

    Ok(ResultSet::from_trials(batches.into_iter().flatten().collect()))
}

/// Read-only state shared by the trials of one batch
struct BatchContext<'a> {
    returns: &'a ReturnMatrix,
    means: &'a AssetMeans,
    config: &'a SimulationConfig,
    progress: Option<&'a SimulationProgress>,
    first_trial: usize,
}

impl BatchContext<'_> {
    fn run(&self, seed: u64, len: usize) -> Result<Vec<TrialResult>> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut trials = Vec::with_capacity(len);

        for offset in 0..len {
            if self.progress.is_some_and(SimulationProgress::is_cancelled) {
                return Err(SimulationError::Cancelled);
            }

            let trial = self.first_trial + offset;
            let weights = sample_weights(self.returns.asset_count(), &mut rng)
                .map_err(|e| annotate(e, trial))?;
            let metrics = evaluate_with_means(
                self.returns,
                self.means,
                &weights,
                self.config.risk_free_rate,
            )
            .map_err(|e| annotate(e, trial))?;
            trials.push(TrialResult::new(metrics, weights));

            if let Some(p) = self.progress {
                p.increment();
            }
        }

        Ok(trials)
    }
}

fn annotate(err: SimulationError, trial: usize) -> SimulationError {
    match err {
        SimulationError::Numerical(msg) => {
            SimulationError::Numerical(format!("trial {trial}: {msg}"))
        }
        other => other,
    }
}
