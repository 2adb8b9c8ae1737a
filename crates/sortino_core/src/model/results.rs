//! Trial records and the result set produced by a simulation run

use serde::{Deserialize, Serialize};

use super::weights::WeightVector;

/// Summary statistics of one allocation over the return history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub downside_deviation: f64,
    /// `f64::INFINITY` when no period fell below the target return
    pub sortino_ratio: f64,
}

impl PortfolioMetrics {
    /// True when the ratio is the unbounded sentinel (no downside observed)
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.sortino_ratio == f64::INFINITY
    }
}

/// One sampled allocation together with its metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub downside_deviation: f64,
    pub sortino_ratio: f64,
    pub weights: WeightVector,
}

impl TrialResult {
    #[must_use]
    pub fn new(metrics: PortfolioMetrics, weights: WeightVector) -> Self {
        Self {
            annualized_return: metrics.annualized_return,
            annualized_volatility: metrics.annualized_volatility,
            downside_deviation: metrics.downside_deviation,
            sortino_ratio: metrics.sortino_ratio,
            weights,
        }
    }

    #[must_use]
    pub fn metrics(&self) -> PortfolioMetrics {
        PortfolioMetrics {
            annualized_return: self.annualized_return,
            annualized_volatility: self.annualized_volatility,
            downside_deviation: self.downside_deviation,
            sortino_ratio: self.sortino_ratio,
        }
    }

    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.sortino_ratio == f64::INFINITY
    }
}

/// Risk/return coordinates of a trial, for scatter plots of the simulated set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrontierPoint {
    pub volatility: f64,
    pub annualized_return: f64,
    pub sortino_ratio: f64,
}

/// All trials of a simulation run, in batch order then intra-batch order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    trials: Vec<TrialResult>,
}

impl ResultSet {
    #[must_use]
    pub fn from_trials(trials: Vec<TrialResult>) -> Self {
        Self { trials }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TrialResult> {
        self.trials.get(index)
    }

    #[must_use]
    pub fn trials(&self) -> &[TrialResult] {
        &self.trials
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrialResult> {
        self.trials.iter()
    }

    pub fn frontier(&self) -> impl Iterator<Item = FrontierPoint> + '_ {
        self.trials.iter().map(|t| FrontierPoint {
            volatility: t.annualized_volatility,
            annualized_return: t.annualized_return,
            sortino_ratio: t.sortino_ratio,
        })
    }

    #[must_use]
    pub fn into_trials(self) -> Vec<TrialResult> {
        self.trials
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a TrialResult;
    type IntoIter = std::slice::Iter<'a, TrialResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.trials.iter()
    }
}

/// View of the winning trial inside a [`ResultSet`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestPortfolio<'a> {
    /// Position of the trial in the result set
    pub index: usize,
    pub trial: &'a TrialResult,
}

impl BestPortfolio<'_> {
    /// The winner never saw a below-target period.
    ///
    /// Usually a sign that the history is too short to measure downside risk
    /// rather than a genuinely riskless allocation.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.trial.is_unbounded()
    }

    #[must_use]
    pub fn weights(&self) -> &WeightVector {
        &self.trial.weights
    }
}

impl std::ops::Deref for BestPortfolio<'_> {
    type Target = TrialResult;

    fn deref(&self) -> &TrialResult {
        self.trial
    }
}
