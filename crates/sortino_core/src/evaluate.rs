//! Portfolio evaluation: annualized return, downside deviation, Sortino ratio
//! and annualized volatility of one allocation over a return history.
//!
//! # Downside deviation convention
//!
//! Squared shortfalls below the target are summed over the periods that fall
//! below it, but the sum is divided by the *total* number of periods. Periods
//! at or above the target contribute zero rather than being excluded. This is
//! not the "divide by the number of losing periods" variant found in some
//! texts, and switching conventions changes every ratio materially.
//!
//! The target is the risk-free rate de-annualized to one period, not the
//! portfolio's own mean.

use crate::error::{Result, SimulationError};
use crate::model::{PortfolioMetrics, ReturnMatrix, WeightVector};

/// Trading days in a year, the usual annualization factor for daily data
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// Per-asset mean returns, annualized.
///
/// Independent of the allocation, so a simulation computes it once and shares
/// it between all trials.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetMeans {
    annualized: Vec<f64>,
    periods_per_year: u32,
}

impl AssetMeans {
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.annualized
    }

    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        self.periods_per_year
    }
}

/// Metrics together with the per-period portfolio return series they came from
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioEvaluation {
    pub metrics: PortfolioMetrics,
    pub period_returns: Vec<f64>,
}

/// Column means of `returns` multiplied by `periods_per_year`
pub fn annualized_mean_returns(returns: &ReturnMatrix, periods_per_year: u32) -> Result<AssetMeans> {
    check_periods_per_year(periods_per_year)?;

    let periods = returns.period_count() as f64;
    let scale = f64::from(periods_per_year);
    let annualized = (0..returns.asset_count())
        .map(|asset| returns.column(asset).sum::<f64>() / periods * scale)
        .collect();

    Ok(AssetMeans {
        annualized,
        periods_per_year,
    })
}

/// Weighted return of the portfolio for every period
pub fn portfolio_period_returns(returns: &ReturnMatrix, weights: &WeightVector) -> Result<Vec<f64>> {
    check_dimensions(returns, weights)?;
    Ok(returns.rows().map(|row| weights.dot(row)).collect())
}

/// Evaluate one allocation from scratch
pub fn evaluate(
    returns: &ReturnMatrix,
    weights: &WeightVector,
    periods_per_year: u32,
    risk_free_rate: f64,
) -> Result<PortfolioMetrics> {
    check_dimensions(returns, weights)?;
    check_risk_free_rate(risk_free_rate)?;
    let means = annualized_mean_returns(returns, periods_per_year)?;
    evaluate_with_means(returns, &means, weights, risk_free_rate)
}

/// Evaluate one allocation and keep its period-return series
pub fn evaluate_detailed(
    returns: &ReturnMatrix,
    weights: &WeightVector,
    periods_per_year: u32,
    risk_free_rate: f64,
) -> Result<PortfolioEvaluation> {
    check_dimensions(returns, weights)?;
    check_risk_free_rate(risk_free_rate)?;
    let means = annualized_mean_returns(returns, periods_per_year)?;
    let period_returns = portfolio_period_returns(returns, weights)?;
    let metrics = metrics_from_series(&means, weights, &period_returns, risk_free_rate)?;

    Ok(PortfolioEvaluation {
        metrics,
        period_returns,
    })
}

/// Evaluate one allocation with means computed by [`annualized_mean_returns`]
pub fn evaluate_with_means(
    returns: &ReturnMatrix,
    means: &AssetMeans,
    weights: &WeightVector,
    risk_free_rate: f64,
) -> Result<PortfolioMetrics> {
    check_risk_free_rate(risk_free_rate)?;
    if means.annualized.len() != returns.asset_count() {
        return Err(SimulationError::DimensionMismatch {
            expected: returns.asset_count(),
            actual: means.annualized.len(),
        });
    }
    let period_returns = portfolio_period_returns(returns, weights)?;
    metrics_from_series(means, weights, &period_returns, risk_free_rate)
}

fn metrics_from_series(
    means: &AssetMeans,
    weights: &WeightVector,
    period_returns: &[f64],
    risk_free_rate: f64,
) -> Result<PortfolioMetrics> {
    let periods_per_year = f64::from(means.periods_per_year);
    let annualized_return = weights.dot(&means.annualized);
    if !annualized_return.is_finite() {
        return Err(SimulationError::numerical(format!(
            "annualized return is {annualized_return}"
        )));
    }

    let target = risk_free_rate / periods_per_year;
    let downside_deviation = downside_deviation(period_returns, target) * periods_per_year.sqrt();
    if !downside_deviation.is_finite() {
        return Err(SimulationError::numerical(format!(
            "downside deviation is {downside_deviation}"
        )));
    }

    let sortino_ratio = if downside_deviation == 0.0 {
        f64::INFINITY
    } else {
        (annualized_return - risk_free_rate) / downside_deviation
    };
    if downside_deviation > 0.0 && !sortino_ratio.is_finite() {
        return Err(SimulationError::numerical(format!(
            "sortino ratio is {sortino_ratio} with downside deviation {downside_deviation}"
        )));
    }

    let annualized_volatility = sample_std_dev(period_returns) * periods_per_year.sqrt();
    if !annualized_volatility.is_finite() {
        return Err(SimulationError::numerical(format!(
            "annualized volatility is {annualized_volatility} over {} periods",
            period_returns.len()
        )));
    }

    Ok(PortfolioMetrics {
        annualized_return,
        annualized_volatility,
        downside_deviation,
        sortino_ratio,
    })
}

/// Per-period downside deviation below `target` (total-period denominator)
fn downside_deviation(period_returns: &[f64], target: f64) -> f64 {
    let (shortfall, below) = period_returns
        .iter()
        .filter(|r| **r < target)
        .fold((0.0, 0usize), |(sum, count), r| {
            (sum + (r - target).powi(2), count + 1)
        });

    if below == 0 {
        0.0
    } else {
        (shortfall / period_returns.len() as f64).sqrt()
    }
}

/// Sample standard deviation (n - 1). NaN with fewer than two values.
fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / (n - 1.0)).sqrt()
}

fn check_dimensions(returns: &ReturnMatrix, weights: &WeightVector) -> Result<()> {
    if weights.len() != returns.asset_count() {
        return Err(SimulationError::DimensionMismatch {
            expected: returns.asset_count(),
            actual: weights.len(),
        });
    }
    Ok(())
}

/// A NaN target would compare false against every period and report no downside
pub(crate) fn check_risk_free_rate(risk_free_rate: f64) -> Result<()> {
    if !risk_free_rate.is_finite() {
        return Err(SimulationError::invalid(format!(
            "risk-free rate must be finite, got {risk_free_rate}"
        )));
    }
    Ok(())
}

pub(crate) fn check_periods_per_year(periods_per_year: u32) -> Result<()> {
    if periods_per_year == 0 {
        return Err(SimulationError::invalid("periods per year must be positive"));
    }
    Ok(())
}
