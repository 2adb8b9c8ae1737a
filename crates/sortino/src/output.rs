//! Printed summary and JSON export of a finished run

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use sortino_core::report::{allocation_table, cumulative_returns};
use sortino_core::{BestPortfolio, ResultSet, Result as CoreResult, TrialResult};

use crate::data::ReturnSeries;

/// Write the human-readable summary of the best portfolio
pub fn write_summary<W: Write>(
    out: &mut W,
    best: &BestPortfolio<'_>,
    assets: &[String],
    display_threshold: f64,
) -> io::Result<()> {
    writeln!(out, "--- Optimal Portfolio Found (Maximum Sortino Ratio) ---")?;
    writeln!(
        out,
        "Annualized Return:       {:.2}%",
        best.annualized_return * 100.0
    )?;
    writeln!(
        out,
        "Annualized Volatility:   {:.2}%",
        best.annualized_volatility * 100.0
    )?;
    if best.is_unbounded() {
        writeln!(out, "Sortino Ratio:           unbounded (no downside observed)")?;
    } else {
        writeln!(out, "Sortino Ratio:           {:.2}", best.sortino_ratio)?;
    }

    writeln!(out)?;
    writeln!(out, "Optimal Allocation (Weights):")?;
    let table = allocation_table(assets, best.weights(), display_threshold)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let width = table.iter().map(|e| e.asset.len()).max().unwrap_or(0);
    for entry in table {
        writeln!(
            out,
            "{:<width$}  {:>7.2}%",
            entry.asset,
            entry.weight * 100.0
        )?;
    }
    Ok(())
}

/// One simulated portfolio in the export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    /// `None` when the ratio is unbounded
    pub sortino_ratio: Option<f64>,
    pub weights: Vec<f64>,
}

impl From<&TrialResult> for TrialRecord {
    fn from(trial: &TrialResult) -> Self {
        Self {
            annualized_return: trial.annualized_return,
            annualized_volatility: trial.annualized_volatility,
            sortino_ratio: (!trial.is_unbounded()).then_some(trial.sortino_ratio),
            weights: trial.weights.as_slice().to_vec(),
        }
    }
}

/// Growth of the best portfolio up to one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub date: Date,
    pub cumulative_return: f64,
}

/// Everything a plotting tool needs: the scatter of all trials, the winner
/// and the winner's cumulative performance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub assets: Vec<String>,
    pub risk_free_rate: f64,
    pub best_index: usize,
    pub trials: Vec<TrialRecord>,
    pub cumulative: Vec<CumulativePoint>,
}

impl RunReport {
    pub fn new(
        series: &ReturnSeries,
        results: &ResultSet,
        best: &BestPortfolio<'_>,
        risk_free_rate: f64,
    ) -> CoreResult<Self> {
        let period_returns = sortino_core::portfolio_period_returns(&series.matrix, best.weights())?;
        let cumulative = series
            .dates
            .iter()
            .zip(cumulative_returns(&period_returns))
            .map(|(date, cumulative_return)| CumulativePoint {
                date: *date,
                cumulative_return,
            })
            .collect();

        Ok(Self {
            assets: series.matrix.assets().to_vec(),
            risk_free_rate,
            best_index: best.index,
            trials: results.iter().map(TrialRecord::from).collect(),
            cumulative,
        })
    }

    /// Write as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()
    }
}
