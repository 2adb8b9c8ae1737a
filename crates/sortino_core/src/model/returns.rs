//! Historical return matrix
//!
//! Periods are rows and assets are columns. Values are stored row-major so the
//! per-period portfolio return is a single contiguous dot product.

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::{Result, SimulationError};

/// Rectangular table of fractional per-period returns, one column per asset.
///
/// Construction checks the shape (at least one period, at least one asset,
/// every period the same width) and that asset identifiers are unique. Cell
/// values are not checked for finiteness here; the evaluator reports any NaN
/// that reaches it as a [`SimulationError::Numerical`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnMatrix {
    assets: Vec<String>,
    values: Vec<f64>,
    periods: usize,
}

impl ReturnMatrix {
    /// Build from per-period rows, each holding one value per asset
    pub fn from_rows(assets: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        validate_assets(&assets)?;
        if rows.is_empty() {
            return Err(SimulationError::invalid("return matrix has no periods"));
        }

        let width = assets.len();
        let mut values = Vec::with_capacity(rows.len() * width);
        for (period, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(SimulationError::invalid(format!(
                    "period {period} has {} values, expected {width}",
                    row.len()
                )));
            }
            values.extend_from_slice(row);
        }

        Ok(Self {
            assets,
            values,
            periods: rows.len(),
        })
    }

    /// Build from per-asset columns of equal length
    pub fn from_columns(assets: Vec<String>, columns: Vec<Vec<f64>>) -> Result<Self> {
        validate_assets(&assets)?;
        if columns.len() != assets.len() {
            return Err(SimulationError::invalid(format!(
                "{} columns supplied for {} assets",
                columns.len(),
                assets.len()
            )));
        }

        let periods = columns[0].len();
        if periods == 0 {
            return Err(SimulationError::invalid("return matrix has no periods"));
        }
        if let Some((idx, col)) = columns.iter().enumerate().find(|(_, c)| c.len() != periods) {
            return Err(SimulationError::invalid(format!(
                "asset '{}' has {} periods, expected {periods}",
                assets[idx],
                col.len()
            )));
        }

        let mut values = Vec::with_capacity(periods * assets.len());
        for period in 0..periods {
            values.extend(columns.iter().map(|col| col[period]));
        }

        Ok(Self {
            assets,
            values,
            periods,
        })
    }

    /// Asset identifiers in column order
    #[must_use]
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    #[must_use]
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn period_count(&self) -> usize {
        self.periods
    }

    /// Returns of every asset for one period; `None` past the last period
    #[must_use]
    pub fn row(&self, period: usize) -> Option<&[f64]> {
        let width = self.assets.len();
        let start = period.checked_mul(width)?;
        self.values.get(start..start.checked_add(width)?)
    }

    /// Iterate over periods in order
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.assets.len())
    }

    /// Iterate over one asset's returns in period order
    pub fn column(&self, asset: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows().map(move |row| row[asset])
    }

    /// Column index of an asset identifier
    #[must_use]
    pub fn asset_index(&self, asset: &str) -> Option<usize> {
        self.assets.iter().position(|a| a == asset)
    }
}

fn validate_assets(assets: &[String]) -> Result<()> {
    if assets.is_empty() {
        return Err(SimulationError::invalid("return matrix has no assets"));
    }

    let mut seen = FxHashSet::default();
    for asset in assets {
        if !seen.insert(asset.as_str()) {
            return Err(SimulationError::invalid(format!(
                "duplicate asset identifier '{asset}'"
            )));
        }
    }
    Ok(())
}
