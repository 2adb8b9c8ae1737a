//! Loading historical data from CSV files into a return matrix.
//!
//! Input files have a date column first (`YYYY-MM-DD`) followed by one column
//! per asset:
//!
//! ```text
//! Date,SPY,TLT,GLD
//! 2020-01-02,324.87,137.20,143.95
//! 2020-01-03,322.41,138.64,
//! ```
//!
//! Empty cells, `NaN` and `null` are missing values. Price files are turned
//! into simple returns (`p[t] / p[t-1] - 1`) after the table has been
//! restricted to the analysis window, assets without any data have been
//! dropped, and every period with a missing value has been removed.

use std::fmt;
use std::io;
use std::path::Path;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use sortino_core::{ReturnMatrix, SimulationError};

/// What the value columns of an input file hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Adjusted close prices
    #[default]
    Prices,
    /// Fractional per-period returns
    Returns,
}

/// Error types for data loading
#[derive(Debug)]
pub enum DataError {
    Csv(csv::Error),
    Parse { line: u64, message: String },
    DuplicateAsset(String),
    DuplicateDate(Date),
    InvalidPrice { asset: String, date: Date, price: f64 },
    NoAssets,
    NotEnoughPeriods { found: usize, required: usize },
    Matrix(SimulationError),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Csv(e) => write!(f, "CSV error: {e}"),
            DataError::Parse { line, message } => write!(f, "line {line}: {message}"),
            DataError::DuplicateAsset(asset) => write!(f, "asset '{asset}' appears twice"),
            DataError::DuplicateDate(date) => write!(f, "date {date} appears twice"),
            DataError::InvalidPrice { asset, date, price } => {
                write!(f, "price of '{asset}' on {date} is {price}, expected > 0")
            }
            DataError::NoAssets => write!(f, "no asset has any data"),
            DataError::NotEnoughPeriods { found, required } => {
                write!(f, "{found} complete periods found, at least {required} needed")
            }
            DataError::Matrix(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Csv(e) => Some(e),
            DataError::Matrix(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for DataError {
    fn from(e: csv::Error) -> Self {
        DataError::Csv(e)
    }
}

impl From<SimulationError> for DataError {
    fn from(e: SimulationError) -> Self {
        DataError::Matrix(e)
    }
}

/// Dated table of values with possible gaps, one column per asset
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    dates: Vec<Date>,
    assets: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

/// Return matrix together with the date of each period
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    pub dates: Vec<Date>,
    pub matrix: ReturnMatrix,
}

/// Read a dated CSV table from `path`
pub fn load_price_table(path: &Path) -> Result<PriceTable, DataError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    PriceTable::from_csv(reader)
}

/// Load `path` and run the full cleaning pipeline for `kind`
pub fn load_return_series(
    path: &Path,
    kind: InputKind,
    start: Option<Date>,
    end: Option<Date>,
) -> Result<ReturnSeries, DataError> {
    let table = load_price_table(path)?;
    tracing::debug!(
        path = %path.display(),
        assets = table.assets().len(),
        periods = table.period_count(),
        "Loaded table"
    );
    clean(table, kind, start, end)
}

/// Window, drop empty assets and incomplete periods, then convert
pub fn clean(
    table: PriceTable,
    kind: InputKind,
    start: Option<Date>,
    end: Option<Date>,
) -> Result<ReturnSeries, DataError> {
    let (table, dropped) = table.within(start, end).drop_empty_assets();
    for asset in &dropped {
        tracing::warn!(asset = asset.as_str(), "No data found for asset, skipping");
    }

    let table = table.drop_incomplete_periods();
    tracing::info!(
        assets = table.assets().len(),
        periods = table.period_count(),
        "Clean data ready"
    );

    match kind {
        InputKind::Prices => table.to_returns(),
        InputKind::Returns => table.into_return_series(),
    }
}

impl PriceTable {
    /// Parse a table from any CSV reader with a header row
    pub fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, DataError> {
        let headers = reader.headers()?.clone();
        let assets: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
        for (i, asset) in assets.iter().enumerate() {
            if assets[..i].contains(asset) {
                return Err(DataError::DuplicateAsset(asset.clone()));
            }
        }

        let mut dated_rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());

            let date_field = record.get(0).unwrap_or_default();
            let date: Date = date_field.parse().map_err(|e| DataError::Parse {
                line,
                message: format!("invalid date '{date_field}': {e}"),
            })?;

            let values = record
                .iter()
                .skip(1)
                .map(|cell| parse_cell(cell, line))
                .collect::<Result<Vec<_>, _>>()?;
            dated_rows.push((date, values));
        }

        dated_rows.sort_by_key(|(date, _)| *date);
        if let Some(pair) = dated_rows.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(DataError::DuplicateDate(pair[0].0));
        }

        let (dates, rows) = dated_rows.into_iter().unzip();
        Ok(Self {
            dates,
            assets,
            rows,
        })
    }

    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    #[must_use]
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    #[must_use]
    pub fn period_count(&self) -> usize {
        self.dates.len()
    }

    /// Keep rows dated within `[start, end]`; `None` leaves that side open
    #[must_use]
    pub fn within(self, start: Option<Date>, end: Option<Date>) -> Self {
        let (dates, rows) = self
            .dates
            .into_iter()
            .zip(self.rows)
            .filter(|(date, _)| start.is_none_or(|s| *date >= s) && end.is_none_or(|e| *date <= e))
            .unzip();
        Self {
            dates,
            assets: self.assets,
            rows,
        }
    }

    /// Remove assets with no value in any row; returns the removed identifiers
    #[must_use]
    pub fn drop_empty_assets(self) -> (Self, Vec<String>) {
        let keep: Vec<bool> = (0..self.assets.len())
            .map(|col| self.rows.iter().any(|row| row[col].is_some()))
            .collect();

        let mut assets = Vec::new();
        let mut dropped = Vec::new();
        for (asset, kept) in self.assets.into_iter().zip(&keep) {
            if *kept {
                assets.push(asset);
            } else {
                dropped.push(asset);
            }
        }

        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(&keep)
                    .filter_map(|(v, kept)| kept.then_some(v))
                    .collect()
            })
            .collect();

        (
            Self {
                dates: self.dates,
                assets,
                rows,
            },
            dropped,
        )
    }

    /// Remove every row with at least one missing value
    #[must_use]
    pub fn drop_incomplete_periods(self) -> Self {
        let (dates, rows) = self
            .dates
            .into_iter()
            .zip(self.rows)
            .filter(|(_, row)| row.iter().all(Option::is_some))
            .unzip();
        Self {
            dates,
            assets: self.assets,
            rows,
        }
    }

    /// Percentage change between consecutive rows, dated by the later row.
    ///
    /// Expects a complete table (see [`Self::drop_incomplete_periods`]).
    pub fn to_returns(&self) -> Result<ReturnSeries, DataError> {
        self.check_shape(2)?;
        let prices = self.complete_rows()?;

        for (row, date) in prices.iter().zip(&self.dates) {
            if let Some((col, price)) = row.iter().enumerate().find(|(_, p)| **p <= 0.0) {
                return Err(DataError::InvalidPrice {
                    asset: self.assets[col].clone(),
                    date: *date,
                    price: *price,
                });
            }
        }

        let rows: Vec<Vec<f64>> = prices
            .windows(2)
            .map(|w| w[1].iter().zip(&w[0]).map(|(now, prev)| now / prev - 1.0).collect())
            .collect();
        check_period_count(&rows, 2)?;

        Ok(ReturnSeries {
            dates: self.dates[1..].to_vec(),
            matrix: ReturnMatrix::from_rows(self.assets.clone(), rows)?,
        })
    }

    /// Use the values as returns directly.
    ///
    /// Expects a complete table (see [`Self::drop_incomplete_periods`]).
    pub fn into_return_series(self) -> Result<ReturnSeries, DataError> {
        self.check_shape(2)?;
        let rows = self.complete_rows()?;
        Ok(ReturnSeries {
            matrix: ReturnMatrix::from_rows(self.assets, rows)?,
            dates: self.dates,
        })
    }

    fn check_shape(&self, required: usize) -> Result<(), DataError> {
        if self.assets.is_empty() {
            return Err(DataError::NoAssets);
        }
        check_period_count(&self.rows, required)
    }

    fn complete_rows(&self) -> Result<Vec<Vec<f64>>, DataError> {
        self.rows
            .iter()
            .zip(&self.dates)
            .map(|(row, date)| {
                row.iter().copied().collect::<Option<Vec<f64>>>().ok_or_else(|| {
                    DataError::Matrix(SimulationError::InvalidInput(format!(
                        "period {date} has missing values"
                    )))
                })
            })
            .collect()
    }
}

fn check_period_count<T>(rows: &[T], required: usize) -> Result<(), DataError> {
    if rows.len() < required {
        return Err(DataError::NotEnoughPeriods {
            found: rows.len(),
            required,
        });
    }
    Ok(())
}

fn parse_cell(cell: &str, line: u64) -> Result<Option<f64>, DataError> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") || cell.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    let value: f64 = cell.parse().map_err(|e| DataError::Parse {
        line,
        message: format!("invalid number '{cell}': {e}"),
    })?;
    Ok(value.is_finite().then_some(value))
}
