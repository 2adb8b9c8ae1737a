//! Command-line front end for the Sortino portfolio search
//!
//! This crate hosts everything around the `sortino_core` engine:
//! - Loading price or return tables from CSV and cleaning them
//! - YAML run configuration with command-line overrides
//! - Logging setup
//! - The printed summary and the JSON export for plotting tools

// ============================================================================
// Core modules
// ============================================================================

pub mod app;
pub mod data;
pub mod logging;
pub mod output;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use app::{RunRequest, run};
pub use config::{ConfigError, Overrides, RunConfig};
pub use data::{DataError, InputKind, PriceTable, ReturnSeries};
pub use logging::init_logging;
