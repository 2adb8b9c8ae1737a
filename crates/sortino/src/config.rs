//! Run configuration stored in YAML
//!
//! ```yaml
//! start_date: 2010-01-01
//! end_date: 2024-12-31
//! risk_free_rate: 0.02
//! num_portfolios: 25000
//! seed: 42
//! ```
//!
//! Every field is optional; missing ones take the defaults below. Command-line
//! flags are applied on top with [`Overrides::apply`].

use std::path::{Path, PathBuf};

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use sortino_core::SimulationConfig;
use sortino_core::report::DEFAULT_DISPLAY_THRESHOLD;

/// Configuration loaded from `config.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// First date of the analysis window (inclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,
    /// Last date of the analysis window (inclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Date>,
    /// Annualized risk-free rate, used as the Sortino target
    pub risk_free_rate: f64,
    /// Number of random portfolios to evaluate
    pub num_portfolios: usize,
    pub periods_per_year: u32,
    /// Master seed; a fresh one is picked and logged when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub batch_size: usize,
    /// Weights at or below this share are left out of the printed allocation
    pub display_threshold: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            start_date: Some(jiff::civil::date(2000, 1, 1)),
            end_date: Some(jiff::civil::date(2024, 12, 31)),
            risk_free_rate: 0.02,
            num_portfolios: 25_000,
            periods_per_year: sortino_core::TRADING_DAYS_PER_YEAR,
            seed: None,
            batch_size: SimulationConfig::DEFAULT_BATCH_SIZE,
            display_threshold: DEFAULT_DISPLAY_THRESHOLD,
        }
    }
}

/// Error types for configuration loading
#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl RunConfig {
    /// Default config location (~/.sortino/config.yaml)
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sortino")
            .join("config.yaml")
    }

    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_saphyr::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to YAML string
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_saphyr::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    /// Load `path` if given, else the default location if it exists, else defaults
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    tracing::debug!(path = %default_path.display(), "Using default config file");
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && start > end
        {
            return Err(ConfigError::Invalid(format!(
                "start date {start} is after end date {end}"
            )));
        }
        if self.num_portfolios == 0 {
            return Err(ConfigError::Invalid(
                "num_portfolios must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.display_threshold) {
            return Err(ConfigError::Invalid(format!(
                "display_threshold must be in [0, 1), got {}",
                self.display_threshold
            )));
        }
        Ok(())
    }

    /// Simulation parameters for the core, with `seed` filling in a missing seed
    #[must_use]
    pub fn simulation_config(&self, seed: u64) -> SimulationConfig {
        SimulationConfig {
            trial_count: self.num_portfolios,
            risk_free_rate: self.risk_free_rate,
            periods_per_year: self.periods_per_year,
            seed: self.seed.unwrap_or(seed),
            batch_size: self.batch_size,
        }
    }
}

/// Values given on the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub risk_free_rate: Option<f64>,
    pub num_portfolios: Option<usize>,
    pub periods_per_year: Option<u32>,
    pub seed: Option<u64>,
}

impl Overrides {
    pub fn apply(&self, config: &mut RunConfig) {
        if let Some(d) = self.start_date {
            config.start_date = Some(d);
        }
        if let Some(d) = self.end_date {
            config.end_date = Some(d);
        }
        if let Some(rate) = self.risk_free_rate {
            config.risk_free_rate = rate;
        }
        if let Some(n) = self.num_portfolios {
            config.num_portfolios = n;
        }
        if let Some(p) = self.periods_per_year {
            config.periods_per_year = p;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
    }
}
