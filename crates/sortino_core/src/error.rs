use std::fmt;

/// Errors raised by the sampler, evaluator, simulation driver and selector
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Malformed return matrix, invalid weights or invalid run configuration
    InvalidInput(String),
    /// Weight vector length does not match the number of assets
    DimensionMismatch { expected: usize, actual: usize },
    /// NaN or infinity outside the unbounded Sortino sentinel
    Numerical(String),
    /// Selection was requested over zero trials
    EmptyResult,
    /// Simulation was cancelled through its progress handle
    Cancelled,
}

impl SimulationError {
    /// Short, stable name of the error kind, suitable for reporting
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SimulationError::InvalidInput(_) => "invalid input",
            SimulationError::DimensionMismatch { .. } => "dimension mismatch",
            SimulationError::Numerical(_) => "numerical error",
            SimulationError::EmptyResult => "empty result",
            SimulationError::Cancelled => "cancelled",
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SimulationError::InvalidInput(msg.into())
    }

    pub(crate) fn numerical(msg: impl Into<String>) -> Self {
        SimulationError::Numerical(msg.into())
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            SimulationError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {expected} weights, got {actual}"
                )
            }
            SimulationError::Numerical(msg) => write!(f, "numerical error: {msg}"),
            SimulationError::EmptyResult => write!(f, "no trials to select from"),
            SimulationError::Cancelled => write!(f, "simulation cancelled"),
        }
    }
}

impl std::error::Error for SimulationError {}

pub type Result<T> = std::result::Result<T, SimulationError>;
