use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Maximum distance from 1.0 accepted for the sum of caller-supplied weights
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Long-only allocation: one non-negative weight per asset, summing to one.
///
/// Weights are in the same order as the columns of the
/// [`ReturnMatrix`](super::ReturnMatrix) they are evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>")]
pub struct WeightVector(Box<[f64]>);

impl WeightVector {
    /// Validate and wrap caller-supplied weights
    pub fn new(weights: Vec<f64>) -> Result<Self> {
        if weights.is_empty() {
            return Err(SimulationError::invalid("weight vector is empty"));
        }
        if let Some((idx, w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(SimulationError::invalid(format!(
                "weight {idx} is {w}, expected a finite non-negative value"
            )));
        }

        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(SimulationError::invalid(format!(
                "weights sum to {sum}, expected 1"
            )));
        }

        Ok(Self(weights.into_boxed_slice()))
    }

    /// Wrap weights already normalized by the sampler
    pub(crate) fn from_normalized(weights: Vec<f64>) -> Self {
        debug_assert!((weights.iter().sum::<f64>() - 1.0).abs() <= 1e-9);
        Self(weights.into_boxed_slice())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed vector; present for API symmetry with `len`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Weighted sum of `values`, which must have one entry per weight
    #[must_use]
    pub fn dot(&self, values: &[f64]) -> f64 {
        self.0.iter().zip(values).map(|(w, v)| w * v).sum()
    }
}

impl TryFrom<Vec<f64>> for WeightVector {
    type Error = SimulationError;

    fn try_from(weights: Vec<f64>) -> Result<Self> {
        Self::new(weights)
    }
}

impl AsRef<[f64]> for WeightVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}
