//! Random long-only allocations.
//!
//! Each weight is an independent uniform draw on `[0, 1)`, then the vector is
//! divided by its sum. The result lies on the simplex but is not uniform over
//! it: renormalized uniforms concentrate toward the interior compared with a
//! flat Dirichlet draw. Results downstream depend on that skew, so it is kept.

use rand::Rng;

use crate::error::{Result, SimulationError};
use crate::model::WeightVector;

/// Degenerate all-zero draws tolerated before giving up
pub const MAX_SAMPLE_ATTEMPTS: usize = 100;

/// Draw one allocation over `asset_count` assets from `rng`
pub fn sample_weights<R: Rng>(asset_count: usize, rng: &mut R) -> Result<WeightVector> {
    if asset_count < 1 {
        return Err(SimulationError::invalid(
            "cannot sample weights for zero assets",
        ));
    }

    let mut draws = vec![0.0; asset_count];
    for _ in 0..MAX_SAMPLE_ATTEMPTS {
        for d in draws.iter_mut() {
            *d = rng.random::<f64>();
        }

        let sum: f64 = draws.iter().sum();
        if sum > 0.0 {
            for d in draws.iter_mut() {
                *d /= sum;
            }
            return Ok(WeightVector::from_normalized(draws));
        }
    }

    Err(SimulationError::numerical(format!(
        "weight draw was all zeros {MAX_SAMPLE_ATTEMPTS} times in a row"
    )))
}
