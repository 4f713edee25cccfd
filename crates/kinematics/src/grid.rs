//! Uniform `cos(theta_cm)` sampling and per-quantity tabulation.

use crate::error::KinematicsError;
use crate::invariants::Invariants;
use crate::quantity::{Quantity, QuantityMap};
use crate::transform::{KinematicState, transform};

/// `n` evenly spaced values from -1 to 1, both endpoints included exactly.
pub fn coscm_grid(n: usize) -> Result<Vec<f64>, KinematicsError> {
    if n < 2 {
        return Err(KinematicsError::InvalidSampleCount(n));
    }
    let last = (n - 1) as f64;
    Ok((0..n).map(|k| -1.0 + 2.0 * k as f64 / last).collect())
}

/// Apply the frame transform at every grid point, in ascending `coscm` order.
pub fn sample(inv: &Invariants, n: usize) -> Result<Vec<KinematicState>, KinematicsError> {
    Ok(coscm_grid(n)?
        .into_iter()
        .map(|coscm| transform(inv, coscm))
        .collect())
}

/// Split samples into index-aligned columns, one per requested quantity.
pub fn tabulate(states: &[KinematicState], quantities: &[Quantity]) -> QuantityMap {
    quantities
        .iter()
        .map(|&q| (q, states.iter().map(|s| s.get(q)).collect()))
        .collect()
}
