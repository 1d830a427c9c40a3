//! Target single-qubit states described by Bloch vectors

use std::fmt;

use ndarray::Array1;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::Serialize;

use crate::error::{Result, StatePrepError};
use crate::quantum::DensityMatrix;

/// Bloch vector (aₓ, a_y, a_z) of a single-qubit state, |a| ≤ 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlochVector(pub [f64; 3]);

impl BlochVector {
    pub fn new(components: [f64; 3]) -> Result<Self> {
        let vector = BlochVector(components);
        let norm = vector.norm();
        if !norm.is_finite() || norm > 1.0 + 1e-10 {
            return Err(StatePrepError::InvalidBlochVector { components, norm });
        }
        Ok(vector)
    }

    /// Norm a Bloch vector must have for a state of the given purity
    pub fn norm_for_purity(purity: f64) -> Result<f64> {
        if !purity.is_finite() || !(0.5..=1.0).contains(&purity) {
            return Err(StatePrepError::InvalidConfig(format!(
                "purity must lie in [0.5, 1], got {}",
                purity
            )));
        }
        Ok((2.0 * purity - 1.0).sqrt())
    }

    /// Random direction with magnitude fixed by `purity`
    ///
    /// The direction is an isotropic Gaussian draw rescaled to
    /// √(2p - 1).
    pub fn random_with_purity<R: Rng>(purity: f64, rng: &mut R) -> Result<Self> {
        let magnitude = Self::norm_for_purity(purity)?;

        loop {
            let v: [f64; 3] = [rng.sample(StandardNormal), rng.sample(StandardNormal), rng.sample(StandardNormal)];
            let norm = v.iter().map(|c| c * c).sum::<f64>().sqrt();
            // A zero draw has no direction
            if norm > 1e-12 {
                return Ok(BlochVector([
                    magnitude * v[0] / norm,
                    magnitude * v[1] / norm,
                    magnitude * v[2] / norm,
                ]));
            }
        }
    }

    pub fn to_array(&self) -> Array1<f64> {
        Array1::from(self.0.to_vec())
    }

    pub fn norm(&self) -> f64 {
        self.0.iter().map(|c| c * c).sum::<f64>().sqrt()
    }

    /// Purity Tr(ρ²) = (1 + |a|²) / 2
    pub fn purity(&self) -> f64 {
        (1.0 + self.norm().powi(2)) / 2.0
    }

    pub fn density_matrix(&self) -> Result<DensityMatrix> {
        DensityMatrix::from_bloch_vector(self.0)
    }
}

impl fmt::Display for BlochVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.8} {:.8} {:.8}]", self.0[0], self.0[1], self.0[2])
    }
}
