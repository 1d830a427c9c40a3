//! Layered rotation/entangler ansatz
//!
//! Layer `j` applies RX, RY, RZ to every qubit `i` with angles
//! `params[i, j, 0..3]`, then a CNOT for every qubit pair `(a, b)` with
//! `a < b` in lexicographic order. On three qubits this is CNOT(0,1),
//! CNOT(0,2), CNOT(1,2).

use ndarray::Array3;
use rand::Rng;
use rand_distr::Normal;
use serde::Serialize;

use crate::error::{Result, StatePrepError};
use crate::quantum::circuit::{CircuitBuilder, QuantumCircuit};

/// Rotation angles per qubit and layer
pub const ANGLES_PER_ROTATION: usize = 3;

/// Circuit parameters of shape (qubits, layers, 3)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnsatzParameters {
    values: Array3<f64>,
}

impl AnsatzParameters {
    /// Wrap an array of shape (qubits, layers, 3), both leading axes non-empty
    pub fn new(values: Array3<f64>) -> Result<Self> {
        let shape = values.shape();
        if shape[2] != ANGLES_PER_ROTATION {
            return Err(StatePrepError::ShapeMismatch {
                expected: vec![shape[0], shape[1], ANGLES_PER_ROTATION],
                actual: shape.to_vec(),
            });
        }
        if shape[0] == 0 || shape[1] == 0 {
            return Err(StatePrepError::InvalidConfig(format!(
                "ansatz needs at least one qubit and one layer, got {} qubits and {} layers",
                shape[0], shape[1]
            )));
        }
        Ok(AnsatzParameters { values })
    }

    pub fn zeros(qubits: usize, layers: usize) -> Result<Self> {
        AnsatzParameters::new(Array3::zeros((qubits, layers, ANGLES_PER_ROTATION)))
    }

    /// Angles drawn independently from N(0, std)
    pub fn random_normal<R: Rng>(qubits: usize, layers: usize, std: f64, rng: &mut R) -> Result<Self> {
        let normal = Normal::new(0.0, std).map_err(|e| StatePrepError::InvalidConfig(e.to_string()))?;
        let values = Array3::from_shape_simple_fn((qubits, layers, ANGLES_PER_ROTATION), || rng.sample(normal));
        AnsatzParameters::new(values)
    }

    /// Rebuild parameters from a flat, row-major slice
    pub fn from_flat(qubits: usize, layers: usize, flat: &[f64]) -> Result<Self> {
        let values = Array3::from_shape_vec((qubits, layers, ANGLES_PER_ROTATION), flat.to_vec()).map_err(|_| {
            StatePrepError::ShapeMismatch {
                expected: vec![qubits * layers * ANGLES_PER_ROTATION],
                actual: vec![flat.len()],
            }
        })?;
        AnsatzParameters::new(values)
    }

    pub fn shape(&self) -> [usize; 3] {
        let s = self.values.shape();
        [s[0], s[1], s[2]]
    }

    pub fn qubit_count(&self) -> usize {
        self.values.shape()[0]
    }

    pub fn layer_count(&self) -> usize {
        self.values.shape()[1]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &Array3<f64> {
        &self.values
    }

    /// Row-major copy of all angles
    pub fn to_flat(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    /// Error unless the array has shape (qubits, layers, 3)
    pub fn check_shape(&self, qubits: usize, layers: usize) -> Result<()> {
        let expected = [qubits, layers, ANGLES_PER_ROTATION];
        if self.shape() != expected {
            return Err(StatePrepError::ShapeMismatch {
                expected: expected.to_vec(),
                actual: self.shape().to_vec(),
            });
        }
        Ok(())
    }

    /// Append layer `j` to `builder`
    pub fn layer(&self, builder: &mut CircuitBuilder, j: usize) -> Result<()> {
        if j >= self.layer_count() {
            return Err(StatePrepError::ShapeMismatch {
                expected: vec![self.qubit_count(), j + 1, ANGLES_PER_ROTATION],
                actual: self.shape().to_vec(),
            });
        }

        for i in 0..self.qubit_count() {
            builder
                .rx(i, self.values[[i, j, 0]])?
                .ry(i, self.values[[i, j, 1]])?
                .rz(i, self.values[[i, j, 2]])?;
        }

        for (control, target) in entangling_pairs(self.qubit_count()) {
            builder.cnot(control, target)?;
        }

        Ok(())
    }

    /// All layers in order, on a register of exactly `qubit_count` qubits
    pub fn circuit(&self) -> Result<QuantumCircuit> {
        let mut builder = CircuitBuilder::new(self.qubit_count());
        for j in 0..self.layer_count() {
            self.layer(&mut builder, j)?;
        }
        Ok(builder.build())
    }
}

/// CNOT pairs (a, b), a < b, in lexicographic order
pub fn entangling_pairs(qubits: usize) -> Vec<(usize, usize)> {
    (0..qubits)
        .flat_map(|a| ((a + 1)..qubits).map(move |b| (a, b)))
        .collect()
}
