use num_complex::Complex64;
use ndarray::Array2;

use crate::error::{Result, StatePrepError};
use crate::quantum::state::{StateVector, MAX_QUBITS};

/// Represents a quantum state as a density matrix
#[derive(Clone, Debug)]
pub struct DensityMatrix {
    /// Number of qubits
    pub qubit_count: usize,

    /// The density matrix as a 2D array of complex values
    matrix: Array2<Complex64>,
}

impl DensityMatrix {
    /// Create a new density matrix from a 2D array
    pub fn new(qubit_count: usize, matrix: Array2<Complex64>) -> Result<Self> {
        if qubit_count > MAX_QUBITS {
            return Err(StatePrepError::DimensionMismatch(format!(
                "{} qubits exceed the {}-qubit register limit",
                qubit_count, MAX_QUBITS
            )));
        }
        let expected_dim = 1 << qubit_count;

        if matrix.shape() != [expected_dim, expected_dim] {
            return Err(StatePrepError::DimensionMismatch(format!(
                "density matrix: expected {}x{}, got {}x{}",
                expected_dim,
                expected_dim,
                matrix.shape()[0],
                matrix.shape()[1]
            )));
        }

        let dm = DensityMatrix { qubit_count, matrix };

        if !dm.is_valid() {
            return Err(StatePrepError::DimensionMismatch(
                "matrix is not a valid density matrix (Hermitian, trace 1, non-negative diagonal)".to_string(),
            ));
        }

        Ok(dm)
    }

    /// Reduced state of one qubit of a pure register state
    ///
    /// Works on the amplitudes directly: ρ₀₀ and ρ₁₁ sum the probabilities
    /// with the qubit clear or set, ρ₀₁ pairs each amplitude with its
    /// partner that differs only in that qubit.
    pub fn reduced_qubit(state: &StateVector, qubit: usize) -> Result<Self> {
        let qubit_count = state.qubit_count();
        if qubit >= qubit_count {
            return Err(StatePrepError::QubitOutOfRange { qubit, qubit_count });
        }

        let mask: usize = 1 << (qubit_count - 1 - qubit);
        let amplitudes = state.amplitudes();
        let mut rho00 = 0.0;
        let mut rho11 = 0.0;
        let mut rho01 = Complex64::new(0.0, 0.0);

        for i in (0..state.dimension()).filter(|i| i & mask == 0) {
            let a0 = amplitudes[i];
            let a1 = amplitudes[i | mask];
            rho00 += a0.norm_sqr();
            rho11 += a1.norm_sqr();
            rho01 += a0 * a1.conj();
        }

        Ok(DensityMatrix {
            qubit_count: 1,
            matrix: ndarray::array![[Complex64::new(rho00, 0.0), rho01], [rho01.conj(), Complex64::new(rho11, 0.0)]],
        })
    }

    /// Single-qubit state ρ = (I + a·σ)/2 for a Bloch vector `a`
    pub fn from_bloch_vector(a: [f64; 3]) -> Result<Self> {
        let half = 0.5;
        let matrix = ndarray::array![
            [Complex64::new(half * (1.0 + a[2]), 0.0), Complex64::new(half * a[0], -half * a[1])],
            [Complex64::new(half * a[0], half * a[1]), Complex64::new(half * (1.0 - a[2]), 0.0)]
        ];

        let norm = a.iter().map(|c| c * c).sum::<f64>().sqrt();
        if !norm.is_finite() || norm > 1.0 + 1e-10 {
            return Err(StatePrepError::InvalidBlochVector { components: a, norm });
        }

        DensityMatrix::new(1, matrix)
    }

    /// Calculate the dimension of the Hilbert space
    pub fn dimension(&self) -> usize {
        1 << self.qubit_count
    }

    /// Get a reference to the matrix
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Check if the density matrix is valid
    pub fn is_valid(&self) -> bool {
        if (self.trace() - 1.0).abs() > 1e-10 {
            return false;
        }

        // Hermitian (ρ = ρ†)
        for i in 0..self.dimension() {
            for j in 0..i {
                if (self.matrix[[i, j]] - self.matrix[[j, i]].conj()).norm() > 1e-10 {
                    return false;
                }
            }
        }

        // Diagonal entries are probabilities
        (0..self.dimension()).all(|i| self.matrix[[i, i]].re >= -1e-10)
    }

    /// Calculate the purity Tr(ρ²)
    pub fn purity(&self) -> f64 {
        let mut sum = Complex64::new(0.0, 0.0);
        for i in 0..self.dimension() {
            for j in 0..self.dimension() {
                sum += self.matrix[[i, j]] * self.matrix[[j, i]];
            }
        }
        sum.re
    }

    /// Calculate the trace of the density matrix
    pub fn trace(&self) -> f64 {
        (0..self.dimension()).map(|i| self.matrix[[i, i]].re).sum()
    }

    /// Bloch vector (⟨X⟩, ⟨Y⟩, ⟨Z⟩) of a single-qubit density matrix
    pub fn bloch_vector(&self) -> Result<[f64; 3]> {
        if self.qubit_count != 1 {
            return Err(StatePrepError::DimensionMismatch(format!(
                "Bloch vector requires a single-qubit state, got {} qubits",
                self.qubit_count
            )));
        }

        let rho01 = self.matrix[[0, 1]];
        Ok([
            2.0 * rho01.re,
            -2.0 * rho01.im,
            self.matrix[[0, 0]].re - self.matrix[[1, 1]].re,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantum::circuit::CircuitBuilder;

    #[test]
    fn bell_pair_halves_are_maximally_mixed() {
        let mut builder = CircuitBuilder::new(2);
        builder.ry(0, std::f64::consts::FRAC_PI_2).unwrap();
        builder.cnot(0, 1).unwrap();
        let state = builder.build().apply(&StateVector::zero_state(2).unwrap()).unwrap();

        for qubit in 0..2 {
            let reduced = DensityMatrix::reduced_qubit(&state, qubit).unwrap();
            assert!(reduced.is_valid());
            assert!((reduced.purity() - 0.5).abs() < 1e-10);
            let a = reduced.bloch_vector().unwrap();
            assert!(a.iter().all(|c| c.abs() < 1e-10));
        }
    }

    #[test]
    fn product_state_reduces_to_pure_factor() {
        // RY(θ) on qubit 1 of |00>: qubit 1 has Bloch vector (sin θ, 0, cos θ)
        let theta = 0.9;
        let mut builder = CircuitBuilder::new(2);
        builder.ry(1, theta).unwrap();
        let state = builder.build().apply(&StateVector::zero_state(2).unwrap()).unwrap();

        let a = DensityMatrix::reduced_qubit(&state, 1).unwrap().bloch_vector().unwrap();
        assert!((a[0] - theta.sin()).abs() < 1e-12);
        assert!(a[1].abs() < 1e-12);
        assert!((a[2] - theta.cos()).abs() < 1e-12);

        let untouched = DensityMatrix::reduced_qubit(&state, 0).unwrap().bloch_vector().unwrap();
        assert!((untouched[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bloch_vector_round_trips_and_sets_purity() {
        let a = [0.3, -0.4, 0.1];
        let rho = DensityMatrix::from_bloch_vector(a).unwrap();
        let back = rho.bloch_vector().unwrap();
        for k in 0..3 {
            assert!((a[k] - back[k]).abs() < 1e-12);
        }

        let norm_sqr: f64 = a.iter().map(|c| c * c).sum();
        assert!((rho.purity() - (1.0 + norm_sqr) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn bloch_vector_outside_ball_is_rejected() {
        let err = DensityMatrix::from_bloch_vector([1.0, 1.0, 0.0]).unwrap_err();
        assert!(matches!(err, StatePrepError::InvalidBlochVector { norm, .. } if (norm - 2.0_f64.sqrt()).abs() < 1e-12));
        assert!(matches!(
            DensityMatrix::from_bloch_vector([f64::NAN, 0.0, 0.0]),
            Err(StatePrepError::InvalidBlochVector { .. })
        ));
    }

    #[test]
    fn reduced_qubit_checks_range() {
        let state = StateVector::zero_state(2).unwrap();
        assert!(DensityMatrix::reduced_qubit(&state, 2).is_err());

        let full = DensityMatrix::new(2, Array2::eye(4).mapv(|v: Complex64| v * 0.25)).unwrap();
        assert!(full.bloch_vector().is_err());
        assert!(DensityMatrix::new(70, Array2::eye(1)).is_err());
    }
}
