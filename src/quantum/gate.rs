// src/quantum/gate.rs
//! Quantum gates used by the state preparation ansatz
//!
//! Gates are described by their unitary matrix in big-endian qubit order
//! (qubit 0 is the most significant bit of a basis index).

use std::fmt::Debug;
use num_complex::Complex64;
use ndarray::{array, Array2};

use super::state::StateVector;
use crate::error::{Result, StatePrepError};

/// Common complex numbers and matrices
pub mod constants {
    use num_complex::Complex64;
    use ndarray::{array, Array2};

    /// The imaginary unit i
    pub const I: Complex64 = Complex64::new(0.0, 1.0);

    pub const ZERO: Complex64 = Complex64::new(0.0, 0.0);

    pub const ONE: Complex64 = Complex64::new(1.0, 0.0);

    /// Pauli X, Y and Z, in that order
    pub fn pauli_matrices() -> [Array2<Complex64>; 3] {
        [
            array![[ZERO, ONE], [ONE, ZERO]],
            array![[ZERO, -I], [I, ZERO]],
            array![[ONE, ZERO], [ZERO, -ONE]],
        ]
    }
}

/// Trait for quantum gates
pub trait QuantumGate: Debug + Send + Sync {
    /// Returns the number of qubits this gate acts on
    fn qubit_count(&self) -> usize;

    /// Returns the matrix representation of this gate
    fn matrix(&self) -> Array2<Complex64>;

    /// Returns a display name for this gate
    fn name(&self) -> String;

    /// Create a clone of this gate
    fn clone_box(&self) -> Box<dyn QuantumGate>;

    /// Returns the adjoint (Hermitian conjugate) of this gate
    fn adjoint(&self) -> Box<dyn QuantumGate> {
        let matrix = self.matrix();
        let adjoint_matrix = matrix.t().mapv(|z| z.conj());

        Box::new(CustomMatrixGate {
            matrix: adjoint_matrix,
            name: format!("{}†", self.name()),
            qubits: self.qubit_count(),
        })
    }

    /// Apply this gate to specific qubits in a state
    fn apply_to_qubits(&self, state: &StateVector, qubits: &[usize]) -> Result<StateVector> {
        if qubits.len() != self.qubit_count() {
            return Err(StatePrepError::DimensionMismatch(format!(
                "gate {} acts on {} qubits, but {} target qubits were specified",
                self.name(),
                self.qubit_count(),
                qubits.len()
            )));
        }

        state.apply_matrix(&self.matrix(), qubits)
    }
}

impl Clone for Box<dyn QuantumGate> {
    fn clone(&self) -> Box<dyn QuantumGate> {
        self.clone_box()
    }
}

/// A gate defined directly by its matrix
#[derive(Debug, Clone)]
pub struct CustomMatrixGate {
    pub matrix: Array2<Complex64>,
    pub name: String,
    pub qubits: usize,
}

impl QuantumGate for CustomMatrixGate {
    fn qubit_count(&self) -> usize {
        self.qubits
    }

    fn matrix(&self) -> Array2<Complex64> {
        self.matrix.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn clone_box(&self) -> Box<dyn QuantumGate> {
        Box::new(self.clone())
    }
}

/// Controlled NOT, control qubit first
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cnot;

impl QuantumGate for Cnot {
    fn qubit_count(&self) -> usize {
        2
    }

    fn matrix(&self) -> Array2<Complex64> {
        use constants::{ONE, ZERO};
        array![
            [ONE, ZERO, ZERO, ZERO],
            [ZERO, ONE, ZERO, ZERO],
            [ZERO, ZERO, ZERO, ONE],
            [ZERO, ZERO, ONE, ZERO]
        ]
    }

    fn name(&self) -> String {
        "CNOT".to_string()
    }

    fn clone_box(&self) -> Box<dyn QuantumGate> {
        Box::new(*self)
    }

    fn adjoint(&self) -> Box<dyn QuantumGate> {
        // Self-inverse
        Box::new(*self)
    }
}

/// Single-qubit rotations exp(-iθP/2) about a Pauli axis
#[derive(Clone, Debug, PartialEq)]
pub enum ParametrizedGate {
    /// Rotation around X-axis
    Rx(f64),

    /// Rotation around Y-axis
    Ry(f64),

    /// Rotation around Z-axis
    Rz(f64),
}

impl ParametrizedGate {
    /// The rotation angle
    pub fn angle(&self) -> f64 {
        match self {
            ParametrizedGate::Rx(theta) | ParametrizedGate::Ry(theta) | ParametrizedGate::Rz(theta) => *theta,
        }
    }

    /// The same rotation with a different angle
    pub fn with_angle(&self, theta: f64) -> Self {
        match self {
            ParametrizedGate::Rx(_) => ParametrizedGate::Rx(theta),
            ParametrizedGate::Ry(_) => ParametrizedGate::Ry(theta),
            ParametrizedGate::Rz(_) => ParametrizedGate::Rz(theta),
        }
    }
}

impl QuantumGate for ParametrizedGate {
    fn qubit_count(&self) -> usize {
        1
    }

    fn matrix(&self) -> Array2<Complex64> {
        match self {
            ParametrizedGate::Rx(theta) => {
                let cos = (theta / 2.0).cos();
                let sin = (theta / 2.0).sin();
                array![
                    [Complex64::new(cos, 0.0), Complex64::new(0.0, -sin)],
                    [Complex64::new(0.0, -sin), Complex64::new(cos, 0.0)]
                ]
            },
            ParametrizedGate::Ry(theta) => {
                let cos = (theta / 2.0).cos();
                let sin = (theta / 2.0).sin();
                array![
                    [Complex64::new(cos, 0.0), Complex64::new(-sin, 0.0)],
                    [Complex64::new(sin, 0.0), Complex64::new(cos, 0.0)]
                ]
            },
            ParametrizedGate::Rz(theta) => {
                let phase_pos = Complex64::new(0.0, theta / 2.0).exp();
                let phase_neg = Complex64::new(0.0, -theta / 2.0).exp();
                array![
                    [phase_neg, constants::ZERO],
                    [constants::ZERO, phase_pos]
                ]
            },
        }
    }

    fn name(&self) -> String {
        match self {
            ParametrizedGate::Rx(theta) => format!("Rx({:.2})", theta),
            ParametrizedGate::Ry(theta) => format!("Ry({:.2})", theta),
            ParametrizedGate::Rz(theta) => format!("Rz({:.2})", theta),
        }
    }

    fn clone_box(&self) -> Box<dyn QuantumGate> {
        Box::new(self.clone())
    }

    fn adjoint(&self) -> Box<dyn QuantumGate> {
        Box::new(self.with_angle(-self.angle()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn matrices_close(a: &Array2<Complex64>, b: &Array2<Complex64>) -> bool {
        a.shape() == b.shape() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() < 1e-10)
    }

    #[test]
    fn rotations_by_pi_are_paulis_up_to_phase() {
        let [x, y, z] = constants::pauli_matrices();
        let minus_i = Complex64::new(0.0, -1.0);

        assert!(matrices_close(&ParametrizedGate::Rx(PI).matrix(), &x.mapv(|v| v * minus_i)));
        assert!(matrices_close(&ParametrizedGate::Ry(PI).matrix(), &y.mapv(|v| v * minus_i)));
        assert!(matrices_close(&ParametrizedGate::Rz(PI).matrix(), &z.mapv(|v| v * minus_i)));
    }

    #[test]
    fn rotation_adjoint_is_inverse() {
        for gate in [ParametrizedGate::Rx(0.7), ParametrizedGate::Ry(-1.3), ParametrizedGate::Rz(2.1)] {
            let product = gate.matrix().dot(&gate.adjoint().matrix());
            assert!(matrices_close(&product, &Array2::eye(2)));
        }
    }

    #[test]
    fn cnot_respects_control_order() {
        // CNOT(0, 2) on 3 qubits: |100> -> |101>
        let state = StateVector::computational_basis(3, 0b100).unwrap();
        let out = Cnot.apply_to_qubits(&state, &[0, 2]).unwrap();
        assert_eq!(out.probability(0b101), 1.0);

        // Reversed roles: |100> has control qubit 2 unset
        let out = Cnot.apply_to_qubits(&state, &[2, 0]).unwrap();
        assert_eq!(out.probability(0b100), 1.0);

        // CNOT(2, 0) maps |001> -> |101>
        let state = StateVector::computational_basis(3, 0b001).unwrap();
        let out = Cnot.apply_to_qubits(&state, &[2, 0]).unwrap();
        assert_eq!(out.probability(0b101), 1.0);
    }

    #[test]
    fn custom_three_qubit_gate_and_its_adjoint() {
        // Toffoli on qubits (2, 0, 1): flips qubit 1 when qubits 2 and 0 are set
        let mut toffoli = Array2::eye(8);
        toffoli[[6, 6]] = constants::ZERO;
        toffoli[[7, 7]] = constants::ZERO;
        toffoli[[6, 7]] = constants::ONE;
        toffoli[[7, 6]] = constants::ONE;
        let gate = CustomMatrixGate {
            matrix: toffoli,
            name: "CCX".to_string(),
            qubits: 3,
        };

        let state = StateVector::computational_basis(3, 0b101).unwrap();
        let out = gate.apply_to_qubits(&state, &[2, 0, 1]).unwrap();
        assert_eq!(out.probability(0b111), 1.0);

        let back = gate.adjoint().apply_to_qubits(&out, &[2, 0, 1]).unwrap();
        assert_eq!(back.probability(0b101), 1.0);
        assert_eq!(gate.adjoint().name(), "CCX†");
    }

    #[test]
    fn wrong_target_count_is_rejected() {
        let state = StateVector::zero_state(2).unwrap();
        assert!(Cnot.apply_to_qubits(&state, &[0]).is_err());
        assert!(ParametrizedGate::Rx(0.1).apply_to_qubits(&state, &[5]).is_err());
    }
}
