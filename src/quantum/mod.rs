// src/quantum/mod.rs
//! Quantum states, gates and circuits
//!
//! This module implements the pieces the variational state preparation
//! needs: pure states, rotation and entangling gates, circuits, reduced
//! density matrices and parameter-shift gradients.

pub mod state;
pub mod gate;
pub mod circuit;
pub mod density_matrix;
pub mod differentiation;

pub use density_matrix::DensityMatrix;
pub use state::StateVector;
pub use gate::{Cnot, QuantumGate, ParametrizedGate, CustomMatrixGate};
pub use circuit::{QuantumCircuit, CircuitBuilder};
pub use differentiation::{parameter_shift_jacobian, ParameterShiftConfig};

/// Re-export commonly used types and traits
pub mod prelude {
    pub use super::{Cnot, QuantumGate, ParametrizedGate};
    pub use super::{QuantumCircuit, CircuitBuilder, StateVector, DensityMatrix};
}
