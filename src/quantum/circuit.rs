use crate::error::{Result, StatePrepError};
use crate::quantum::gate::{Cnot, ParametrizedGate, QuantumGate};
use crate::quantum::state::StateVector;

/// A quantum circuit consisting of a sequence of gates
#[derive(Debug, Clone)]
pub struct QuantumCircuit {
    pub gates: Vec<(Box<dyn QuantumGate>, Vec<usize>)>,
    pub qubit_count: usize,
}

impl QuantumCircuit {
    /// Create a new empty quantum circuit
    pub fn new(qubit_count: usize) -> Self {
        QuantumCircuit {
            gates: Vec::new(),
            qubit_count,
        }
    }

    pub fn add_gate(&mut self, gate: Box<dyn QuantumGate>, qubits: &[usize]) -> Result<()> {
        for &q in qubits {
            if q >= self.qubit_count {
                return Err(StatePrepError::QubitOutOfRange {
                    qubit: q,
                    qubit_count: self.qubit_count,
                });
            }
        }

        if gate.qubit_count() != qubits.len() {
            return Err(StatePrepError::DimensionMismatch(format!(
                "gate {} acts on {} qubits, but {} qubits were specified",
                gate.name(),
                gate.qubit_count(),
                qubits.len()
            )));
        }

        for (i, q) in qubits.iter().enumerate() {
            if qubits[..i].contains(q) {
                return Err(StatePrepError::DimensionMismatch(format!(
                    "gate {} lists qubit {} twice",
                    gate.name(),
                    q
                )));
            }
        }

        self.gates.push((gate, qubits.to_vec()));
        Ok(())
    }

    /// Get the number of gates in the circuit
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Apply the circuit to a quantum state
    pub fn apply(&self, state: &StateVector) -> Result<StateVector> {
        if state.qubit_count() < self.qubit_count {
            return Err(StatePrepError::DimensionMismatch(format!(
                "state has {} qubits, but circuit requires at least {}",
                state.qubit_count(),
                self.qubit_count
            )));
        }

        let mut current_state = state.clone();
        for (gate, qubits) in &self.gates {
            current_state = gate.apply_to_qubits(&current_state, qubits)?;
        }

        Ok(current_state)
    }

    /// Append another circuit on the same register after this one
    pub fn compose(&self, other: &QuantumCircuit) -> Result<QuantumCircuit> {
        if self.qubit_count != other.qubit_count {
            return Err(StatePrepError::DimensionMismatch(format!(
                "cannot compose circuits with {} and {} qubits",
                self.qubit_count, other.qubit_count
            )));
        }

        let mut result = self.clone();
        for (gate, qubits) in &other.gates {
            result.add_gate(gate.clone_box(), qubits)?;
        }

        Ok(result)
    }

    /// The adjoint circuit: reversed order, each gate replaced by its adjoint
    pub fn adjoint(&self) -> Self {
        QuantumCircuit {
            gates: self
                .gates
                .iter()
                .rev()
                .map(|(gate, qubits)| (gate.adjoint(), qubits.clone()))
                .collect(),
            qubit_count: self.qubit_count,
        }
    }
}

/// A builder for quantum circuits
pub struct CircuitBuilder {
    circuit: QuantumCircuit,
}

impl CircuitBuilder {
    /// Create a new circuit builder
    pub fn new(qubit_count: usize) -> Self {
        CircuitBuilder {
            circuit: QuantumCircuit::new(qubit_count),
        }
    }

    /// Build the quantum circuit
    pub fn build(self) -> QuantumCircuit {
        self.circuit
    }

    pub fn add_gate<G: QuantumGate + 'static>(&mut self, gate: G, qubits: &[usize]) -> Result<&mut Self> {
        self.circuit.add_gate(Box::new(gate), qubits)?;
        Ok(self)
    }

    /// Add a CNOT gate
    pub fn cnot(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.add_gate(Cnot, &[control, target])
    }

    /// Add an Rx gate
    pub fn rx(&mut self, qubit: usize, theta: f64) -> Result<&mut Self> {
        self.add_gate(ParametrizedGate::Rx(theta), &[qubit])
    }

    /// Add an Ry gate
    pub fn ry(&mut self, qubit: usize, theta: f64) -> Result<&mut Self> {
        self.add_gate(ParametrizedGate::Ry(theta), &[qubit])
    }

    /// Add an Rz gate
    pub fn rz(&mut self, qubit: usize, theta: f64) -> Result<&mut Self> {
        self.add_gate(ParametrizedGate::Rz(theta), &[qubit])
    }
}
