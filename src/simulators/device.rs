//! Simulated execution device
//!
//! A `Device` fixes the register width and the estimation mode. With
//! `shots = None` expectation values are exact; otherwise each one is
//! estimated from that many measurements.

use num_complex::Complex64;
use ndarray::{Array1, Array2};
use rand::Rng;

use crate::error::{Result, StatePrepError};
use crate::quantum::circuit::QuantumCircuit;
use crate::quantum::state::MAX_QUBITS;
use crate::simulators::statevector::StatevectorSimulator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Device {
    wires: usize,
    shots: Option<usize>,
}

impl Device {
    pub fn new(wires: usize, shots: Option<usize>) -> Result<Self> {
        if wires == 0 || wires > MAX_QUBITS {
            return Err(StatePrepError::InvalidConfig(format!(
                "device wire count must lie in 1..={}, got {}",
                MAX_QUBITS, wires
            )));
        }
        if shots == Some(0) {
            return Err(StatePrepError::InvalidConfig(
                "shot count must be positive; use None for exact expectations".to_string(),
            ));
        }

        Ok(Device { wires, shots })
    }

    /// Device returning exact expectation values
    pub fn analytic(wires: usize) -> Result<Self> {
        Device::new(wires, None)
    }

    pub fn wires(&self) -> usize {
        self.wires
    }

    pub fn shots(&self) -> Option<usize> {
        self.shots
    }

    /// Run `circuit` from |0...0⟩ and return the final simulator
    pub fn execute(&self, circuit: &QuantumCircuit) -> Result<StatevectorSimulator> {
        let mut simulator = StatevectorSimulator::new(self.wires)?;
        simulator.run_circuit(circuit)?;
        Ok(simulator)
    }

    /// Expectation values of several observables on one wire after `circuit`
    ///
    /// The circuit is simulated once; with shots, each observable gets its
    /// own batch of measurements.
    pub fn expectations<R: Rng>(
        &self,
        circuit: &QuantumCircuit,
        observables: &[Array2<Complex64>],
        wire: usize,
        rng: &mut R,
    ) -> Result<Array1<f64>> {
        let simulator = self.execute(circuit)?;

        let values = observables
            .iter()
            .map(|observable| match self.shots {
                None => simulator.expectation_value_single_qubit(observable, wire),
                Some(shots) => simulator.sample_expectation_single_qubit(observable, wire, shots, rng),
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(Array1::from(values))
    }
}
