//! Statevector simulator
//!
//! Holds a pure register state, applies circuits gate by gate and
//! evaluates single-qubit observables either exactly or from sampled
//! measurement outcomes.
use std::collections::HashMap;
use num_complex::Complex64;
use ndarray::Array2;
use rand::Rng;
use rand_distr::{Binomial, Distribution};

use crate::error::{Result, StatePrepError};
use crate::quantum::circuit::QuantumCircuit;
use crate::quantum::density_matrix::DensityMatrix;
use crate::quantum::state::StateVector;

const HERMITIAN_TOLERANCE: f64 = 1e-10;

/// A measurement outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Measurement yielded 0
    Zero,
    /// Measurement yielded 1
    One,
}

/// Eigen-decomposition of a Hermitian 2x2 observable
///
/// Only the eigenvalues are kept: the probability of the upper outcome
/// follows from the exact expectation as (⟨A⟩ - λ₋) / (λ₊ - λ₋).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spectrum {
    pub lower: f64,
    pub upper: f64,
}

impl Spectrum {
    /// Eigenvalues of a single-qubit Hermitian observable
    pub fn of(observable: &Array2<Complex64>) -> Result<Self> {
        check_single_qubit_hermitian(observable)?;

        let a = observable[[0, 0]].re;
        let d = observable[[1, 1]].re;
        let b = observable[[0, 1]];

        let mean = 0.5 * (a + d);
        let radius = (0.25 * (a - d) * (a - d) + b.norm_sqr()).sqrt();

        Ok(Spectrum {
            lower: mean - radius,
            upper: mean + radius,
        })
    }

    /// Whether the observable is a multiple of the identity
    pub fn is_degenerate(&self) -> bool {
        (self.upper - self.lower).abs() < HERMITIAN_TOLERANCE
    }
}

fn check_single_qubit_hermitian(observable: &Array2<Complex64>) -> Result<()> {
    if observable.shape() != [2, 2] {
        return Err(StatePrepError::DimensionMismatch(format!(
            "single-qubit observable must be 2x2, got {}x{}",
            observable.shape()[0],
            observable.shape()[1]
        )));
    }

    for i in 0..2 {
        for j in 0..2 {
            if (observable[[i, j]] - observable[[j, i]].conj()).norm() > HERMITIAN_TOLERANCE {
                return Err(StatePrepError::NonHermitian);
            }
        }
    }

    Ok(())
}

/// A statevector simulator for quantum circuits
#[derive(Clone, Debug)]
pub struct StatevectorSimulator {
    /// The current state of the simulator
    state: StateVector,
}

impl StatevectorSimulator {
    /// Create a new statevector simulator in |0...0⟩
    pub fn new(qubit_count: usize) -> Result<Self> {
        Ok(StatevectorSimulator {
            state: StateVector::zero_state(qubit_count)?,
        })
    }

    /// Get the current state vector
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    /// Get the number of qubits in the simulator
    pub fn qubit_count(&self) -> usize {
        self.state.qubit_count()
    }

    /// Apply a quantum circuit to the current state
    pub fn run_circuit(&mut self, circuit: &QuantumCircuit) -> Result<()> {
        if circuit.qubit_count > self.qubit_count() {
            return Err(StatePrepError::DimensionMismatch(format!(
                "circuit has {} qubits, but simulator has only {}",
                circuit.qubit_count,
                self.qubit_count()
            )));
        }

        self.state = circuit.apply(&self.state)?;
        Ok(())
    }

    fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.qubit_count() {
            return Err(StatePrepError::QubitOutOfRange {
                qubit,
                qubit_count: self.qubit_count(),
            });
        }
        Ok(())
    }

    /// Outcome probabilities of measuring one qubit in the computational basis
    pub fn measure_qubit_probability(&self, qubit: usize) -> Result<HashMap<Outcome, f64>> {
        self.check_qubit(qubit)?;

        let shift = self.qubit_count() - 1 - qubit;
        let mut prob_zero = 0.0;
        let mut prob_one = 0.0;

        for i in 0..self.state.dimension() {
            let prob = self.state.probability(i);
            if (i >> shift) & 1 == 0 {
                prob_zero += prob;
            } else {
                prob_one += prob;
            }
        }

        let mut probabilities = HashMap::new();
        probabilities.insert(Outcome::Zero, prob_zero);
        probabilities.insert(Outcome::One, prob_one);
        Ok(probabilities)
    }

    /// Reduced density matrix of one qubit
    pub fn reduced_density_matrix(&self, qubit: usize) -> Result<DensityMatrix> {
        DensityMatrix::reduced_qubit(&self.state, qubit)
    }

    /// Exact expectation value of a Hermitian observable on a single qubit
    pub fn expectation_value_single_qubit(&self, observable: &Array2<Complex64>, qubit: usize) -> Result<f64> {
        self.check_qubit(qubit)?;
        check_single_qubit_hermitian(observable)?;

        // Z can be read off the measurement probabilities
        if is_z_operator(observable) {
            let probabilities = self.measure_qubit_probability(qubit)?;
            return Ok(probabilities[&Outcome::Zero] - probabilities[&Outcome::One]);
        }

        // ⟨A⟩ = Tr(ρA) with ρ the reduced state of `qubit`
        let reduced = self.reduced_density_matrix(qubit)?;
        let rho = reduced.matrix();
        let mut expectation = Complex64::new(0.0, 0.0);
        for i in 0..2 {
            for j in 0..2 {
                expectation += rho[[i, j]] * observable[[j, i]];
            }
        }

        Ok(expectation.re)
    }

    /// Estimate a single-qubit expectation value from `shots` measurements
    ///
    /// Each shot measures the observable in its eigenbasis, so the estimate
    /// is λ₋ + (λ₊ - λ₋) k / shots with k the number of upper outcomes.
    pub fn sample_expectation_single_qubit<R: Rng>(
        &self,
        observable: &Array2<Complex64>,
        qubit: usize,
        shots: usize,
        rng: &mut R,
    ) -> Result<f64> {
        if shots == 0 {
            return Err(StatePrepError::InvalidConfig("shot count must be positive".to_string()));
        }

        let spectrum = Spectrum::of(observable)?;
        let exact = self.expectation_value_single_qubit(observable, qubit)?;
        if spectrum.is_degenerate() {
            return Ok(spectrum.lower);
        }

        let gap = spectrum.upper - spectrum.lower;
        let p_upper = ((exact - spectrum.lower) / gap).clamp(0.0, 1.0);
        let binomial = Binomial::new(shots as u64, p_upper)
            .map_err(|e| StatePrepError::Sampling(e.to_string()))?;
        let upper_count = binomial.sample(rng);

        Ok(spectrum.lower + gap * upper_count as f64 / shots as f64)
    }
}

fn is_z_operator(observable: &Array2<Complex64>) -> bool {
    let z00 = Complex64::new(1.0, 0.0);
    let z11 = Complex64::new(-1.0, 0.0);
    let zero = Complex64::new(0.0, 0.0);

    (observable[[0, 0]] - z00).norm_sqr() < 1e-10
        && (observable[[0, 1]] - zero).norm_sqr() < 1e-10
        && (observable[[1, 0]] - zero).norm_sqr() < 1e-10
        && (observable[[1, 1]] - z11).norm_sqr() < 1e-10
}
