// src/quantum/state.rs
//! Pure state vectors over a qubit register

use std::fmt::{self, Display};
use num_complex::Complex64;
use ndarray::{Array1, Array2};

use crate::error::{Result, StatePrepError};

const NORM_TOLERANCE: f64 = 1e-10;

/// Largest register a state vector may span
pub const MAX_QUBITS: usize = 16;

fn check_register(qubit_count: usize) -> Result<usize> {
    if qubit_count > MAX_QUBITS {
        return Err(StatePrepError::DimensionMismatch(format!(
            "{} qubits exceed the {}-qubit register limit",
            qubit_count, MAX_QUBITS
        )));
    }
    Ok(1 << qubit_count)
}

/// State vector representation of a quantum state
#[derive(Clone, Debug)]
pub struct StateVector {
    /// Number of qubits
    pub qubit_count: usize,

    /// The state vector as an array of complex amplitudes
    amplitudes: Array1<Complex64>,
}

impl StateVector {
    /// Create a new state vector with the given amplitudes
    pub fn new(qubit_count: usize, amplitudes: Array1<Complex64>) -> Result<Self> {
        let expected_dim = check_register(qubit_count)?;

        if amplitudes.len() != expected_dim {
            return Err(StatePrepError::DimensionMismatch(format!(
                "state vector: expected {} amplitudes, got {}",
                expected_dim,
                amplitudes.len()
            )));
        }

        let state = StateVector { qubit_count, amplitudes };
        let norm_sqr = state.norm_sqr();
        if (norm_sqr - 1.0).abs() > NORM_TOLERANCE {
            return Err(StatePrepError::NotNormalized(norm_sqr));
        }

        Ok(state)
    }

    /// Create the computational basis state |index⟩
    pub fn computational_basis(qubit_count: usize, index: usize) -> Result<Self> {
        let dim = check_register(qubit_count)?;

        if index >= dim {
            return Err(StatePrepError::DimensionMismatch(format!(
                "basis index {} is out of range for {}-qubit state",
                index, qubit_count
            )));
        }

        let mut amplitudes = Array1::zeros(dim);
        amplitudes[index] = Complex64::new(1.0, 0.0);

        Ok(StateVector { qubit_count, amplitudes })
    }

    /// Create the zero state |00...0⟩
    pub fn zero_state(qubit_count: usize) -> Result<Self> {
        Self::computational_basis(qubit_count, 0)
    }

    /// Returns the number of qubits in this state
    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    /// Returns the dimension of the Hilbert space (2^n for n qubits)
    pub fn dimension(&self) -> usize {
        1 << self.qubit_count
    }

    /// Squared norm of the amplitude vector
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|amp| amp.norm_sqr()).sum()
    }

    /// Check that the state is normalized
    pub fn is_valid(&self) -> bool {
        (self.norm_sqr() - 1.0).abs() < NORM_TOLERANCE
    }

    /// Calculate the probability of measuring the given bit string
    pub fn probability(&self, bit_string: usize) -> f64 {
        if bit_string >= self.dimension() {
            return 0.0;
        }

        self.amplitudes[bit_string].norm_sqr()
    }

    /// Get a reference to the amplitudes
    pub fn amplitudes(&self) -> &Array1<Complex64> {
        &self.amplitudes
    }

    /// Apply a `2^k x 2^k` matrix to the `k` listed qubits
    ///
    /// `qubits[0]` is the most significant bit of the matrix index. Only
    /// the amplitudes touched by the gate are combined, so the cost is
    /// O(2^n · 2^k) rather than a full-register matrix product.
    pub fn apply_matrix(&self, matrix: &Array2<Complex64>, qubits: &[usize]) -> Result<Self> {
        let k = qubits.len();
        let sub_dim = 1 << k;

        if matrix.shape() != [sub_dim, sub_dim] {
            return Err(StatePrepError::DimensionMismatch(format!(
                "expected {}x{} matrix for {} qubits, got {}x{}",
                sub_dim,
                sub_dim,
                k,
                matrix.shape()[0],
                matrix.shape()[1]
            )));
        }

        for (t, &q) in qubits.iter().enumerate() {
            if q >= self.qubit_count {
                return Err(StatePrepError::QubitOutOfRange {
                    qubit: q,
                    qubit_count: self.qubit_count,
                });
            }
            if qubits[..t].contains(&q) {
                return Err(StatePrepError::DimensionMismatch(format!("qubit {} listed twice", q)));
            }
        }

        let masks: Vec<usize> = qubits.iter().map(|&q| 1 << (self.qubit_count - 1 - q)).collect();
        let target_mask = masks.iter().fold(0, |acc, &m| acc | m);

        // Register offset of every local basis index
        let offsets: Vec<usize> = (0..sub_dim)
            .map(|local| {
                masks
                    .iter()
                    .enumerate()
                    .filter(|&(t, _)| (local >> (k - 1 - t)) & 1 == 1)
                    .map(|(_, &m)| m)
                    .sum()
            })
            .collect();

        let mut amplitudes = self.amplitudes.clone();
        let mut local = vec![Complex64::new(0.0, 0.0); sub_dim];

        for base in (0..self.dimension()).filter(|base| base & target_mask == 0) {
            for (l, &offset) in offsets.iter().enumerate() {
                local[l] = self.amplitudes[base | offset];
            }
            for (row, &offset) in offsets.iter().enumerate() {
                amplitudes[base | offset] = (0..sub_dim).map(|col| matrix[[row, col]] * local[col]).sum();
            }
        }

        Ok(StateVector {
            qubit_count: self.qubit_count,
            amplitudes,
        })
    }
}

impl Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}-qubit state:", self.qubit_count)?;

        let threshold = 1e-10;
        let mut has_entries = false;

        for (i, amp) in self.amplitudes.iter().enumerate() {
            if amp.norm_sqr() > threshold {
                has_entries = true;
                let bit_string = format!("{:0width$b}", i, width = self.qubit_count);
                writeln!(
                    f,
                    "  ({:.6}{:+.6}i) |{}⟩ [{:.1}%]",
                    amp.re,
                    amp.im,
                    bit_string,
                    amp.norm_sqr() * 100.0
                )?;
            }
        }

        if !has_entries {
            writeln!(f, "  (zero vector)")?;
        }

        Ok(())
    }
}
