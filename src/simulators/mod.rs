//! Quantum circuit simulators
//!
//! This module provides the statevector simulator and the device wrapper
//! that chooses between exact and shot-based expectation values.

pub mod device;
pub mod statevector;

pub use device::Device;
pub use statevector::{Outcome, Spectrum, StatevectorSimulator};
