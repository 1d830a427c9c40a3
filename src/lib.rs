//! Variational state preparation on a statevector simulator
//!
//! This crate trains a layered rotation/CNOT circuit so that one qubit of
//! the register ends up in a target mixed state, given by its Bloch vector.
//! It includes the pieces such a run needs: gates and circuits, a
//! statevector simulator with exact or shot-based expectation values,
//! parameter-shift gradients and the Adam optimizer.

pub mod config;
pub mod error;
pub mod quantum;
pub mod simulators;
pub mod machine_learning;
pub mod state_preparation;

pub use error::{Result, StatePrepError};

// Create a prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ExperimentConfig, LossKind};
    pub use crate::error::{Result, StatePrepError};
    pub use crate::quantum::prelude::*;
    pub use crate::simulators::{Device, StatevectorSimulator};
    pub use crate::state_preparation::{
        run_experiment, AnsatzParameters, BlochCost, BlochVector, ExperimentOutcome, Trainer, TrainingReport,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
