//! Variational preparation of a single-qubit state with a chosen purity
//!
//! A random target Bloch vector is drawn with norm √(2p - 1). A layered
//! ansatz on `qubits` wires is trained so that the reduced state of wire 0
//! reproduces it. The extra wires act as an environment, which lets a
//! unitary circuit prepare mixed states on wire 0.

pub mod ansatz;
pub mod cost;
pub mod target;
pub mod training;

use rand::Rng;
use serde::Serialize;
use tracing::info;

pub use ansatz::AnsatzParameters;
pub use cost::{BlochCost, CostGradient};
pub use target::BlochVector;
pub use training::{Progress, Trainer, TrainingReport};

use crate::config::ExperimentConfig;
use crate::error::Result;
use crate::machine_learning::loss::loss_for;
use crate::machine_learning::optimizer::Adam;
use crate::simulators::Device;

/// Result of a complete run
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentOutcome {
    pub target: BlochVector,
    /// Bloch vector produced by the best parameters, estimated by the device
    pub output: [f64; 3],
    pub report: TrainingReport,
}

/// Generate a target, train the ansatz and measure the result
///
/// `on_progress` sees the cost at step 0 and at every reported step.
pub fn run_experiment<R, F>(config: &ExperimentConfig, rng: &mut R, on_progress: F) -> Result<ExperimentOutcome>
where
    R: Rng,
    F: FnMut(Progress),
{
    config.validate()?;

    let target = BlochVector::random_with_purity(config.purity, rng)?;
    info!(%target, purity = config.purity, "generated target Bloch vector");

    let initial = AnsatzParameters::random_normal(config.qubits, config.layers, config.init_std, rng)?;
    let device = Device::new(config.qubits, config.shots())?;
    let cost = BlochCost::new(target, device, config.layers, loss_for(config.loss));

    let mut trainer = Trainer::new(
        Box::new(Adam::from_config(&config.adam)),
        config.steps,
        config.report_every,
    )?;
    let report = trainer.run(&cost, initial, rng, on_progress)?;

    let output = cost.bloch_vector(&report.best_params, rng)?;

    Ok(ExperimentOutcome {
        target,
        output: [output[0], output[1], output[2]],
        report,
    })
}
