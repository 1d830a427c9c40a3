//! Classical optimization pieces driving the variational circuit
//!
//! Loss functions compare prepared and target Bloch vectors; optimizers
//! turn loss gradients into parameter updates.

pub mod loss;
pub mod optimizer;

pub use loss::{loss_for, AbsoluteDeviation, LossFunction, MeanSquaredError};
pub use optimizer::{Adam, Optimizer};
