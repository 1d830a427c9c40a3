//! Run configuration
//!
//! Every field has a default, so a TOML file only needs the values it
//! wants to change:
//!
//! ```toml
//! purity = 0.8
//! steps = 100
//! shots = 0      # analytic expectations
//! loss = "mse"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatePrepError};

pub use crate::quantum::state::MAX_QUBITS;

/// Cost used to compare the prepared Bloch vector with the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LossKind {
    /// Sum of absolute component differences
    #[default]
    L1,
    /// Mean squared component difference
    Mse,
}

/// Adam hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdamConfig {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
}

impl Default for AdamConfig {
    fn default() -> Self {
        AdamConfig {
            learning_rate: 0.01,
            beta1: 0.9,
            beta2: 0.99,
            epsilon: 1e-8,
        }
    }
}

/// Complete description of one state preparation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Purity Tr(ρ²) of the target state, in [0.5, 1]
    pub purity: f64,
    /// Register size; qubit 0 carries the prepared state
    pub qubits: usize,
    /// Number of ansatz layers
    pub layers: usize,
    /// Optimizer steps
    pub steps: usize,
    /// Samples per expectation value, 0 for exact expectations
    pub shots: usize,
    /// Standard deviation of the initial parameters
    pub init_std: f64,
    /// Print progress every this many steps
    pub report_every: usize,
    /// Seed for the run's random number generator
    pub seed: Option<u64>,
    pub loss: LossKind,
    pub adam: AdamConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            purity: 0.66,
            qubits: 3,
            layers: 2,
            steps: 200,
            shots: 1000,
            init_std: std::f64::consts::PI,
            report_every: 10,
            seed: None,
            loss: LossKind::L1,
            adam: AdamConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Load a configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| StatePrepError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;

        let config: ExperimentConfig =
            toml::from_str(&content).map_err(|source| StatePrepError::ConfigParse {
                path: path.display().to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Shot count as the device expects it
    pub fn shots(&self) -> Option<usize> {
        if self.shots == 0 {
            None
        } else {
            Some(self.shots)
        }
    }

    /// Check every field for a usable value
    pub fn validate(&self) -> Result<()> {
        if !self.purity.is_finite() || !(0.5..=1.0).contains(&self.purity) {
            return Err(StatePrepError::InvalidConfig(format!(
                "purity must lie in [0.5, 1], got {}",
                self.purity
            )));
        }

        if self.qubits == 0 || self.qubits > MAX_QUBITS {
            return Err(StatePrepError::InvalidConfig(format!(
                "qubit count must lie in 1..={}, got {}",
                MAX_QUBITS, self.qubits
            )));
        }

        if self.layers == 0 {
            return Err(StatePrepError::InvalidConfig(
                "at least one ansatz layer is required".to_string(),
            ));
        }

        if self.report_every == 0 {
            return Err(StatePrepError::InvalidConfig(
                "report_every must be positive".to_string(),
            ));
        }

        if !self.init_std.is_finite() || self.init_std < 0.0 {
            return Err(StatePrepError::InvalidConfig(format!(
                "init_std must be a non-negative finite number, got {}",
                self.init_std
            )));
        }

        let adam = &self.adam;
        if !adam.learning_rate.is_finite() || adam.learning_rate <= 0.0 {
            return Err(StatePrepError::InvalidConfig(format!(
                "learning rate must be positive, got {}",
                adam.learning_rate
            )));
        }
        for (name, beta) in [("beta1", adam.beta1), ("beta2", adam.beta2)] {
            if !beta.is_finite() || !(0.0..1.0).contains(&beta) {
                return Err(StatePrepError::InvalidConfig(format!(
                    "{} must lie in [0, 1), got {}",
                    name, beta
                )));
            }
        }
        if !adam.epsilon.is_finite() || adam.epsilon <= 0.0 {
            return Err(StatePrepError::InvalidConfig(format!(
                "epsilon must be positive, got {}",
                adam.epsilon
            )));
        }

        Ok(())
    }
}
