//! Gradient-based optimizers for circuit parameters
use crate::config::AdamConfig;
use crate::error::{Result, StatePrepError};

/// Trait for optimization algorithms
pub trait Optimizer: Send + Sync {
    /// Update parameters in place using gradients
    fn update(&mut self, parameters: &mut [f64], gradients: &[f64]) -> Result<()>;

    /// Reset the optimizer's internal state
    fn reset(&mut self);

    /// Short name used in log output
    fn name(&self) -> &'static str;
}

fn check_lengths(parameters: &[f64], gradients: &[f64]) -> Result<()> {
    if parameters.len() != gradients.len() {
        return Err(StatePrepError::DimensionMismatch(format!(
            "{} parameters but {} gradient entries",
            parameters.len(),
            gradients.len()
        )));
    }
    Ok(())
}

/// Adaptive Moment Estimation (Adam) optimizer
#[derive(Debug, Clone)]
pub struct Adam {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    m: Vec<f64>,        // First moment estimate
    v: Vec<f64>,        // Second moment estimate
    t: usize,           // Timestep
}

impl Adam {
    /// Creates a new Adam optimizer
    pub fn new(learning_rate: f64, beta1: f64, beta2: f64, epsilon: f64) -> Self {
        Adam {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            m: Vec::new(),
            v: Vec::new(),
            t: 0,
        }
    }

    pub fn from_config(config: &AdamConfig) -> Self {
        Adam::new(config.learning_rate, config.beta1, config.beta2, config.epsilon)
    }

    /// Number of updates applied since creation or the last reset
    pub fn timestep(&self) -> usize {
        self.t
    }
}

impl Default for Adam {
    fn default() -> Self {
        Adam::from_config(&AdamConfig::default())
    }
}

impl Optimizer for Adam {
    fn update(&mut self, parameters: &mut [f64], gradients: &[f64]) -> Result<()> {
        check_lengths(parameters, gradients)?;
        let n = parameters.len();

        if self.m.len() != n {
            self.m = vec![0.0; n];
            self.v = vec![0.0; n];
            self.t = 0;
        }

        self.t += 1;
        let bias1 = 1.0 - self.beta1.powi(self.t as i32);
        let bias2 = 1.0 - self.beta2.powi(self.t as i32);

        for i in 0..n {
            self.m[i] = self.beta1 * self.m[i] + (1.0 - self.beta1) * gradients[i];
            self.v[i] = self.beta2 * self.v[i] + (1.0 - self.beta2) * gradients[i] * gradients[i];

            let m_hat = self.m[i] / bias1;
            let v_hat = self.v[i] / bias2;

            parameters[i] -= self.learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.m.clear();
        self.v.clear();
        self.t = 0;
    }

    fn name(&self) -> &'static str {
        "adam"
    }
}
