//! Loss functions comparing prepared and target Bloch vectors

use ndarray::Array1;

use crate::config::LossKind;

/// Trait for loss functions
pub trait LossFunction: Send + Sync {
    /// Calculate the loss between predictions and targets
    fn calculate_loss(&self, predictions: &Array1<f64>, targets: &Array1<f64>) -> f64;

    /// Calculate gradients of the loss with respect to predictions
    fn calculate_gradients(&self, predictions: &Array1<f64>, targets: &Array1<f64>) -> Array1<f64>;
}

/// Sum of absolute differences, Σ |pᵢ - tᵢ|
///
/// The gradient uses sign(0) = 0 at the kink.
#[derive(Debug, Clone, Copy)]
pub struct AbsoluteDeviation;

impl LossFunction for AbsoluteDeviation {
    fn calculate_loss(&self, predictions: &Array1<f64>, targets: &Array1<f64>) -> f64 {
        (predictions - targets).mapv(f64::abs).sum()
    }

    fn calculate_gradients(&self, predictions: &Array1<f64>, targets: &Array1<f64>) -> Array1<f64> {
        (predictions - targets).mapv(|d| if d == 0.0 { 0.0 } else { d.signum() })
    }
}

/// Mean Squared Error loss
#[derive(Debug, Clone, Copy)]
pub struct MeanSquaredError;

impl LossFunction for MeanSquaredError {
    fn calculate_loss(&self, predictions: &Array1<f64>, targets: &Array1<f64>) -> f64 {
        let diff = predictions - targets;
        diff.mapv(|x| x * x).sum() / predictions.len() as f64
    }

    fn calculate_gradients(&self, predictions: &Array1<f64>, targets: &Array1<f64>) -> Array1<f64> {
        let diff = predictions - targets;
        2.0 * diff / predictions.len() as f64
    }
}

/// Loss implementation for a configured kind
pub fn loss_for(kind: LossKind) -> Box<dyn LossFunction> {
    match kind {
        LossKind::L1 => Box::new(AbsoluteDeviation),
        LossKind::Mse => Box::new(MeanSquaredError),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn absolute_deviation_sums_component_gaps() {
        let p = array![0.1, -0.2, 0.5];
        let t = array![0.3, -0.2, 0.0];
        assert!((AbsoluteDeviation.calculate_loss(&p, &t) - 0.7).abs() < 1e-12);
        assert_eq!(AbsoluteDeviation.calculate_gradients(&p, &t), array![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn mse_gradient_matches_definition() {
        let p = array![1.0, 2.0];
        let t = array![0.0, 0.0];
        assert!((MeanSquaredError.calculate_loss(&p, &t) - 2.5).abs() < 1e-12);
        assert_eq!(MeanSquaredError.calculate_gradients(&p, &t), array![1.0, 2.0]);
    }

    #[test]
    fn losses_are_zero_on_target() {
        let t = array![0.2, 0.4, -0.1];
        for kind in [LossKind::L1, LossKind::Mse] {
            assert_eq!(loss_for(kind).calculate_loss(&t, &t), 0.0);
        }
    }
}
