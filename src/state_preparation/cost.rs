//! Cost of a parameter set: distance between the Bloch vector the circuit
//! prepares on wire 0 and the target

use num_complex::Complex64;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::Rng;

use crate::error::Result;
use crate::machine_learning::loss::LossFunction;
use crate::quantum::differentiation::{parameter_shift_jacobian, ParameterShiftConfig};
use crate::quantum::gate::constants::pauli_matrices;
use crate::simulators::Device;
use crate::state_preparation::ansatz::AnsatzParameters;
use crate::state_preparation::target::BlochVector;

/// Wire whose reduced state is compared with the target
pub const OUTPUT_WIRE: usize = 0;

/// Cost and gradient at one parameter point
#[derive(Debug, Clone)]
pub struct CostGradient {
    pub cost: f64,
    pub gradient: Vec<f64>,
}

pub struct BlochCost {
    target: BlochVector,
    observables: [Array2<Complex64>; 3],
    device: Device,
    layers: usize,
    loss: Box<dyn LossFunction>,
    shift: ParameterShiftConfig,
}

impl BlochCost {
    pub fn new(target: BlochVector, device: Device, layers: usize, loss: Box<dyn LossFunction>) -> Self {
        BlochCost {
            target,
            observables: pauli_matrices(),
            device,
            layers,
            loss,
            shift: ParameterShiftConfig::default(),
        }
    }

    /// (⟨X⟩, ⟨Y⟩, ⟨Z⟩) on the output wire, estimated by the device
    pub fn bloch_vector<R: Rng>(&self, params: &AnsatzParameters, rng: &mut R) -> Result<Array1<f64>> {
        params.check_shape(self.device.wires(), self.layers)?;
        let circuit = params.circuit()?;
        self.device.expectations(&circuit, &self.observables, OUTPUT_WIRE, rng)
    }

    /// Exact Bloch vector of the reduced state on the output wire
    pub fn exact_bloch_vector(&self, params: &AnsatzParameters) -> Result<BlochVector> {
        params.check_shape(self.device.wires(), self.layers)?;
        let simulator = self.device.execute(&params.circuit()?)?;
        let reduced = simulator.reduced_density_matrix(OUTPUT_WIRE)?;
        BlochVector::new(reduced.bloch_vector()?)
    }

    fn cost_of(&self, bloch: &Array1<f64>) -> f64 {
        self.loss.calculate_loss(bloch, &self.target.to_array())
    }

    pub fn evaluate<R: Rng>(&self, params: &AnsatzParameters, rng: &mut R) -> Result<f64> {
        let bloch = self.bloch_vector(params, rng)?;
        Ok(self.cost_of(&bloch))
    }

    /// Cost and its gradient with respect to every angle, row-major
    ///
    /// Chain rule through the loss: ∂C/∂θ = Σₖ ∂L/∂aₖ · ∂⟨σₖ⟩/∂θ, with the
    /// expectation derivatives from the parameter-shift rule.
    pub fn gradient<R: Rng>(&self, params: &AnsatzParameters, rng: &mut R) -> Result<CostGradient> {
        let bloch = self.bloch_vector(params, rng)?;
        let target = self.target.to_array();
        let cost = self.loss.calculate_loss(&bloch, &target);
        let outer = self.loss.calculate_gradients(&bloch, &target);

        let (qubits, layers) = (params.qubit_count(), params.layer_count());
        let evaluate = |flat: &[f64], rng: &mut StdRng| -> Result<Array1<f64>> {
            let shifted = AnsatzParameters::from_flat(qubits, layers, flat)?;
            self.bloch_vector(&shifted, rng)
        };

        let jacobian = parameter_shift_jacobian(evaluate, &params.to_flat(), self.observables.len(), &self.shift, rng)?;
        let gradient = jacobian.t().dot(&outer);

        Ok(CostGradient {
            cost,
            gradient: gradient.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine_learning::loss::{AbsoluteDeviation, MeanSquaredError};
    use rand::SeedableRng;

    fn analytic_cost(target: [f64; 3]) -> BlochCost {
        BlochCost::new(
            BlochVector::new(target).unwrap(),
            Device::analytic(3).unwrap(),
            2,
            Box::new(MeanSquaredError),
        )
    }

    #[test]
    fn all_zero_angles_prepare_ket_zero() {
        let cost = analytic_cost([0.0, 0.0, 1.0]);
        let params = AnsatzParameters::zeros(3, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let bloch = cost.bloch_vector(&params, &mut rng).unwrap();
        assert!((bloch[2] - 1.0).abs() < 1e-12);
        assert!(cost.evaluate(&params, &mut rng).unwrap().abs() < 1e-12);
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let cost = analytic_cost([0.0, 0.0, 0.5]);
        let params = AnsatzParameters::zeros(2, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(cost.evaluate(&params, &mut rng).is_err());
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let cost = analytic_cost([0.3, -0.2, 0.1]);
        let mut rng = StdRng::seed_from_u64(21);
        let params = AnsatzParameters::random_normal(3, 2, 1.0, &mut rng).unwrap();

        let analytic = cost.gradient(&params, &mut rng).unwrap();
        let flat = params.to_flat();
        let h = 1e-5;

        for i in 0..flat.len() {
            let mut plus = flat.clone();
            plus[i] += h;
            let mut minus = flat.clone();
            minus[i] -= h;
            let c_plus = cost.evaluate(&AnsatzParameters::from_flat(3, 2, &plus).unwrap(), &mut rng).unwrap();
            let c_minus = cost.evaluate(&AnsatzParameters::from_flat(3, 2, &minus).unwrap(), &mut rng).unwrap();
            let numeric = (c_plus - c_minus) / (2.0 * h);
            assert!(
                (analytic.gradient[i] - numeric).abs() < 1e-6,
                "parameter {}: shift {} vs finite difference {}",
                i,
                analytic.gradient[i],
                numeric
            );
        }
    }

    #[test]
    fn sampled_bloch_vector_agrees_with_reduced_state() {
        let target = BlochVector::new([0.1, 0.2, 0.3]).unwrap();
        let mut rng = StdRng::seed_from_u64(77);
        let params = AnsatzParameters::random_normal(3, 2, 1.0, &mut rng).unwrap();

        let sampled = BlochCost::new(target, Device::new(3, Some(20_000)).unwrap(), 2, Box::new(AbsoluteDeviation));
        let exact = sampled.exact_bloch_vector(&params).unwrap();
        let estimate = sampled.bloch_vector(&params, &mut rng).unwrap();

        // Standard error is at most 1/sqrt(20000) ≈ 0.007
        for k in 0..3 {
            assert!((estimate[k] - exact.0[k]).abs() < 0.05);
        }
    }
}
