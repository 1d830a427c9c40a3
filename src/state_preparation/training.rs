//! Optimization loop
//!
//! Each step computes the gradient at the current parameters, lets the
//! optimizer update them, then re-evaluates the cost. The lowest cost seen
//! (including the initial one) and its parameters are kept, since the last
//! iterate of a noisy run is rarely the best.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, StatePrepError};
use crate::machine_learning::optimizer::Optimizer;
use crate::state_preparation::ansatz::AnsatzParameters;
use crate::state_preparation::cost::BlochCost;

/// Cost after a given number of completed steps
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub step: usize,
    pub cost: f64,
}

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub initial_cost: f64,
    pub final_cost: f64,
    pub best_cost: f64,
    /// Completed steps when the best cost was reached, 0 for the start point
    pub best_step: usize,
    /// Costs at the reporting cadence, starting with step 0
    pub history: Vec<Progress>,
    /// Lowest cost seen after each number of completed steps, `steps + 1` entries
    pub best_costs: Vec<f64>,
    pub initial_params: AnsatzParameters,
    pub final_params: AnsatzParameters,
    pub best_params: AnsatzParameters,
}

pub struct Trainer {
    optimizer: Box<dyn Optimizer>,
    steps: usize,
    report_every: usize,
}

impl Trainer {
    pub fn new(optimizer: Box<dyn Optimizer>, steps: usize, report_every: usize) -> Result<Self> {
        if report_every == 0 {
            return Err(StatePrepError::InvalidConfig("report_every must be positive".to_string()));
        }

        Ok(Trainer {
            optimizer,
            steps,
            report_every,
        })
    }

    /// Whether progress after step index `n` (0-based) is reported
    pub fn is_report_step(&self, n: usize) -> bool {
        n % self.report_every == self.report_every - 1 || n + 1 == self.steps
    }

    /// Optimize `initial` against `cost`, calling `on_progress` at step 0
    /// and at every reported step
    pub fn run<R, F>(
        &mut self,
        cost: &BlochCost,
        initial: AnsatzParameters,
        rng: &mut R,
        mut on_progress: F,
    ) -> Result<TrainingReport>
    where
        R: Rng,
        F: FnMut(Progress),
    {
        let (qubits, layers) = (initial.qubit_count(), initial.layer_count());
        self.optimizer.reset();

        let initial_cost = cost.evaluate(&initial, rng)?;
        let start = Progress { step: 0, cost: initial_cost };
        on_progress(start);

        info!(
            optimizer = self.optimizer.name(),
            steps = self.steps,
            parameters = initial.len(),
            initial_cost,
            "starting optimization"
        );

        let mut history = vec![start];
        let mut flat = initial.to_flat();
        let mut current = initial.clone();
        let mut current_cost = initial_cost;
        let mut best_cost = initial_cost;
        let mut best_step = 0;
        let mut best_params = initial.clone();
        let mut best_costs = Vec::with_capacity(self.steps + 1);
        best_costs.push(best_cost);

        for n in 0..self.steps {
            let gradient = cost.gradient(&current, rng)?;
            self.optimizer.update(&mut flat, &gradient.gradient)?;
            current = AnsatzParameters::from_flat(qubits, layers, &flat)?;
            current_cost = cost.evaluate(&current, rng)?;

            debug!(step = n + 1, cost = current_cost, "optimizer step");

            if current_cost < best_cost {
                best_cost = current_cost;
                best_step = n + 1;
                best_params = current.clone();
            }
            best_costs.push(best_cost);

            if self.is_report_step(n) {
                let progress = Progress { step: n + 1, cost: current_cost };
                history.push(progress);
                on_progress(progress);
            }
        }

        info!(final_cost = current_cost, best_cost, best_step, "optimization finished");

        Ok(TrainingReport {
            initial_cost,
            final_cost: current_cost,
            best_cost,
            best_step,
            history,
            best_costs,
            initial_params: initial,
            final_params: current,
            best_params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine_learning::loss::AbsoluteDeviation;
    use crate::machine_learning::optimizer::Adam;
    use crate::simulators::Device;
    use crate::state_preparation::target::BlochVector;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn report_cadence_matches_every_tenth_and_last() {
        let trainer = Trainer::new(Box::new(Adam::default()), 25, 10).unwrap();
        let reported: Vec<usize> = (0..25).filter(|&n| trainer.is_report_step(n)).map(|n| n + 1).collect();
        assert_eq!(reported, vec![10, 20, 25]);
    }

    #[test]
    fn zero_report_interval_is_rejected() {
        assert!(Trainer::new(Box::new(Adam::default()), 5, 0).is_err());
    }

    #[test]
    fn short_sampled_run_tracks_best() {
        let mut rng = StdRng::seed_from_u64(4);
        let target = BlochVector::random_with_purity(0.66, &mut rng).unwrap();
        let cost = BlochCost::new(target, Device::new(3, Some(200)).unwrap(), 2, Box::new(AbsoluteDeviation));
        let initial = AnsatzParameters::random_normal(3, 2, std::f64::consts::PI, &mut rng).unwrap();

        let mut trainer = Trainer::new(Box::new(Adam::default()), 5, 2).unwrap();
        let mut seen = Vec::new();
        let report = trainer.run(&cost, initial, &mut rng, |p| seen.push(p.step)).unwrap();

        assert_eq!(seen, vec![0, 2, 4, 5]);
        assert_eq!(report.history.len(), 4);
        assert!(report.best_cost <= report.initial_cost);
        assert!(report.history.iter().all(|p| p.cost >= report.best_cost));
        assert_eq!(report.final_params.shape(), [3, 2, 3]);

        assert_eq!(report.best_costs.len(), 6);
        assert_eq!(report.best_costs[0], report.initial_cost);
        assert!(report.best_costs.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(report.best_costs[report.best_step], report.best_cost);
        assert_eq!(report.best_costs.last().copied(), Some(report.best_cost));
    }
}
