use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f64::consts::PI;

use stateprep::config::{ExperimentConfig, LossKind};
use stateprep::machine_learning::loss::{AbsoluteDeviation, MeanSquaredError};
use stateprep::machine_learning::optimizer::Adam;
use stateprep::simulators::Device;
use stateprep::state_preparation::{run_experiment, AnsatzParameters, BlochCost, BlochVector, Trainer};

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

#[test]
fn test_target_norm_follows_purity_for_many_seeds() {
    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let target = BlochVector::random_with_purity(0.66, &mut rng).unwrap();
        assert!(approx_eq(target.norm(), (2.0 * 0.66 - 1.0_f64).sqrt(), 1e-12));
    }
}

#[test]
fn test_cost_is_non_negative_for_random_parameters() {
    let mut rng = StdRng::seed_from_u64(8);
    let target = BlochVector::random_with_purity(0.66, &mut rng).unwrap();

    let costs = [
        BlochCost::new(target, Device::analytic(3).unwrap(), 2, Box::new(AbsoluteDeviation)),
        BlochCost::new(target, Device::new(3, Some(100)).unwrap(), 2, Box::new(AbsoluteDeviation)),
        BlochCost::new(target, Device::new(3, Some(10)).unwrap(), 2, Box::new(MeanSquaredError)),
    ];

    for _ in 0..20 {
        let params = AnsatzParameters::random_normal(3, 2, 10.0, &mut rng).unwrap();
        for cost in &costs {
            let value = cost.evaluate(&params, &mut rng).unwrap();
            assert!(value >= 0.0 && value.is_finite());
        }
    }
}

#[test]
fn test_zero_steps_leave_cost_unchanged() {
    let mut rng = StdRng::seed_from_u64(13);
    let target = BlochVector::random_with_purity(0.66, &mut rng).unwrap();
    let cost = BlochCost::new(target, Device::new(3, Some(1000)).unwrap(), 2, Box::new(AbsoluteDeviation));
    let initial = AnsatzParameters::random_normal(3, 2, PI, &mut rng).unwrap();

    let mut trainer = Trainer::new(Box::new(Adam::default()), 0, 10).unwrap();
    let mut seen = Vec::new();
    let report = trainer.run(&cost, initial.clone(), &mut rng, |p| seen.push(p)).unwrap();

    assert_eq!(report.final_cost, report.initial_cost);
    assert_eq!(report.best_cost, report.initial_cost);
    assert_eq!(report.best_step, 0);
    assert_eq!(report.final_params, initial);
    assert_eq!(report.best_params, initial);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].step, 0);
}

#[test]
fn test_analytic_training_reduces_cost() {
    let mut rng = StdRng::seed_from_u64(31);
    let target = BlochVector::random_with_purity(0.66, &mut rng).unwrap();
    let cost = BlochCost::new(target, Device::analytic(3).unwrap(), 2, Box::new(AbsoluteDeviation));
    let initial = AnsatzParameters::random_normal(3, 2, PI, &mut rng).unwrap();

    let mut trainer = Trainer::new(Box::new(Adam::default()), 200, 10).unwrap();
    let report = trainer.run(&cost, initial, &mut rng, |_| {}).unwrap();

    assert!(report.best_cost < report.initial_cost);
    assert_eq!(report.history.len(), 21);
    assert_eq!(report.history.last().map(|p| p.step), Some(200));

    // Best record is the running minimum
    let best_seen = report.history.iter().map(|p| p.cost).fold(f64::INFINITY, f64::min);
    assert!(report.best_cost <= best_seen);

    // Exact Bloch vector of the best parameters stays inside the ball
    let exact = cost.exact_bloch_vector(&report.best_params).unwrap();
    assert!(exact.norm() <= 1.0 + 1e-10);
}

#[test]
fn test_run_experiment_is_reproducible_with_seed() {
    let config = ExperimentConfig {
        steps: 3,
        shots: 200,
        seed: Some(99),
        report_every: 1,
        ..Default::default()
    };

    let mut first_progress = Vec::new();
    let first = run_experiment(&config, &mut StdRng::seed_from_u64(99), |p| first_progress.push(p)).unwrap();
    let mut second_progress = Vec::new();
    let second = run_experiment(&config, &mut StdRng::seed_from_u64(99), |p| second_progress.push(p)).unwrap();

    assert_eq!(first.target, second.target);
    assert_eq!(first.output, second.output);
    assert_eq!(first_progress, second_progress);
    assert_eq!(first_progress.iter().map(|p| p.step).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    assert_eq!(first.report.initial_params.shape(), [3, 2, 3]);
}

#[test]
fn test_run_experiment_validates_config() {
    let config = ExperimentConfig {
        purity: 0.2,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(0);
    assert!(run_experiment(&config, &mut rng, |_| {}).is_err());
}

#[test]
fn test_running_best_cost_never_increases() {
    let mut rng = StdRng::seed_from_u64(17);
    let target = BlochVector::random_with_purity(0.75, &mut rng).unwrap();
    let cost = BlochCost::new(target, Device::new(3, Some(300)).unwrap(), 2, Box::new(AbsoluteDeviation));
    let initial = AnsatzParameters::random_normal(3, 2, PI, &mut rng).unwrap();

    let mut trainer = Trainer::new(Box::new(Adam::default()), 30, 7).unwrap();
    let report = trainer.run(&cost, initial, &mut rng, |_| {}).unwrap();

    assert_eq!(report.best_costs.len(), 31);
    assert_eq!(report.best_costs[0], report.initial_cost);
    for pair in report.best_costs.windows(2) {
        assert!(pair[1] <= pair[0]);
    }
    assert_eq!(report.best_costs[30], report.best_cost);
    assert!(report.history.iter().all(|p| p.cost >= report.best_cost));
}

#[test]
fn test_largest_register_runs_and_larger_is_rejected() {
    use stateprep::config::MAX_QUBITS;

    let config = ExperimentConfig {
        qubits: MAX_QUBITS,
        layers: 1,
        steps: 0,
        shots: 0,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(3);
    let outcome = run_experiment(&config, &mut rng, |_| {}).unwrap();
    assert_eq!(outcome.report.best_params.shape(), [MAX_QUBITS, 1, 3]);
    assert_eq!(outcome.report.final_cost, outcome.report.initial_cost);

    let too_wide = ExperimentConfig {
        qubits: MAX_QUBITS + 1,
        ..config
    };
    assert!(run_experiment(&too_wide, &mut rng, |_| {}).is_err());
}

#[test]
fn test_mse_loss_and_other_register_sizes() {
    let config = ExperimentConfig {
        qubits: 2,
        layers: 1,
        steps: 2,
        shots: 0,
        loss: LossKind::Mse,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(5);
    let outcome = run_experiment(&config, &mut rng, |_| {}).unwrap();

    assert_eq!(outcome.report.best_params.shape(), [2, 1, 3]);
    assert!(outcome.report.best_cost >= 0.0);
    let norm_sqr: f64 = outcome.output.iter().map(|c| c * c).sum();
    assert!(norm_sqr <= 1.0 + 1e-10);
}
