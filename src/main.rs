//! stateprep binary: prepare a random mixed single-qubit state variationally

use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};

use stateprep::config::{ExperimentConfig, LossKind};
use stateprep::state_preparation::{run_experiment, BlochVector, Progress};

#[derive(Parser)]
#[command(name = "stateprep")]
#[command(about = "Train a layered circuit to prepare a target single-qubit mixed state")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Optimizer steps
    #[arg(long)]
    steps: Option<usize>,

    /// Shots per expectation value (0 for exact expectations)
    #[arg(long)]
    shots: Option<usize>,

    /// Purity of the target state, in [0.5, 1]
    #[arg(long)]
    purity: Option<f64>,

    /// Register size
    #[arg(long)]
    qubits: Option<usize>,

    /// Ansatz layers
    #[arg(long)]
    layers: Option<usize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Adam step size
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Print progress every this many steps
    #[arg(long)]
    report_every: Option<usize>,

    /// Cost function
    #[arg(long, value_parser = parse_loss)]
    loss: Option<LossKind>,

    /// Logging level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn parse_loss(s: &str) -> Result<LossKind, String> {
    match s {
        "l1" => Ok(LossKind::L1),
        "mse" => Ok(LossKind::Mse),
        other => Err(format!("unknown loss '{}', expected 'l1' or 'mse'", other)),
    }
}

impl Args {
    fn resolve_config(&self) -> stateprep::Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::from_file(path)?,
            None => ExperimentConfig::default(),
        };

        if let Some(steps) = self.steps {
            config.steps = steps;
        }
        if let Some(shots) = self.shots {
            config.shots = shots;
        }
        if let Some(purity) = self.purity {
            config.purity = purity;
        }
        if let Some(qubits) = self.qubits {
            config.qubits = qubits;
        }
        if let Some(layers) = self.layers {
            config.layers = layers;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(learning_rate) = self.learning_rate {
            config.adam.learning_rate = learning_rate;
        }
        if let Some(report_every) = self.report_every {
            config.report_every = report_every;
        }
        if let Some(loss) = self.loss {
            config.loss = loss;
        }

        config.validate()?;
        Ok(config)
    }
}

fn progress_line(progress: &Progress) -> String {
    format!("Cost after {} steps is {:.4}", progress.step, progress.cost)
}

fn bloch_line(label: &str, vector: &BlochVector) -> String {
    format!("{} Bloch vector = {}", label, vector)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        version = stateprep::VERSION,
        qubits = config.qubits,
        layers = config.layers,
        steps = config.steps,
        shots = config.shots,
        "Starting state preparation"
    );

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let outcome = match run_experiment(&config, &mut rng, |progress| {
        println!("{}", progress_line(&progress));
    }) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("State preparation failed: {}", e);
            return Err(e.into());
        }
    };

    println!("{}", bloch_line("Target", &outcome.target));
    println!("{}", bloch_line("Output", &BlochVector(outcome.output)));

    Ok(())
}
