//! Error types for state preparation runs

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, StatePrepError>;

/// Errors raised while building, simulating or optimizing a circuit
#[derive(Debug, Error)]
pub enum StatePrepError {
    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Parameter array has the wrong shape for the ansatz
    #[error("parameter shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Qubit index outside the register
    #[error("qubit index {qubit} out of range for {qubit_count}-qubit register")]
    QubitOutOfRange { qubit: usize, qubit_count: usize },

    /// Matrix or vector dimensions do not line up
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Observable is not Hermitian
    #[error("observable is not Hermitian")]
    NonHermitian,

    /// Bloch vector outside the closed unit ball, or not finite
    #[error("Bloch vector {components:?} has norm {norm}, outside the unit ball")]
    InvalidBlochVector { components: [f64; 3], norm: f64 },

    /// State vector does not have unit norm
    #[error("state vector is not normalized (norm^2 = {0})")]
    NotNormalized(f64),

    /// Config file could not be read
    #[error("failed to read config file '{path}': {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for `ExperimentConfig`
    #[error("failed to parse config file '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A sampling distribution rejected its parameters
    #[error("sampling error: {0}")]
    Sampling(String),
}
