//! Error types for marginal embedding and reconstruction

use qmarg_state::StateError;
use thiserror::Error;

/// Errors raised while building the aggregated operator or reconstructing
///
/// Non-convergence of the power iteration is not an error; it is reported
/// through [`crate::ConvergenceReport`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconError {
    /// Per-operator dimension that is not a power of two of at least 2
    #[error("Invalid local operator dimension {dimension}, expected a power of 2 >= 2")]
    InvalidOperatorDimension { dimension: usize },

    /// Local operator whose size differs from the declared window size
    #[error("Local operator {index} has dimension {actual}, expected {expected}")]
    OperatorSizeMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// No local operators were supplied
    #[error("At least one local operator is required")]
    EmptyMarginals,

    /// Window width of zero or wider than the register
    #[error("Invalid window width {width} for {num_qubits} qubits")]
    InvalidWindowWidth { width: usize, num_qubits: usize },

    /// Number of marginals differs from n - K + 1
    #[error("Expected {expected} marginals, got {actual}")]
    WindowCountMismatch { expected: usize, actual: usize },

    /// Vector passed to an operator has the wrong length
    #[error("Vector length mismatch: expected {expected}, got {actual}")]
    VectorLengthMismatch { expected: usize, actual: usize },

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error from the underlying matrix layer
    #[error(transparent)]
    State(#[from] StateError),
}

/// Result type for reconstruction operations
pub type Result<T> = std::result::Result<T, ReconError>;
