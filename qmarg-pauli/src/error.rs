//! Error types for Pauli operations

use qmarg_state::StateError;
use thiserror::Error;

/// Errors that can occur while enumerating or projecting onto Paulis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PauliError {
    /// Character other than I, X, Y or Z
    #[error("Invalid Pauli character '{0}'")]
    InvalidPauliChar(char),

    /// Zero qubits for the Pauli group, or more than a `usize` index can address
    #[error("Invalid qubit count {num_qubits} for the Pauli group")]
    InvalidQubitCount { num_qubits: usize },

    /// Basis state index outside 0..2^n
    #[error("Basis state {state} out of range for {num_qubits} qubits")]
    BasisStateOutOfRange { state: usize, num_qubits: usize },

    /// Group index outside 0..4^n
    #[error("Pauli group index {index} out of range for {num_qubits} qubits")]
    IndexOutOfRange { index: usize, num_qubits: usize },

    /// Error from the underlying matrix layer
    #[error(transparent)]
    State(#[from] StateError),
}

/// Result type for Pauli operations
pub type Result<T> = std::result::Result<T, PauliError>;
