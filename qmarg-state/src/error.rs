//! Error types for matrix and state operations

use thiserror::Error;

/// Errors that can occur while building or manipulating states and operators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Qubit count of zero or too large to address
    #[error("Invalid qubit count {num_qubits}")]
    InvalidQubitCount { num_qubits: usize },

    /// Invalid matrix or vector dimension
    #[error("Invalid dimension {dimension}, expected power of 2")]
    InvalidDimension { dimension: usize },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Window of qubits that does not fit inside the register
    #[error("Window of {width} qubits at offset {offset} does not fit a {num_qubits}-qubit state")]
    InvalidWindow {
        offset: usize,
        width: usize,
        num_qubits: usize,
    },

    /// Vector with zero or non-finite norm
    #[error("Vector cannot be normalized: zero or non-finite norm")]
    NotNormalizable,

    /// Memory allocation error
    #[error("Failed to allocate {size} elements for a dense matrix")]
    AllocationError { size: usize },
}

/// Result type for state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Dimension 2^num_qubits, checked against overflow
pub(crate) fn checked_dimension(num_qubits: usize) -> Result<usize> {
    if num_qubits == 0 {
        return Err(StateError::InvalidQubitCount { num_qubits });
    }
    u32::try_from(num_qubits)
        .ok()
        .and_then(|shift| 1usize.checked_shl(shift))
        .filter(|dim| dim.checked_mul(*dim).is_some())
        .ok_or(StateError::InvalidQubitCount { num_qubits })
}

/// log2 of `dimension` when it is a power of two greater than one
pub fn qubits_for_dimension(dimension: usize) -> Result<usize> {
    if dimension < 2 || !dimension.is_power_of_two() {
        return Err(StateError::InvalidDimension { dimension });
    }
    Ok(dimension.trailing_zeros() as usize)
}
