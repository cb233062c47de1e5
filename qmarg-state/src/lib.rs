//! Dense complex matrices, quantum states and local marginals
//!
//! This crate provides the linear-algebra objects shared by the qmarg
//! workspace: a row-major [`ComplexMatrix`], [`DensityMatrix`] and
//! [`PureState`] representations, and the partial traces that turn a state
//! into its contiguous-window marginals.
//!
//! # Qubit ordering
//!
//! Qubit 0 is the left-most tensor factor, i.e. the most significant bit of a
//! basis index. A window of K qubits at offset i covers qubits i..i+K-1 and
//! corresponds to the operator `I_{2^i} ⊗ σ ⊗ I_{2^(n-K-i)}`.
//!
//! # Example
//!
//! ```
//! use qmarg_state::{LocalMarginals, PureState};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let state = PureState::random(4, &mut rng).unwrap();
//!
//! let sigmas: Vec<_> = state.marginals(2).unwrap().collect();
//! assert_eq!(sigmas.len(), 3);
//! ```

pub mod density_matrix;
pub mod error;
pub mod marginal;
pub mod matrix;
pub mod pure_state;
pub mod validation;

pub use density_matrix::DensityMatrix;
pub use error::{qubits_for_dimension, Result, StateError};
pub use marginal::{LocalMarginals, Marginals, WindowLayout};
pub use matrix::ComplexMatrix;
pub use pure_state::PureState;
