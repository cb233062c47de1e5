//! Pauli-group utilities for verifying density-matrix reconstructions
//!
//! This crate enumerates the n-qubit Pauli group lazily and projects
//! matrices onto it. Summing the projections of a matrix over the whole
//! group returns the matrix itself, which gives an independent exactness
//! check for anything that produces density matrices.
//!
//! # Example
//!
//! ```
//! use qmarg_pauli::{pauli_group, pauli_proj};
//! use qmarg_state::{ComplexMatrix, DensityMatrix};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7777);
//! let rho = DensityMatrix::random(2, &mut rng).unwrap();
//!
//! let mut total = ComplexMatrix::zeros(4);
//! for p in pauli_group(2).unwrap() {
//!     total += &pauli_proj(rho.matrix(), &p).unwrap();
//! }
//! assert!(total.max_abs_diff(rho.matrix()).unwrap() < 1e-13);
//! ```

pub mod error;
pub mod group;
pub mod pauli;
pub mod projection;

pub use error::{PauliError, Result};
pub use group::{pauli_group, PauliGroup, PauliStrings};
pub use pauli::{Pauli, PauliString};
pub use projection::{
    from_pauli_terms, pauli_coefficient, pauli_decomposition, pauli_proj,
    resum_pauli_decomposition,
};
