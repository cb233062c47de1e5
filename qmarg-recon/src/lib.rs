//! Pure-state reconstruction from contiguous-window marginals
//!
//! Given the reduced density matrices σᵢ of every window of K adjacent qubits
//! in an n-qubit register, this crate forms the aggregated operator
//!
//! ```text
//! R = Σᵢ I_{2^i} ⊗ σᵢ ⊗ I_{2^(n-K-i)}
//! ```
//!
//! and returns its dominant eigenvector, found by phase-aligned power
//! iteration, as the estimate of the global pure state.
//!
//! # Example
//!
//! ```
//! use qmarg_recon::{Reconstructor, ReconstructionConfig, OperatorMode};
//! use qmarg_state::{LocalMarginals, PureState};
//! use num_complex::Complex64;
//!
//! let h = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
//! let target = PureState::product(&[[h, h]; 4]).unwrap();
//!
//! let config = ReconstructionConfig::accurate()
//!     .with_seed(2024)
//!     .with_operator(OperatorMode::MatrixFree);
//! let result = Reconstructor::new(config)
//!     .unwrap()
//!     .reconstruct(2, target.marginals(2).unwrap(), 4)
//!     .unwrap();
//!
//! assert!(result.is_converged());
//! assert!(result.fidelity(&target).unwrap() > 0.999);
//! ```

pub mod config;
pub mod convergence;
pub mod embedding;
pub mod error;
pub mod operator;
pub mod power;
pub mod reconstructor;

pub use config::{OperatorMode, ReconstructionConfig};
pub use convergence::{ConvergenceMonitor, ConvergenceReport, StoppingCriterion};
pub use embedding::{embed_window, r_hat, WindowGeometry};
pub use error::{ReconError, Result};
pub use operator::{EmbeddedMarginals, LinearOperator};
pub use power::{power_iteration, PowerIteration, PowerIterationOptions};
pub use reconstructor::{iteration, Reconstruction, Reconstructor};
