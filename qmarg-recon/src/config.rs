//! Reconstruction configuration

use crate::error::{ReconError, Result};
use crate::power::PowerIterationOptions;
use serde::{Deserialize, Serialize};

/// How the aggregated operator is represented during the iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorMode {
    /// Build the 2^n × 2^n matrix once and multiply by it
    #[default]
    Dense,
    /// Keep the window operators and apply them in place
    MatrixFree,
}

/// Configuration for the marginal reconstructor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionConfig {
    /// Maximum number of power-iteration steps
    ///
    /// The iterate reached when the budget runs out is returned as is.
    ///
    /// Default: 100
    pub max_iterations: usize,

    /// Convergence threshold on the estimated eigenvector error ‖Rv - λv‖/(1 - ρ)
    ///
    /// Default: 0.1
    pub tolerance: f64,

    /// Random number generator seed for the starting vector
    ///
    /// If None, seeds from entropy. Set to Some(seed) for deterministic results.
    ///
    /// Default: None (random)
    pub seed: Option<u64>,

    /// Representation of the aggregated operator
    ///
    /// Dense costs 4^n memory; matrix-free keeps only the window operators.
    ///
    /// Default: Dense
    pub operator: OperatorMode,

    /// Keep the per-step residual in the convergence report
    ///
    /// Default: false
    pub record_history: bool,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 0.1,
            seed: None,
            operator: OperatorMode::Dense,
            record_history: false,
        }
    }
}

impl ReconstructionConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration that iterates to near machine precision
    ///
    /// - 10 000 iterations
    /// - Tolerance 1e-10
    pub fn accurate() -> Self {
        Self {
            max_iterations: 10_000,
            tolerance: 1e-10,
            ..Default::default()
        }
    }

    /// Create a configuration for debugging
    ///
    /// - Deterministic seed
    /// - Per-step history recorded
    pub fn debug() -> Self {
        Self {
            seed: Some(42),
            record_history: true,
            ..Default::default()
        }
    }

    /// Set the iteration budget
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the random seed for deterministic execution
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Choose the operator representation
    pub fn with_operator(mut self, operator: OperatorMode) -> Self {
        self.operator = operator;
        self
    }

    /// Enable or disable history recording
    pub fn with_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(ReconError::InvalidConfig(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    /// Loop controls for the power iteration
    pub fn power_options(&self) -> PowerIterationOptions {
        PowerIterationOptions {
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
            record_history: self.record_history,
        }
    }
}
