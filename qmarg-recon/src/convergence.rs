//! Convergence reporting for the power iteration
//!
//! Every reconstruction returns a [`ConvergenceReport`] so callers can tell
//! an iterate that met the tolerance from one that merely exhausted the
//! iteration budget.
//!
//! The monitor is fed the eigen-residual rₖ = ‖R vₖ - λₖ vₖ‖ of each iterate,
//! with λₖ = ⟨vₖ|R|vₖ⟩. When the iteration converges linearly the residuals
//! shrink by a roughly constant ratio ρ = rₖ/rₖ₋₁, and the remaining error is
//! estimated as rₖ/(1 - ρ). That estimate, not the raw residual, is compared
//! against the tolerance, so a small gap that slows the iteration also
//! delays the stop.
//!
//! # Example
//!
//! ```
//! use qmarg_recon::convergence::{ConvergenceMonitor, StoppingCriterion};
//!
//! let mut monitor = ConvergenceMonitor::new(0.1, true);
//! // No rate is known after a single residual
//! assert!(!monitor.record(0.5));
//! // ρ = 0.1, so the estimate is 0.05 / 0.9
//! assert!(monitor.record(0.05));
//!
//! let report = monitor.finish(StoppingCriterion::Tolerance, 2.0);
//! assert!(report.is_converged());
//! assert_eq!(report.history, vec![0.5, 0.05]);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the power iteration stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoppingCriterion {
    /// Estimated eigenvector error fell below the tolerance
    Tolerance,
    /// Maximum iterations reached
    MaxIterations,
    /// The operator mapped the iterate to zero
    Annihilated,
}

impl StoppingCriterion {
    /// Check if this represents successful convergence
    pub fn is_converged(&self) -> bool {
        matches!(self, StoppingCriterion::Tolerance)
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            StoppingCriterion::Tolerance => "Residual estimate below tolerance",
            StoppingCriterion::MaxIterations => "Maximum iterations reached",
            StoppingCriterion::Annihilated => "Operator annihilated the iterate",
        }
    }
}

impl fmt::Display for StoppingCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Outcome of a power iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceReport {
    /// Number of operator applications performed in the loop
    pub iterations: usize,
    /// Eigen-residual ‖R v - λ v‖ of the last measured iterate (infinite if none)
    pub final_residual: f64,
    /// Last rate-corrected error estimate, the value compared against the tolerance
    pub error_estimate: f64,
    /// Rayleigh quotient ⟨v|R|v⟩ of the returned vector
    pub rayleigh_quotient: f64,
    /// Why the iteration stopped
    pub criterion: StoppingCriterion,
    /// Per-step residuals, recorded only when history is enabled
    pub history: Vec<f64>,
}

impl ConvergenceReport {
    /// Check whether the tolerance was reached
    pub fn is_converged(&self) -> bool {
        self.criterion.is_converged()
    }
}

impl fmt::Display for ConvergenceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} after {} iterations (residual = {:.3e}, estimate = {:.3e}, rayleigh = {:.6})",
            self.criterion, self.iterations, self.final_residual, self.error_estimate, self.rayleigh_quotient
        )
    }
}

/// Tracks per-step residuals against a tolerance
#[derive(Debug, Clone)]
pub struct ConvergenceMonitor {
    tolerance: f64,
    record_history: bool,
    history: Vec<f64>,
    iterations: usize,
    last_residual: f64,
    last_estimate: f64,
}

impl ConvergenceMonitor {
    /// Create a monitor for `tolerance`, optionally keeping every residual
    pub fn new(tolerance: f64, record_history: bool) -> Self {
        Self {
            tolerance,
            record_history,
            history: Vec::new(),
            iterations: 0,
            last_residual: f64::INFINITY,
            last_estimate: f64::INFINITY,
        }
    }

    /// Record one residual; returns true once the error estimate is below the tolerance
    pub fn record(&mut self, residual: f64) -> bool {
        let estimate = error_estimate(self.last_residual, residual);
        self.iterations += 1;
        self.last_residual = residual;
        self.last_estimate = estimate;
        if self.record_history {
            self.history.push(residual);
        }
        estimate < self.tolerance
    }

    /// Steps recorded so far
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Most recent residual
    pub fn last_residual(&self) -> f64 {
        self.last_residual
    }

    /// Most recent error estimate
    pub fn last_estimate(&self) -> f64 {
        self.last_estimate
    }

    /// Close the monitor into a report
    pub fn finish(self, criterion: StoppingCriterion, rayleigh_quotient: f64) -> ConvergenceReport {
        ConvergenceReport {
            iterations: self.iterations,
            final_residual: self.last_residual,
            error_estimate: self.last_estimate,
            rayleigh_quotient,
            criterion,
            history: self.history,
        }
    }
}

/// rₖ/(1 - rₖ/rₖ₋₁), or infinity while the residual is not shrinking
fn error_estimate(previous: f64, residual: f64) -> f64 {
    if residual == 0.0 {
        return 0.0;
    }
    if !previous.is_finite() || residual >= previous {
        return f64::INFINITY;
    }
    residual / (1.0 - residual / previous)
}
