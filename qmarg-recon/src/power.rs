//! Phase-aligned power iteration
//!
//! Repeatedly applies an operator to a unit vector, renormalizing and
//! removing the global phase picked up at every step. Convergence is judged
//! on the eigen-residual ‖R v - ⟨v|R|v⟩ v‖ through
//! [`ConvergenceMonitor`], not on the change between iterates: near a small
//! spectral gap that change is tiny long before v settles. The loop stops
//! when the error estimate drops below the tolerance, when the iteration
//! budget runs out, or when the operator maps the iterate to zero. None of
//! these is an error.

use crate::convergence::{ConvergenceMonitor, ConvergenceReport, StoppingCriterion};
use crate::error::{ReconError, Result};
use crate::operator::LinearOperator;
use num_complex::Complex64;
use qmarg_state::pure_state::{inner_product, norm, normalize};
use tracing::{trace, warn};

/// Loop controls for [`power_iteration`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerIterationOptions {
    /// Maximum number of operator applications in the loop
    pub max_iterations: usize,
    /// Stop once the rate-corrected residual estimate falls below this value
    pub tolerance: f64,
    /// Keep every per-step residual in the report
    pub record_history: bool,
}

impl Default for PowerIterationOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 0.1,
            record_history: false,
        }
    }
}

/// Final iterate and how it was reached
#[derive(Debug, Clone)]
pub struct PowerIteration {
    /// Unit-norm final iterate
    pub vector: Vec<Complex64>,
    /// Convergence diagnostics
    pub report: ConvergenceReport,
}

/// Run the power iteration on `op` starting from `initial`
///
/// `initial` is normalized before the first step. Each application y = R v
/// first yields the residual of v; if the monitor accepts it, v is returned
/// as is. Otherwise y is scaled to unit norm and multiplied by the unit phase
/// of ⟨y|v⟩, making its overlap with the previous iterate real and
/// non-negative, and becomes the next iterate.
///
/// # Errors
/// Fails if `initial` has the wrong length or cannot be normalized, or if an
/// iterate becomes non-finite. Exhausting `max_iterations` is reported through
/// [`StoppingCriterion::MaxIterations`].
///
/// # Example
/// ```
/// use qmarg_recon::power::{power_iteration, PowerIterationOptions};
/// use qmarg_state::ComplexMatrix;
/// use num_complex::Complex64;
///
/// let op = ComplexMatrix::from_fn(2, |i, j| {
///     Complex64::new(if i == j { [2.0, 1.0][i] } else { 0.0 }, 0.0)
/// });
/// let options = PowerIterationOptions { tolerance: 1e-12, ..Default::default() };
/// let result = power_iteration(&op, vec![Complex64::new(1.0, 0.0); 2], &options).unwrap();
///
/// assert!(result.report.is_converged());
/// assert!((result.report.rayleigh_quotient - 2.0).abs() < 1e-9);
/// ```
pub fn power_iteration<O>(op: &O, initial: Vec<Complex64>, options: &PowerIterationOptions) -> Result<PowerIteration>
where
    O: LinearOperator + ?Sized,
{
    let dimension = op.dimension();
    if initial.len() != dimension {
        return Err(ReconError::VectorLengthMismatch {
            expected: dimension,
            actual: initial.len(),
        });
    }

    let mut v = initial;
    normalize(&mut v)?;
    let mut y = vec![Complex64::new(0.0, 0.0); dimension];

    let mut monitor = ConvergenceMonitor::new(options.tolerance, options.record_history);
    let mut criterion = StoppingCriterion::MaxIterations;

    for step in 0..options.max_iterations {
        op.apply(&v, &mut y)?;

        if norm(&y) == 0.0 {
            warn!(step, "operator annihilated the iterate");
            criterion = StoppingCriterion::Annihilated;
            break;
        }

        let rayleigh = inner_product(&v, &y)?.re;
        let residual = residual_norm(&y, &v, rayleigh);
        let converged = monitor.record(residual);
        trace!(step, residual, estimate = monitor.last_estimate(), rayleigh, "power iteration step");
        if converged {
            criterion = StoppingCriterion::Tolerance;
            break;
        }

        normalize(&mut y)?;
        align_phase(&mut y, &v)?;
        std::mem::swap(&mut v, &mut y);
    }

    op.apply(&v, &mut y)?;
    let rayleigh_quotient = inner_product(&v, &y)?.re;

    Ok(PowerIteration {
        vector: v,
        report: monitor.finish(criterion, rayleigh_quotient),
    })
}

/// Multiply `y` by the unit phase of ⟨y|reference⟩
fn align_phase(y: &mut [Complex64], reference: &[Complex64]) -> Result<()> {
    let overlap = inner_product(y, reference)?;
    let magnitude = overlap.norm();
    if magnitude > 0.0 {
        let phase = overlap / magnitude;
        for a in y.iter_mut() {
            *a *= phase;
        }
    }
    Ok(())
}

/// ‖Rv - λv‖ given Rv and λ
fn residual_norm(rv: &[Complex64], v: &[Complex64], lambda: f64) -> f64 {
    rv.iter()
        .zip(v.iter())
        .map(|(r, x)| (*r - *x * lambda).norm_sqr())
        .sum::<f64>()
        .sqrt()
}
