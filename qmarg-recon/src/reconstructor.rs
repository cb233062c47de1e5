//! Pure-state reconstruction from contiguous-window marginals

use crate::config::{OperatorMode, ReconstructionConfig};
use crate::convergence::{ConvergenceReport, StoppingCriterion};
use crate::embedding::r_hat;
use crate::error::{ReconError, Result};
use crate::operator::EmbeddedMarginals;
use crate::power::{power_iteration, PowerIteration};
use num_complex::Complex64;
use qmarg_state::pure_state::random_amplitudes;
use qmarg_state::{ComplexMatrix, PureState, StateError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// Reconstructed state with its convergence diagnostics
#[derive(Debug, Clone)]
pub struct Reconstruction {
    /// Unit-norm estimate, defined up to a global phase
    pub state: PureState,
    /// How the power iteration terminated
    pub report: ConvergenceReport,
}

impl Reconstruction {
    /// Phase-invariant fidelity |⟨target|state⟩|² against a reference state
    pub fn fidelity(&self, target: &PureState) -> Result<f64> {
        Ok(self.state.fidelity(target)?)
    }

    /// Check whether the tolerance was reached
    pub fn is_converged(&self) -> bool {
        self.report.is_converged()
    }

    /// Amplitudes of the estimate
    pub fn amplitudes(&self) -> &[Complex64] {
        self.state.amplitudes()
    }
}

/// Recovers a pure state as the dominant eigenvector of R = Σᵢ I ⊗ σᵢ ⊗ I
///
/// # Example
///
/// ```
/// use qmarg_recon::{Reconstructor, ReconstructionConfig};
/// use qmarg_state::{LocalMarginals, PureState};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let target = PureState::random(3, &mut rng).unwrap();
///
/// // One window covering the whole register
/// let reconstructor = Reconstructor::new(ReconstructionConfig::default().with_seed(5)).unwrap();
/// let result = reconstructor.reconstruct(3, target.marginals(3).unwrap(), 3).unwrap();
/// assert!(result.fidelity(&target).unwrap() > 0.999);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Reconstructor {
    config: ReconstructionConfig,
}

impl Reconstructor {
    /// Create a reconstructor with the given configuration
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the configuration does not validate
    pub fn new(config: ReconstructionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the reconstructor configuration
    pub fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    /// Reconstruct an n-qubit state from its `n - K + 1` window marginals
    ///
    /// The starting vector is drawn from a `StdRng` seeded with the
    /// configured seed, or from entropy when none is set.
    pub fn reconstruct<I>(&self, window_qubits: usize, sigmas: I, num_qubits: usize) -> Result<Reconstruction>
    where
        I: IntoIterator<Item = ComplexMatrix>,
    {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.reconstruct_with_rng(window_qubits, sigmas, num_qubits, &mut rng)
    }

    /// Reconstruct using an explicitly supplied random number generator
    ///
    /// `sigmas` must hold exactly `num_qubits - window_qubits + 1` operators of
    /// size 2^K × 2^K, ordered by window offset. The sequence is consumed once.
    ///
    /// # Errors
    /// - `InvalidWindowWidth` if K is zero or exceeds n
    /// - `WindowCountMismatch` for the wrong number of operators
    /// - `OperatorSizeMismatch` for an operator of the wrong size
    ///
    /// Running out of iterations is not an error; see [`Reconstruction::report`].
    pub fn reconstruct_with_rng<I, R>(
        &self,
        window_qubits: usize,
        sigmas: I,
        num_qubits: usize,
        rng: &mut R,
    ) -> Result<Reconstruction>
    where
        I: IntoIterator<Item = ComplexMatrix>,
        R: Rng + ?Sized,
    {
        if window_qubits == 0 || window_qubits > num_qubits {
            return Err(ReconError::InvalidWindowWidth {
                width: window_qubits,
                num_qubits,
            });
        }
        if 2 * num_qubits >= usize::BITS as usize {
            return Err(StateError::InvalidQubitCount { num_qubits }.into());
        }

        let sigmas: Vec<ComplexMatrix> = sigmas.into_iter().collect();
        let expected = num_qubits - window_qubits + 1;
        if sigmas.len() != expected {
            return Err(ReconError::WindowCountMismatch {
                expected,
                actual: sigmas.len(),
            });
        }

        debug!(
            num_qubits,
            window_qubits,
            mode = ?self.config.operator,
            max_iterations = self.config.max_iterations,
            tolerance = self.config.tolerance,
            "starting reconstruction"
        );

        let window_dimension = 1usize << window_qubits;
        let initial = random_amplitudes(1usize << num_qubits, rng);
        let options = self.config.power_options();

        let PowerIteration { vector, report } = match self.config.operator {
            OperatorMode::Dense => {
                let r = r_hat(sigmas, window_dimension)?;
                power_iteration(&r, initial, &options)?
            }
            OperatorMode::MatrixFree => {
                let op = EmbeddedMarginals::new(sigmas, window_dimension)?;
                power_iteration(&op, initial, &options)?
            }
        };

        match report.criterion {
            StoppingCriterion::Tolerance => debug!(
                iterations = report.iterations,
                error_estimate = report.error_estimate,
                rayleigh = report.rayleigh_quotient,
                "reconstruction converged"
            ),
            StoppingCriterion::MaxIterations => warn!(
                iterations = report.iterations,
                final_residual = report.final_residual,
                error_estimate = report.error_estimate,
                tolerance = self.config.tolerance,
                "iteration budget exhausted before reaching tolerance"
            ),
            StoppingCriterion::Annihilated => warn!(
                iterations = report.iterations,
                "aggregated operator annihilated the iterate; marginals may be zero"
            ),
        }

        let state = PureState::from_amplitudes(num_qubits, vector)?;
        Ok(Reconstruction { state, report })
    }
}

/// Reconstruct with a dense operator and an explicit RNG
///
/// Shorthand for a [`Reconstructor`] with `max_its` iterations and tolerance
/// `delta`. Both the returned vector and the report are produced even when
/// the tolerance is never met.
///
/// # Example
///
/// ```
/// use qmarg_recon::iteration;
/// use qmarg_state::{LocalMarginals, PureState};
/// use num_complex::Complex64;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let one = Complex64::new(1.0, 0.0);
/// let zero = Complex64::new(0.0, 0.0);
/// let target = PureState::product(&[[one, zero], [one, one], [zero, one]]).unwrap();
///
/// let mut rng = StdRng::seed_from_u64(3);
/// let result = iteration(2, target.marginals(2).unwrap(), 3, 100, 1e-8, &mut rng).unwrap();
/// assert!(result.fidelity(&target).unwrap() > 0.99);
/// ```
pub fn iteration<I, R>(
    window_qubits: usize,
    sigmas: I,
    num_qubits: usize,
    max_its: usize,
    delta: f64,
    rng: &mut R,
) -> Result<Reconstruction>
where
    I: IntoIterator<Item = ComplexMatrix>,
    R: Rng + ?Sized,
{
    let config = ReconstructionConfig::new()
        .with_max_iterations(max_its)
        .with_tolerance(delta);
    Reconstructor::new(config)?.reconstruct_with_rng(window_qubits, sigmas, num_qubits, rng)
}
