//! Pure n-qubit state vectors
//!
//! A pure state is only defined up to a global phase, so [`PureState`]
//! exposes phase-invariant comparisons ([`PureState::fidelity`]) rather than
//! amplitude equality.

use crate::error::{checked_dimension, Result, StateError};
use crate::marginal::{LocalMarginals, WindowLayout};
use crate::matrix::ComplexMatrix;
use num_complex::Complex64;
use rand::Rng;
use rand_distr::StandardNormal;
use std::fmt;

/// Dense pure state with 2^n amplitudes
#[derive(Clone, PartialEq)]
pub struct PureState {
    /// Number of qubits
    num_qubits: usize,

    /// Amplitudes in Kronecker order (qubit 0 most significant)
    amplitudes: Vec<Complex64>,
}

impl PureState {
    /// Create a state initialized to |0...0⟩
    pub fn new(num_qubits: usize) -> Result<Self> {
        let dimension = checked_dimension(num_qubits)?;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); dimension];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Create a state from amplitude data, taking ownership
    ///
    /// The amplitudes are stored as given; call [`PureState::normalize`] if
    /// they are not already of unit norm.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the length is not 2^num_qubits
    pub fn from_amplitudes(num_qubits: usize, amplitudes: Vec<Complex64>) -> Result<Self> {
        let dimension = checked_dimension(num_qubits)?;
        if amplitudes.len() != dimension {
            return Err(StateError::DimensionMismatch {
                expected: dimension,
                actual: amplitudes.len(),
            });
        }
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Product state ⊗ₖ (αₖ|0⟩ + βₖ|1⟩), one factor per qubit from left to right
    ///
    /// Each factor is normalized before the product is formed.
    ///
    /// # Example
    /// ```
    /// use qmarg_state::PureState;
    /// use num_complex::Complex64;
    ///
    /// let one = Complex64::new(1.0, 0.0);
    /// let zero = Complex64::new(0.0, 0.0);
    /// // |0⟩ ⊗ |1⟩
    /// let state = PureState::product(&[[one, zero], [zero, one]]).unwrap();
    /// assert_eq!(state.amplitudes()[1], one);
    /// ```
    pub fn product(factors: &[[Complex64; 2]]) -> Result<Self> {
        let num_qubits = factors.len();
        checked_dimension(num_qubits)?;

        let mut amplitudes = vec![Complex64::new(1.0, 0.0)];
        for factor in factors {
            let norm = (factor[0].norm_sqr() + factor[1].norm_sqr()).sqrt();
            if norm == 0.0 {
                return Err(StateError::NotNormalizable);
            }
            amplitudes = amplitudes
                .iter()
                .flat_map(|a| [a * factor[0] / norm, a * factor[1] / norm])
                .collect();
        }

        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Draw a Haar-random pure state
    ///
    /// Amplitudes are independent standard complex Gaussians, normalized.
    pub fn random<R: Rng + ?Sized>(num_qubits: usize, rng: &mut R) -> Result<Self> {
        let dimension = checked_dimension(num_qubits)?;
        let mut state = Self {
            num_qubits,
            amplitudes: random_amplitudes(dimension, rng),
        };
        state.normalize()?;
        Ok(state)
    }

    /// Get the number of qubits
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the state dimension (2^num_qubits)
    #[inline]
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Get a reference to the state amplitudes
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume the state and return its amplitudes
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Euclidean norm of the amplitude vector
    pub fn norm(&self) -> f64 {
        norm(&self.amplitudes)
    }

    /// Check if the state is normalized (|norm - 1| < epsilon)
    pub fn is_normalized(&self, epsilon: f64) -> bool {
        (self.norm() - 1.0).abs() < epsilon
    }

    /// Normalize the state to unit norm
    ///
    /// # Errors
    /// Returns `NotNormalizable` for the zero vector
    pub fn normalize(&mut self) -> Result<()> {
        normalize(&mut self.amplitudes).map(|_| ())
    }

    /// Multiply every amplitude by a global phase e^{iθ}
    pub fn apply_global_phase(&mut self, theta: f64) {
        let phase = Complex64::from_polar(1.0, theta);
        for a in self.amplitudes.iter_mut() {
            *a *= phase;
        }
    }

    /// Compute the inner product ⟨self|other⟩
    pub fn inner_product(&self, other: &PureState) -> Result<Complex64> {
        inner_product(&self.amplitudes, &other.amplitudes)
    }

    /// Fidelity |⟨self|other⟩|², invariant under global phases of either state
    pub fn fidelity(&self, other: &PureState) -> Result<f64> {
        fidelity(&self.amplitudes, &other.amplitudes)
    }

    /// Density matrix |ψ⟩⟨ψ|
    pub fn to_density_matrix(&self) -> ComplexMatrix {
        let a = &self.amplitudes;
        ComplexMatrix::from_fn(a.len(), |i, j| a[i] * a[j].conj())
    }
}

impl LocalMarginals for PureState {
    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn reduce_window(&self, layout: &WindowLayout) -> ComplexMatrix {
        let d = layout.window;
        let mut reduced = ComplexMatrix::zeros(d);

        for a in 0..layout.left {
            for b in 0..layout.right {
                for i in 0..d {
                    let psi_i = self.amplitudes[layout.index(a, i, b)];
                    for j in 0..d {
                        reduced[(i, j)] += psi_i * self.amplitudes[layout.index(a, j, b)].conj();
                    }
                }
            }
        }

        reduced
    }
}

impl fmt::Debug for PureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PureState {{ qubits: {}, dim: {}, norm: {:.6} }}",
            self.num_qubits,
            self.dimension(),
            self.norm()
        )
    }
}

/// Euclidean norm of an amplitude slice
pub fn norm(amplitudes: &[Complex64]) -> f64 {
    amplitudes.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt()
}

/// Scale `amplitudes` to unit norm, returning the norm before scaling
///
/// # Errors
/// Returns `NotNormalizable` if the norm is zero or not finite
pub fn normalize(amplitudes: &mut [Complex64]) -> Result<f64> {
    let n = norm(amplitudes);
    if n == 0.0 || !n.is_finite() {
        return Err(StateError::NotNormalizable);
    }
    let inv = 1.0 / n;
    for a in amplitudes.iter_mut() {
        *a *= inv;
    }
    Ok(n)
}

/// Inner product ⟨a|b⟩ = Σᵢ aᵢ* bᵢ
pub fn inner_product(a: &[Complex64], b: &[Complex64]) -> Result<Complex64> {
    if a.len() != b.len() {
        return Err(StateError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x.conj() * y).sum())
}

/// Phase-invariant fidelity |⟨a|b⟩|² / (‖a‖² ‖b‖²)
///
/// # Errors
/// Returns `DimensionMismatch` for different lengths and `NotNormalizable`
/// when either vector is zero
pub fn fidelity(a: &[Complex64], b: &[Complex64]) -> Result<f64> {
    let overlap = inner_product(a, b)?;
    let norms = norm(a) * norm(b);
    if norms == 0.0 {
        return Err(StateError::NotNormalizable);
    }
    Ok(overlap.norm_sqr() / (norms * norms))
}

/// Independent standard complex Gaussian amplitudes (not normalized)
pub fn random_amplitudes<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Vec<Complex64> {
    (0..dimension)
        .map(|_| Complex64::new(rng.sample(StandardNormal), rng.sample(StandardNormal)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_new_state() {
        let state = PureState::new(3).unwrap();
        assert_eq!(state.num_qubits(), 3);
        assert_eq!(state.dimension(), 8);
        assert!(state.is_normalized(TOL));
    }

    #[test]
    fn test_from_amplitudes_checks_length() {
        let err = PureState::from_amplitudes(2, vec![Complex64::new(1.0, 0.0); 3]).unwrap_err();
        assert_eq!(err, StateError::DimensionMismatch { expected: 4, actual: 3 });
    }

    #[test]
    fn test_normalize_zero_vector_fails() {
        let mut state = PureState::from_amplitudes(1, vec![Complex64::new(0.0, 0.0); 2]).unwrap();
        assert_eq!(state.normalize().unwrap_err(), StateError::NotNormalizable);
    }

    #[test]
    fn test_product_state_layout() {
        let s = 1.0 / 2.0_f64.sqrt();
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        // |1⟩ ⊗ |+⟩ with an unnormalized second factor
        let state = PureState::product(&[[zero, one], [one, one]]).unwrap();
        assert!(state.is_normalized(TOL));
        assert_relative_eq!(state.amplitudes()[0b10].re, s, epsilon = TOL);
        assert_relative_eq!(state.amplitudes()[0b11].re, s, epsilon = TOL);
        assert_eq!(state.amplitudes()[0b00], zero);
    }

    #[test]
    fn test_fidelity_is_phase_invariant() {
        let mut rng = StdRng::seed_from_u64(42);
        let state = PureState::random(4, &mut rng).unwrap();
        let mut rotated = state.clone();
        rotated.apply_global_phase(1.234);

        assert_relative_eq!(state.fidelity(&rotated).unwrap(), 1.0, epsilon = TOL);
        assert!((state.inner_product(&rotated).unwrap() - Complex64::new(1.0, 0.0)).norm() > 0.1);
    }

    #[test]
    fn test_fidelity_orthogonal() {
        let a = PureState::new(2).unwrap();
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 4];
        amplitudes[3] = Complex64::new(0.0, 1.0);
        let b = PureState::from_amplitudes(2, amplitudes).unwrap();
        assert!(a.fidelity(&b).unwrap() < TOL);
    }

    #[test]
    fn test_fidelity_ignores_norm() {
        let a = vec![Complex64::new(3.0, 0.0), Complex64::new(0.0, 4.0)];
        let b = vec![Complex64::new(0.6, 0.0), Complex64::new(0.0, 0.8)];
        assert_relative_eq!(fidelity(&a, &b).unwrap(), 1.0, epsilon = TOL);
    }

    #[test]
    fn test_pure_marginals_match_density_matrix() {
        use crate::density_matrix::DensityMatrix;

        let mut rng = StdRng::seed_from_u64(5);
        let state = PureState::random(4, &mut rng).unwrap();
        let dm = DensityMatrix::from_state_vector(4, state.amplitudes()).unwrap();

        for (from_state, from_dm) in state.marginals(2).unwrap().zip(dm.marginals(2).unwrap()) {
            assert!(from_state.max_abs_diff(&from_dm).unwrap() < TOL);
        }
    }
}
