//! Dense density matrices and their window marginals
//!
//! ρ is Hermitian, positive semi-definite and of unit trace; it equals
//! |ψ⟩⟨ψ| for a pure state and Σᵢ pᵢ |ψᵢ⟩⟨ψᵢ| for a mixture.
//!
//! Trace one is assumed by callers and not enforced on construction; use
//! [`DensityMatrix::is_valid`] when a check is needed.
//!
//! # Example
//!
//! ```
//! use qmarg_state::{DensityMatrix, LocalMarginals};
//!
//! let dm = DensityMatrix::maximally_mixed(3).unwrap();
//! assert!((dm.purity() - 0.125).abs() < 1e-12);
//!
//! // Two-qubit marginals on windows (0,1) and (1,2)
//! let sigmas: Vec<_> = dm.marginals(2).unwrap().collect();
//! assert_eq!(sigmas.len(), 2);
//! assert_eq!(sigmas[0].dimension(), 4);
//! ```

use crate::error::{checked_dimension, Result, StateError};
use crate::marginal::{LocalMarginals, WindowLayout};
use crate::matrix::ComplexMatrix;
use num_complex::Complex64;
use rand::Rng;
use rand_distr::StandardNormal;
use std::fmt;

/// Density matrix of an n-qubit state
#[derive(Clone)]
pub struct DensityMatrix {
    /// Number of qubits
    num_qubits: usize,

    /// Full 2^n × 2^n matrix
    matrix: ComplexMatrix,
}

impl DensityMatrix {
    /// |0...0⟩⟨0...0| on `num_qubits` qubits
    ///
    /// # Errors
    /// Returns error if num_qubits is zero or too large to address
    pub fn new(num_qubits: usize) -> Result<Self> {
        let dimension = checked_dimension(num_qubits)?;
        let mut matrix = ComplexMatrix::zeros(dimension);
        matrix.set(0, 0, Complex64::new(1.0, 0.0));

        Ok(Self { num_qubits, matrix })
    }

    /// Wrap an existing 2^n × 2^n matrix
    ///
    /// # Errors
    /// Returns `InvalidDimension` if the matrix size is not a power of two
    pub fn from_matrix(matrix: ComplexMatrix) -> Result<Self> {
        let num_qubits = matrix.num_qubits().ok_or(StateError::InvalidDimension {
            dimension: matrix.dimension(),
        })?;
        Ok(Self { num_qubits, matrix })
    }

    /// ρ = |ψ⟩⟨ψ| for the given amplitudes
    pub fn from_state_vector(num_qubits: usize, amplitudes: &[Complex64]) -> Result<Self> {
        let dimension = checked_dimension(num_qubits)?;

        if amplitudes.len() != dimension {
            return Err(StateError::DimensionMismatch {
                expected: dimension,
                actual: amplitudes.len(),
            });
        }

        // ρᵢⱼ = ψᵢ ψⱼ*
        let matrix = ComplexMatrix::from_fn(dimension, |i, j| amplitudes[i] * amplitudes[j].conj());

        Ok(Self { num_qubits, matrix })
    }

    /// ρ = I / 2^n
    pub fn maximally_mixed(num_qubits: usize) -> Result<Self> {
        let dimension = checked_dimension(num_qubits)?;
        let mut matrix = ComplexMatrix::identity(dimension);
        matrix.scale(Complex64::new(1.0 / dimension as f64, 0.0));

        Ok(Self { num_qubits, matrix })
    }

    /// Draw a random full-rank density matrix from the Hilbert-Schmidt measure
    ///
    /// Samples a Ginibre matrix G with independent standard complex Gaussian
    /// entries and returns ρ = G G† / Tr(G G†).
    ///
    /// # Example
    /// ```
    /// use qmarg_state::DensityMatrix;
    /// use rand::SeedableRng;
    ///
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(7777);
    /// let dm = DensityMatrix::random(3, &mut rng).unwrap();
    /// assert!(dm.is_valid(1e-10));
    /// ```
    pub fn random<R: Rng + ?Sized>(num_qubits: usize, rng: &mut R) -> Result<Self> {
        let dimension = checked_dimension(num_qubits)?;
        let ginibre = ComplexMatrix::from_fn(dimension, |_, _| {
            Complex64::new(rng.sample(StandardNormal), rng.sample(StandardNormal))
        });

        let mut matrix = ginibre.matmul(&ginibre.adjoint())?;
        let trace = matrix.trace().re;
        matrix.scale(Complex64::new(1.0 / trace, 0.0));

        Ok(Self { num_qubits, matrix })
    }

    /// Number of qubits
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Linear dimension 2^n
    #[inline]
    pub fn dimension(&self) -> usize {
        self.matrix.dimension()
    }

    /// Element ρᵢⱼ
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.matrix.get(row, col)
    }

    /// Borrow the underlying matrix
    pub fn matrix(&self) -> &ComplexMatrix {
        &self.matrix
    }

    /// Consume and return the underlying matrix
    pub fn into_matrix(self) -> ComplexMatrix {
        self.matrix
    }

    /// Purity Tr(ρ²), between 1/2^n and 1
    pub fn purity(&self) -> f64 {
        let dim = self.dimension();
        let mut trace = Complex64::new(0.0, 0.0);

        for i in 0..dim {
            for j in 0..dim {
                trace += self.get(i, j) * self.get(j, i);
            }
        }

        trace.re
    }

    /// Real part of Tr(ρ)
    pub fn trace(&self) -> f64 {
        self.matrix.trace().re
    }

    /// Check if the density matrix is valid (Hermitian, non-negative diagonal, trace 1)
    pub fn is_valid(&self, tolerance: f64) -> bool {
        if (self.trace() - 1.0).abs() > tolerance {
            return false;
        }

        if !self.matrix.is_hermitian(tolerance) {
            return false;
        }

        (0..self.dimension()).all(|i| self.get(i, i).re >= -tolerance)
    }
}

impl LocalMarginals for DensityMatrix {
    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn reduce_window(&self, layout: &WindowLayout) -> ComplexMatrix {
        let d = layout.window;
        let mut reduced = ComplexMatrix::zeros(d);

        for a in 0..layout.left {
            for b in 0..layout.right {
                for i in 0..d {
                    let row = layout.index(a, i, b);
                    for j in 0..d {
                        let col = layout.index(a, j, b);
                        reduced[(i, j)] += self.matrix.get(row, col);
                    }
                }
            }
        }

        reduced
    }
}

impl fmt::Debug for DensityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DensityMatrix {{ qubits: {}, dim: {}, purity: {:.4} }}",
            self.num_qubits,
            self.dimension(),
            self.purity()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TOL: f64 = 1e-10;

    fn bell_amplitudes() -> Vec<Complex64> {
        let s = 1.0 / 2.0_f64.sqrt();
        vec![
            Complex64::new(s, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(s, 0.0),
        ]
    }

    #[test]
    fn test_new_density_matrix() {
        let dm = DensityMatrix::new(2).unwrap();
        assert_eq!(dm.num_qubits(), 2);
        assert_eq!(dm.dimension(), 4);
        assert!((dm.trace() - 1.0).abs() < TOL);
        assert!((dm.purity() - 1.0).abs() < TOL);
    }

    #[test]
    fn test_zero_qubits_rejected() {
        assert_eq!(
            DensityMatrix::new(0).unwrap_err(),
            StateError::InvalidQubitCount { num_qubits: 0 }
        );
    }

    #[test]
    fn test_from_state_vector() {
        let dm = DensityMatrix::from_state_vector(2, &bell_amplitudes()).unwrap();
        assert!((dm.purity() - 1.0).abs() < TOL);
        assert!((dm.trace() - 1.0).abs() < TOL);
        assert!(dm.is_valid(TOL));
    }

    #[test]
    fn test_from_state_vector_wrong_length() {
        let err = DensityMatrix::from_state_vector(3, &bell_amplitudes()).unwrap_err();
        assert_eq!(err, StateError::DimensionMismatch { expected: 8, actual: 4 });
    }

    #[test]
    fn test_from_matrix_requires_power_of_two() {
        assert!(DensityMatrix::from_matrix(ComplexMatrix::identity(3)).is_err());
        let dm = DensityMatrix::from_matrix(ComplexMatrix::identity(4)).unwrap();
        assert_eq!(dm.num_qubits(), 2);
    }

    #[test]
    fn test_maximally_mixed() {
        let dm = DensityMatrix::maximally_mixed(2).unwrap();
        assert!((dm.trace() - 1.0).abs() < TOL);
        assert!((dm.purity() - 0.25).abs() < TOL);
    }

    #[test]
    fn test_random_is_valid_and_mixed() {
        let mut rng = StdRng::seed_from_u64(7777);
        let dm = DensityMatrix::random(3, &mut rng).unwrap();
        assert!(dm.is_valid(TOL));
        assert!(dm.purity() < 1.0);
        assert!(dm.purity() > 0.125 - TOL);
    }

    #[test]
    fn test_random_is_reproducible() {
        let a = DensityMatrix::random(2, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = DensityMatrix::random(2, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a.matrix(), b.matrix());
    }

    #[test]
    fn test_bell_marginal_is_maximally_mixed() {
        let dm = DensityMatrix::from_state_vector(2, &bell_amplitudes()).unwrap();
        for offset in 0..2 {
            let sigma = dm.marginal(offset, 1).unwrap();
            assert_relative_eq!(sigma[(0, 0)].re, 0.5, epsilon = TOL);
            assert_relative_eq!(sigma[(1, 1)].re, 0.5, epsilon = TOL);
            assert!(sigma[(0, 1)].norm() < TOL);
        }
    }

    #[test]
    fn test_marginal_of_product_state() {
        // |0⟩ ⊗ |1⟩ ⊗ |+⟩
        let s = 1.0 / 2.0_f64.sqrt();
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 8];
        amplitudes[0b010] = Complex64::new(s, 0.0);
        amplitudes[0b011] = Complex64::new(s, 0.0);
        let dm = DensityMatrix::from_state_vector(3, &amplitudes).unwrap();

        let first = dm.marginal(0, 1).unwrap();
        assert_relative_eq!(first[(0, 0)].re, 1.0, epsilon = TOL);

        let middle = dm.marginal(1, 1).unwrap();
        assert_relative_eq!(middle[(1, 1)].re, 1.0, epsilon = TOL);

        let last = dm.marginal(2, 1).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                assert_relative_eq!(last[(i, j)].re, 0.5, epsilon = TOL);
            }
        }
    }

    #[test]
    fn test_full_window_marginal_is_identity_map() {
        let mut rng = StdRng::seed_from_u64(3);
        let dm = DensityMatrix::random(3, &mut rng).unwrap();
        let full = dm.marginal(0, 3).unwrap();
        assert!(full.max_abs_diff(dm.matrix()).unwrap() < TOL);
    }

    #[test]
    fn test_marginals_are_trace_one_and_lazy() {
        let mut rng = StdRng::seed_from_u64(11);
        let dm = DensityMatrix::random(4, &mut rng).unwrap();
        let marginals = dm.marginals(2).unwrap();
        assert_eq!(marginals.len(), 3);
        for sigma in marginals {
            assert_eq!(sigma.dimension(), 4);
            assert_relative_eq!(sigma.trace().re, 1.0, epsilon = TOL);
            assert!(sigma.is_hermitian(TOL));
        }
        assert!(dm.marginals(5).is_err());
    }
}
