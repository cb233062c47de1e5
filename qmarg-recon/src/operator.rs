//! Linear operators acting on register vectors
//!
//! The power iteration only needs y = R·x. [`LinearOperator`] abstracts over
//! the dense aggregated matrix (O(4^n) memory and time per product) and
//! [`EmbeddedMarginals`], which keeps the m window operators and applies
//! them directly (O(m·d²) memory, O(m·2^n·d) time per product).

use crate::embedding::WindowGeometry;
use crate::error::{ReconError, Result};
use num_complex::Complex64;
use qmarg_state::{ComplexMatrix, WindowLayout};

/// A square linear map on vectors of length `dimension()`
pub trait LinearOperator {
    /// Length of the vectors the operator acts on
    fn dimension(&self) -> usize;

    /// Compute `y = self · x`, overwriting `y`
    fn apply(&self, x: &[Complex64], y: &mut [Complex64]) -> Result<()>;
}

impl LinearOperator for ComplexMatrix {
    fn dimension(&self) -> usize {
        ComplexMatrix::dimension(self)
    }

    fn apply(&self, x: &[Complex64], y: &mut [Complex64]) -> Result<()> {
        check_lengths(self.dimension(), x, y)?;
        Ok(self.matvec(x, y)?)
    }
}

/// Matrix-free form of the aggregated operator R = Σᵢ I ⊗ σᵢ ⊗ I
///
/// # Example
/// ```
/// use qmarg_recon::{EmbeddedMarginals, LinearOperator};
/// use qmarg_state::ComplexMatrix;
/// use num_complex::Complex64;
///
/// let op = EmbeddedMarginals::new(vec![ComplexMatrix::identity(2); 3], 2).unwrap();
/// let x = vec![Complex64::new(1.0, 0.0); 8];
/// let mut y = vec![Complex64::new(0.0, 0.0); 8];
/// op.apply(&x, &mut y).unwrap();
/// assert_eq!(y[0].re, 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct EmbeddedMarginals {
    geometry: WindowGeometry,
    sigmas: Vec<ComplexMatrix>,
    layouts: Vec<WindowLayout>,
}

impl EmbeddedMarginals {
    /// Take ownership of the window operators, validated like [`crate::r_hat`]
    pub fn new<I>(sigmas: I, per_operator_dim: usize) -> Result<Self>
    where
        I: IntoIterator<Item = ComplexMatrix>,
    {
        let sigmas: Vec<ComplexMatrix> = sigmas.into_iter().collect();
        let geometry = WindowGeometry::infer(sigmas.len(), per_operator_dim)?;
        for (index, sigma) in sigmas.iter().enumerate() {
            geometry.check_operator(index, sigma)?;
        }
        let layouts = (0..geometry.num_windows)
            .map(|offset| geometry.layout(offset))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            geometry,
            sigmas,
            layouts,
        })
    }

    /// Geometry of the windows
    pub fn geometry(&self) -> &WindowGeometry {
        &self.geometry
    }

    /// The window operators in offset order
    pub fn sigmas(&self) -> &[ComplexMatrix] {
        &self.sigmas
    }

    /// Materialize the dense 2^n × 2^n operator
    pub fn to_dense(&self) -> Result<ComplexMatrix> {
        crate::embedding::r_hat(&self.sigmas, self.geometry.window_dimension())
    }
}

impl LinearOperator for EmbeddedMarginals {
    fn dimension(&self) -> usize {
        self.geometry.dimension()
    }

    fn apply(&self, x: &[Complex64], y: &mut [Complex64]) -> Result<()> {
        check_lengths(self.dimension(), x, y)?;
        y.fill(Complex64::new(0.0, 0.0));

        let d = self.geometry.window_dimension();
        let mut local = vec![Complex64::new(0.0, 0.0); d];

        for (sigma, layout) in self.sigmas.iter().zip(self.layouts.iter()) {
            for a in 0..layout.left {
                for b in 0..layout.right {
                    for (j, slot) in local.iter_mut().enumerate() {
                        *slot = x[layout.index(a, j, b)];
                    }
                    for i in 0..d {
                        let row = &sigma.data()[i * d..(i + 1) * d];
                        let sum: Complex64 = row.iter().zip(local.iter()).map(|(s, v)| s * v).sum();
                        y[layout.index(a, i, b)] += sum;
                    }
                }
            }
        }

        Ok(())
    }
}

fn check_lengths(dimension: usize, x: &[Complex64], y: &[Complex64]) -> Result<()> {
    for len in [x.len(), y.len()] {
        if len != dimension {
            return Err(ReconError::VectorLengthMismatch {
                expected: dimension,
                actual: len,
            });
        }
    }
    Ok(())
}
