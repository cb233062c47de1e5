//! Embedding of local marginals into the full register
//!
//! Given m operators σ₀ … σ_{m-1} of size d = 2^K, one per contiguous window,
//! the register has n = m + K - 1 qubits and the aggregated operator is
//!
//! ```text
//! R = Σᵢ I_{2^i} ⊗ σᵢ ⊗ I_{2^(n-K-i)}
//! ```
//!
//! Each term is accumulated by index algebra (see [`WindowLayout`]) rather
//! than by forming Kronecker products with identities.

use crate::error::{ReconError, Result};
use qmarg_state::{ComplexMatrix, StateError, WindowLayout};
use std::borrow::Borrow;

/// Qubit geometry implied by a sequence of window operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    /// Qubits per window (K)
    pub window_qubits: usize,
    /// Qubits in the register (n)
    pub num_qubits: usize,
    /// Number of windows (m = n - K + 1)
    pub num_windows: usize,
}

impl WindowGeometry {
    /// Infer n from `num_windows` operators of dimension `per_operator_dim`
    ///
    /// # Errors
    /// Fails if the dimension is not a power of two of at least 2, if there
    /// are no windows, or if 2^n × 2^n is not addressable
    pub fn infer(num_windows: usize, per_operator_dim: usize) -> Result<Self> {
        if per_operator_dim < 2 || !per_operator_dim.is_power_of_two() {
            return Err(ReconError::InvalidOperatorDimension {
                dimension: per_operator_dim,
            });
        }
        if num_windows == 0 {
            return Err(ReconError::EmptyMarginals);
        }

        let window_qubits = per_operator_dim.trailing_zeros() as usize;
        let num_qubits = num_windows + window_qubits - 1;
        // The dense operator needs 4^n addressable elements
        if 2 * num_qubits >= usize::BITS as usize {
            return Err(StateError::InvalidQubitCount { num_qubits }.into());
        }

        Ok(Self {
            window_qubits,
            num_qubits,
            num_windows,
        })
    }

    /// Linear dimension of one window operator (2^K)
    #[inline]
    pub fn window_dimension(&self) -> usize {
        1 << self.window_qubits
    }

    /// Linear dimension of the register (2^n)
    #[inline]
    pub fn dimension(&self) -> usize {
        1 << self.num_qubits
    }

    /// Index layout of window `offset`
    pub fn layout(&self, offset: usize) -> Result<WindowLayout> {
        Ok(WindowLayout::new(offset, self.window_qubits, self.num_qubits)?)
    }

    /// Check that operator `index` has the window dimension
    pub fn check_operator(&self, index: usize, sigma: &ComplexMatrix) -> Result<()> {
        if sigma.dimension() != self.window_dimension() {
            return Err(ReconError::OperatorSizeMismatch {
                index,
                expected: self.window_dimension(),
                actual: sigma.dimension(),
            });
        }
        Ok(())
    }
}

/// Aggregated operator R = Σᵢ I_{2^i} ⊗ σᵢ ⊗ I_{2^(n-K-i)}
///
/// `per_operator_dim` is the linear dimension d of every σᵢ (4 for
/// two-qubit windows). The sequence is consumed once.
///
/// # Errors
/// Fails fast on an empty sequence, a dimension that is not a power of two,
/// or any operator that is not d × d. Nothing is truncated or padded.
///
/// # Example
/// ```
/// use qmarg_recon::r_hat;
/// use qmarg_state::ComplexMatrix;
///
/// let sigmas = vec![ComplexMatrix::identity(4); 3];
/// let r = r_hat(&sigmas, 4).unwrap();
/// assert_eq!(r.dimension(), 16);
/// assert_eq!(r[(5, 5)].re, 3.0);
/// ```
pub fn r_hat<I>(sigmas: I, per_operator_dim: usize) -> Result<ComplexMatrix>
where
    I: IntoIterator,
    I::Item: Borrow<ComplexMatrix>,
{
    let sigmas: Vec<I::Item> = sigmas.into_iter().collect();
    let geometry = WindowGeometry::infer(sigmas.len(), per_operator_dim)?;
    for (index, sigma) in sigmas.iter().enumerate() {
        geometry.check_operator(index, sigma.borrow())?;
    }

    let mut r = ComplexMatrix::zeros(geometry.dimension());
    for (offset, sigma) in sigmas.iter().enumerate() {
        accumulate_window(&mut r, sigma.borrow(), &geometry.layout(offset)?);
    }
    Ok(r)
}

/// Single term I_{2^offset} ⊗ σ ⊗ I_{2^(n-K-offset)} of the aggregated operator
///
/// # Errors
/// Fails if σ is not 2^K × 2^K or the window does not fit in `num_qubits`
pub fn embed_window(sigma: &ComplexMatrix, offset: usize, num_qubits: usize) -> Result<ComplexMatrix> {
    let window_qubits = sigma
        .num_qubits()
        .ok_or(ReconError::InvalidOperatorDimension {
            dimension: sigma.dimension(),
        })?;
    let layout = WindowLayout::new(offset, window_qubits, num_qubits)?;

    let mut embedded = ComplexMatrix::zeros(layout.full_dimension());
    accumulate_window(&mut embedded, sigma, &layout);
    Ok(embedded)
}

/// `target += I_left ⊗ σ ⊗ I_right`
fn accumulate_window(target: &mut ComplexMatrix, sigma: &ComplexMatrix, layout: &WindowLayout) {
    let d = layout.window;
    for a in 0..layout.left {
        for b in 0..layout.right {
            for i in 0..d {
                let row = layout.index(a, i, b);
                for j in 0..d {
                    target[(row, layout.index(a, j, b))] += sigma.get(i, j);
                }
            }
        }
    }
}
