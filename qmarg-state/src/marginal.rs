//! Local marginals on contiguous qubit windows
//!
//! A window of `width` qubits starting at `offset` splits a basis index of an
//! n-qubit register into three parts, with qubit 0 as the most significant
//! bit:
//!
//! ```text
//! index = (a · 2^width + i) · 2^(n - offset - width) + b
//!          └ left qubits ┘ └ window ┘                 └ right qubits
//! ```
//!
//! The reduced density matrix on the window is
//! `σᵢⱼ = Σₐ Σ_b ρ[(a·d + i)·r + b, (a·d + j)·r + b]` with `d = 2^width` and
//! `r = 2^(n - offset - width)`.

use crate::error::{Result, StateError};
use crate::matrix::ComplexMatrix;

/// Index layout of one window inside an n-qubit register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLayout {
    /// Dimension of the qubits left of the window (2^offset)
    pub left: usize,
    /// Dimension of the window (2^width)
    pub window: usize,
    /// Dimension of the qubits right of the window
    pub right: usize,
}

impl WindowLayout {
    /// Layout of a `width`-qubit window at `offset` in an `num_qubits` register
    ///
    /// # Errors
    /// Returns `InvalidWindow` if the window is empty or does not fit
    pub fn new(offset: usize, width: usize, num_qubits: usize) -> Result<Self> {
        if width == 0 || offset + width > num_qubits || num_qubits >= usize::BITS as usize {
            return Err(StateError::InvalidWindow {
                offset,
                width,
                num_qubits,
            });
        }
        Ok(Self {
            left: 1 << offset,
            window: 1 << width,
            right: 1 << (num_qubits - offset - width),
        })
    }

    /// Dimension of the full register
    #[inline]
    pub fn full_dimension(&self) -> usize {
        self.left * self.window * self.right
    }

    /// Full-register basis index for left part `a`, window part `i`, right part `b`
    #[inline]
    pub fn index(&self, a: usize, i: usize, b: usize) -> usize {
        (a * self.window + i) * self.right + b
    }
}

/// Anything that can be reduced onto a contiguous window of qubits
pub trait LocalMarginals {
    /// Number of qubits in the register
    fn num_qubits(&self) -> usize;

    /// Reduced density matrix for an already validated window
    fn reduce_window(&self, layout: &WindowLayout) -> ComplexMatrix;

    /// Reduced density matrix of the `width` qubits starting at `offset`
    fn marginal(&self, offset: usize, width: usize) -> Result<ComplexMatrix> {
        let layout = WindowLayout::new(offset, width, self.num_qubits())?;
        Ok(self.reduce_window(&layout))
    }

    /// Lazily yield all `n - width + 1` window marginals in offset order
    fn marginals(&self, width: usize) -> Result<Marginals<'_, Self>>
    where
        Self: Sized,
    {
        Marginals::new(self, width)
    }
}

/// Iterator over the marginals of consecutive windows
///
/// Produced by [`LocalMarginals::marginals`]; each marginal is computed when
/// it is requested.
pub struct Marginals<'a, S: LocalMarginals> {
    source: &'a S,
    width: usize,
    next_offset: usize,
    end: usize,
}

impl<'a, S: LocalMarginals> Marginals<'a, S> {
    fn new(source: &'a S, width: usize) -> Result<Self> {
        let num_qubits = source.num_qubits();
        // Validates the window once for every offset
        WindowLayout::new(0, width, num_qubits)?;
        Ok(Self {
            source,
            width,
            next_offset: 0,
            end: num_qubits - width + 1,
        })
    }

    /// Window width in qubits
    pub fn width(&self) -> usize {
        self.width
    }
}

impl<S: LocalMarginals> Iterator for Marginals<'_, S> {
    type Item = ComplexMatrix;

    fn next(&mut self) -> Option<ComplexMatrix> {
        if self.next_offset >= self.end {
            return None;
        }
        let layout = WindowLayout::new(self.next_offset, self.width, self.source.num_qubits()).ok()?;
        self.next_offset += 1;
        Some(self.source.reduce_window(&layout))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next_offset;
        (remaining, Some(remaining))
    }
}

impl<S: LocalMarginals> ExactSizeIterator for Marginals<'_, S> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_dimensions() {
        let layout = WindowLayout::new(1, 2, 5).unwrap();
        assert_eq!(layout.left, 2);
        assert_eq!(layout.window, 4);
        assert_eq!(layout.right, 4);
        assert_eq!(layout.full_dimension(), 32);
        assert_eq!(layout.index(1, 3, 2), (4 + 3) * 4 + 2);
    }

    #[test]
    fn test_layout_rejects_bad_windows() {
        assert!(WindowLayout::new(0, 0, 3).is_err());
        assert!(WindowLayout::new(2, 2, 3).is_err());
        assert_eq!(
            WindowLayout::new(3, 1, 3).unwrap_err(),
            StateError::InvalidWindow {
                offset: 3,
                width: 1,
                num_qubits: 3
            }
        );
        assert!(WindowLayout::new(0, 3, 3).is_ok());
    }
}
