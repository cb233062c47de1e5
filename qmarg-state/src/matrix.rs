//! Dense square complex matrices
//!
//! [`ComplexMatrix`] stores a d × d matrix of `Complex64` in row-major order.
//! It is the common currency of the workspace: density matrices, local
//! marginals, Pauli operators and the aggregated reconstruction operator are
//! all stored this way.
//!
//! # Kronecker order
//!
//! For `A.kron(&B)` with A of size p and B of size q, the element
//! `(i_a * q + i_b, j_a * q + j_b)` equals `A[(i_a, j_a)] * B[(i_b, j_b)]`.
//! The left factor therefore addresses the most significant part of a
//! basis index, which is why qubit 0 is the left-most tensor factor
//! everywhere in this crate.

use crate::error::{Result, StateError};
use num_complex::Complex64;
use std::fmt;
use std::ops::{AddAssign, Index, IndexMut};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Square complex matrix in row-major order
#[derive(Clone, PartialEq)]
pub struct ComplexMatrix {
    /// Linear dimension d
    dimension: usize,

    /// Elements in row-major order, length d²
    data: Vec<Complex64>,
}

impl ComplexMatrix {
    /// Create a d × d matrix of zeros
    pub fn zeros(dimension: usize) -> Self {
        Self {
            dimension,
            data: vec![ZERO; dimension * dimension],
        }
    }

    /// Create the d × d identity
    pub fn identity(dimension: usize) -> Self {
        let mut matrix = Self::zeros(dimension);
        for i in 0..dimension {
            matrix.data[i * dimension + i] = ONE;
        }
        matrix
    }

    /// Create a matrix from row-major data
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if `data.len() != dimension²`
    pub fn from_vec(dimension: usize, data: Vec<Complex64>) -> Result<Self> {
        let expected = dimension
            .checked_mul(dimension)
            .ok_or(StateError::AllocationError { size: usize::MAX })?;
        if data.len() != expected {
            return Err(StateError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { dimension, data })
    }

    /// Create a matrix from a slice of rows
    ///
    /// # Example
    /// ```
    /// use qmarg_state::ComplexMatrix;
    /// use num_complex::Complex64;
    ///
    /// let one = Complex64::new(1.0, 0.0);
    /// let zero = Complex64::new(0.0, 0.0);
    /// let x = ComplexMatrix::from_rows(&[[zero, one], [one, zero]]).unwrap();
    /// assert!(x.is_hermitian(1e-12));
    /// ```
    pub fn from_rows<R: AsRef<[Complex64]>>(rows: &[R]) -> Result<Self> {
        let dimension = rows.len();
        let mut data = Vec::with_capacity(dimension * dimension);
        for row in rows {
            let row = row.as_ref();
            if row.len() != dimension {
                return Err(StateError::DimensionMismatch {
                    expected: dimension,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { dimension, data })
    }

    /// Create a matrix whose element (i, j) is `f(i, j)`
    pub fn from_fn<F>(dimension: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Complex64,
    {
        let mut data = Vec::with_capacity(dimension * dimension);
        for i in 0..dimension {
            for j in 0..dimension {
                data.push(f(i, j));
            }
        }
        Self { dimension, data }
    }

    /// Linear dimension d
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of qubits the matrix acts on, if d is a power of two
    pub fn num_qubits(&self) -> Option<usize> {
        if self.dimension >= 2 && self.dimension.is_power_of_two() {
            Some(self.dimension.trailing_zeros() as usize)
        } else {
            None
        }
    }

    /// Get element (row, col)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.dimension + col]
    }

    /// Set element (row, col)
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Complex64) {
        self.data[row * self.dimension + col] = value;
    }

    /// Row-major element buffer
    pub fn data(&self) -> &[Complex64] {
        &self.data
    }

    /// Mutable row-major element buffer
    pub fn data_mut(&mut self) -> &mut [Complex64] {
        &mut self.data
    }

    /// Consume the matrix and return its row-major buffer
    pub fn into_vec(self) -> Vec<Complex64> {
        self.data
    }

    /// Kronecker (tensor) product `self ⊗ other`
    pub fn kron(&self, other: &ComplexMatrix) -> ComplexMatrix {
        let p = self.dimension;
        let q = other.dimension;
        let d = p * q;
        let mut result = ComplexMatrix::zeros(d);

        for ia in 0..p {
            for ja in 0..p {
                let a = self.data[ia * p + ja];
                if a == ZERO {
                    continue;
                }
                for ib in 0..q {
                    let row = (ia * q + ib) * d + ja * q;
                    let b_row = &other.data[ib * q..(ib + 1) * q];
                    for (jb, b) in b_row.iter().enumerate() {
                        result.data[row + jb] = a * b;
                    }
                }
            }
        }

        result
    }

    /// Matrix-vector product `y = self · x`
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if either slice is not of length d
    pub fn matvec(&self, x: &[Complex64], y: &mut [Complex64]) -> Result<()> {
        let d = self.dimension;
        if x.len() != d {
            return Err(StateError::DimensionMismatch {
                expected: d,
                actual: x.len(),
            });
        }
        if y.len() != d {
            return Err(StateError::DimensionMismatch {
                expected: d,
                actual: y.len(),
            });
        }

        for (row, out) in self.data.chunks_exact(d).zip(y.iter_mut()) {
            *out = row.iter().zip(x.iter()).map(|(a, b)| a * b).sum();
        }
        Ok(())
    }

    /// Matrix product `self · other`
    pub fn matmul(&self, other: &ComplexMatrix) -> Result<ComplexMatrix> {
        self.check_same_dimension(other)?;
        let d = self.dimension;
        let mut result = ComplexMatrix::zeros(d);

        for i in 0..d {
            for k in 0..d {
                let a = self.data[i * d + k];
                if a == ZERO {
                    continue;
                }
                let b_row = &other.data[k * d..(k + 1) * d];
                let out_row = &mut result.data[i * d..(i + 1) * d];
                for (out, b) in out_row.iter_mut().zip(b_row.iter()) {
                    *out += a * b;
                }
            }
        }

        Ok(result)
    }

    /// Trace Tr(self)
    pub fn trace(&self) -> Complex64 {
        (0..self.dimension).map(|i| self.get(i, i)).sum()
    }

    /// Tr(self · other) computed as Σᵢⱼ selfᵢⱼ otherⱼᵢ, without forming the product
    pub fn trace_of_product(&self, other: &ComplexMatrix) -> Result<Complex64> {
        self.check_same_dimension(other)?;
        let d = self.dimension;
        let mut trace = ZERO;
        for i in 0..d {
            for j in 0..d {
                trace += self.data[i * d + j] * other.data[j * d + i];
            }
        }
        Ok(trace)
    }

    /// Conjugate transpose
    pub fn adjoint(&self) -> ComplexMatrix {
        ComplexMatrix::from_fn(self.dimension, |i, j| self.get(j, i).conj())
    }

    /// Check ρᵢⱼ = ρⱼᵢ* for all elements within `tolerance`
    pub fn is_hermitian(&self, tolerance: f64) -> bool {
        for i in 0..self.dimension {
            for j in i..self.dimension {
                if (self.get(i, j) - self.get(j, i).conj()).norm() > tolerance {
                    return false;
                }
            }
        }
        true
    }

    /// Largest elementwise modulus of `self - other`
    pub fn max_abs_diff(&self, other: &ComplexMatrix) -> Result<f64> {
        self.check_same_dimension(other)?;
        Ok(self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max))
    }

    /// Multiply every element by `factor` in place
    pub fn scale(&mut self, factor: Complex64) {
        for elem in self.data.iter_mut() {
            *elem *= factor;
        }
    }

    /// Return a copy with every element multiplied by `factor`
    pub fn scaled(&self, factor: Complex64) -> ComplexMatrix {
        let mut result = self.clone();
        result.scale(factor);
        result
    }

    /// `self += factor · other`
    pub fn add_scaled(&mut self, other: &ComplexMatrix, factor: Complex64) -> Result<()> {
        self.check_same_dimension(other)?;
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += factor * b;
        }
        Ok(())
    }

    fn check_same_dimension(&self, other: &ComplexMatrix) -> Result<()> {
        if self.dimension != other.dimension {
            return Err(StateError::DimensionMismatch {
                expected: self.dimension,
                actual: other.dimension,
            });
        }
        Ok(())
    }
}

impl Index<(usize, usize)> for ComplexMatrix {
    type Output = Complex64;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Complex64 {
        &self.data[row * self.dimension + col]
    }
}

impl IndexMut<(usize, usize)> for ComplexMatrix {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Complex64 {
        &mut self.data[row * self.dimension + col]
    }
}

/// Elementwise sum
///
/// # Panics
/// Panics if the dimensions differ; use [`ComplexMatrix::add_scaled`] for a
/// checked version.
impl AddAssign<&ComplexMatrix> for ComplexMatrix {
    fn add_assign(&mut self, other: &ComplexMatrix) {
        assert_eq!(
            self.dimension, other.dimension,
            "cannot add matrices of different dimension"
        );
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += b;
        }
    }
}

impl fmt::Debug for ComplexMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ComplexMatrix {{ dim: {} }}", self.dimension)?;
        if self.dimension <= 8 {
            for row in self.data.chunks_exact(self.dimension.max(1)) {
                let cells: Vec<String> = row
                    .iter()
                    .map(|z| format!("{:+.4}{:+.4}i", z.re, z.im))
                    .collect();
                writeln!(f, "  [{}]", cells.join(", "))?;
            }
        }
        Ok(())
    }
}
