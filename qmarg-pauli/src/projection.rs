//! Projection of matrices onto the Pauli basis
//!
//! Pauli-group elements are orthogonal under the Hilbert-Schmidt inner
//! product with ⟨P, P⟩ = 2^n, so any 2^n × 2^n matrix decomposes as
//!
//! ```text
//! ρ = Σ_P (Tr(P·ρ) / 2^n) · P
//! ```
//!
//! This holds for every complex square matrix of matching size, Hermitian or
//! not, and independently of its trace.

use crate::error::Result;
use crate::group::PauliGroup;
use crate::pauli::PauliString;
use num_complex::Complex64;
use qmarg_state::{qubits_for_dimension, ComplexMatrix, StateError};

/// Expansion coefficient Tr(P·ρ) / 2^n of ρ along the Pauli element P
///
/// # Errors
/// Returns a dimension error if the sizes differ or are not a power of two
pub fn pauli_coefficient(rho: &ComplexMatrix, pauli: &ComplexMatrix) -> Result<Complex64> {
    let dimension = check_square_pair(rho, pauli)?;
    Ok(pauli.trace_of_product(rho)? / dimension as f64)
}

/// Component of ρ along the Pauli element P: (Tr(P·ρ) / 2^n) · P
///
/// Neither input is modified.
///
/// # Example
/// ```
/// use qmarg_pauli::{pauli_proj, Pauli};
/// use qmarg_state::ComplexMatrix;
///
/// // |0⟩⟨0| = (I + Z) / 2
/// let rho = ComplexMatrix::from_fn(2, |i, j| {
///     num_complex::Complex64::new(if i == 0 && j == 0 { 1.0 } else { 0.0 }, 0.0)
/// });
/// let z_part = pauli_proj(&rho, &Pauli::Z.matrix()).unwrap();
/// assert!((z_part[(1, 1)].re + 0.5).abs() < 1e-12);
/// ```
pub fn pauli_proj(rho: &ComplexMatrix, pauli: &ComplexMatrix) -> Result<ComplexMatrix> {
    let coefficient = pauli_coefficient(rho, pauli)?;
    Ok(pauli.scaled(coefficient))
}

/// Coefficients of ρ along every element of the Pauli group, in group order
///
/// Uses the one-entry-per-column structure of Pauli strings, so no group
/// element is ever materialized.
pub fn pauli_decomposition(rho: &ComplexMatrix) -> Result<Vec<(PauliString, Complex64)>> {
    let num_qubits = qubits_for_dimension(rho.dimension())?;
    let group = PauliGroup::new(num_qubits)?;
    let scale = 1.0 / rho.dimension() as f64;

    group
        .iter()
        .map(|p| {
            let coefficient = p.trace_with(rho)? * scale;
            Ok((p, coefficient))
        })
        .collect()
}

/// Sum of [`pauli_proj`] over the whole Pauli group
///
/// Equals ρ up to floating-point rounding; this is the completeness identity
/// used to check decompositions.
pub fn resum_pauli_decomposition(rho: &ComplexMatrix) -> Result<ComplexMatrix> {
    let num_qubits = qubits_for_dimension(rho.dimension())?;
    let group = PauliGroup::new(num_qubits)?;

    let mut total = ComplexMatrix::zeros(rho.dimension());
    for pauli in group.matrices() {
        total += &pauli_proj(rho, &pauli)?;
    }
    Ok(total)
}

/// Rebuild a matrix from `(PauliString, coefficient)` terms
///
/// # Errors
/// Returns `DimensionMismatch` if a term acts on a different number of qubits
pub fn from_pauli_terms(num_qubits: usize, terms: &[(PauliString, Complex64)]) -> Result<ComplexMatrix> {
    let group = PauliGroup::new(num_qubits)?;
    let dimension = 1usize << group.num_qubits();
    let mut matrix = ComplexMatrix::zeros(dimension);

    for (pauli, coefficient) in terms {
        if pauli.num_qubits() != num_qubits {
            return Err(StateError::DimensionMismatch {
                expected: num_qubits,
                actual: pauli.num_qubits(),
            }
            .into());
        }
        for col in 0..dimension {
            let (row, phase) = pauli.image(col);
            matrix[(row, col)] += coefficient * phase;
        }
    }

    Ok(matrix)
}

fn check_square_pair(rho: &ComplexMatrix, pauli: &ComplexMatrix) -> Result<usize> {
    qubits_for_dimension(pauli.dimension())?;
    if rho.dimension() != pauli.dimension() {
        return Err(StateError::DimensionMismatch {
            expected: pauli.dimension(),
            actual: rho.dimension(),
        }
        .into());
    }
    Ok(rho.dimension())
}
