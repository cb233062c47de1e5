//! Lazy enumeration of the n-qubit Pauli group
//!
//! The group {I, X, Y, Z}^⊗n has 4^n elements. [`PauliGroup`] is a cheap
//! handle describing the group; every call to [`PauliGroup::iter`] or
//! [`PauliGroup::matrices`] starts a fresh enumeration in the fixed order of
//! [`PauliString::from_index`], producing each element on demand.

use crate::error::{PauliError, Result};
use crate::pauli::{group_size, PauliString};
use qmarg_state::ComplexMatrix;

/// The n-qubit Pauli group (phases ignored)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauliGroup {
    num_qubits: usize,
    size: usize,
}

impl PauliGroup {
    /// Describe the Pauli group on `num_qubits` qubits
    ///
    /// # Errors
    /// Returns `InvalidQubitCount` for zero qubits or when 4^n does not fit
    /// in `usize`
    pub fn new(num_qubits: usize) -> Result<Self> {
        let size = (num_qubits > 0)
            .then(|| group_size(num_qubits))
            .flatten()
            .ok_or(PauliError::InvalidQubitCount { num_qubits })?;
        Ok(Self { num_qubits, size })
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of group elements, 4^n
    pub fn len(&self) -> usize {
        self.size
    }

    /// Always false; the group contains at least the identity
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Enumerate the group as Pauli strings
    pub fn iter(&self) -> PauliStrings {
        PauliStrings {
            num_qubits: self.num_qubits,
            next: 0,
            end: self.size,
        }
    }

    /// Enumerate the group as dense 2^n × 2^n matrices, built one at a time
    pub fn matrices(&self) -> impl ExactSizeIterator<Item = ComplexMatrix> {
        self.iter().map(|p| p.to_matrix())
    }
}

impl<'a> IntoIterator for &'a PauliGroup {
    type Item = PauliString;
    type IntoIter = PauliStrings;

    fn into_iter(self) -> PauliStrings {
        self.iter()
    }
}

/// Iterator over the elements of a [`PauliGroup`]
#[derive(Debug, Clone)]
pub struct PauliStrings {
    num_qubits: usize,
    next: usize,
    end: usize,
}

impl Iterator for PauliStrings {
    type Item = PauliString;

    fn next(&mut self) -> Option<PauliString> {
        if self.next >= self.end {
            return None;
        }
        let pauli = PauliString::at_index(self.num_qubits, self.next);
        self.next += 1;
        Some(pauli)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PauliStrings {}

/// All 4^n Pauli-group elements on `num_qubits` qubits as dense matrices
///
/// # Example
/// ```
/// use qmarg_pauli::pauli_group;
///
/// let group: Vec<_> = pauli_group(1).unwrap().collect();
/// assert_eq!(group.len(), 4);
/// assert_eq!(group[0].dimension(), 2);
/// ```
pub fn pauli_group(num_qubits: usize) -> Result<impl ExactSizeIterator<Item = ComplexMatrix>> {
    Ok(PauliGroup::new(num_qubits)?.matrices())
}
