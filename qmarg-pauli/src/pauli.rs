//! Single-qubit Paulis and their tensor products
//!
//! ```text
//! I = [[1, 0], [0, 1]]    X = [[0, 1], [1, 0]]
//! Y = [[0, -i], [i, 0]]   Z = [[1, 0], [0, -1]]
//! ```
//!
//! A [`PauliString`] such as "IXYZ" stands for I⊗X⊗Y⊗Z. Its left-most letter
//! acts on qubit 0, the most significant bit of a basis index, so every
//! string has exactly one nonzero entry per column.

use crate::error::{PauliError, Result};
use num_complex::Complex64;
use qmarg_state::ComplexMatrix;
use std::fmt;
use std::str::FromStr;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// One of I, X, Y, Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

impl Pauli {
    /// All four Paulis in enumeration order
    pub const ALL: [Pauli; 4] = [Pauli::I, Pauli::X, Pauli::Y, Pauli::Z];

    /// Parse one of `IXYZ`, case-insensitive
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'I' => Ok(Pauli::I),
            'X' => Ok(Pauli::X),
            'Y' => Ok(Pauli::Y),
            'Z' => Ok(Pauli::Z),
            _ => Err(PauliError::InvalidPauliChar(c)),
        }
    }

    /// Upper-case letter for this Pauli
    pub fn to_char(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }

    /// Check if this Pauli flips the computational basis bit (X or Y)
    pub fn flips_bit(self) -> bool {
        matches!(self, Pauli::X | Pauli::Y)
    }

    /// The 2×2 matrix of this Pauli
    pub fn matrix(self) -> ComplexMatrix {
        let rows = match self {
            Pauli::I => [[ONE, ZERO], [ZERO, ONE]],
            Pauli::X => [[ZERO, ONE], [ONE, ZERO]],
            Pauli::Y => [[ZERO, -I], [I, ZERO]],
            Pauli::Z => [[ONE, ZERO], [ZERO, -ONE]],
        };
        ComplexMatrix::from_fn(2, |i, j| rows[i][j])
    }

    /// Matrix element ⟨bit ⊕ flip| P |bit⟩ for an input basis bit
    #[inline]
    fn phase(self, bit: usize) -> Complex64 {
        match self {
            Pauli::I | Pauli::X => ONE,
            // Y|0⟩ = i|1⟩, Y|1⟩ = -i|0⟩
            Pauli::Y => {
                if bit == 0 {
                    I
                } else {
                    -I
                }
            },
            Pauli::Z => {
                if bit == 0 {
                    ONE
                } else {
                    -ONE
                }
            },
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Tensor product of single-qubit Paulis, qubit 0 first
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PauliString {
    /// Pauli operators for each qubit, qubit 0 first
    paulis: Vec<Pauli>,
}

impl PauliString {
    /// Wrap factors given in qubit order
    pub fn from_paulis(paulis: Vec<Pauli>) -> Self {
        Self { paulis }
    }

    /// I⊗…⊗I on `num_qubits` qubits
    pub fn identity(num_qubits: usize) -> Self {
        Self {
            paulis: vec![Pauli::I; num_qubits],
        }
    }

    /// The `index`-th element of the n-qubit Pauli group
    ///
    /// `index` is read in base 4 with the most significant digit selecting
    /// the Pauli on qubit 0 (0 = I, 1 = X, 2 = Y, 3 = Z).
    ///
    /// # Example
    /// ```
    /// use qmarg_pauli::PauliString;
    ///
    /// let p = PauliString::from_index(2, 0b0111).unwrap();
    /// assert_eq!(p.to_string(), "XZ");
    /// ```
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if `index >= 4^num_qubits`
    pub fn from_index(num_qubits: usize, index: usize) -> Result<Self> {
        let out_of_range = PauliError::IndexOutOfRange { index, num_qubits };
        let size = group_size(num_qubits).ok_or(out_of_range.clone())?;
        if index >= size {
            return Err(out_of_range);
        }

        Ok(Self::at_index(num_qubits, index))
    }

    /// Decode a group index already known to be in range
    pub(crate) fn at_index(num_qubits: usize, index: usize) -> Self {
        let mut paulis = vec![Pauli::I; num_qubits];
        let mut rest = index;
        for slot in paulis.iter_mut().rev() {
            *slot = Pauli::ALL[rest & 3];
            rest >>= 2;
        }
        Self { paulis }
    }

    /// Number of factors
    pub fn num_qubits(&self) -> usize {
        self.paulis.len()
    }

    /// Factor acting on `qubit`
    pub fn get(&self, qubit: usize) -> Option<Pauli> {
        self.paulis.get(qubit).copied()
    }

    /// Paulis in qubit order
    pub fn paulis(&self) -> &[Pauli] {
        &self.paulis
    }

    /// Number of non-identity factors
    pub fn weight(&self) -> usize {
        self.paulis.iter().filter(|p| **p != Pauli::I).count()
    }

    /// Matrix dimension 2^n, or `None` when it does not fit in a `usize`
    pub fn dimension(&self) -> Option<usize> {
        u32::try_from(self.num_qubits())
            .ok()
            .and_then(|shift| 1usize.checked_shl(shift))
    }

    fn checked_dimension(&self) -> Result<usize> {
        self.dimension().ok_or(PauliError::InvalidQubitCount {
            num_qubits: self.num_qubits(),
        })
    }

    /// Dense 2^n × 2^n matrix, the Kronecker product of the factors
    pub fn to_matrix(&self) -> ComplexMatrix {
        self.paulis
            .iter()
            .fold(ComplexMatrix::identity(1), |acc, p| acc.kron(&p.matrix()))
    }

    /// Tr(P·ρ) without forming the matrix of P
    ///
    /// P has one nonzero entry per column, so the trace reduces to a single
    /// pass over the basis: Tr(Pρ) = Σ_c P[c⊕m, c] ρ[c, c⊕m].
    ///
    /// # Errors
    /// Returns `InvalidQubitCount` if 2^n overflows and `DimensionMismatch`
    /// if ρ is not 2^n × 2^n
    pub fn trace_with(&self, rho: &ComplexMatrix) -> Result<Complex64> {
        let dimension = self.checked_dimension()?;
        if rho.dimension() != dimension {
            return Err(qmarg_state::StateError::DimensionMismatch {
                expected: dimension,
                actual: rho.dimension(),
            }
            .into());
        }

        let mut trace = ZERO;
        for col in 0..dimension {
            let (row, phase) = self.image(col);
            trace += phase * rho.get(col, row);
        }
        Ok(trace)
    }

    /// Image of basis state |col⟩: P|col⟩ = phase · |row⟩, returned as (row, phase)
    ///
    /// # Errors
    /// Returns `InvalidQubitCount` if 2^n overflows and `BasisStateOutOfRange`
    /// if `col >= 2^n`
    pub fn apply_to_basis_state(&self, col: usize) -> Result<(usize, Complex64)> {
        let dimension = self.checked_dimension()?;
        if col >= dimension {
            return Err(PauliError::BasisStateOutOfRange {
                state: col,
                num_qubits: self.num_qubits(),
            });
        }
        Ok(self.image(col))
    }

    /// [`apply_to_basis_state`](Self::apply_to_basis_state) for `col` already known to be below 2^n
    pub(crate) fn image(&self, col: usize) -> (usize, Complex64) {
        let n = self.num_qubits();
        let mut row = col;
        let mut phase = ONE;

        for (qubit, pauli) in self.paulis.iter().enumerate() {
            let shift = n - 1 - qubit;
            if pauli.flips_bit() {
                row ^= 1 << shift;
            }
            phase *= pauli.phase((col >> shift) & 1);
        }

        (row, phase)
    }
}

impl FromStr for PauliString {
    type Err = PauliError;

    /// Parse from letters such as "XXYZ"
    fn from_str(s: &str) -> Result<Self> {
        let paulis = s.chars().map(Pauli::from_char).collect::<Result<Vec<_>>>()?;
        Ok(Self { paulis })
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.paulis.iter().try_for_each(|p| write!(f, "{}", p))
    }
}

/// 4^num_qubits, or `None` on overflow
pub(crate) fn group_size(num_qubits: usize) -> Option<usize> {
    u32::try_from(2 * num_qubits)
        .ok()
        .and_then(|shift| 1usize.checked_shl(shift))
}
