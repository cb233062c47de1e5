//! Input validation helpers
//!
//! The reconstruction core assumes well-formed inputs and does not call these
//! itself. They exist for callers that want to check marginals or results
//! before trusting them.

use crate::matrix::ComplexMatrix;
use crate::pure_state::norm;
use num_complex::Complex64;

/// Default tolerance for normalization checks
pub const DEFAULT_NORM_TOLERANCE: f64 = 1e-10;

/// Default tolerance for Hermiticity and trace checks
pub const DEFAULT_MATRIX_TOLERANCE: f64 = 1e-10;

/// Validation result with diagnostics
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the input passed validation
    pub valid: bool,
    /// Size of the largest violation found (0 when exact)
    pub deviation: f64,
    /// Human-readable diagnostic message
    pub message: String,
}

impl ValidationResult {
    /// Check if the input is valid within tolerance
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Get severity level (0 = good, 1 = warning, 2 = error)
    pub fn severity(&self) -> u8 {
        if self.deviation < 1e-10 {
            0
        } else if self.deviation < 1e-6 {
            1
        } else {
            2
        }
    }

    fn combine(self, other: ValidationResult) -> ValidationResult {
        let valid = self.valid && other.valid;
        let deviation = self.deviation.max(other.deviation);
        let message = match (self.valid, other.valid) {
            (true, true) => self.message,
            (false, true) => self.message,
            (true, false) => other.message,
            (false, false) => format!("{}; {}", self.message, other.message),
        };
        ValidationResult {
            valid,
            deviation,
            message,
        }
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ValidationResult(valid={}, deviation={:.2e})",
            self.valid, self.deviation
        )
    }
}

/// Validate state normalization
///
/// # Example
/// ```
/// use qmarg_state::validation::{validate_normalization, DEFAULT_NORM_TOLERANCE};
/// use num_complex::Complex64;
///
/// let amplitudes = vec![
///     Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0),
///     Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0),
/// ];
///
/// let result = validate_normalization(&amplitudes, DEFAULT_NORM_TOLERANCE);
/// assert!(result.is_valid());
/// ```
pub fn validate_normalization(amplitudes: &[Complex64], tolerance: f64) -> ValidationResult {
    if !check_finite(amplitudes) {
        return ValidationResult {
            valid: false,
            deviation: f64::INFINITY,
            message: "State contains NaN or infinite amplitudes".to_string(),
        };
    }

    let norm = norm(amplitudes);
    let deviation = (norm - 1.0).abs();
    let valid = deviation < tolerance;
    let message = if valid {
        format!("State is normalized (norm = {:.10})", norm)
    } else {
        format!(
            "State normalization error: norm = {:.10}, error = {:.2e}",
            norm, deviation
        )
    };

    ValidationResult {
        valid,
        deviation,
        message,
    }
}

/// Validate ρᵢⱼ = ρⱼᵢ* for every element
pub fn validate_hermitian(matrix: &ComplexMatrix, tolerance: f64) -> ValidationResult {
    if !check_finite(matrix.data()) {
        return ValidationResult {
            valid: false,
            deviation: f64::INFINITY,
            message: "Matrix contains NaN or infinite elements".to_string(),
        };
    }

    let d = matrix.dimension();
    let mut deviation: f64 = 0.0;
    for i in 0..d {
        for j in i..d {
            deviation = deviation.max((matrix.get(i, j) - matrix.get(j, i).conj()).norm());
        }
    }

    let valid = deviation <= tolerance;
    let message = if valid {
        "Matrix is Hermitian".to_string()
    } else {
        format!("Matrix is not Hermitian: max |ρᵢⱼ - ρⱼᵢ*| = {:.2e}", deviation)
    };

    ValidationResult {
        valid,
        deviation,
        message,
    }
}

/// Validate that a matrix is a plausible marginal: Hermitian with unit trace
pub fn validate_marginal(matrix: &ComplexMatrix, tolerance: f64) -> ValidationResult {
    let hermitian = validate_hermitian(matrix, tolerance);

    let trace = matrix.trace();
    let deviation = (trace - Complex64::new(1.0, 0.0)).norm();
    let valid = deviation <= tolerance;
    let trace_result = ValidationResult {
        valid,
        deviation,
        message: if valid {
            "Trace is one".to_string()
        } else {
            format!("Trace is {:.6}{:+.6}i, expected 1", trace.re, trace.im)
        },
    };

    hermitian.combine(trace_result)
}

/// Check if values contain NaN or infinity
pub fn check_finite(values: &[Complex64]) -> bool {
    values.iter().all(|a| a.re.is_finite() && a.im.is_finite())
}
