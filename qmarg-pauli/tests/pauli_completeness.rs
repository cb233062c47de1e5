//! Completeness and orthogonality of the Pauli basis

use num_complex::Complex64;
use qmarg_pauli::{pauli_group, pauli_proj, resum_pauli_decomposition, PauliGroup};
use qmarg_state::{ComplexMatrix, DensityMatrix};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

const NUM_QUBITS: usize = 3;
const SEED: u64 = 7777;

fn exact_tolerance() -> f64 {
    100.0 * f64::EPSILON
}

#[test]
fn test_pauli_proj_resums_random_density_matrix() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let rho = DensityMatrix::random(NUM_QUBITS, &mut rng).unwrap();

    let mut reconstructed = ComplexMatrix::zeros(rho.dimension());
    for p in pauli_group(NUM_QUBITS).unwrap() {
        reconstructed += &pauli_proj(rho.matrix(), &p).unwrap();
    }

    let error = reconstructed.max_abs_diff(rho.matrix()).unwrap();
    assert!(error <= exact_tolerance(), "max deviation {error:e}");
}

#[test]
fn test_resum_holds_for_any_trace() {
    let mut rng = StdRng::seed_from_u64(SEED + 1);
    let mut m = DensityMatrix::random(2, &mut rng).unwrap().into_matrix();
    m.scale(Complex64::new(-3.5, 0.25));

    let resummed = resum_pauli_decomposition(&m).unwrap();
    assert!(resummed.max_abs_diff(&m).unwrap() <= 10.0 * exact_tolerance());
}

#[test]
fn test_pauli_group_is_hilbert_schmidt_orthogonal() {
    let group: Vec<ComplexMatrix> = pauli_group(2).unwrap().collect();
    for (a, p) in group.iter().enumerate() {
        for (b, q) in group.iter().enumerate() {
            let inner = p.adjoint().trace_of_product(q).unwrap();
            let expected = if a == b { 4.0 } else { 0.0 };
            assert!((inner - Complex64::new(expected, 0.0)).norm() < 1e-12);
        }
    }
}

#[test]
fn test_group_elements_are_unitary_and_hermitian() {
    for p in pauli_group(2).unwrap() {
        assert!(p.is_hermitian(0.0));
        let squared = p.matmul(&p).unwrap();
        assert!(squared.max_abs_diff(&ComplexMatrix::identity(4)).unwrap() < 1e-15);
    }
}

#[test]
fn test_reenumeration_yields_same_elements() {
    let group = PauliGroup::new(NUM_QUBITS).unwrap();

    let fingerprint = |m: &ComplexMatrix| -> Vec<(i64, i64)> {
        m.data()
            .iter()
            .map(|z| (z.re.round() as i64, z.im.round() as i64))
            .collect()
    };

    let first: HashSet<_> = group.matrices().map(|m| fingerprint(&m)).collect();
    let second: HashSet<_> = group.matrices().map(|m| fingerprint(&m)).collect();

    assert_eq!(first.len(), 4usize.pow(NUM_QUBITS as u32));
    assert_eq!(first, second);
}
