//! End-to-end reconstruction from window marginals

use approx::assert_relative_eq;
use num_complex::Complex64;
use qmarg_recon::{
    iteration, r_hat, OperatorMode, ReconError, ReconstructionConfig, Reconstructor, StoppingCriterion,
};
use qmarg_state::pure_state::inner_product;
use qmarg_state::validation::{
    validate_marginal, validate_normalization, DEFAULT_MATRIX_TOLERANCE, DEFAULT_NORM_TOLERANCE,
};
use qmarg_state::{ComplexMatrix, DensityMatrix, LocalMarginals, PureState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::FRAC_1_SQRT_2;

const WINDOW: usize = 2;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn random_product_state(num_qubits: usize, rng: &mut StdRng) -> PureState {
    let factors: Vec<[Complex64; 2]> = (0..num_qubits)
        .map(|_| {
            [
                c(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)),
                c(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)),
            ]
        })
        .collect();
    PureState::product(&factors).unwrap()
}

/// (|00⟩ + |11⟩)/√2 on qubits (0,1) and (2,3)
fn bell_chain() -> PureState {
    let bell = [c(FRAC_1_SQRT_2, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(FRAC_1_SQRT_2, 0.0)];
    let amplitudes = (0..16).map(|x| bell[x >> 2] * bell[x & 3]).collect();
    PureState::from_amplitudes(4, amplitudes).unwrap()
}

/// Real single-excitation state on five qubits with fixed Gaussian weights
fn single_excitation_state() -> PureState {
    let weights = [
        0.5866181194677145,
        0.9501383865371288,
        0.09354459814432016,
        -0.008949660387259879,
        2.8210331820596277,
    ];
    let mut amplitudes = vec![c(0.0, 0.0); 32];
    for (qubit, weight) in weights.iter().enumerate() {
        amplitudes[1 << qubit] = c(*weight, 0.0);
    }
    let mut state = PureState::from_amplitudes(5, amplitudes).unwrap();
    state.normalize().unwrap();
    state
}

/// Equal superposition of the five single-excitation basis states
fn w_state() -> PureState {
    let mut amplitudes = vec![c(0.0, 0.0); 32];
    for qubit in 0..5 {
        amplitudes[1 << qubit] = c(1.0, 0.0);
    }
    let mut state = PureState::from_amplitudes(5, amplitudes).unwrap();
    state.normalize().unwrap();
    state
}

fn expectation(r: &ComplexMatrix, state: &PureState) -> f64 {
    let mut y = vec![c(0.0, 0.0); state.dimension()];
    r.matvec(state.amplitudes(), &mut y).unwrap();
    inner_product(state.amplitudes(), &y).unwrap().re
}

#[test]
fn test_product_states_with_default_budget() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..20 {
        let target = random_product_state(5, &mut rng);
        let result = iteration(WINDOW, target.marginals(WINDOW).unwrap(), 5, 100, 0.1, &mut rng).unwrap();
        assert_relative_eq!(result.state.norm(), 1.0, epsilon = 1e-12);
        let fidelity = result.fidelity(&target).unwrap();
        assert!(fidelity > 0.99, "fidelity {fidelity}");
    }
}

#[test]
fn test_single_excitation_state_fidelity() {
    let target = single_excitation_state();
    let sigmas: Vec<ComplexMatrix> = target.marginals(WINDOW).unwrap().collect();

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = iteration(WINDOW, sigmas.iter().cloned(), 5, 100, 0.1, &mut rng).unwrap();
        assert!(result.is_converged());
        let fidelity = result.fidelity(&target).unwrap();
        assert!(fidelity >= 1.0 - 0.15, "seed {seed}: fidelity {fidelity}");
    }
}

#[test]
fn test_single_excitation_state_dominant_eigenvector() {
    // The limit of the iteration, not the target, bounds the fidelity
    let target = single_excitation_state();
    let mut rng = StdRng::seed_from_u64(77);
    let result = iteration(WINDOW, target.marginals(WINDOW).unwrap(), 5, 5000, 1e-12, &mut rng).unwrap();

    assert!(result.is_converged());
    assert_relative_eq!(result.fidelity(&target).unwrap(), 0.8637, epsilon = 1e-3);
}

#[test]
fn test_product_states_with_tight_tolerance() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..5 {
        let target = random_product_state(5, &mut rng);
        let result = iteration(WINDOW, target.marginals(WINDOW).unwrap(), 5, 500, 1e-8, &mut rng).unwrap();
        assert!(result.is_converged());
        let fidelity = result.fidelity(&target).unwrap();
        assert!(fidelity > 0.9999, "fidelity {fidelity}");
    }
}

#[test]
fn test_bell_chain() {
    let target = bell_chain();
    let mut rng = StdRng::seed_from_u64(1);
    let result = iteration(WINDOW, target.marginals(WINDOW).unwrap(), 4, 500, 1e-10, &mut rng).unwrap();

    assert!(result.is_converged());
    assert_relative_eq!(result.fidelity(&target).unwrap(), 1.0, epsilon = 1e-9);
    // Two Bell projectors plus the maximally mixed middle window
    assert_relative_eq!(result.report.rayleigh_quotient, 2.25, epsilon = 1e-9);
}

#[test]
fn test_w_state_reaches_dominant_eigenvalue() {
    let target = w_state();
    let sigmas: Vec<ComplexMatrix> = target.marginals(WINDOW).unwrap().collect();
    let bound = expectation(&r_hat(&sigmas, 4).unwrap(), &target);

    let reconstructor = Reconstructor::new(ReconstructionConfig::accurate().with_seed(5)).unwrap();
    let result = reconstructor.reconstruct(WINDOW, sigmas, 5).unwrap();

    assert_relative_eq!(result.state.norm(), 1.0, epsilon = 1e-12);
    assert!(
        result.report.rayleigh_quotient >= bound - 1e-6,
        "rayleigh {} below <psi|R|psi> = {bound}",
        result.report.rayleigh_quotient
    );
    // Every window gives |00⟩ weight 3/5, so R has eigenvalue 4 · 3/5 above ⟨ψ|R|ψ⟩
    assert!(result.is_converged());
    assert_relative_eq!(result.report.rayleigh_quotient, 2.4, epsilon = 1e-8);
}

#[test]
fn test_fidelity_ignores_global_phase() {
    let mut rng = StdRng::seed_from_u64(3);
    let target = random_product_state(4, &mut rng);
    let result = iteration(WINDOW, target.marginals(WINDOW).unwrap(), 4, 500, 1e-8, &mut rng).unwrap();

    let mut rotated = result.state.clone();
    rotated.apply_global_phase(1.234);
    assert_relative_eq!(
        rotated.fidelity(&target).unwrap(),
        result.fidelity(&target).unwrap(),
        epsilon = 1e-12
    );
}

#[test]
fn test_full_window_with_both_operator_modes() {
    let mut rng = StdRng::seed_from_u64(8);
    let target = PureState::random(3, &mut rng).unwrap();

    for mode in [OperatorMode::Dense, OperatorMode::MatrixFree] {
        let config = ReconstructionConfig::new().with_seed(12).with_operator(mode);
        let result = Reconstructor::new(config)
            .unwrap()
            .reconstruct(3, target.marginals(3).unwrap(), 3)
            .unwrap();
        assert_relative_eq!(result.fidelity(&target).unwrap(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(result.report.rayleigh_quotient, 1.0, epsilon = 1e-10);
    }
}

#[test]
fn test_mixed_state_marginals_still_produce_a_state() {
    let mut rng = StdRng::seed_from_u64(44);
    let rho = DensityMatrix::random(4, &mut rng).unwrap();
    for sigma in rho.marginals(WINDOW).unwrap() {
        let check = validate_marginal(&sigma, DEFAULT_MATRIX_TOLERANCE);
        assert!(check.is_valid(), "{}", check.message);
    }

    let config = ReconstructionConfig::new().with_seed(1).with_history(true);
    let result = Reconstructor::new(config)
        .unwrap()
        .reconstruct(WINDOW, rho.marginals(WINDOW).unwrap(), 4)
        .unwrap();

    assert_eq!(result.state.num_qubits(), 4);
    assert!(validate_normalization(result.amplitudes(), DEFAULT_NORM_TOLERANCE).is_valid());
    assert_eq!(result.report.history.len(), result.report.iterations);
    assert_ne!(result.report.criterion, StoppingCriterion::Annihilated);
}

#[test]
fn test_mismatched_inputs_fail_fast() {
    let mut rng = StdRng::seed_from_u64(0);
    let target = bell_chain();

    // Marginals of width 2 passed as width 3
    assert_eq!(
        iteration(3, target.marginals(WINDOW).unwrap(), 4, 10, 0.1, &mut rng).unwrap_err(),
        ReconError::WindowCountMismatch {
            expected: 2,
            actual: 3
        }
    );

    // Right count, wrong size
    let sigmas = vec![ComplexMatrix::identity(8); 3];
    assert!(matches!(
        iteration(WINDOW, sigmas, 4, 10, 0.1, &mut rng),
        Err(ReconError::OperatorSizeMismatch { index: 0, expected: 4, actual: 8 })
    ));

    assert!(matches!(
        iteration(WINDOW, Vec::<ComplexMatrix>::new(), 1, 10, 0.1, &mut rng),
        Err(ReconError::InvalidWindowWidth { width: 2, num_qubits: 1 })
    ));
}

#[test]
fn test_config_round_trips_through_json() {
    let config = ReconstructionConfig::accurate()
        .with_seed(17)
        .with_operator(OperatorMode::MatrixFree);
    let json = serde_json::to_string(&config).unwrap();
    let decoded: ReconstructionConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, config);

    let partial: ReconstructionConfig =
        serde_json::from_str(r#"{ "tolerance": 1e-4, "operator": "matrix_free" }"#).unwrap();
    assert_eq!(partial.max_iterations, 100);
    assert_eq!(partial.tolerance, 1e-4);
    assert_eq!(partial.operator, OperatorMode::MatrixFree);
    assert_eq!(partial.seed, None);
}
