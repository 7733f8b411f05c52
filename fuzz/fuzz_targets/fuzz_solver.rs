//! Fuzz target for the root solver
//!
//! Builds small polynomials from arbitrary coefficients and checks that a
//! successful solve returns one finite root per degree.

#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use dskypoly_math::{FallbackMethod, Polynomial, RootSolver, SolveError, SolverConfig};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Fallback {
    Companion,
    DurandKerner,
}

#[derive(Debug, Arbitrary)]
struct Input {
    coefficients: Vec<i16>,
    scale: u8,
    fallback: Fallback,
    hypergeometric: bool,
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);
    let Ok(input) = Input::arbitrary(&mut unstructured) else {
        return;
    };

    // Degree at most 12 keeps each run fast
    let divisor = f64::from(input.scale.max(1));
    let coefficients: Vec<f64> = input
        .coefficients
        .iter()
        .take(13)
        .map(|&c| f64::from(c) / divisor)
        .collect();
    let Ok(poly) = Polynomial::from_real(&coefficients) else {
        return;
    };

    let fallback = match input.fallback {
        Fallback::Companion => FallbackMethod::Companion,
        Fallback::DurandKerner => FallbackMethod::DurandKerner,
    };
    let config = SolverConfig::new()
        .with_fallback(fallback)
        .with_hypergeometric(input.hypergeometric);
    let Ok(solver) = RootSolver::new(config) else {
        return;
    };

    match solver.solve(&poly) {
        Ok(result) => {
            assert_eq!(result.roots.len(), poly.degree());
            assert!(result.converged);
            assert!(result.roots.iter().all(|r| r.value.is_finite()));
            assert!(result.max_residual.is_finite());
        }
        Err(SolveError::NonConvergence { best_effort, .. }) => {
            assert_eq!(best_effort.roots.len(), poly.degree());
        }
        Err(_) => {}
    }
});
