//! Property-based tests for root finding
//!
//! This module tests:
//! - Roots reproduce the polynomial they came from
//! - Every strategy returns exactly `degree` roots
//! - Coefficients spanning many orders of magnitude give finite roots
//! - Roots of unity and other binomials
//! - Determinism of repeated solves

use dskypoly_math::{
    Complex64, FallbackMethod, Method, Polynomial, RootSolver, SolveError, SolveResult,
    SolverConfig,
};
use proptest::prelude::*;
use std::f64::consts::TAU;

/// Strategy for generating well-scaled real roots
fn root_strategy() -> impl Strategy<Value = f64> {
    -5.0f64..5.0f64
}

/// Strategy for generating a leading coefficient bounded away from zero
fn leading_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![0.5f64..4.0f64, -4.0f64..-0.5f64]
}

/// Strategy for a nonzero coefficient `±m · 10^e` with `e` in `exponents`
fn wide_coefficient(exponents: std::ops::RangeInclusive<i32>) -> impl Strategy<Value = f64> {
    (1.0f64..10.0f64, exponents, any::<bool>()).prop_map(|(mantissa, exponent, negative)| {
        let value = mantissa * 10f64.powi(exponent);
        if negative { -value } else { value }
    })
}

fn solver() -> RootSolver {
    RootSolver::default()
}

/// Solve, accepting a best-effort result from an exhausted iteration.
fn solve_or_best_effort(poly: &Polynomial) -> SolveResult {
    match solver().solve(poly) {
        Ok(result) => result,
        Err(SolveError::NonConvergence { best_effort, .. }) => *best_effort,
        Err(e) => panic!("unexpected error {e} for {poly}"),
    }
}

#[cfg(test)]
mod round_trip_properties {
    use super::*;

    proptest! {
        /// Roots of a polynomial built from known real roots verify
        #[test]
        fn real_roots_round_trip(
            leading in leading_strategy(),
            roots in prop::collection::vec(root_strategy(), 1..=4)
        ) {
            let roots: Vec<Complex64> = roots.into_iter().map(|r| Complex64::new(r, 0.0)).collect();
            let poly = Polynomial::from_roots(Complex64::new(leading, 0.0), &roots).unwrap();
            let result = solver().solve(&poly).unwrap();

            prop_assert_eq!(result.roots.len(), roots.len());
            prop_assert!(result.max_relative_residual < 1e-9,
                "relative residual {} for {}", result.max_relative_residual, poly);
        }

        /// Conjugate pairs produce real polynomials whose roots verify
        #[test]
        fn conjugate_pairs_round_trip(
            re in root_strategy(),
            im in 0.1f64..5.0f64,
            extra in prop::collection::vec(root_strategy(), 0..=2)
        ) {
            let mut roots = vec![Complex64::new(re, im), Complex64::new(re, -im)];
            roots.extend(extra.into_iter().map(|r| Complex64::new(r, 0.0)));
            let poly = Polynomial::from_roots(Complex64::new(1.0, 0.0), &roots).unwrap();
            let result = solver().solve(&poly).unwrap();

            prop_assert_eq!(result.roots.len(), roots.len());
            prop_assert!(result.max_relative_residual < 1e-9);
            prop_assert!(result.roots.iter().any(|r| (r.value - roots[0]).norm() < 1e-6));
        }

        /// Every degree yields exactly `degree` roots with small backward error
        #[test]
        fn root_count_matches_degree(
            leading in leading_strategy(),
            rest in prop::collection::vec(-10.0f64..10.0f64, 1..=8)
        ) {
            let mut coeffs = vec![leading];
            coeffs.extend(rest);
            let poly = Polynomial::from_real(&coeffs).unwrap();
            let result = solver().solve(&poly).unwrap();

            prop_assert_eq!(result.degree, poly.degree());
            prop_assert_eq!(result.roots.len(), poly.degree());
            prop_assert!(result.max_relative_residual < 1e-8,
                "relative residual {} via {} for {}",
                result.max_relative_residual, result.method, poly);
        }
    }
}

#[cfg(test)]
mod scale_properties {
    use super::*;

    proptest! {
        /// Small roots leave a small absolute residual, not only a relative one
        #[test]
        fn bounded_roots_have_small_absolute_residual(
            leading in prop_oneof![0.5f64..2.0f64, -2.0f64..-0.5f64],
            roots in prop::collection::vec(-2.0f64..2.0f64, 1..=4)
        ) {
            let roots: Vec<Complex64> = roots.into_iter().map(|r| Complex64::new(r, 0.0)).collect();
            let poly = Polynomial::from_roots(Complex64::new(leading, 0.0), &roots).unwrap();
            let result = solver().solve(&poly).unwrap();

            prop_assert!(result.max_residual < 1e-9,
                "absolute residual {} via {} for {}", result.max_residual, result.method, poly);
        }

        /// Coefficients across forty orders of magnitude still give finite
        /// roots and residuals
        #[test]
        fn wide_exponent_coefficients_stay_finite(
            coeffs in prop::collection::vec(wide_coefficient(-20..=20), 2..=5)
        ) {
            let poly = Polynomial::from_real(&coeffs).unwrap();
            let result = solve_or_best_effort(&poly);

            prop_assert_eq!(result.roots.len(), poly.degree());
            if result.converged {
                prop_assert!(result.roots.iter().all(|r| r.value.is_finite()),
                    "non-finite root via {} for {}: {:?}", result.method, poly, result.values());
                prop_assert!(result.max_residual.is_finite());
                prop_assert!(result.max_relative_residual.is_finite());
            }
        }

        /// Quadratics with coefficients from 1e-150 to 1e151 have finite roots
        #[test]
        fn wide_quadratics_stay_finite(
            coeffs in prop::collection::vec(wide_coefficient(-150..=150), 3)
        ) {
            let poly = Polynomial::from_real(&coeffs).unwrap();
            let result = solve_or_best_effort(&poly);

            prop_assert_eq!(result.roots.len(), 2);
            if result.converged {
                prop_assert!(result.roots.iter().all(|r| r.value.is_finite()),
                    "non-finite root via {} for {}: {:?}", result.method, poly, result.values());
                prop_assert!(result.max_relative_residual.is_finite());
            }
        }
    }
}

#[cfg(test)]
mod binomial_properties {
    use super::*;

    proptest! {
        /// xⁿ - 1 gives the n-th roots of unity
        #[test]
        fn roots_of_unity(n in 5usize..=12) {
            let mut coeffs = vec![0.0; n + 1];
            coeffs[0] = 1.0;
            coeffs[n] = -1.0;
            let result = solver().solve_real(&coeffs).unwrap();

            prop_assert_eq!(result.method, Method::BinomialRadical);
            prop_assert_eq!(result.roots.len(), n);
            for k in 0..n {
                let expected = Complex64::from_polar(1.0, TAU * k as f64 / n as f64);
                prop_assert!(result.roots.iter().any(|r| (r.value - expected).norm() < 1e-12));
            }
            for root in &result.roots {
                prop_assert!((root.value.norm() - 1.0).abs() < 1e-12);
                prop_assert!((root.value.powu(n as u32) - Complex64::new(1.0, 0.0)).norm() < 1e-12);
            }
        }
    }
}

#[cfg(test)]
mod determinism_properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Solving the same polynomial twice gives bit-identical roots
        #[test]
        fn solve_is_deterministic(
            leading in leading_strategy(),
            rest in prop::collection::vec(-10.0f64..10.0f64, 5..=7)
        ) {
            let mut coeffs = vec![leading];
            coeffs.extend(rest);
            let poly = Polynomial::from_real(&coeffs).unwrap();
            let first = solver().solve(&poly).unwrap();
            let second = solver().solve(&poly).unwrap();

            prop_assert_eq!(first.method, second.method);
            let a: Vec<(u64, u64)> = first.values().iter().map(|z| (z.re.to_bits(), z.im.to_bits())).collect();
            let b: Vec<(u64, u64)> = second.values().iter().map(|z| (z.re.to_bits(), z.im.to_bits())).collect();
            prop_assert_eq!(a, b);
        }
    }
}

#[test]
fn double_root_is_accurate() {
    let result = solver().solve_real(&[1.0, -2.0, 1.0]).unwrap();
    assert!(result.max_residual < 1e-12);
    for root in &result.roots {
        assert!((root.value - Complex64::new(1.0, 0.0)).norm() < 1e-12);
    }
}

#[test]
fn bring_quintic_falls_back_to_companion() {
    let result = solver().solve_real(&[1.0, 0.0, 0.0, 0.0, -1.0, 1.0]).unwrap();
    assert_eq!(result.roots.len(), 5);
    assert_eq!(result.method, Method::NumericalCompanion);
    assert!(result.max_residual <= 1e-6);
    let rejected = result.fallback_from.expect("experimental attempt recorded");
    assert_eq!(rejected.method, Method::HypergeometricExperimental);
}

#[test]
fn iteration_cap_reports_best_effort() {
    let config = SolverConfig::new()
        .with_max_iterations(1)
        .with_hypergeometric(false)
        .with_fallback(FallbackMethod::DurandKerner);
    let err = RootSolver::new(config)
        .unwrap()
        .solve_real(&[1.0, 0.0, 0.0, 0.0, -1.0, 1.0])
        .unwrap_err();

    let SolveError::NonConvergence {
        iterations,
        best_effort,
    } = err
    else {
        panic!("expected non-convergence");
    };
    assert_eq!(iterations, 1);
    assert_eq!(best_effort.roots.len(), 5);
    assert_eq!(best_effort.method, Method::NumericalIterative);
    assert!(best_effort.max_relative_residual > 1e-6);
}

#[test]
fn extreme_closed_form_inputs_stay_finite() {
    let cases: [(&[f64], &[Complex64]); 4] = [
        (&[1e-200, 1.0], &[Complex64::new(-1e200, 0.0)]),
        (&[1.0, 1e200, 1.0], &[Complex64::new(-1e200, 0.0), Complex64::new(-1e-200, 0.0)]),
        (&[1e-300, 1.0, 1.0], &[Complex64::new(-1e300, 0.0), Complex64::new(-1.0, 0.0)]),
        (
            &[1.0, 1e120, 0.0, 1.0],
            &[
                Complex64::new(-1e120, 0.0),
                Complex64::new(0.0, 1e-60),
                Complex64::new(0.0, -1e-60),
            ],
        ),
    ];
    for (coeffs, expected) in cases {
        let result = solver().solve_real(coeffs).unwrap();
        assert!(result.converged);
        assert!(result.method.is_closed_form(), "{coeffs:?} via {}", result.method);
        assert!(result.roots.iter().all(|r| r.value.is_finite()), "{coeffs:?}: {:?}", result.values());
        assert!(result.max_relative_residual <= 1e-6, "{coeffs:?}");
        for e in expected {
            assert!(
                result.roots.iter().any(|r| (r.value - e).norm() <= 1e-12 * e.norm()),
                "{coeffs:?}: missing root {e} in {:?}",
                result.values()
            );
        }
    }
}

#[test]
fn constant_has_no_roots() {
    assert!(matches!(
        solver().solve_real(&[7.0]),
        Err(SolveError::Degree { degree: 0, .. })
    ));
}
