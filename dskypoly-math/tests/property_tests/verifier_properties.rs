//! Property-based tests for root verification
//!
//! This module tests:
//! - Exact roots verify with tiny backward error
//! - Perturbed roots are caught
//! - Solver results carry consistent verification data

use dskypoly_math::{Complex64, Polynomial, RootSolver, RootVerifier};
use proptest::prelude::*;

/// Strategy for generating integer roots, exact in floating point
fn integer_root_strategy() -> impl Strategy<Value = i32> {
    -6i32..=6i32
}

#[cfg(test)]
mod verification_properties {
    use super::*;

    proptest! {
        /// Integer roots rebuild the polynomial exactly
        #[test]
        fn integer_roots_verify_exactly(
            roots in prop::collection::vec(integer_root_strategy(), 1..=6)
        ) {
            let roots: Vec<Complex64> = roots.into_iter().map(|r| Complex64::new(r as f64, 0.0)).collect();
            let poly = Polynomial::from_roots(Complex64::new(1.0, 0.0), &roots).unwrap();
            let check = RootVerifier::verify(&poly, &roots);

            prop_assert_eq!(check.max_residual, 0.0);
            prop_assert_eq!(check.coefficient_error, 0.0);
            prop_assert!(check.accepts(1e-15));
        }

        /// Moving one root away is detected
        #[test]
        fn perturbed_root_is_rejected(
            roots in prop::collection::vec(integer_root_strategy(), 1..=6),
            offset in 0.5f64..2.0f64
        ) {
            let roots: Vec<Complex64> = roots.into_iter().map(|r| Complex64::new(r as f64, 0.0)).collect();
            let poly = Polynomial::from_roots(Complex64::new(1.0, 0.0), &roots).unwrap();
            let mut moved = roots.clone();
            moved[0] += Complex64::new(0.0, offset);
            let check = RootVerifier::verify(&poly, &moved);

            prop_assert!(check.max_residual > 0.0);
            prop_assert!(check.coefficient_error > 0.0);
            prop_assert!(!check.accepts(1e-9));
        }

        /// The residuals stored on a result match a fresh verification
        #[test]
        fn solve_result_is_verified(
            roots in prop::collection::vec(integer_root_strategy(), 1..=6)
        ) {
            let roots: Vec<Complex64> = roots.into_iter().map(|r| Complex64::new(r as f64, 0.0)).collect();
            let poly = Polynomial::from_roots(Complex64::new(1.0, 0.0), &roots).unwrap();
            let result = RootSolver::default().solve(&poly).unwrap();
            let check = RootVerifier::verify(&poly, &result.values());

            prop_assert_eq!(check.max_residual, result.max_residual);
            prop_assert_eq!(check.max_relative_residual, result.max_relative_residual);
            for (root, residual) in result.roots.iter().zip(&check.residuals) {
                prop_assert_eq!(root.residual, *residual);
            }
        }
    }
}
