//! Property-based tests for polynomial transforms
//!
//! This module tests:
//! - Depression removes the second coefficient without changing values
//! - Taylor shifts and deflation agree with direct evaluation
//! - Horner evaluation and derivatives
//! - Evaluation and depression are repeatable

use dskypoly_math::{Complex64, Polynomial};
use proptest::prelude::*;

/// Strategy for generating polynomial coefficients
fn coeff_strategy() -> impl Strategy<Value = f64> {
    -10.0f64..10.0f64
}

fn real_poly(leading: f64, rest: Vec<f64>) -> Polynomial {
    let mut coeffs = vec![leading];
    coeffs.extend(rest);
    Polynomial::from_real(&coeffs).unwrap()
}

fn close(a: Complex64, b: Complex64, scale: f64) -> bool {
    (a - b).norm() <= 1e-9 * scale.max(1.0)
}

#[cfg(test)]
mod depression_properties {
    use super::*;

    proptest! {
        /// Q(y) = P(y + shift) at random points
        #[test]
        fn depressed_matches_shifted_evaluation(
            leading in 0.5f64..5.0f64,
            rest in prop::collection::vec(coeff_strategy(), 2..=6),
            y_re in -3.0f64..3.0f64,
            y_im in -3.0f64..3.0f64
        ) {
            let poly = real_poly(leading, rest);
            let (depressed, shift) = poly.depress().unwrap();
            let y = Complex64::new(y_re, y_im);

            let lhs = depressed.evaluate(y);
            let rhs = poly.evaluate(y + shift);
            let scale = poly.evaluate_magnitude(y + shift);
            prop_assert!(close(lhs, rhs, scale), "{} vs {}", lhs, rhs);
        }

        /// The second-highest coefficient of the depressed form is exactly zero
        #[test]
        fn depression_eliminates_coefficient(
            leading in 0.5f64..5.0f64,
            rest in prop::collection::vec(coeff_strategy(), 1..=6)
        ) {
            let poly = real_poly(leading, rest);
            let (depressed, shift) = poly.depress().unwrap();
            let n = poly.degree();

            prop_assert_eq!(depressed.degree(), n);
            prop_assert_eq!(depressed.leading(), poly.leading());
            prop_assert_eq!(depressed.coefficient(n - 1), Complex64::new(0.0, 0.0));
            let expected = -poly.coefficient(n - 1) / (poly.leading() * n as f64);
            prop_assert_eq!(shift, expected);
        }

        /// Deflation remainder equals the value at the divisor root
        #[test]
        fn deflation_remainder_is_value(
            leading in 0.5f64..5.0f64,
            rest in prop::collection::vec(coeff_strategy(), 1..=6),
            r in -3.0f64..3.0f64
        ) {
            let poly = real_poly(leading, rest);
            let root = Complex64::new(r, 0.0);
            let (quotient, remainder) = poly.deflate(root).unwrap();

            prop_assert_eq!(quotient.degree(), poly.degree() - 1);
            prop_assert!(close(remainder, poly.evaluate(root), poly.evaluate_magnitude(root)));
        }

        /// The combined Horner pass agrees with the explicit derivative
        #[test]
        fn derivative_agrees(
            leading in 0.5f64..5.0f64,
            rest in prop::collection::vec(coeff_strategy(), 1..=6),
            x in -3.0f64..3.0f64
        ) {
            let poly = real_poly(leading, rest);
            let x = Complex64::new(x, 0.0);
            let (value, slope) = poly.evaluate_with_derivative(x);
            let derivative = poly.derivative().unwrap();

            prop_assert_eq!(value, poly.evaluate(x));
            prop_assert!(close(slope, derivative.evaluate(x), derivative.evaluate_magnitude(x)));
        }

        /// Repeated evaluation and depression are bit-identical
        #[test]
        fn evaluate_and_depress_are_idempotent(
            leading in 0.5f64..5.0f64,
            rest in prop::collection::vec(coeff_strategy(), 3..=4),
            re in -3.0f64..3.0f64,
            im in -3.0f64..3.0f64
        ) {
            let poly = real_poly(leading, rest);
            let x = Complex64::new(re, im);
            let first = poly.evaluate(x);
            let second = poly.evaluate(x);
            prop_assert_eq!(first.re.to_bits(), second.re.to_bits());
            prop_assert_eq!(first.im.to_bits(), second.im.to_bits());

            let (q1, shift1) = poly.depress().unwrap();
            let (q2, shift2) = poly.depress().unwrap();
            prop_assert_eq!(q1, q2);
            prop_assert_eq!(shift1, shift2);
        }
    }
}
