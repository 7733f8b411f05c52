//! Independent checks on computed roots.
//!
//! Two measures are reported. The absolute residual `|P(x)|` is what users
//! read; the relative residual `|P(x)| / Σ|a_i||x|^i` is the backward error,
//! which stays meaningful when coefficients or roots are large and is what
//! acceptance decisions use. The root-to-coefficient check rebuilds the
//! polynomial from the roots and compares it with the input.

use crate::polynomial::{Polynomial, divide};
use crate::solver::SolveResult;
use num_complex::Complex64;
use serde::Serialize;
use tracing::debug;

/// Verification of a root set against a polynomial.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verification {
    /// Degree of the polynomial
    pub degree: usize,
    /// `|P(x)|` per root
    pub residuals: Vec<f64>,
    /// Backward error per root
    pub relative_residuals: Vec<f64>,
    /// Largest absolute residual
    pub max_residual: f64,
    /// Largest backward error
    pub max_relative_residual: f64,
    /// Largest coefficient difference after rebuilding from the roots,
    /// relative to the largest coefficient
    pub coefficient_error: f64,
}

impl Verification {
    /// Whether the root count is right and every backward error is within
    /// `tolerance`.
    #[must_use]
    pub fn accepts(&self, tolerance: f64) -> bool {
        self.residuals.len() == self.degree && self.max_relative_residual <= tolerance
    }
}

/// Residual and coefficient checks for computed roots.
pub struct RootVerifier;

impl RootVerifier {
    /// Verify `roots` against `poly`.
    ///
    /// Non-finite residuals count as infinite so they are never masked by
    /// the maximum.
    pub fn verify(poly: &Polynomial, roots: &[Complex64]) -> Verification {
        let (residuals, relative_residuals): (Vec<f64>, Vec<f64>) =
            roots.iter().map(|&x| residual_pair(poly, x)).unzip();
        let max = |values: &[f64]| values.iter().copied().fold(0.0, f64::max);

        let verification = Verification {
            degree: poly.degree(),
            max_residual: max(&residuals),
            max_relative_residual: max(&relative_residuals),
            coefficient_error: coefficient_error(poly, roots),
            residuals,
            relative_residuals,
        };
        debug!(
            max_residual = verification.max_residual,
            max_relative_residual = verification.max_relative_residual,
            coefficient_error = verification.coefficient_error,
            "Verified {} roots",
            roots.len()
        );
        verification
    }

    /// Verify a result in place, filling every residual field.
    pub fn attach(poly: &Polynomial, result: &mut SolveResult) -> Verification {
        let values = result.values();
        let verification = Self::verify(poly, &values);
        for (i, root) in result.roots.iter_mut().enumerate() {
            root.residual = verification.residuals[i];
            root.relative_residual = verification.relative_residuals[i];
        }
        result.max_residual = verification.max_residual;
        result.max_relative_residual = verification.max_relative_residual;
        result.coefficient_error = verification.coefficient_error;
        verification
    }
}

fn finite_or_infinity(x: f64) -> f64 {
    if x.is_nan() { f64::INFINITY } else { x }
}

/// `|P(x)| / Σ|a_i||x|^i`, infinite when it cannot be computed.
pub(crate) fn relative_residual(poly: &Polynomial, x: Complex64) -> f64 {
    residual_pair(poly, x).1
}

fn residual_pair(poly: &Polynomial, x: Complex64) -> (f64, f64) {
    let absolute = finite_or_infinity(poly.evaluate(x).norm());
    if absolute == 0.0 {
        return (0.0, 0.0);
    }
    let relative = if x.norm() > 1.0 {
        // |x|^n cancels from the ratio
        let (value, scale) = poly.evaluate_reversed(divide(Complex64::new(1.0, 0.0), x));
        value.norm() / scale
    } else {
        absolute / poly.evaluate_magnitude(x)
    };
    (absolute, finite_or_infinity(relative))
}

fn coefficient_error(poly: &Polynomial, roots: &[Complex64]) -> f64 {
    if roots.len() != poly.degree() {
        return f64::INFINITY;
    }
    let Ok(rebuilt) = Polynomial::from_roots(poly.leading(), roots) else {
        return f64::INFINITY;
    };
    let scale = poly.max_coefficient_norm();
    poly.coefficients()
        .iter()
        .zip(rebuilt.coefficients())
        .map(|(a, b)| finite_or_infinity((a - b).norm() / scale))
        .fold(0.0, f64::max)
}
