//! General-degree numerical methods.

use crate::polynomial::{Polynomial, divide};
use nalgebra::{DMatrix, Schur};
use num_complex::Complex64;
use std::f64::consts::TAU;

/// Rotates the Durand-Kerner start points off the real axis.
const INITIAL_ANGLE: f64 = 0.4;

/// Result of an iterative method.
#[derive(Debug, Clone)]
pub(crate) struct Iteration {
    pub roots: Vec<Complex64>,
    pub iterations: usize,
    pub converged: bool,
}

/// Eigenvalues of the companion matrix.
///
/// The matrix has ones on the subdiagonal and `-a_k/a_n` in its last
/// column, so its characteristic polynomial is the monic form of `poly`.
/// A complex Schur decomposition makes it upper triangular; the eigenvalues
/// are the diagonal. The roots are scaled by [`Polynomial::root_scale`]
/// first so the matrix entries stay near 1.
///
/// Returns `None` if the QR iteration does not converge within
/// `max_iterations` sweeps or an eigenvalue is not finite.
pub(crate) fn companion_roots(poly: &Polynomial, max_iterations: usize) -> Option<Vec<Complex64>> {
    let n = poly.degree();
    if n == 1 {
        return Some(vec![-divide(poly.constant(), poly.leading())]);
    }

    let scale = poly.root_scale();
    let scaled = poly.scale_roots(scale);
    let mut companion = DMatrix::<Complex64>::zeros(n, n);
    for i in 1..n {
        companion[(i, i - 1)] = Complex64::new(1.0, 0.0);
    }
    for k in 0..n {
        companion[(k, n - 1)] = -scaled.coefficient(k);
    }

    let schur = Schur::try_new(companion, f64::EPSILON, max_iterations)?;
    let (_, triangular) = schur.unpack();
    let roots: Vec<Complex64> = (0..n).map(|i| triangular[(i, i)] * scale).collect();
    roots.iter().all(|r| r.is_finite()).then_some(roots)
}

/// Durand-Kerner (Weierstrass) simultaneous iteration.
///
/// Starts from `n` points evenly spaced on the circle of radius
/// [`Polynomial::cauchy_bound`]. Stops when every relative step falls below
/// `step_tolerance`, or every residual is at rounding level.
pub(crate) fn durand_kerner(
    poly: &Polynomial,
    max_iterations: usize,
    step_tolerance: f64,
) -> Iteration {
    let n = poly.degree();
    let monic = poly.monic();
    let radius = poly.cauchy_bound();
    let mut roots: Vec<Complex64> = (0..n)
        .map(|k| Complex64::from_polar(radius, TAU * k as f64 / n as f64 + INITIAL_ANGLE))
        .collect();

    // Residual floor for Horner evaluation in double precision.
    let noise = 8.0 * n as f64 * f64::EPSILON;

    for iteration in 1..=max_iterations {
        let mut max_step: f64 = 0.0;
        for k in 0..n {
            let z = roots[k];
            let mut denominator = Complex64::new(1.0, 0.0);
            for (j, &other) in roots.iter().enumerate() {
                if j != k {
                    denominator *= z - other;
                }
            }
            if denominator.norm() == 0.0 {
                denominator = Complex64::new(f64::EPSILON, 0.0);
            }
            let step = divide(monic.evaluate(z), denominator);
            roots[k] = z - step;
            max_step = max_step.max(step.norm() / roots[k].norm().max(1.0));
        }

        let settled = roots
            .iter()
            .all(|&z| monic.evaluate(z).norm() <= noise * monic.evaluate_magnitude(z));
        let finite = roots.iter().all(|z| z.is_finite());
        if finite && (max_step <= step_tolerance || settled) {
            return Iteration {
                roots,
                iterations: iteration,
                converged: true,
            };
        }
    }

    Iteration {
        roots,
        iterations: max_iterations,
        converged: false,
    }
}
