//! Cardano's method for cubics.
//!
//! The cubic is depressed to `t³ + pt + q` and split by the sign of
//! `Δ = -(4p³ + 27q²)`:
//!
//! - `Δ > 0`: three distinct real roots, taken from the trigonometric form so
//!   no complex intermediate is needed
//! - `Δ < 0`: one real root from real cube roots, plus a conjugate pair
//! - `Δ = 0`: a double root `-3q/(2p)` and a simple root `3q/p`, or a triple
//!   root when `p = q = 0`
//!
//! Complex coefficients go through complex cube roots.
//!
//! The roots are first scaled by a power of two so the depressed
//! coefficients stay near 1 and `p³` cannot overflow. When the roots differ
//! widely in magnitude, the two smaller ones are recomputed by deflating the
//! largest one.

use super::{Candidate, Discriminant, Method, polish, quadratic};
use crate::algebraic::{AlgebraicForm, exact};
use crate::error::Result;
use crate::polynomial::{Polynomial, divide};
use crate::verify::relative_residual;
use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use std::f64::consts::PI;
use tracing::trace;

/// `|Δ|` below this fraction of `4|p|³ + 27q²` counts as a repeated root.
const DEGENERATE_TOLERANCE: f64 = 1e-13;

const SQRT_3_HALF: f64 = 0.866_025_403_784_438_6;

/// Newton steps spent on the largest root before deflating it.
const POLISH_STEPS: usize = 4;

/// Solve a degree-3 polynomial.
pub(crate) fn solve(poly: &Polynomial) -> Result<Candidate> {
    let (roots, discriminant) = roots(poly)?;
    let candidate = Candidate::numeric(Method::Cardano, roots.to_vec())
        .with_discriminant(discriminant);

    if discriminant == Discriminant::Zero
        && let Some(form) = triple_root_form(poly)
    {
        return Ok(candidate.with_forms(vec![form.clone(), form.clone(), form]));
    }
    Ok(candidate)
}

/// All three roots of a cubic plus its discriminant class.
pub(crate) fn roots(poly: &Polynomial) -> Result<([Complex64; 3], Discriminant)> {
    let scale = poly.root_scale();
    let scaled = poly.scale_roots(scale);
    let (depressed, shift) = scaled.depress()?;
    let monic = depressed.monic();
    let (p, q) = (monic.coefficient(1), monic.coefficient(0));

    let (ts, discriminant) = if poly.is_real() {
        depressed_real(p.re, q.re)
    } else {
        (depressed_complex(p, q), Discriminant::Complex)
    };
    let ts = ts.map(|t| t + shift);
    let roots = ts.map(|t| t * scale);

    match deflate_largest(poly, &scaled, scale, ts) {
        Some(refined) => {
            trace!("Smaller cubic roots recomputed by deflation");
            Ok((refined, exact_class(poly).unwrap_or(discriminant)))
        }
        None => Ok((roots, discriminant)),
    }
}

/// Recompute the two smaller roots from `P(x) = (x - r)(a x² + e x + f)`,
/// with `r` the largest root.
///
/// `ts` are the roots of `scaled`, the polynomial with roots divided by
/// `scale`. The largest one is polished there, where no value overflows.
/// Dividing from the constant end is stable for the largest root. The new
/// pair is kept only if it lowers the worse relative residual.
fn deflate_largest(
    poly: &Polynomial,
    scaled: &Polynomial,
    scale: f64,
    ts: [Complex64; 3],
) -> Option<[Complex64; 3]> {
    let (i, &t) = ts
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.norm().total_cmp(&b.1.norm()))?;
    if !t.is_finite() || t.norm() == 0.0 {
        return None;
    }
    let largest = polish(scaled, t, POLISH_STEPS, f64::EPSILON) * scale;
    let roots = ts.map(|t| t * scale);

    let [a, c, d] = [poly.coefficient(3), poly.coefficient(1), poly.coefficient(0)];
    let f = -divide(d, largest);
    let e = divide(f - c, largest);
    let pair = quadratic::roots(a, e, f);

    let others: Vec<Complex64> = (0..3).filter(|&k| k != i).map(|k| roots[k]).collect();
    let worst = |xs: &[Complex64]| {
        xs.iter()
            .map(|&x| relative_residual(poly, x))
            .fold(0.0, f64::max)
    };
    if !(worst(pair.as_slice()) < worst(others.as_slice())) {
        return None;
    }
    Some([largest, pair[0], pair[1]])
}

/// Sign of `18abcd - 4b³d + b²c² - 4ac³ - 27a²d²` in exact arithmetic, for
/// real coefficients.
fn exact_class(poly: &Polynomial) -> Option<Discriminant> {
    let real = poly.real_coefficients()?;
    let [a, b, c, d] = [
        exact(real[0])?,
        exact(real[1])?,
        exact(real[2])?,
        exact(real[3])?,
    ];
    let int = |n: i64| BigRational::from_integer(BigInt::from(n));
    let delta = int(18) * &a * &b * &c * &d - int(4) * &b * &b * &b * &d
        + &b * &b * &c * &c
        - int(4) * &a * &c * &c * &c
        - int(27) * &a * &a * &d * &d;
    Some(if delta.is_zero() {
        Discriminant::Zero
    } else if delta.is_positive() {
        Discriminant::Positive
    } else {
        Discriminant::Negative
    })
}

fn depressed_real(p: f64, q: f64) -> ([Complex64; 3], Discriminant) {
    let real = |x: f64| Complex64::new(x, 0.0);
    let delta = -(4.0 * p * p * p + 27.0 * q * q);
    let scale = 4.0 * (p * p * p).abs() + 27.0 * q * q;

    if scale == 0.0 {
        return ([real(0.0); 3], Discriminant::Zero);
    }

    if delta.abs() <= DEGENERATE_TOLERANCE * scale {
        let simple = 3.0 * q / p;
        let double = -1.5 * q / p;
        return ([real(simple), real(double), real(double)], Discriminant::Zero);
    }

    if delta > 0.0 {
        // p < 0 here
        let r = 2.0 * (-p / 3.0).sqrt();
        let arg = (1.5 * q / p * (-3.0 / p).sqrt()).clamp(-1.0, 1.0);
        let phi = arg.acos() / 3.0;
        let ts = [0.0, 1.0, 2.0].map(|k| real(r * (phi - 2.0 * PI * k / 3.0).cos()));
        return (ts, Discriminant::Positive);
    }

    let d = q * q / 4.0 + p * p * p / 27.0;
    // Pick the sign that adds magnitudes.
    let a = (-q / 2.0 - q.signum() * d.sqrt()).cbrt();
    let b = if a == 0.0 { 0.0 } else { -p / (3.0 * a) };
    let re = -(a + b) / 2.0;
    let im = SQRT_3_HALF * (a - b);
    (
        [
            real(a + b),
            Complex64::new(re, im),
            Complex64::new(re, -im),
        ],
        Discriminant::Negative,
    )
}

fn depressed_complex(p: Complex64, q: Complex64) -> [Complex64; 3] {
    let half_q = q / 2.0;
    let sqrt = (half_q * half_q + p * p * p / 27.0).sqrt();
    let plus = -half_q + sqrt;
    let minus = -half_q - sqrt;
    let u3 = if plus.norm() >= minus.norm() { plus } else { minus };

    let zero = Complex64::new(0.0, 0.0);
    if u3 == zero {
        return [zero; 3];
    }

    let u = u3.cbrt();
    let v = -p / (u * 3.0);
    let omega = Complex64::new(-0.5, SQRT_3_HALF);
    let omega2 = omega.conj();
    [u + v, u * omega + v * omega2, u * omega2 + v * omega]
}

/// `-b/(3a)` when the cubic is exactly `a(x + b/(3a))³`.
fn triple_root_form(poly: &Polynomial) -> Option<AlgebraicForm> {
    let real = poly.real_coefficients()?;
    let [a, b, c, d] = [
        exact(real[0])?,
        exact(real[1])?,
        exact(real[2])?,
        exact(real[3])?,
    ];
    let three = BigRational::from_integer(BigInt::from(3));
    let r = -b / (&a * &three);
    let is_cube = c == &a * &three * &r * &r && d == -(&a * &r * &r * &r);
    is_cube.then_some(AlgebraicForm::Rational(r))
}
