//! Degrees 1 and 2.

use super::{Candidate, Discriminant, Method};
use crate::algebraic::{AlgebraicForm, exact, exact_discriminant};
use crate::polynomial::{Polynomial, divide};
use num_complex::Complex64;
use num_traits::{Signed, Zero};

/// `a_1 x + a_0 = 0`.
pub(crate) fn linear(poly: &Polynomial) -> Candidate {
    let root = -divide(poly.constant(), poly.leading());
    let candidate = Candidate::numeric(Method::Linear, vec![root]);

    let form = poly
        .real_coefficients()
        .and_then(|c| Some(AlgebraicForm::Rational(-exact(c[1])? / exact(c[0])?)));
    match form {
        Some(form) => candidate.with_forms(vec![form]),
        None => candidate,
    }
}

/// `a x² + b x + c = 0`.
pub(crate) fn solve(poly: &Polynomial) -> Candidate {
    let [a, b, c] = [poly.coefficient(2), poly.coefficient(1), poly.coefficient(0)];

    let Some(real) = poly.real_coefficients() else {
        let candidate = Candidate::numeric(Method::QuadraticFormula, roots(a, b, c).to_vec());
        return candidate.with_discriminant(Discriminant::Complex);
    };

    let discriminant = match (exact(real[0]), exact(real[1]), exact(real[2])) {
        (Some(a), Some(b), Some(c)) => {
            let d = exact_discriminant(&a, &b, &c);
            if d.is_zero() {
                Discriminant::Zero
            } else if d.is_positive() {
                Discriminant::Positive
            } else {
                Discriminant::Negative
            }
        }
        _ => Discriminant::Complex,
    };

    let values = if discriminant == Discriminant::Zero {
        let double = -divide(b, a * 2.0);
        vec![double, double]
    } else {
        roots(a, b, c).to_vec()
    };

    let candidate =
        Candidate::numeric(Method::QuadraticFormula, values).with_discriminant(discriminant);
    match AlgebraicForm::quadratic_roots(real[0], real[1], real[2]) {
        Some(forms) => candidate.with_forms(forms.to_vec()),
        None => candidate,
    }
}

/// Both roots of `a x² + b x + c` without cancellation.
///
/// The square root's sign is chosen so that `b` and `±√Δ` add in magnitude;
/// the second root comes from Vieta's product `x₁x₂ = c/a`. The coefficients
/// are first divided by a power of two near the largest of them, which is
/// exact and keeps `b²` finite.
pub(crate) fn roots(a: Complex64, b: Complex64, c: Complex64) -> [Complex64; 2] {
    let largest = a.norm().max(b.norm()).max(c.norm());
    let scale = largest.log2().round().clamp(-1022.0, 1023.0).exp2();
    let (a, b, c) = (a / scale, b / scale, c / scale);
    let disc = b * b - a * c * 4.0;
    let sqrt = disc.sqrt();
    let q = if (b + sqrt).norm() >= (b - sqrt).norm() {
        -(b + sqrt) / 2.0
    } else {
        -(b - sqrt) / 2.0
    };
    if q.is_zero() {
        // b = 0 and c = 0
        return [q, q];
    }
    [divide(q, a), divide(c, q)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_linear_root() {
        let poly = Polynomial::from_real(&[4.0, 2.0]).unwrap();
        let candidate = linear(&poly);
        assert_eq!(candidate.roots, vec![real(-0.5)]);
        assert_eq!(candidate.forms[0].as_ref().unwrap().to_string(), "-1/2");
    }

    #[test]
    fn test_no_cancellation() {
        // x² + 1e8 x + 1: the small root is about -1e-8
        let [big, small] = roots(real(1.0), real(1e8), real(1.0));
        assert!((big.re + 1e8).abs() < 1.0);
        assert!((small.re + 1e-8).abs() < 1e-20);
    }

    #[test]
    fn test_linear_tiny_leading() {
        // 1e-200 x + 1: dividing through |a|² would underflow to NaN
        let poly = Polynomial::from_real(&[1e-200, 1.0]).unwrap();
        let root = linear(&poly).roots[0];
        assert!(root.is_finite());
        assert!((root.re + 1e200).abs() < 1e186);
        assert_eq!(root.im, 0.0);
    }

    #[test]
    fn test_wide_coefficients_stay_finite() {
        // x² + 1e200 x + 1: b² overflows unscaled
        let [big, small] = roots(real(1.0), real(1e200), real(1.0));
        assert!((big.re + 1e200).abs() < 1e186);
        assert!((small.re + 1e-200).abs() < 1e-214);

        // 1e-300 x² + x + 1: roots near -1e300 and -1
        let poly = Polynomial::from_real(&[1e-300, 1.0, 1.0]).unwrap();
        let candidate = solve(&poly);
        assert!(candidate.roots.iter().all(|r| r.is_finite()));
        assert!(candidate.roots.iter().any(|r| (r.re + 1e300).abs() < 1e286));
        assert!(candidate.roots.iter().any(|r| (r.re + 1.0).abs() < 1e-14));
    }

    #[test]
    fn test_discriminant_classes() {
        let cases = [
            ([1.0, -3.0, 2.0], Discriminant::Positive),
            ([1.0, -2.0, 1.0], Discriminant::Zero),
            ([1.0, 0.0, 1.0], Discriminant::Negative),
        ];
        for (coeffs, expected) in cases {
            let poly = Polynomial::from_real(&coeffs).unwrap();
            assert_eq!(solve(&poly).discriminant, Some(expected));
        }
    }

    #[test]
    fn test_complex_pair() {
        let poly = Polynomial::from_real(&[1.0, 0.0, 4.0]).unwrap();
        let candidate = solve(&poly);
        let mut ims: Vec<f64> = candidate.roots.iter().map(|r| r.im).collect();
        ims.sort_by(f64::total_cmp);
        assert_eq!(ims, vec![-2.0, 2.0]);
        for (root, form) in candidate.roots.iter().zip(&candidate.forms) {
            let form = form.as_ref().unwrap();
            assert!((form.value() - root).norm() < 1e-15);
        }
    }

    #[test]
    fn test_complex_coefficients() {
        // (x - i)(x - 2) = x² - (2 + i)x + 2i
        let poly = Polynomial::new([
            real(1.0),
            Complex64::new(-2.0, -1.0),
            Complex64::new(0.0, 2.0),
        ])
        .unwrap();
        let candidate = solve(&poly);
        assert_eq!(candidate.discriminant, Some(Discriminant::Complex));
        assert!(candidate.forms.iter().all(Option::is_none));
        for expected in [Complex64::new(0.0, 1.0), real(2.0)] {
            assert!(candidate.roots.iter().any(|r| (r - expected).norm() < 1e-14));
        }
    }
}
