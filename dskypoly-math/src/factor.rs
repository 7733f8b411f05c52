//! Factorization from computed roots.
//!
//! Over ℂ every root gives a linear factor. Over ℝ, real roots give linear
//! factors and each conjugate pair `α ± βi` gives the irreducible quadratic
//! `x² - 2αx + (α² + β²)`. Roots closer than the tolerance are merged into
//! one factor with a multiplicity.

use crate::polynomial::{Polynomial, superscript};
use num_complex::Complex64;
use serde::Serialize;
use std::fmt;

/// Default clustering tolerance, relative to `max(1, |root|)`.
pub const DEFAULT_CLUSTER_TOLERANCE: f64 = 1e-6;

/// One factor of a factorization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Factor {
    /// `(x - root)^multiplicity`
    Linear {
        /// Root of the factor
        root: Complex64,
        /// Number of merged roots
        multiplicity: usize,
    },
    /// `(x² + bx + c)^multiplicity`, irreducible over ℝ
    Quadratic {
        /// Linear coefficient
        b: f64,
        /// Constant coefficient
        c: f64,
        /// Number of merged conjugate pairs
        multiplicity: usize,
    },
}

/// `leading · Π factors`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Factorization {
    /// Leading coefficient
    pub leading: Complex64,
    /// Factors, roots in ascending order
    pub factors: Vec<Factor>,
}

/// Merge roots that agree within `tolerance` into `(mean, count)` pairs.
fn cluster(roots: &[Complex64], tolerance: f64) -> Vec<(Complex64, usize)> {
    let mut clusters: Vec<(Complex64, usize)> = Vec::new();
    for &root in roots {
        let existing = clusters.iter_mut().find(|(center, count)| {
            let mean = center / *count as f64;
            (root - mean).norm() <= tolerance * mean.norm().max(1.0)
        });
        match existing {
            Some((sum, count)) => {
                *sum += root;
                *count += 1;
            }
            None => clusters.push((root, 1)),
        }
    }
    let mut merged: Vec<(Complex64, usize)> = clusters
        .into_iter()
        .map(|(sum, count)| (sum / count as f64, count))
        .collect();
    merged.sort_by(|a, b| a.0.re.total_cmp(&b.0.re).then(a.0.im.total_cmp(&b.0.im)));
    merged
}

/// Factorization over ℂ.
pub fn over_complex(poly: &Polynomial, roots: &[Complex64], tolerance: f64) -> Factorization {
    let factors = cluster(roots, tolerance)
        .into_iter()
        .map(|(root, multiplicity)| Factor::Linear { root, multiplicity })
        .collect();
    Factorization {
        leading: poly.leading(),
        factors,
    }
}

/// Factorization over ℝ; `None` if `poly` has complex coefficients.
pub fn over_reals(
    poly: &Polynomial,
    roots: &[Complex64],
    tolerance: f64,
) -> Option<Factorization> {
    if !poly.is_real() {
        return None;
    }
    let is_real = |z: &Complex64| z.im.abs() <= tolerance * z.norm().max(1.0);

    let reals: Vec<Complex64> = roots
        .iter()
        .filter(|z| is_real(z))
        .map(|z| Complex64::new(z.re, 0.0))
        .collect();
    let upper: Vec<Complex64> = roots
        .iter()
        .filter(|z| !is_real(z) && z.im > 0.0)
        .copied()
        .collect();

    let mut factors: Vec<Factor> = cluster(&reals, tolerance)
        .into_iter()
        .map(|(root, multiplicity)| Factor::Linear { root, multiplicity })
        .collect();
    factors.extend(
        cluster(&upper, tolerance)
            .into_iter()
            .map(|(z, multiplicity)| Factor::Quadratic {
                b: -2.0 * z.re,
                c: z.norm_sqr(),
                multiplicity,
            }),
    );

    Some(Factorization {
        leading: poly.leading(),
        factors,
    })
}

/// Format a real number with at most eight decimals and no trailing zeros.
pub(crate) fn format_number(x: f64) -> String {
    let text = format!("{:.8}", x);
    let trimmed = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text.as_str()
    };
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn format_value(z: Complex64) -> String {
    if z.im == 0.0 {
        return format_number(z.re);
    }
    let im = format_number(z.im.abs());
    let sign = if z.im < 0.0 { "-" } else { "+" };
    if z.re == 0.0 {
        format!("{}{}i", if z.im < 0.0 { "-" } else { "" }, im)
    } else {
        format!("{} {} {}i", format_number(z.re), sign, im)
    }
}

fn power(multiplicity: usize) -> String {
    if multiplicity > 1 {
        superscript(multiplicity)
    } else {
        String::new()
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear { root, multiplicity } => {
                let body = if *root == Complex64::new(0.0, 0.0) {
                    "x".to_string()
                } else if root.im == 0.0 {
                    let sign = if root.re < 0.0 { "+" } else { "-" };
                    format!("(x {} {})", sign, format_number(root.re.abs()))
                } else {
                    format!("(x - ({}))", format_value(*root))
                };
                write!(f, "{}{}", body, power(*multiplicity))
            }
            Self::Quadratic { b, c, multiplicity } => {
                write!(f, "(x²")?;
                if *b != 0.0 {
                    let sign = if *b < 0.0 { "-" } else { "+" };
                    write!(f, " {} {}x", sign, format_number(b.abs()))?;
                }
                let sign = if *c < 0.0 { "-" } else { "+" };
                write!(f, " {} {}){}", sign, format_number(c.abs()), power(*multiplicity))
            }
        }
    }
}

impl fmt::Display for Factorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let one = Complex64::new(1.0, 0.0);
        if self.leading == -one {
            write!(f, "-")?;
        } else if self.leading != one {
            if self.leading.im == 0.0 {
                write!(f, "{}", format_number(self.leading.re))?;
            } else {
                write!(f, "({})", format_value(self.leading))?;
            }
        }
        for factor in &self.factors {
            write!(f, "{}", factor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real(x: f64) -> Complex64 {
        Complex64::new(x, 0.0)
    }

    #[test]
    fn test_double_root_merged() {
        let poly = Polynomial::from_real(&[1.0, -2.0, 1.0]).unwrap();
        let roots = [real(1.0), real(1.0 + 1e-9)];
        let factored = over_complex(&poly, &roots, DEFAULT_CLUSTER_TOLERANCE);
        assert_eq!(factored.factors.len(), 1);
        assert_eq!(factored.to_string(), "(x - 1)²");
    }

    #[test]
    fn test_zero_and_negative_roots() {
        // 2x³ - 2x
        let poly = Polynomial::from_real(&[2.0, 0.0, -2.0, 0.0]).unwrap();
        let roots = [real(1.0), real(0.0), real(-1.0)];
        let factored = over_complex(&poly, &roots, DEFAULT_CLUSTER_TOLERANCE);
        assert_eq!(factored.to_string(), "2(x + 1)x(x - 1)");
    }

    #[test]
    fn test_real_quadratic_factors() {
        // x⁴ + 5x² + 4 = (x² + 1)(x² + 4)
        let poly = Polynomial::from_real(&[1.0, 0.0, 5.0, 0.0, 4.0]).unwrap();
        let roots = [
            Complex64::new(0.0, 1.0),
            Complex64::new(0.0, -1.0),
            Complex64::new(0.0, 2.0),
            Complex64::new(0.0, -2.0),
        ];
        let factored = over_reals(&poly, &roots, DEFAULT_CLUSTER_TOLERANCE).unwrap();
        assert_eq!(factored.to_string(), "(x² + 1)(x² + 4)");
        let complex = over_complex(&poly, &roots, DEFAULT_CLUSTER_TOLERANCE);
        assert_eq!(complex.factors.len(), 4);
        assert!(complex.to_string().contains("(x - (-2i))"));
    }

    #[test]
    fn test_complex_coefficients_have_no_real_factorization() {
        let poly = Polynomial::new([real(1.0), Complex64::new(0.0, -1.0)]).unwrap();
        assert!(over_reals(&poly, &[Complex64::new(0.0, 1.0)], 1e-6).is_none());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(-0.5), "-0.5");
        assert_eq!(format_number(-1e-12), "0");
        assert_eq!(format_number(1.0 / 3.0), "0.33333333");
    }
}
