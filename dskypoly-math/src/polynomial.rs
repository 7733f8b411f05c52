//! Univariate polynomials with complex coefficients.
//!
//! Coefficients are stored highest degree first, `[a_n, a_{n-1}, ..., a_0]`,
//! matching how the solver's callers write them. The leading coefficient is
//! never zero; the degree is the sequence length minus one and is never stored
//! separately.

use crate::error::{Result, SolveError};
use num_complex::Complex64;
use smallvec::SmallVec;
use std::fmt;

/// Inline storage covers every degree the closed-form paths handle.
type Coeffs = SmallVec<[Complex64; 6]>;

/// Superscript digits used when printing exponents.
const SUPERSCRIPT_DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

/// An immutable univariate polynomial.
#[derive(Clone, PartialEq)]
pub struct Polynomial {
    /// Highest-degree coefficient first.
    coeffs: Coeffs,
}

impl Polynomial {
    /// Create a polynomial from coefficients, highest degree first.
    ///
    /// Fails with [`SolveError::InvalidInput`] if the sequence is empty,
    /// contains a non-finite value, or starts with zero.
    pub fn new(coeffs: impl IntoIterator<Item = Complex64>) -> Result<Self> {
        let coeffs: Coeffs = coeffs.into_iter().collect();

        if coeffs.is_empty() {
            return Err(SolveError::invalid_input("coefficient sequence is empty"));
        }
        if let Some((i, c)) = coeffs.iter().enumerate().find(|(_, c)| !c.is_finite()) {
            return Err(SolveError::invalid_input(format!(
                "coefficient {} is not finite: {}",
                i, c
            )));
        }
        if coeffs[0] == Complex64::new(0.0, 0.0) {
            return Err(SolveError::invalid_input("leading coefficient is zero"));
        }

        Ok(Self { coeffs })
    }

    /// Create a polynomial from real coefficients, highest degree first.
    pub fn from_real(coeffs: &[f64]) -> Result<Self> {
        Self::new(coeffs.iter().map(|&c| Complex64::new(c, 0.0)))
    }

    /// Build `leading * Π (x - r)` from its roots.
    pub fn from_roots(leading: Complex64, roots: &[Complex64]) -> Result<Self> {
        let mut coeffs: Vec<Complex64> = vec![leading];
        for &r in roots {
            // multiply by (x - r)
            coeffs.push(Complex64::new(0.0, 0.0));
            for i in (1..coeffs.len()).rev() {
                let prev = coeffs[i - 1];
                coeffs[i] -= r * prev;
            }
        }
        Self::new(coeffs)
    }

    /// Construct without validation; callers guarantee a non-zero leading term.
    fn from_coeffs_unchecked(coeffs: Coeffs) -> Self {
        debug_assert!(!coeffs.is_empty() && coeffs[0] != Complex64::new(0.0, 0.0));
        Self { coeffs }
    }

    /// Degree of the polynomial.
    #[inline]
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Coefficients, highest degree first.
    #[inline]
    pub fn coefficients(&self) -> &[Complex64] {
        &self.coeffs
    }

    /// Coefficient of `x^power`, zero above the degree.
    pub fn coefficient(&self, power: usize) -> Complex64 {
        let n = self.degree();
        if power > n {
            Complex64::new(0.0, 0.0)
        } else {
            self.coeffs[n - power]
        }
    }

    /// The leading coefficient `a_n`.
    #[inline]
    pub fn leading(&self) -> Complex64 {
        self.coeffs[0]
    }

    /// The constant term `a_0`.
    #[inline]
    pub fn constant(&self) -> Complex64 {
        self.coeffs[self.degree()]
    }

    /// True if every coefficient has a zero imaginary part.
    pub fn is_real(&self) -> bool {
        self.coeffs.iter().all(|c| c.im == 0.0)
    }

    /// Real parts of the coefficients, if the polynomial is real.
    pub fn real_coefficients(&self) -> Option<Vec<f64>> {
        self.is_real()
            .then(|| self.coeffs.iter().map(|c| c.re).collect())
    }

    /// Evaluate at `x` with Horner's method.
    pub fn evaluate(&self, x: Complex64) -> Complex64 {
        let mut result = self.coeffs[0];
        for &c in &self.coeffs[1..] {
            result = result * x + c;
        }
        result
    }

    /// Evaluate the polynomial and its first derivative in one Horner pass.
    pub fn evaluate_with_derivative(&self, x: Complex64) -> (Complex64, Complex64) {
        let mut value = self.coeffs[0];
        let mut deriv = Complex64::new(0.0, 0.0);
        for &c in &self.coeffs[1..] {
            deriv = deriv * x + value;
            value = value * x + c;
        }
        (value, deriv)
    }

    /// `Σ |a_i| |x|^i`, the scale against which `|P(x)|` is judged.
    pub fn evaluate_magnitude(&self, x: Complex64) -> f64 {
        let r = x.norm();
        self.coeffs.iter().fold(0.0, |acc, c| acc * r + c.norm())
    }

    /// `y^n P(1/y)` and `Σ |a_i| |y|^(n-i)` in one pass over the reversed
    /// coefficients.
    ///
    /// Both equal the plain values divided by `|x|^n` at `x = 1/y`, so their
    /// ratio can be judged for large `x` without overflow.
    pub fn evaluate_reversed(&self, y: Complex64) -> (Complex64, f64) {
        let r = y.norm();
        self.coeffs
            .iter()
            .rev()
            .fold((Complex64::new(0.0, 0.0), 0.0), |(value, scale), &c| {
                (value * y + c, scale * r + c.norm())
            })
    }

    /// First derivative. Fails for constants, whose derivative is zero.
    pub fn derivative(&self) -> Result<Polynomial> {
        let n = self.degree();
        if n == 0 {
            return Err(SolveError::Degree {
                degree: 0,
                operation: "derivative",
            });
        }
        let coeffs = self.coeffs[..n]
            .iter()
            .enumerate()
            .map(|(i, &c)| c * (n - i) as f64)
            .collect();
        Ok(Self::from_coeffs_unchecked(coeffs))
    }

    /// Divide every coefficient by the leading one.
    pub fn monic(&self) -> Polynomial {
        let lead = self.leading();
        let coeffs = self.coeffs.iter().map(|&c| divide(c, lead)).collect();
        Self::from_coeffs_unchecked(coeffs)
    }

    /// Power of two close to the root magnitude, `max |a_k / a_n|^(1/k)`.
    ///
    /// Returns 1 for `a_n x^n`, or when the ratio is not representable.
    pub fn root_scale(&self) -> f64 {
        let lead = self.leading().norm().ln();
        let log_scale = self.coeffs[1..]
            .iter()
            .enumerate()
            .filter(|(_, c)| c.norm() > 0.0)
            .map(|(i, c)| (c.norm().ln() - lead) / (i + 1) as f64)
            .fold(f64::NEG_INFINITY, f64::max);
        let scale = (log_scale / std::f64::consts::LN_2).round().exp2();
        if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        }
    }

    /// The monic polynomial whose roots are those of `self` divided by `scale`.
    ///
    /// With `scale` from [`Polynomial::root_scale`] every coefficient is at
    /// most about 1 in magnitude, and a power of two keeps the scaling exact.
    pub fn scale_roots(&self, scale: f64) -> Polynomial {
        let lead = self.leading();
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .map(|(k, &c)| {
                // divide one power at a time; |a_k| / scale^k never exceeds |a_n|
                let scaled = (0..k).fold(c, |acc, _| acc / scale);
                divide(scaled, lead)
            })
            .collect();
        Self::from_coeffs_unchecked(coeffs)
    }

    /// The polynomial `Q(y) = P(y + shift)`.
    pub fn taylor_shift(&self, shift: Complex64) -> Polynomial {
        let n = self.degree();
        // ascending order for the classic in-place shift
        let mut b: Vec<Complex64> = self.coeffs.iter().rev().copied().collect();
        for i in 0..n {
            for j in (i..n).rev() {
                let next = b[j + 1];
                b[j] += shift * next;
            }
        }
        Self::from_coeffs_unchecked(b.into_iter().rev().collect())
    }

    /// Remove the `x^(n-1)` term.
    ///
    /// Returns `(Q, shift)` with `shift = -a_{n-1} / (n·a_n)` such that
    /// `Q(y) = P(y + shift)` for every `y`; a root `y` of `Q` gives the root
    /// `x = y + shift` of `P`. The eliminated coefficient is set to exactly
    /// zero.
    pub fn depress(&self) -> Result<(Polynomial, Complex64)> {
        let n = self.degree();
        if n < 1 {
            return Err(SolveError::Degree {
                degree: n,
                operation: "depress",
            });
        }

        let shift = -divide(self.coeffs[1], self.coeffs[0] * n as f64);
        let mut depressed = self.taylor_shift(shift);
        depressed.coeffs[1] = Complex64::new(0.0, 0.0);
        Ok((depressed, shift))
    }

    /// Synthetic division by `(x - root)`.
    ///
    /// Returns the quotient and the remainder, which equals `P(root)`.
    pub fn deflate(&self, root: Complex64) -> Result<(Polynomial, Complex64)> {
        let n = self.degree();
        if n < 1 {
            return Err(SolveError::Degree {
                degree: n,
                operation: "deflate",
            });
        }

        let mut quotient: Coeffs = SmallVec::with_capacity(n);
        let mut acc = self.coeffs[0];
        quotient.push(acc);
        for &c in &self.coeffs[1..n] {
            acc = acc * root + c;
            quotient.push(acc);
        }
        let remainder = acc * root + self.coeffs[n];
        Ok((Self::from_coeffs_unchecked(quotient), remainder))
    }

    /// Cauchy's bound: every root satisfies `|x| < 1 + max |a_i / a_n|`.
    pub fn cauchy_bound(&self) -> f64 {
        let lead = self.leading().norm();
        let max_ratio = self.coeffs[1..]
            .iter()
            .map(|c| c.norm() / lead)
            .fold(0.0, f64::max);
        1.0 + max_ratio
    }

    /// For `a_n x^n + a_0` returns `c` with `x^n = c`; `None` otherwise.
    pub fn binomial_constant(&self) -> Option<Complex64> {
        let n = self.degree();
        if n < 1 {
            return None;
        }
        let zero = Complex64::new(0.0, 0.0);
        self.coeffs[1..n]
            .iter()
            .all(|&c| c == zero)
            .then(|| -divide(self.coeffs[n], self.coeffs[0]))
    }

    /// Number of exact zero roots (trailing zero coefficients).
    pub fn zero_root_multiplicity(&self) -> usize {
        self.coeffs
            .iter()
            .rev()
            .take_while(|c| **c == Complex64::new(0.0, 0.0))
            .count()
    }

    /// Divide out `x^k` where `k` is the zero-root multiplicity.
    pub fn strip_zero_roots(&self) -> (Polynomial, usize) {
        let k = self.zero_root_multiplicity();
        let coeffs = self.coeffs[..self.coeffs.len() - k].iter().copied().collect();
        (Self::from_coeffs_unchecked(coeffs), k)
    }

    /// Largest coefficient magnitude.
    pub fn max_coefficient_norm(&self) -> f64 {
        self.coeffs.iter().map(|c| c.norm()).fold(0.0, f64::max)
    }
}

/// `num / den` without forming `|den|²`, which leaves the `f64` range long
/// before the quotient does.
pub(crate) fn divide(num: Complex64, den: Complex64) -> Complex64 {
    if den.im == 0.0 {
        return Complex64::new(num.re / den.re, num.im / den.re);
    }
    if den.re.abs() >= den.im.abs() {
        let ratio = den.im / den.re;
        let d = den.re + den.im * ratio;
        Complex64::new((num.re + num.im * ratio) / d, (num.im - num.re * ratio) / d)
    } else {
        let ratio = den.re / den.im;
        let d = den.re * ratio + den.im;
        Complex64::new((num.re * ratio + num.im) / d, (num.im * ratio - num.re) / d)
    }
}

/// Render `n` with superscript digits.
pub(crate) fn superscript(n: usize) -> String {
    n.to_string()
        .chars()
        .map(|d| SUPERSCRIPT_DIGITS[d.to_digit(10).unwrap_or(0) as usize])
        .collect()
}

/// Map a superscript digit back to its value.
pub(crate) fn superscript_value(ch: char) -> Option<u32> {
    SUPERSCRIPT_DIGITS
        .iter()
        .position(|&d| d == ch)
        .map(|p| p as u32)
}

/// Format a complex number compactly: `3`, `-0.5i`, `(1 - 2i)`.
pub(crate) fn format_complex(c: Complex64) -> String {
    if c.im == 0.0 {
        format!("{}", c.re)
    } else if c.re == 0.0 {
        format!("{}i", c.im)
    } else if c.im < 0.0 {
        format!("({} - {}i)", c.re, -c.im)
    } else {
        format!("({} + {}i)", c.re, c.im)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.degree();
        let mut first = true;

        for (i, &c) in self.coeffs.iter().enumerate() {
            if c == Complex64::new(0.0, 0.0) {
                continue;
            }
            let power = n - i;

            // Pull the sign out of real coefficients.
            let (negative, body) = if c.im == 0.0 {
                (c.re < 0.0, Complex64::new(c.re.abs(), 0.0))
            } else {
                (false, c)
            };

            if first {
                if negative {
                    write!(f, "-")?;
                }
            } else if negative {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            first = false;

            let is_unit = body == Complex64::new(1.0, 0.0);
            if power == 0 || !is_unit {
                write!(f, "{}", format_complex(body))?;
            }
            match power {
                0 => {}
                1 => write!(f, "x")?,
                p => write!(f, "x{}", superscript(p))?,
            }
        }

        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polynomial({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_construction_errors() {
        assert!(Polynomial::from_real(&[]).is_err());
        assert!(Polynomial::from_real(&[0.0, 1.0]).is_err());
        assert!(Polynomial::from_real(&[1.0, f64::NAN]).is_err());
        assert!(Polynomial::from_real(&[1.0, f64::INFINITY, 2.0]).is_err());
        assert!(Polynomial::from_real(&[3.0]).is_ok());
    }

    #[test]
    fn test_degree_and_accessors() {
        let p = Polynomial::from_real(&[2.0, -3.0, 1.0]).unwrap();
        assert_eq!(p.degree(), 2);
        assert_eq!(p.leading(), c(2.0));
        assert_eq!(p.constant(), c(1.0));
        assert_eq!(p.coefficient(1), c(-3.0));
        assert_eq!(p.coefficient(7), c(0.0));
        assert!(p.is_real());
        assert_eq!(p.real_coefficients(), Some(vec![2.0, -3.0, 1.0]));
    }

    #[test]
    fn test_evaluate_horner() {
        // x^2 - 3x + 2 = (x - 1)(x - 2)
        let p = Polynomial::from_real(&[1.0, -3.0, 2.0]).unwrap();
        assert_eq!(p.evaluate(c(1.0)), c(0.0));
        assert_eq!(p.evaluate(c(2.0)), c(0.0));
        assert_eq!(p.evaluate(c(0.0)), c(2.0));

        // x^2 + 1 at i
        let q = Polynomial::from_real(&[1.0, 0.0, 1.0]).unwrap();
        assert_eq!(q.evaluate(Complex64::new(0.0, 1.0)), c(0.0));
    }

    #[test]
    fn test_evaluate_with_derivative() {
        // x^3 - 2x + 5, p'(x) = 3x^2 - 2
        let p = Polynomial::from_real(&[1.0, 0.0, -2.0, 5.0]).unwrap();
        let (v, d) = p.evaluate_with_derivative(c(2.0));
        assert_eq!(v, c(9.0));
        assert_eq!(d, c(10.0));
    }

    #[test]
    fn test_derivative() {
        let p = Polynomial::from_real(&[1.0, 0.0, -2.0, 5.0]).unwrap();
        let d = p.derivative().unwrap();
        assert_eq!(d.coefficients(), &[c(3.0), c(0.0), c(-2.0)]);
        assert!(Polynomial::from_real(&[4.0]).unwrap().derivative().is_err());
    }

    #[test]
    fn test_from_roots() {
        let p = Polynomial::from_roots(c(2.0), &[c(1.0), c(2.0)]).unwrap();
        assert_eq!(p.coefficients(), &[c(2.0), c(-6.0), c(4.0)]);

        let i = Complex64::new(0.0, 1.0);
        let q = Polynomial::from_roots(c(1.0), &[i, -i]).unwrap();
        assert_eq!(q.coefficients(), &[c(1.0), c(0.0), c(1.0)]);
    }

    #[test]
    fn test_depress_cubic() {
        // x^3 + 3x^2 + 3x + 1 = (x + 1)^3 -> y^3 with shift -1
        let p = Polynomial::from_real(&[1.0, 3.0, 3.0, 1.0]).unwrap();
        let (q, shift) = p.depress().unwrap();
        assert_eq!(shift, c(-1.0));
        assert_eq!(q.coefficients(), &[c(1.0), c(0.0), c(0.0), c(0.0)]);
    }

    #[test]
    fn test_depress_matches_shifted_evaluation() {
        let p = Polynomial::from_real(&[2.0, -5.0, 1.0, 4.0, -3.0]).unwrap();
        let (q, shift) = p.depress().unwrap();
        assert_eq!(q.coefficient(3), c(0.0));
        for y in [-2.0, -0.5, 0.0, 1.25, 3.0] {
            let lhs = q.evaluate(c(y));
            let rhs = p.evaluate(c(y) + shift);
            assert!((lhs - rhs).norm() < 1e-10, "y={y}: {lhs} vs {rhs}");
        }
    }

    #[test]
    fn test_depress_degree_zero_fails() {
        let p = Polynomial::from_real(&[5.0]).unwrap();
        assert!(matches!(
            p.depress(),
            Err(SolveError::Degree { degree: 0, .. })
        ));
    }

    #[test]
    fn test_deflate() {
        // (x - 1)(x - 2)(x - 3)
        let p = Polynomial::from_real(&[1.0, -6.0, 11.0, -6.0]).unwrap();
        let (q, rem) = p.deflate(c(1.0)).unwrap();
        assert_eq!(rem, c(0.0));
        assert_eq!(q.coefficients(), &[c(1.0), c(-5.0), c(6.0)]);
    }

    #[test]
    fn test_binomial_and_zero_roots() {
        let p = Polynomial::from_real(&[1.0, 0.0, 0.0, 0.0, 0.0, -32.0]).unwrap();
        assert_eq!(p.binomial_constant(), Some(c(32.0)));

        let q = Polynomial::from_real(&[1.0, 0.0, -10.0, 0.0, 5.0, 0.0]).unwrap();
        assert_eq!(q.binomial_constant(), None);
        assert_eq!(q.zero_root_multiplicity(), 1);
        let (r, k) = q.strip_zero_roots();
        assert_eq!(k, 1);
        assert_eq!(r.degree(), 4);
    }

    #[test]
    fn test_cauchy_bound() {
        let p = Polynomial::from_real(&[2.0, 0.0, -8.0]).unwrap();
        assert_eq!(p.cauchy_bound(), 5.0);
    }

    #[test]
    fn test_evaluate_reversed() {
        // x² - 3x + 2 at x = 4, divided by 4²
        let p = Polynomial::from_real(&[1.0, -3.0, 2.0]).unwrap();
        let (value, scale) = p.evaluate_reversed(c(0.25));
        assert_eq!(value, c(6.0 / 16.0));
        assert_eq!(scale, 30.0 / 16.0);
    }

    #[test]
    fn test_root_scale_is_power_of_two() {
        // roots near 1e120 and 1e-60
        let p = Polynomial::from_real(&[1.0, 1e120, 0.0, 1.0]).unwrap();
        let scale = p.root_scale();
        assert_eq!(scale, 2f64.powi(399));
        assert_eq!(Polynomial::from_real(&[3.0, 0.0, 0.0]).unwrap().root_scale(), 1.0);

        let q = p.scale_roots(scale);
        assert_eq!(q.leading(), c(1.0));
        assert!(q.coefficients().iter().all(|a| a.norm() <= 2.0));
    }

    #[test]
    fn test_scale_roots_maps_roots() {
        // (x - 8)(x + 4) scaled by 4: (t - 2)(t + 1)
        let p = Polynomial::from_real(&[2.0, -8.0, -64.0]).unwrap();
        let q = p.scale_roots(4.0);
        assert_eq!(q.coefficients(), &[c(1.0), c(-1.0), c(-2.0)]);
    }

    #[test]
    fn test_divide_extreme_magnitudes() {
        assert!((divide(c(-1.0), c(1e-200)) - c(-1e200)).norm() < 1e185);
        let z = divide(Complex64::new(1.0, 1.0), Complex64::new(1e-300, 1e-300));
        assert!((z - c(1e300)).norm() < 1e285);
        let w = divide(Complex64::new(0.0, 2.0), Complex64::new(0.0, 1e-170));
        assert!((w - c(2e170)).norm() < 1e155);
    }

    #[test]
    fn test_display() {
        let p = Polynomial::from_real(&[1.0, 0.0, 0.0, 0.0, -1.0, 1.0]).unwrap();
        assert_eq!(p.to_string(), "x⁵ - x + 1");
        let q = Polynomial::from_real(&[-2.0, 3.5, 0.0]).unwrap();
        assert_eq!(q.to_string(), "-2x² + 3.5x");
        let r = Polynomial::from_real(&[7.0]).unwrap();
        assert_eq!(r.to_string(), "7");
        assert_eq!(superscript(12), "¹²");
        assert_eq!(superscript_value('⁴'), Some(4));
    }

    #[test]
    fn test_evaluate_is_bit_identical() {
        let p = Polynomial::from_real(&[1.1, -0.3, 2.7, -9.1]).unwrap();
        let x = Complex64::new(0.37, -1.21);
        let a = p.evaluate(x);
        let b = p.evaluate(x);
        assert_eq!(a.re.to_bits(), b.re.to_bits());
        assert_eq!(a.im.to_bits(), b.im.to_bits());
    }
}
