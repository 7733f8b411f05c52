//! Exact forms of roots found by closed-form paths.
//!
//! Coefficients enter as `f64`, and every finite `f64` is a dyadic rational,
//! so the forms here are exact with respect to the caller's input. They are
//! kept in [`BigRational`] arithmetic and can be expanded to any number of
//! decimal digits, which is how `precision_digits` beyond double precision is
//! honored.

use num_bigint::{BigInt, BigUint};
use num_complex::Complex64;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::f64::consts::PI;
use std::fmt;

use crate::polynomial::superscript;

/// Extra digits carried through root extraction before rounding.
const GUARD_DIGITS: u32 = 5;

/// Exact representation of a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgebraicForm {
    /// A rational number
    Rational(BigRational),
    /// `rational + coefficient·√radicand`; a negative radicand is imaginary
    QuadraticSurd {
        /// Rational part
        rational: BigRational,
        /// Multiplier of the square root
        coefficient: BigRational,
        /// Value under the square root
        radicand: BigRational,
    },
    /// Branch `k` of `radicand^(1/index)`: `|c|^(1/n)·e^(i(arg c + 2πk)/n)`
    Radical {
        /// Real radicand `c`
        radicand: BigRational,
        /// Root index `n`
        index: u32,
        /// Branch number `k` in `0..n`
        branch: u32,
    },
}

/// Exact rational value of a finite `f64`.
pub fn exact(x: f64) -> Option<BigRational> {
    BigRational::from_float(x)
}

impl AlgebraicForm {
    /// Exact roots of `ax² + bx + c` for real, finite coefficients.
    ///
    /// Perfect-square discriminants collapse to rationals. The `+√` root
    /// comes first.
    pub fn quadratic_roots(a: f64, b: f64, c: f64) -> Option<[AlgebraicForm; 2]> {
        let (a, b, c) = (exact(a)?, exact(b)?, exact(c)?);
        if a.is_zero() {
            return None;
        }

        let two_a = &a * BigRational::from_integer(BigInt::from(2));
        let rational = -&b / &two_a;
        let coefficient = BigRational::one() / &two_a;
        let radicand = exact_discriminant(&a, &b, &c);

        if radicand.is_zero() {
            return Some([
                AlgebraicForm::Rational(rational.clone()),
                AlgebraicForm::Rational(rational),
            ]);
        }

        if !radicand.is_negative()
            && let Some(root) = rational_sqrt(&radicand)
        {
            let offset = &coefficient * root;
            return Some([
                AlgebraicForm::Rational(&rational + &offset),
                AlgebraicForm::Rational(&rational - &offset),
            ]);
        }

        Some([
            AlgebraicForm::QuadraticSurd {
                rational: rational.clone(),
                coefficient: coefficient.clone(),
                radicand: radicand.clone(),
            },
            AlgebraicForm::QuadraticSurd {
                rational,
                coefficient: -coefficient,
                radicand,
            },
        ])
    }

    /// All branches of `c^(1/n)`, ordered by branch number.
    pub fn radical_roots(radicand: &BigRational, index: u32) -> Vec<AlgebraicForm> {
        (0..index)
            .map(|branch| AlgebraicForm::Radical {
                radicand: radicand.clone(),
                index,
                branch,
            })
            .collect()
    }

    /// Angle of a radical branch as a reduced fraction of π.
    fn radical_angle(radicand: &BigRational, index: u32, branch: u32) -> (u64, u64) {
        let numer = if radicand.is_negative() {
            2 * branch as u64 + 1
        } else {
            2 * branch as u64
        };
        let denom = index as u64;
        if numer == 0 {
            return (0, 1);
        }
        let g = numer.gcd(&denom);
        (numer / g, denom / g)
    }

    /// True if the form denotes a real number.
    pub fn is_real(&self) -> bool {
        match self {
            Self::Rational(_) => true,
            Self::QuadraticSurd {
                coefficient,
                radicand,
                ..
            } => !radicand.is_negative() || coefficient.is_zero(),
            Self::Radical {
                radicand,
                index,
                branch,
            } => {
                if radicand.is_zero() {
                    return true;
                }
                let (p, q) = Self::radical_angle(radicand, *index, *branch);
                // angle pπ/q is 0 or π
                p == 0 || (q == 1 && p % 2 == 1)
            }
        }
    }

    /// Approximate value in double precision.
    pub fn value(&self) -> Complex64 {
        match self {
            Self::Rational(r) => Complex64::new(to_f64(r), 0.0),
            Self::QuadraticSurd {
                rational,
                coefficient,
                radicand,
            } => {
                let base = to_f64(rational);
                let k = to_f64(coefficient);
                let d = to_f64(radicand);
                if d < 0.0 {
                    Complex64::new(base, k * (-d).sqrt())
                } else {
                    Complex64::new(base + k * d.sqrt(), 0.0)
                }
            }
            Self::Radical {
                radicand,
                index,
                branch,
            } => {
                let modulus = to_f64(&radicand.abs()).powf(1.0 / *index as f64);
                let (p, q) = Self::radical_angle(radicand, *index, *branch);
                Complex64::from_polar(modulus, PI * p as f64 / q as f64)
            }
        }
    }

    /// Decimal expansion with `digits` places, for real-valued forms.
    ///
    /// Root extraction runs in integer arithmetic, so the expansion is good to
    /// the last printed digit regardless of double precision.
    pub fn to_decimal(&self, digits: u32) -> Option<String> {
        if !self.is_real() {
            return None;
        }
        let value = match self {
            Self::Rational(r) => r.clone(),
            Self::QuadraticSurd {
                rational,
                coefficient,
                radicand,
            } => {
                let root = nth_root_approx(radicand, 2, digits + GUARD_DIGITS);
                rational + coefficient * root
            }
            Self::Radical {
                radicand,
                index,
                branch,
            } => {
                let magnitude = nth_root_approx(&radicand.abs(), *index, digits + GUARD_DIGITS);
                let (p, _) = Self::radical_angle(radicand, *index, *branch);
                if p == 0 { magnitude } else { -magnitude }
            }
        };
        Some(rational_to_decimal(&value, digits))
    }
}

/// `b² - 4ac` in exact arithmetic.
pub fn exact_discriminant(a: &BigRational, b: &BigRational, c: &BigRational) -> BigRational {
    b * b - BigRational::from_integer(BigInt::from(4)) * a * c
}

fn to_f64(r: &BigRational) -> f64 {
    r.to_f64().unwrap_or(f64::NAN)
}

/// Exact square root if both numerator and denominator are perfect squares.
fn rational_sqrt(r: &BigRational) -> Option<BigRational> {
    let n = r.numer().magnitude();
    let d = r.denom().magnitude();
    let sn = n.sqrt();
    let sd = d.sqrt();
    (&sn * &sn == *n && &sd * &sd == *d)
        .then(|| BigRational::new(BigInt::from(sn), BigInt::from(sd)))
}

/// `floor(value^(1/n) · 10^digits) / 10^digits` for non-negative `value`.
fn nth_root_approx(value: &BigRational, n: u32, digits: u32) -> BigRational {
    let scale = BigUint::from(10u32).pow(digits);
    let scaled = value.numer().magnitude() * scale.pow(n) / value.denom().magnitude();
    let root = scaled.nth_root(n);
    BigRational::new(BigInt::from(root), BigInt::from(scale))
}

/// Round to `digits` places (half away from zero) and print.
fn rational_to_decimal(value: &BigRational, digits: u32) -> String {
    let scale = BigInt::from(10u32).pow(digits);
    let scaled = (value * BigRational::from_integer(scale)).round().to_integer();
    let negative = scaled.is_negative();
    let body = scaled.magnitude().to_string();
    let width = digits as usize;

    let padded = if body.len() <= width {
        format!("{}{}", "0".repeat(width + 1 - body.len()), body)
    } else {
        body
    };
    let (whole, frac) = padded.split_at(padded.len() - width);
    let sign = if negative { "-" } else { "" };
    if width == 0 {
        format!("{}{}", sign, whole)
    } else {
        format!("{}{}.{}", sign, whole, frac)
    }
}

impl fmt::Display for AlgebraicForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rational(r) => write!(f, "{}", r),
            Self::QuadraticSurd {
                rational,
                coefficient,
                radicand,
            } => {
                let imaginary = radicand.is_negative();
                let magnitude = coefficient.abs();
                let term = match rational_sqrt(&radicand.abs()) {
                    Some(root) if imaginary => {
                        let k = &magnitude * root;
                        if k.is_one() {
                            "i".to_string()
                        } else {
                            format!("{}i", k)
                        }
                    }
                    _ => {
                        let sqrt = if imaginary {
                            format!("i√{}", radicand.abs())
                        } else {
                            format!("√{}", radicand)
                        };
                        if magnitude.is_one() {
                            sqrt
                        } else {
                            format!("{}·{}", magnitude, sqrt)
                        }
                    }
                };
                let sign = if coefficient.is_negative() { "-" } else { "+" };
                if rational.is_zero() {
                    if coefficient.is_negative() {
                        write!(f, "-{}", term)
                    } else {
                        write!(f, "{}", term)
                    }
                } else {
                    write!(f, "{} {} {}", rational, sign, term)
                }
            }
            Self::Radical {
                radicand,
                index,
                branch,
            } => {
                write!(f, "{}√{}", superscript(*index as usize), radicand.abs())?;
                let (p, q) = Self::radical_angle(radicand, *index, *branch);
                match (p, q) {
                    (0, _) => Ok(()),
                    (1, 1) => write!(f, "·(-1)"),
                    (p, 1) => write!(f, "·e^(πi·{})", p),
                    (p, q) => write!(f, "·e^(πi·{}/{})", p, q),
                }
            }
        }
    }
}
