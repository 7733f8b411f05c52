//! Special forms of degree five and above.
//!
//! [`binomial`] handles `a xⁿ + a₀` exactly for any degree. [`bring_jerrard`]
//! is the experimental hypergeometric method for quintics: it only applies
//! when depression leaves `y⁵ + b₁y + b₀`, which is rewritten as
//! `z⁵ + z + a` with `y = λz`, `λ⁴ = b₁`, `a = b₀/λ⁵`. One root is the Bring
//! radical
//!
//! ```text
//! BR(a) = Σ (-1)^(k+1) · C(5k, k) · a^(4k+1) / (4k+1)
//! ```
//!
//! which converges for `|a| < 4/5^(5/4)`. The other four come from the
//! deflated quartic.

use super::{Candidate, Method, quartic};
use crate::algebraic::{AlgebraicForm, exact};
use crate::config::SolverConfig;
use crate::polynomial::Polynomial;
use num_complex::Complex64;
use num_traits::Zero;
use std::f64::consts::PI;
use tracing::trace;

/// Radius of convergence of the Bring radical series, `4 / 5^(5/4)`.
pub(crate) const BRING_RADIUS: f64 = 0.534_992_243_981_186_5;

/// Middle coefficients below this fraction of the root scale count as zero.
const FORM_TOLERANCE: f64 = 1e-12;

/// Why the experimental method did not produce roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Declined(pub &'static str);

/// Roots of `a xⁿ + a₀`, where `c = -a₀/a`.
///
/// Branch `k` is `|c|^(1/n)·e^(i(arg c + 2πk)/n)`. For real input the exact
/// radical forms are attached in the same branch order.
pub(crate) fn binomial(poly: &Polynomial, c: Complex64) -> Candidate {
    let n = poly.degree();
    let modulus = c.norm().powf(1.0 / n as f64);
    let real = poly.is_real();
    let arg = if real {
        if c.re < 0.0 { PI } else { 0.0 }
    } else {
        c.arg()
    };

    let roots: Vec<Complex64> = (0..n)
        .map(|k| {
            let angle = (arg + 2.0 * PI * k as f64) / n as f64;
            let root = Complex64::from_polar(modulus, angle);
            // Real branches of real radicands are exactly real.
            if real && ((k == 0 && c.re >= 0.0) || (2 * k + 1 == n && c.re < 0.0)) {
                Complex64::new(root.re, 0.0)
            } else {
                root
            }
        })
        .collect();

    let mut candidate = Candidate::numeric(Method::BinomialRadical, roots);
    if real
        && let Some(radicand) = exact(poly.constant().re)
            .zip(exact(poly.leading().re))
            .map(|(a0, an)| -a0 / an)
    {
        let forms = if radicand.is_zero() {
            vec![AlgebraicForm::Rational(radicand); n]
        } else {
            AlgebraicForm::radical_roots(&radicand, n as u32)
        };
        candidate.forms = forms.into_iter().map(Some).collect();
    }
    candidate
}

/// Experimental Bring radical solution of a quintic.
pub(crate) fn bring_jerrard(
    poly: &Polynomial,
    config: &SolverConfig,
) -> Result<Candidate, Declined> {
    if poly.degree() != 5 {
        return Err(Declined("degree is not 5"));
    }
    let (depressed, shift) = poly.depress().map_err(|_| Declined("cannot depress"))?;
    let monic = depressed.monic();
    let [b3, b2, b1, b0] = [3, 2, 1, 0].map(|k| monic.coefficient(k));

    let rho = b1.norm().sqrt().sqrt().max(b0.norm().powf(0.2));
    if rho == 0.0 {
        return Err(Declined("all roots coincide"));
    }
    if b3.norm() > FORM_TOLERANCE * rho.powi(2) || b2.norm() > FORM_TOLERANCE * rho.powi(3) {
        return Err(Declined("not in Bring-Jerrard form"));
    }
    if b1.is_zero() {
        return Err(Declined("vanishing linear coefficient"));
    }

    let lambda = b1.sqrt().sqrt();
    let a = b0 / lambda.powu(5);
    trace!(a = %a, "Bring-Jerrard parameter");
    if a.norm() >= BRING_RADIUS {
        return Err(Declined("outside the series radius"));
    }

    let z0 = bring_radical(a, config.max_iterations).ok_or(Declined("series did not converge"))?;

    let one = Complex64::new(1.0, 0.0);
    let zero = Complex64::new(0.0, 0.0);
    let normalized = Polynomial::new([one, zero, zero, zero, one, a])
        .map_err(|_| Declined("degenerate parameter"))?;
    let (quartic, _) = normalized
        .deflate(z0)
        .map_err(|_| Declined("deflation failed"))?;
    let rest = quartic::solve(&quartic)
        .ok()
        .flatten()
        .ok_or(Declined("deflated quartic is degenerate"))?;

    let roots = std::iter::once(z0)
        .chain(rest.roots)
        .map(|z| lambda * z + shift)
        .collect();
    Ok(Candidate::numeric(Method::HypergeometricExperimental, roots))
}

/// Sum the Bring radical series, at most `max_terms` terms.
pub(crate) fn bring_radical(a: Complex64, max_terms: usize) -> Option<Complex64> {
    let a4 = a.powu(4);
    // k = 0 term is -a
    let mut term = -a;
    let mut sum = term;
    for k in 0..max_terms {
        let k = k as f64;
        // C(5k+5, k+1) / C(5k, k)
        let ratio = (5.0 * k + 1.0) * (5.0 * k + 2.0) * (5.0 * k + 3.0) * (5.0 * k + 4.0)
            * (5.0 * k + 5.0)
            / ((k + 1.0) * (4.0 * k + 1.0) * (4.0 * k + 2.0) * (4.0 * k + 3.0) * (4.0 * k + 4.0));
        term = -term * a4 * (ratio * (4.0 * k + 1.0) / (4.0 * k + 5.0));
        sum += term;
        if term.norm() <= f64::EPSILON * sum.norm() {
            return Some(sum);
        }
    }
    None
}
