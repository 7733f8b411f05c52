//! Ferrari's method for quartics.

use super::{Candidate, Method, cubic, quadratic};
use crate::error::Result;
use crate::polynomial::Polynomial;
use num_complex::Complex64;
use tracing::trace;

/// `|q|` below this fraction of `ρ³` makes the quartic biquadratic.
const BIQUADRATIC_TOLERANCE: f64 = 1e-14;

/// A resolvent root below this fraction of `ρ²` cannot be divided by.
const RESOLVENT_TOLERANCE: f64 = 1e-12;

/// Solve a degree-4 polynomial.
///
/// Returns `Ok(None)` when the resolvent root is too close to zero to divide
/// by; the caller then uses a numerical method. The roots are scaled by a
/// power of two near their magnitude first.
pub(crate) fn solve(poly: &Polynomial) -> Result<Option<Candidate>> {
    let scale = poly.root_scale();
    let (depressed, shift) = poly.scale_roots(scale).depress()?;
    let monic = depressed.monic();
    let (p, q, r) = (
        monic.coefficient(2),
        monic.coefficient(1),
        monic.coefficient(0),
    );

    // Root-magnitude scale of y⁴ + py² + qy + r.
    let rho = p
        .norm()
        .sqrt()
        .max(q.norm().cbrt())
        .max(r.norm().sqrt().sqrt());
    if rho == 0.0 {
        return Ok(Some(Candidate::numeric(Method::Ferrari, vec![shift * scale; 4])));
    }

    let ys = if q.norm() <= BIQUADRATIC_TOLERANCE * rho.powi(3) {
        trace!("Biquadratic quartic");
        biquadratic(p, r)
    } else {
        let Some(ys) = split(p, q, r, rho)? else {
            return Ok(None);
        };
        ys
    };

    let roots = ys.iter().map(|y| (y + shift) * scale).collect();
    Ok(Some(Candidate::numeric(Method::Ferrari, roots)))
}

/// `y⁴ + py² + r`: a quadratic in `y²`.
fn biquadratic(p: Complex64, r: Complex64) -> Vec<Complex64> {
    let one = Complex64::new(1.0, 0.0);
    quadratic::roots(one, p, r)
        .into_iter()
        .flat_map(|z| {
            let s = z.sqrt();
            [s, -s]
        })
        .collect()
}

/// Factor `y⁴ + py² + qy + r` into two quadratics through the resolvent cubic
/// `m³ + pm² + (p²/4 - r)m - q²/8`.
fn split(p: Complex64, q: Complex64, r: Complex64, rho: f64) -> Result<Option<Vec<Complex64>>> {
    let one = Complex64::new(1.0, 0.0);
    let resolvent = Polynomial::new([one, p, p * p / 4.0 - r, -q * q / 8.0])?;
    let (candidates, _) = cubic::roots(&resolvent)?;
    let Some(m) = candidates
        .into_iter()
        .max_by(|a, b| a.norm().total_cmp(&b.norm()))
    else {
        return Ok(None);
    };
    if m.norm() <= RESOLVENT_TOLERANCE * rho * rho {
        trace!(m = %m, "Resolvent root too small");
        return Ok(None);
    }

    let s = (m * 2.0).sqrt();
    let base = p / 2.0 + m;
    let offset = q / (s * 2.0);
    let mut ys = quadratic::roots(one, -s, base + offset).to_vec();
    ys.extend(quadratic::roots(one, s, base - offset));
    Ok(Some(ys))
}
