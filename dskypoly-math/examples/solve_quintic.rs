//! # Solving a Quintic
//!
//! Walks through the degree-5 path:
//! - The experimental Bring radical method on a Bring-Jerrard quintic
//! - The same method declining `x⁵ - x + 1` and the companion fallback
//! - Factorization of the result over ℝ

use dskypoly_math::factor::{DEFAULT_CLUSTER_TOLERANCE, over_reals};
use dskypoly_math::{RootSolver, SolveResult, parse_polynomial};

fn show(label: &str, result: &SolveResult) {
    println!("{label}: method {}", result.method);
    if let Some(rejected) = &result.fallback_from {
        println!("  rejected {} ({})", rejected.method, rejected.reason);
    }
    for root in &result.roots {
        println!(
            "  {:>22.15} {:+.15}i   |P(x)| = {:.2e}",
            root.value.re, root.value.im, root.residual
        );
    }
}

fn main() -> dskypoly_math::Result<()> {
    let solver = RootSolver::default();

    let small = parse_polynomial("x^5 + 2x + 0.5")?;
    show("x⁵ + 2x + 0.5", &solver.solve(&small)?);

    let bring = parse_polynomial("x^5 - x + 1")?;
    let result = solver.solve(&bring)?;
    show("x⁵ - x + 1", &result);

    if let Some(factored) = over_reals(&bring, &result.values(), DEFAULT_CLUSTER_TOLERANCE) {
        println!("  over ℝ: {factored}");
    }
    Ok(())
}
