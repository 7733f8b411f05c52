//! Reference suite of canonical polynomials, one group per degree.

use anyhow::Context;
use dskypoly_math::{Polynomial, RootSolver, SolveError, SolveResult};
use owo_colors::AnsiColors;
use serde::Serialize;
use std::process::ExitCode;
use tracing::debug;

use crate::format::{JsonReport, eprintln_colored, format_text, println_colored};
use crate::{Args, EXIT_NON_CONVERGENCE, OutputFormat, Verbosity};

/// One reference polynomial.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SuiteCase {
    /// Short name
    pub name: &'static str,
    /// Coefficients, highest degree first
    pub coefficients: &'static [f64],
    /// Expected roots, as prose
    pub expected: &'static str,
}

pub(crate) const CASES: &[SuiteCase] = &[
    SuiteCase {
        name: "Distinct real roots",
        coefficients: &[1.0, -3.0, 2.0],
        expected: "1, 2",
    },
    SuiteCase {
        name: "Perfect square",
        coefficients: &[1.0, -2.0, 1.0],
        expected: "1 (double)",
    },
    SuiteCase {
        name: "Imaginary pair",
        coefficients: &[1.0, 0.0, 1.0],
        expected: "±i",
    },
    SuiteCase {
        name: "Golden ratio",
        coefficients: &[1.0, -1.0, -1.0],
        expected: "(1 ± √5)/2",
    },
    SuiteCase {
        name: "Three integer roots",
        coefficients: &[1.0, -6.0, 11.0, -6.0],
        expected: "1, 2, 3",
    },
    SuiteCase {
        name: "Cube roots of unity",
        coefficients: &[1.0, 0.0, 0.0, -1.0],
        expected: "1, -1/2 ± (√3/2)i",
    },
    SuiteCase {
        name: "Repeated cubic root",
        coefficients: &[1.0, 0.0, -3.0, 2.0],
        expected: "-2, 1 (double)",
    },
    SuiteCase {
        name: "Biquadratic",
        coefficients: &[1.0, 0.0, -10.0, 0.0, 9.0],
        expected: "±1, ±3",
    },
    SuiteCase {
        name: "Depressed quartic",
        coefficients: &[1.0, 0.0, -5.0, 0.0, 6.0],
        expected: "±√2, ±√3",
    },
    SuiteCase {
        name: "Fourth power",
        coefficients: &[1.0, -4.0, 6.0, -4.0, 1.0],
        expected: "1 (quadruple)",
    },
    SuiteCase {
        name: "Quartic with complex roots",
        coefficients: &[1.0, 0.0, 1.0, 0.0, 1.0],
        expected: "±1/2 ± (√3/2)i",
    },
    SuiteCase {
        name: "Ferrari's example",
        coefficients: &[1.0, -2.0, -1.0, 2.0, 1.0],
        expected: "(1 ± √5)/2, each double",
    },
    SuiteCase {
        name: "Monomial quintic",
        coefficients: &[1.0, 0.0, 0.0, 0.0, 0.0, -32.0],
        expected: "2·e^(2πik/5), k = 0..4",
    },
    SuiteCase {
        name: "Bring-Jerrard quintic",
        coefficients: &[1.0, 0.0, 0.0, 0.0, 5.0, -6.0],
        expected: "1 and four complex roots",
    },
    SuiteCase {
        name: "Principal quintic",
        coefficients: &[1.0, 0.0, 0.0, 0.0, 1.0, 0.1],
        expected: "one real root near -0.1, two conjugate pairs",
    },
    SuiteCase {
        name: "Unsolvable quintic",
        coefficients: &[1.0, 0.0, 0.0, 0.0, -1.0, 1.0],
        expected: "one real root near -1.1673, two conjugate pairs",
    },
    SuiteCase {
        name: "General quintic",
        coefficients: &[1.0, -5.0, 5.0, 5.0, -5.0, -1.0],
        expected: "five real roots",
    },
    SuiteCase {
        name: "Odd quintic",
        coefficients: &[1.0, 0.0, -10.0, 0.0, 5.0, 0.0],
        expected: "0 and ±√(5 ± 2√5)",
    },
    SuiteCase {
        name: "Cyclotomic sextic factor",
        coefficients: &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        expected: "-1, e^(±iπ/3), e^(±2iπ/3)",
    },
];

/// Outcome of one case.
#[derive(Serialize)]
struct CaseReport<'a> {
    name: &'static str,
    expected: &'static str,
    verified: bool,
    #[serde(flatten)]
    report: JsonReport<'a>,
}

/// Solve one case; non-convergence yields the best-effort result.
fn solve_case(solver: &RootSolver, case: &SuiteCase) -> anyhow::Result<(Polynomial, SolveResult)> {
    let poly = Polynomial::from_real(case.coefficients)
        .with_context(|| format!("building '{}'", case.name))?;
    match solver.solve(&poly) {
        Ok(result) => Ok((poly, result)),
        Err(SolveError::NonConvergence { best_effort, .. }) => Ok((poly, *best_effort)),
        Err(e) => Err(e).with_context(|| format!("solving '{}'", case.name)),
    }
}

/// Run every case and print the reports.
pub(crate) fn run_suite(solver: &RootSolver, args: &Args) -> anyhow::Result<ExitCode> {
    let tolerance = solver.config().tolerance;
    let verbosity = args.effective_verbosity();

    let mut solved = Vec::with_capacity(CASES.len());
    for case in CASES {
        let (poly, result) = solve_case(solver, case)?;
        debug!(case = case.name, method = %result.method, "suite case solved");
        solved.push((case, poly, result));
    }

    let verified = |result: &SolveResult| result.converged && result.meets(tolerance);
    let passed = solved.iter().filter(|(_, _, r)| verified(r)).count();
    let all_converged = solved.iter().all(|(_, _, r)| r.converged);

    match args.format {
        OutputFormat::Json => {
            let reports: Vec<CaseReport<'_>> = solved
                .iter()
                .map(|(case, poly, result)| CaseReport {
                    name: case.name,
                    expected: case.expected,
                    verified: verified(result),
                    report: JsonReport::new(poly, result),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Text => {
            let mut degree = 0;
            for (case, poly, result) in &solved {
                if verbosity > Verbosity::Quiet && result.degree != degree {
                    degree = result.degree;
                    println_colored(
                        args,
                        &format!("=== Degree {degree} ==="),
                        Some(AnsiColors::Magenta),
                    );
                }
                if verbosity > Verbosity::Quiet {
                    println_colored(
                        args,
                        &format!("--- {} (expected: {}) ---", case.name, case.expected),
                        Some(AnsiColors::BrightBlue),
                    );
                }
                println!("{}", format_text(poly, result, args, tolerance));
                println!();
            }
            let summary = format!("{passed}/{} cases verified", solved.len());
            if passed == solved.len() {
                println_colored(args, &summary, Some(AnsiColors::Green));
            } else {
                eprintln_colored(args, &summary);
            }
        }
    }

    Ok(if all_converged {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_NON_CONVERGENCE)
    })
}
