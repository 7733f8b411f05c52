//! Output formatting for the CLI
//!
//! Text reports (optionally colored with owo-colors) and JSON documents for
//! solve results, plus the plot hand-off.

use anyhow::Context;
use dskypoly_math::factor::{self, DEFAULT_CLUSTER_TOLERANCE, Factorization};
use dskypoly_math::{
    Complex64, Discriminant, JsonPlotExporter, Method, Polynomial, SolveResult, Visualizer,
};
use owo_colors::{AnsiColors, OwoColorize, Stream};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{Args, OutputFormat, Verbosity};

/// JSON report for one polynomial
#[derive(Serialize)]
pub(crate) struct JsonReport<'a> {
    /// Polynomial as text
    pub polynomial: String,
    /// The solve result
    #[serde(flatten)]
    pub result: &'a SolveResult,
    /// Factorization over the reals, for real coefficients
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factored_real: Option<String>,
    /// Factorization over the complex numbers
    pub factored_complex: String,
}

impl<'a> JsonReport<'a> {
    pub(crate) fn new(poly: &Polynomial, result: &'a SolveResult) -> Self {
        let (real, complex) = factorizations(poly, result);
        Self {
            polynomial: poly.to_string(),
            result,
            factored_real: real.map(|f| f.to_string()),
            factored_complex: complex.to_string(),
        }
    }
}

fn factorizations(poly: &Polynomial, result: &SolveResult) -> (Option<Factorization>, Factorization) {
    let values = result.values();
    (
        factor::over_reals(poly, &values, DEFAULT_CLUSTER_TOLERANCE),
        factor::over_complex(poly, &values, DEFAULT_CLUSTER_TOLERANCE),
    )
}

/// Format a complex root as `a`, `bi` or `a ± bi`.
pub(crate) fn format_complex(z: Complex64) -> String {
    if z.im == 0.0 {
        return format!("{}", z.re);
    }
    if z.re == 0.0 {
        return format!("{}i", z.im);
    }
    let sign = if z.im < 0.0 { '-' } else { '+' };
    format!("{} {} {}i", z.re, sign, z.im.abs())
}

fn discriminant_text(discriminant: Discriminant, degree: usize) -> &'static str {
    match (discriminant, degree) {
        (Discriminant::Zero, _) => "zero (repeated root)",
        (Discriminant::Positive, 2) => "positive (two distinct real roots)",
        (Discriminant::Positive, _) => "positive (three distinct real roots)",
        (Discriminant::Negative, 2) => "negative (complex conjugate pair)",
        (Discriminant::Negative, _) => "negative (one real root, one conjugate pair)",
        (Discriminant::Complex, _) => "complex coefficients",
    }
}

/// Colorize `text` unless colors are off.
fn paint(args: &Args, text: &str, color: AnsiColors) -> String {
    if args.no_color {
        text.to_string()
    } else {
        text.if_supports_color(Stream::Stdout, |t| t.color(color))
            .to_string()
    }
}

/// Render the text report; `tolerance` decides the verified status.
pub(crate) fn format_text(
    poly: &Polynomial,
    result: &SolveResult,
    args: &Args,
    tolerance: f64,
) -> String {
    let verbosity = args.effective_verbosity();
    let mut lines = Vec::new();

    if verbosity == Verbosity::Quiet {
        for root in &result.roots {
            lines.push(format_complex(root.value));
        }
        return lines.join("\n");
    }

    lines.push(format!("{} {}", paint(args, "Polynomial:", AnsiColors::Cyan), poly));
    lines.push(format!("{} {}", paint(args, "Degree:", AnsiColors::Cyan), result.degree));
    let mut method_line = format!("{} {}", paint(args, "Method:", AnsiColors::Cyan), result.method);
    if let Some(ref rejected) = result.fallback_from {
        method_line.push_str(&format!(" ({} rejected: {})", rejected.method, rejected.reason));
    }
    lines.push(method_line);
    if let Some(discriminant) = result.discriminant {
        lines.push(format!(
            "{} {}",
            paint(args, "Discriminant:", AnsiColors::Cyan),
            discriminant_text(discriminant, result.degree)
        ));
    }
    if result.iterations > 0 {
        lines.push(format!(
            "{} {}",
            paint(args, "Iterations:", AnsiColors::Cyan),
            result.iterations
        ));
    }

    lines.push(paint(args, "Roots:", AnsiColors::Cyan));
    for (i, root) in result.roots.iter().enumerate() {
        let mut line = format!("  x{} = {}", i + 1, format_complex(root.value));
        if let Some(ref form) = root.algebraic_form {
            let exact = form.to_string();
            if exact != format_complex(root.value) {
                line.push_str(&format!("  = {exact}"));
            }
        }
        if verbosity >= Verbosity::Verbose {
            line.push_str(&format!(
                "  |P(x)| = {:.3e}  rel = {:.3e}",
                root.residual, root.relative_residual
            ));
        }
        lines.push(line);
        if let Some(ref decimal) = root.decimal {
            lines.push(format!("       ≈ {decimal}"));
        }
    }

    let (real, complex) = factorizations(poly, result);
    if let Some(real) = real {
        lines.push(format!("{} {}", paint(args, "Factored (ℝ):", AnsiColors::Cyan), real));
    }
    lines.push(format!("{} {}", paint(args, "Factored (ℂ):", AnsiColors::Cyan), complex));

    let status = if !result.converged {
        paint(args, "not converged", AnsiColors::Red)
    } else if result.meets(tolerance) {
        paint(args, "verified", AnsiColors::Green)
    } else {
        paint(args, "above tolerance", AnsiColors::Yellow)
    };
    lines.push(format!(
        "{} max |P(x)| = {:.3e}, max relative = {:.3e} ({})",
        paint(args, "Residual:", AnsiColors::Cyan),
        result.max_residual,
        result.max_relative_residual,
        status
    ));
    if verbosity >= Verbosity::Verbose {
        lines.push(format!(
            "{} {:.3e}",
            paint(args, "Coefficient error:", AnsiColors::Cyan),
            result.coefficient_error
        ));
    }
    lines.join("\n")
}

/// Print a result in the selected format.
pub(crate) fn print_result(
    poly: &Polynomial,
    result: &SolveResult,
    args: &Args,
    tolerance: f64,
) -> anyhow::Result<()> {
    match args.format {
        OutputFormat::Text => println!("{}", format_text(poly, result, args, tolerance)),
        OutputFormat::Json => {
            let report = JsonReport::new(poly, result);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

/// Write plot data for `result` to `path`.
pub(crate) fn write_plot(path: &Path, poly: &Polynomial, result: &SolveResult) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut exporter = JsonPlotExporter::new(BufWriter::new(file));
    exporter
        .render_result(poly, result)
        .with_context(|| format!("writing plot data to {}", path.display()))?;
    exporter
        .into_inner()
        .flush()
        .with_context(|| format!("writing plot data to {}", path.display()))
}

/// Print the description of a method.
pub(crate) fn print_method_info(args: &Args, method: Method) {
    println_colored(args, method.as_str(), Some(AnsiColors::Green));
    let kind = if method.is_closed_form() {
        "closed form"
    } else {
        "numerical"
    };
    println!("  ({kind})");
    println!("  {}", method.description());
    println!();
}

/// Print colored text to stdout
pub(crate) fn println_colored(args: &Args, text: &str, color: Option<AnsiColors>) {
    if args.no_color {
        println!("{}", text);
    } else if let Some(c) = color {
        println!("{}", text.if_supports_color(Stream::Stdout, |t| t.color(c)));
    } else {
        println!("{}", text);
    }
}

/// Print colored error message to stderr
pub(crate) fn eprintln_colored(args: &Args, text: &str) {
    if args.no_color {
        eprintln!("{}", text);
    } else {
        eprintln!("{}", text.if_supports_color(Stream::Stderr, |t| t.red()));
    }
}
