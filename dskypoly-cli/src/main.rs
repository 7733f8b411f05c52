//! DSKYpoly CLI - Polynomial Root Solver
//!
//! Finds every root of a polynomial given as coefficients or as an
//! expression, reports the method used and how well the roots verify.

mod format;
mod interactive;
mod suite;

use anyhow::{Context, bail};
use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::{Shell, generate};
use dskypoly_math::{
    FallbackMethod, Method, Polynomial, RootSolver, SolveError, SolverConfig, parse_polynomial,
};
use format::{eprintln_colored, print_method_info, print_result, println_colored, write_plot};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

/// Exit code for roots that are printed but did not converge
const EXIT_NON_CONVERGENCE: u8 = 2;

/// Configuration file structure
#[derive(Debug, Default, Serialize, Deserialize)]
struct CliConfig {
    /// Default verbosity level
    #[serde(default)]
    verbosity: Option<String>,
    /// Default output format
    #[serde(default)]
    format: Option<String>,
    /// Enable colors by default
    #[serde(default)]
    color: Option<bool>,
    /// Relative residual acceptance threshold
    #[serde(default)]
    tolerance: Option<f64>,
    /// Iteration cap for numerical methods
    #[serde(default)]
    max_iterations: Option<usize>,
    /// Decimal digits for polishing and exact expansions
    #[serde(default)]
    precision: Option<u32>,
    /// Try the experimental quintic method
    #[serde(default)]
    hypergeometric: Option<bool>,
    /// General fallback method
    #[serde(default)]
    fallback: Option<String>,
}

impl CliConfig {
    /// Load configuration from file
    fn load() -> Self {
        let config_path = dirs::home_dir()
            .map(|mut p| {
                p.push(".dskypolyrc");
                p
            })
            .filter(|p| p.exists())
            .or_else(|| {
                dirs::config_dir().map(|mut p| {
                    p.push("dskypoly");
                    p.push("config.yaml");
                    p
                })
            });

        if let Some(path) = config_path
            && path.exists()
            && let Ok(contents) = fs::read_to_string(&path)
        {
            match serde_yaml::from_str(&contents) {
                Ok(config) => return config,
                Err(e) => eprintln!("Ignoring {}: {}", path.display(), e),
            }
        }

        Self::default()
    }

    /// Merge configuration with command-line arguments
    fn merge_with_args(&self, args: &mut Args) {
        // Only apply config if arg is not explicitly set
        if args.verbosity == Verbosity::Normal
            && let Some(ref v) = self.verbosity
            && let Ok(level) = Verbosity::from_str(v, true)
        {
            args.verbosity = level;
        }

        if args.format == OutputFormat::Text
            && let Some(ref f) = self.format
            && let Ok(format) = OutputFormat::from_str(f, true)
        {
            args.format = format;
        }

        if let Some(color) = self.color
            && !color
        {
            args.no_color = true;
        }

        if args.tolerance.is_none() {
            args.tolerance = self.tolerance;
        }
        if args.max_iterations.is_none() {
            args.max_iterations = self.max_iterations;
        }
        if args.precision.is_none() {
            args.precision = self.precision;
        }
        if self.hypergeometric == Some(false) {
            args.no_hypergeometric = true;
        }
        if args.fallback.is_none()
            && let Some(ref f) = self.fallback
        {
            args.fallback = FallbackArg::from_str(f, true).ok();
        }
    }
}

/// Output format for results
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable report (default)
    Text,
    /// JSON document
    Json,
}

/// Verbosity level
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, PartialOrd, Ord)]
enum Verbosity {
    /// Only roots and errors
    Quiet,
    /// Normal output
    Normal,
    /// Verbose output with per-root residuals
    Verbose,
    /// Debug output with solver logs
    Debug,
    /// Trace output with every iteration
    Trace,
}

/// General numerical method
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum FallbackArg {
    /// Companion-matrix eigenvalues
    Companion,
    /// Durand-Kerner iteration
    DurandKerner,
}

impl From<FallbackArg> for FallbackMethod {
    fn from(arg: FallbackArg) -> Self {
        match arg {
            FallbackArg::Companion => FallbackMethod::Companion,
            FallbackArg::DurandKerner => FallbackMethod::DurandKerner,
        }
    }
}

/// DSKYpoly - find every root of a polynomial
#[derive(Parser, Debug)]
#[command(name = "dskypoly")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Coefficients, highest degree first (e.g. `1 0 0 0 -1 1` for x⁵ - x + 1)
    #[arg(value_name = "COEFF", allow_negative_numbers = true)]
    coefficients: Vec<f64>,

    /// Polynomial expression, e.g. "x^5 - x + 1"
    #[arg(short, long, conflicts_with = "coefficients")]
    expr: Option<String>,

    /// Run the reference suite of canonical polynomials
    #[arg(long)]
    suite: bool,

    /// Describe a method (e.g. `cardano`, `numerical-companion`, `all`)
    #[arg(long, value_name = "METHOD")]
    info: Option<String>,

    /// Start an interactive session
    #[arg(short, long)]
    interactive: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Relative residual acceptance threshold
    #[arg(long)]
    tolerance: Option<f64>,

    /// Iteration cap for numerical methods
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Decimal digits (above 17 enables extended decimal expansions)
    #[arg(long)]
    precision: Option<u32>,

    /// Skip the experimental quintic method
    #[arg(long)]
    no_hypergeometric: bool,

    /// General numerical method for degree 5 and above
    #[arg(long, value_enum)]
    fallback: Option<FallbackArg>,

    /// Write root locations as JSON for an external plotter
    #[arg(long, value_name = "FILE")]
    plot_json: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, value_enum, default_value = "normal")]
    verbosity: Verbosity,

    /// Quiet mode (same as --verbosity quiet)
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

impl Args {
    /// Effective verbosity after `--quiet`
    fn effective_verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            self.verbosity
        }
    }

    /// Solver configuration from flags over defaults
    fn solver_config(&self) -> SolverConfig {
        let mut config = SolverConfig::default().with_hypergeometric(!self.no_hypergeometric);
        if let Some(tolerance) = self.tolerance {
            config = config.with_tolerance(tolerance);
        }
        if let Some(max_iterations) = self.max_iterations {
            config = config.with_max_iterations(max_iterations);
        }
        if let Some(digits) = self.precision {
            config = config.with_precision_digits(digits);
        }
        if let Some(fallback) = self.fallback {
            config = config.with_fallback(fallback.into());
        }
        config
    }

    /// The polynomial named on the command line, if any
    fn polynomial(&self) -> anyhow::Result<Option<Polynomial>> {
        if let Some(ref expr) = self.expr {
            let poly = parse_polynomial(expr).with_context(|| format!("reading '{expr}'"))?;
            return Ok(Some(poly));
        }
        if self.coefficients.is_empty() {
            return Ok(None);
        }
        let poly = Polynomial::from_real(&self.coefficients).context("reading coefficients")?;
        Ok(Some(poly))
    }
}

/// Solve one polynomial and print the report.
///
/// Non-convergence still prints the best-effort roots and maps to exit code 2.
fn solve_and_report(
    solver: &RootSolver,
    poly: &Polynomial,
    args: &Args,
) -> anyhow::Result<ExitCode> {
    match solver.solve(poly) {
        Ok(result) => {
            print_result(poly, &result, args, solver.config().tolerance)?;
            if let Some(ref path) = args.plot_json {
                write_plot(path, poly, &result)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(SolveError::NonConvergence {
            iterations,
            best_effort,
        }) => {
            eprintln_colored(
                args,
                &format!(
                    "Warning: no convergence after {iterations} iterations; showing best-effort roots"
                ),
            );
            print_result(poly, &best_effort, args, solver.config().tolerance)?;
            if let Some(ref path) = args.plot_json {
                write_plot(path, poly, &best_effort)?;
            }
            Ok(ExitCode::from(EXIT_NON_CONVERGENCE))
        }
        Err(e) => Err(e).with_context(|| format!("solving {poly}")),
    }
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    if let Some(ref name) = args.info {
        if name.eq_ignore_ascii_case("all") {
            for method in Method::ALL {
                print_method_info(args, method);
            }
            return Ok(ExitCode::SUCCESS);
        }
        let Some(method) = Method::from_name(name) else {
            let known: Vec<&str> = Method::ALL.iter().map(Method::as_str).collect();
            bail!("unknown method '{}' (known: {})", name, known.join(", "));
        };
        print_method_info(args, method);
        return Ok(ExitCode::SUCCESS);
    }

    let config = args.solver_config();
    debug!(?config, "solver configuration");
    let solver = RootSolver::new(config).context("invalid solver configuration")?;

    if args.suite {
        return suite::run_suite(&solver, args);
    }

    if args.interactive {
        interactive::run_interactive(solver, args, args.effective_verbosity())?;
        return Ok(ExitCode::SUCCESS);
    }

    match args.polynomial()? {
        Some(poly) => solve_and_report(&solver, &poly, args),
        None => bail!("no polynomial given; pass coefficients, --expr, --suite or --interactive"),
    }
}

fn main() -> ExitCode {
    let mut args = Args::parse();

    // Handle shell completions generation
    if let Some(shell) = args.completions {
        let mut cmd = Args::command();
        let bin_name = cmd.get_name().to_string();
        generate(shell, &mut cmd, bin_name, &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    // Load configuration file and merge with args
    let config = CliConfig::load();
    config.merge_with_args(&mut args);

    let verbosity = args.effective_verbosity();

    // Set up logging
    if verbosity >= Verbosity::Debug {
        let level = match verbosity {
            Verbosity::Trace => Level::TRACE,
            Verbosity::Debug => Level::DEBUG,
            _ => Level::INFO,
        };
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(io::stderr)
            .finish();
        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            eprintln_colored(&args, &format!("Failed to set tracing subscriber: {}", e));
            return ExitCode::FAILURE;
        }
    }

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln_colored(&args, &format!("Error: {e:#}"));
            if verbosity >= Verbosity::Verbose {
                println_colored(&args, "Run `dskypoly --help` for usage.", None);
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_coefficients_parse() {
        let args = Args::try_parse_from(["dskypoly", "1", "0", "0", "0", "-1", "1"]).unwrap();
        assert_eq!(args.coefficients, vec![1.0, 0.0, 0.0, 0.0, -1.0, 1.0]);
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn test_solver_config_from_flags() {
        let args = Args::try_parse_from([
            "dskypoly",
            "--tolerance",
            "1e-9",
            "--max-iterations",
            "50",
            "--no-hypergeometric",
            "--fallback",
            "durand-kerner",
            "1",
            "2",
        ])
        .unwrap();
        let config = args.solver_config();
        assert_eq!(config.tolerance, 1e-9);
        assert_eq!(config.max_iterations, 50);
        assert!(!config.attempt_hypergeometric);
        assert_eq!(config.fallback, FallbackMethod::DurandKerner);
    }

    #[test]
    fn test_config_does_not_override_flags() {
        let config: CliConfig = serde_yaml::from_str(
            "verbosity: verbose\nformat: json\ntolerance: 1.0e-3\nfallback: durand-kerner\ncolor: false\n",
        )
        .unwrap();

        let mut args = Args::try_parse_from(["dskypoly", "--tolerance", "1e-8", "1", "1"]).unwrap();
        config.merge_with_args(&mut args);
        assert_eq!(args.tolerance, Some(1e-8));
        assert_eq!(args.verbosity, Verbosity::Verbose);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.fallback, Some(FallbackArg::DurandKerner));
        assert!(args.no_color);
    }

    #[test]
    fn test_expr_conflicts_with_coefficients() {
        assert!(Args::try_parse_from(["dskypoly", "--expr", "x - 1", "1", "2"]).is_err());
    }

    #[test]
    fn test_polynomial_from_expr() {
        let args = Args::try_parse_from(["dskypoly", "--expr", "x^2 - 4"]).unwrap();
        let poly = args.polynomial().unwrap().unwrap();
        assert_eq!(poly.degree(), 2);
    }
}
