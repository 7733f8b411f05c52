//! Interactive REPL mode for DSKYpoly
//!
//! Reads polynomials as expressions (`x^5 - x + 1`) or coefficient lists
//! (`1 0 0 0 -1 1`) and solves each one, with history, completion of
//! `:commands` and hints.

use std::borrow::Cow;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, bail};
use clap::ValueEnum;
use dskypoly_math::{
    Method, Polynomial, RootSolver, SolverConfig, parse_coefficient_list, parse_polynomial,
};
use owo_colors::OwoColorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Editor, Helper};

use crate::format::{eprintln_colored, print_method_info, println_colored};
use crate::{Args, FallbackArg, Verbosity, solve_and_report, suite};

/// REPL commands, for completion and hints
const COMMANDS: &[&str] = &[
    ":help", ":quit", ":exit", ":suite", ":info", ":methods", ":config", ":set",
];

/// Keys accepted by `:set`
const SETTINGS: &[&str] = &[
    "tolerance",
    "max_iterations",
    "precision",
    "hypergeometric",
    "fallback",
];

/// Line helper: highlighting, completion and hints
struct PolyHelper {
    colors: bool,
}

impl PolyHelper {
    fn new(colors: bool) -> Self {
        Self { colors }
    }
}

impl Highlighter for PolyHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !self.colors {
            return Cow::Borrowed(line);
        }
        if line.starts_with(':') {
            return Cow::Owned(line.cyan().to_string());
        }

        let mut out = String::with_capacity(line.len() * 2);
        for c in line.chars() {
            match c {
                'x' => out.push_str(&c.yellow().to_string()),
                '^' | '⁰'..='⁹' | '¹' | '²' | '³' => out.push_str(&c.magenta().to_string()),
                '+' | '-' | '−' | '*' | '=' => out.push_str(&c.bright_black().to_string()),
                _ => out.push(c),
            }
        }
        Cow::Owned(out)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        if self.colors {
            Cow::Owned(hint.bright_black().to_string())
        } else {
            Cow::Borrowed(hint)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        self.colors
    }
}

impl Validator for PolyHelper {}

impl Completer for PolyHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        let pair = |s: &str| Pair {
            display: s.to_string(),
            replacement: s.to_string(),
        };

        if let Some(rest) = line.strip_prefix(":info ") {
            let start = pos - rest.len();
            let names = Method::ALL
                .iter()
                .map(Method::as_str)
                .filter(|name| name.starts_with(rest))
                .map(pair)
                .collect();
            return Ok((start, names));
        }
        if let Some(rest) = line.strip_prefix(":set ") {
            let start = pos - rest.len();
            let keys = SETTINGS
                .iter()
                .filter(|key| key.starts_with(rest))
                .map(|key| pair(key))
                .collect();
            return Ok((start, keys));
        }
        if line.starts_with(':') && !line.contains(' ') {
            let commands = COMMANDS
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| pair(cmd))
                .collect();
            return Ok((0, commands));
        }
        Ok((pos, vec![]))
    }
}

impl Hinter for PolyHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || !line.starts_with(':') || line.len() < 2 {
            return None;
        }
        COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Helper for PolyHelper {}

/// Parse one line of input into a polynomial.
///
/// Lines mentioning `x` are expressions; anything else is a coefficient list.
pub(crate) fn parse_input(input: &str) -> anyhow::Result<Polynomial> {
    if input.contains('x') {
        Ok(parse_polynomial(input)?)
    } else {
        Ok(Polynomial::new(parse_coefficient_list(input)?)?)
    }
}

/// Apply a `:set key value` command to `config`.
pub(crate) fn apply_setting(config: &SolverConfig, key: &str, value: &str) -> anyhow::Result<SolverConfig> {
    let config = config.clone();
    let updated = match key.replace('-', "_").as_str() {
        "tolerance" => config.with_tolerance(value.parse().context("tolerance must be a number")?),
        "max_iterations" => config.with_max_iterations(
            value
                .parse()
                .context("max_iterations must be a positive integer")?,
        ),
        "precision" => config.with_precision_digits(
            value
                .parse()
                .context("precision must be a positive integer")?,
        ),
        "hypergeometric" => match value {
            "on" | "true" | "yes" => config.with_hypergeometric(true),
            "off" | "false" | "no" => config.with_hypergeometric(false),
            _ => bail!("hypergeometric takes on or off"),
        },
        "fallback" => {
            let Ok(fallback) = FallbackArg::from_str(value, true) else {
                bail!("fallback takes companion or durand-kerner");
            };
            config.with_fallback(fallback.into())
        }
        _ => bail!("unknown setting '{}' (known: {})", key, SETTINGS.join(", ")),
    };
    updated.validate()?;
    Ok(updated)
}

fn print_help(args: &Args) {
    println_colored(args, "Enter a polynomial to solve it:", Some(owo_colors::AnsiColors::Green));
    println!("  x^5 - x + 1          expression (x², x⁵ and − are accepted)");
    println!("  1 0 0 0 -1 1         coefficients, highest degree first");
    println!();
    println_colored(args, "Commands:", Some(owo_colors::AnsiColors::Green));
    println!("  :help                this message");
    println!("  :suite               run the reference suite");
    println!("  :methods             describe every method");
    println!("  :info <method>       describe one method");
    println!("  :config              show the solver configuration");
    println!("  :set <key> <value>   change a setting ({})", SETTINGS.join(", "));
    println!("  :quit                leave");
}

/// Handle a `:command`. Returns `false` when the session should end.
fn run_command(
    input: &str,
    solver: &mut RootSolver,
    args: &Args,
) -> anyhow::Result<bool> {
    let mut words = input.split_whitespace();
    let command = words.next().unwrap_or_default();
    match command {
        ":quit" | ":exit" | ":q" => return Ok(false),
        ":help" => print_help(args),
        ":suite" => {
            suite::run_suite(solver, args)?;
        }
        ":methods" => {
            for method in Method::ALL {
                print_method_info(args, method);
            }
        }
        ":info" => {
            let name = words.next().context("usage: :info <method>")?;
            let method = Method::from_name(name).with_context(|| format!("unknown method '{name}'"))?;
            print_method_info(args, method);
        }
        ":config" => print!("{}", serde_yaml::to_string(solver.config())?),
        ":set" => {
            let (Some(key), Some(value)) = (words.next(), words.next()) else {
                bail!("usage: :set <key> <value>");
            };
            let config = apply_setting(solver.config(), key, value)?;
            *solver = RootSolver::new(config)?;
            println_colored(args, &format!("{key} = {value}"), None);
        }
        other => bail!("unknown command '{other}' (try :help)"),
    }
    Ok(true)
}

/// Run the interactive REPL mode
pub(crate) fn run_interactive(
    mut solver: RootSolver,
    args: &Args,
    verbosity: Verbosity,
) -> anyhow::Result<()> {
    let config = Config::builder()
        .completion_type(CompletionType::List)
        .auto_add_history(true)
        .build();

    let mut rl: Editor<PolyHelper, FileHistory> =
        Editor::with_config(config).context("failed to initialize editor")?;
    rl.set_helper(Some(PolyHelper::new(!args.no_color)));

    // Load history
    let history_path = dirs::home_dir()
        .map(|mut p| {
            p.push(".dskypoly_history");
            p
        })
        .unwrap_or_else(|| PathBuf::from(".dskypoly_history"));

    let _ = rl.load_history(&history_path);

    if verbosity >= Verbosity::Normal {
        println_colored(
            args,
            &format!("DSKYpoly v{}", env!("CARGO_PKG_VERSION")),
            Some(owo_colors::AnsiColors::Green),
        );
        println_colored(
            args,
            "Enter a polynomial, :help for help, or :quit to leave.",
            None,
        );
        println!();
    }

    loop {
        match rl.readline("dskypoly> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                if input.starts_with(':') {
                    match run_command(input, &mut solver, args) {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => eprintln_colored(args, &format!("Error: {e:#}")),
                    }
                    continue;
                }

                let start = Instant::now();
                let outcome = parse_input(input).and_then(|poly| solve_and_report(&solver, &poly, args));
                if let Err(e) = outcome {
                    eprintln_colored(args, &format!("Error: {e:#}"));
                    continue;
                }
                if verbosity >= Verbosity::Verbose {
                    println_colored(
                        args,
                        &format!("Time: {}µs", start.elapsed().as_micros()),
                        Some(owo_colors::AnsiColors::BrightBlack),
                    );
                }
            }
            Err(ReadlineError::Interrupted) => {
                if verbosity >= Verbosity::Normal {
                    println_colored(args, "CTRL-C", None);
                }
                break;
            }
            Err(ReadlineError::Eof) => {
                if verbosity >= Verbosity::Normal {
                    println_colored(args, "CTRL-D", None);
                }
                break;
            }
            Err(err) => {
                eprintln_colored(args, &format!("Error: {}", err));
                break;
            }
        }
    }

    // Save history
    let _ = rl.save_history(&history_path);
    Ok(())
}
