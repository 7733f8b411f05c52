//! Degree-dispatched root finding.
//!
//! [`RootSolver::solve`] picks a strategy from the degree alone:
//!
//! | degree | strategy                                             |
//! |--------|------------------------------------------------------|
//! | 1      | direct division                                      |
//! | 2      | cancellation-free quadratic formula                  |
//! | 3      | Cardano, with trigonometric and degenerate branches  |
//! | 4      | Ferrari via the resolvent cubic                      |
//! | 5      | experimental Bring radical, gated by verification    |
//! | ≥ 5    | companion eigenvalues or Durand-Kerner               |
//!
//! Binomials `a x^n + a_0` and exact zero roots are peeled off before the
//! general methods run. Every result is verified before it is returned; a
//! closed form whose roots are not finite or do not verify gives way to the
//! general methods.

mod cubic;
mod numerical;
mod quadratic;
mod quartic;
mod quintic;

use crate::algebraic::AlgebraicForm;
use crate::config::{FallbackMethod, SolverConfig};
use crate::error::{Result, SolveError};
use crate::polynomial::{Polynomial, divide};
use crate::verify::RootVerifier;
use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::Zero;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use tracing::{debug, info, warn};

/// Method that produced a set of roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// `x = -a_0 / a_1`
    Linear,
    /// Quadratic formula
    QuadraticFormula,
    /// Cardano's formula
    Cardano,
    /// Ferrari's method
    Ferrari,
    /// `x^n = c` solved by radicals
    BinomialRadical,
    /// Companion-matrix eigenvalues
    NumericalCompanion,
    /// Durand-Kerner iteration
    NumericalIterative,
    /// Bring radical series for Bring-Jerrard quintics
    HypergeometricExperimental,
}

impl Method {
    /// Every method, in dispatch order.
    pub const ALL: [Method; 8] = [
        Method::Linear,
        Method::QuadraticFormula,
        Method::Cardano,
        Method::Ferrari,
        Method::BinomialRadical,
        Method::HypergeometricExperimental,
        Method::NumericalCompanion,
        Method::NumericalIterative,
    ];

    /// Stable identifier, as serialized.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::QuadraticFormula => "quadratic_formula",
            Self::Cardano => "cardano",
            Self::Ferrari => "ferrari",
            Self::BinomialRadical => "binomial_radical",
            Self::NumericalCompanion => "numerical_companion",
            Self::NumericalIterative => "numerical_iterative",
            Self::HypergeometricExperimental => "hypergeometric_experimental",
        }
    }

    /// Parse an identifier; `-` and `_` are interchangeable.
    pub fn from_name(name: &str) -> Option<Method> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|m| m.as_str() == normalized)
    }

    /// Whether the roots come from a formula rather than an iteration.
    #[must_use]
    pub fn is_closed_form(&self) -> bool {
        matches!(
            self,
            Self::Linear
                | Self::QuadraticFormula
                | Self::Cardano
                | Self::Ferrari
                | Self::BinomialRadical
        )
    }

    /// One-paragraph description for `--info`.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Linear => "Degree 1. The single root is -a0/a1, computed by one division.",
            Self::QuadraticFormula => {
                "Degree 2. Uses q = -(b + sign(b)·√Δ)/2 with roots q/a and c/q, which avoids \
                 cancellation when b² dominates 4ac. The discriminant is classified exactly \
                 and exact surd forms are kept for real input."
            }
            Self::Cardano => {
                "Degree 3. Depresses to t³ + pt + q. Three real roots use the trigonometric \
                 form, one real root uses real cube roots, a vanishing discriminant uses the \
                 closed multiple-root formulas, and complex input uses complex cube roots."
            }
            Self::Ferrari => {
                "Degree 4. Depresses to y⁴ + py² + qy + r. Biquadratics are solved as a \
                 quadratic in y². Otherwise the resolvent cubic's largest root m splits the \
                 quartic into two quadratics; a vanishing m falls back to the numerical method."
            }
            Self::BinomialRadical => {
                "Any degree, form a·xⁿ + a0. Roots are the n branches of (-a0/a)^(1/n), evenly \
                 spaced on a circle."
            }
            Self::NumericalCompanion => {
                "Degree ≥ 5. Eigenvalues of the companion matrix via a complex Schur \
                 decomposition. Backward stable; multiple roots are accurate to about the \
                 square root of machine precision before polishing."
            }
            Self::NumericalIterative => {
                "Degree ≥ 5. Durand-Kerner simultaneous iteration from points on a circle of \
                 the Cauchy bound radius. Stops when steps or residuals reach rounding level, \
                 or fails with the best-effort roots at the iteration cap."
            }
            Self::HypergeometricExperimental => {
                "Degree 5, experimental. Applies only to quintics that depress to the \
                 Bring-Jerrard form y⁵ + by + c. Scales to z⁵ + z + a and sums the Bring radical \
                 series when |a| < 4/5^(5/4); the remaining roots come from the deflated quartic. \
                 Results are verified and rejected in favor of the fallback when the residual \
                 exceeds the tolerance."
            }
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sign class of a discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discriminant {
    /// Repeated root
    Zero,
    /// Quadratic: two real roots; cubic: three distinct real roots
    Positive,
    /// Quadratic: complex conjugate pair; cubic: one real root and a pair
    Negative,
    /// Complex coefficients, no sign
    Complex,
}

/// A root with its verification data.
#[derive(Debug, Clone, Serialize)]
pub struct Root {
    /// Numerical value
    pub value: Complex64,
    /// Exact form, if the method produced one
    #[serde(serialize_with = "serialize_form")]
    pub algebraic_form: Option<AlgebraicForm>,
    /// Decimal expansion of the exact form at the requested precision
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimal: Option<String>,
    /// `|P(value)|`
    pub residual: f64,
    /// `|P(value)| / Σ|a_i||value|^i`
    pub relative_residual: f64,
}

fn serialize_form<S: Serializer>(
    form: &Option<AlgebraicForm>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match form {
        Some(form) => serializer.collect_str(form),
        None => serializer.serialize_none(),
    }
}

/// A method attempt that was not accepted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedAttempt {
    /// Method that was tried
    pub method: Method,
    /// Relative residual of its roots; infinite if it declined outright
    pub max_relative_residual: f64,
    /// Why it was rejected
    pub reason: String,
}

/// Roots of a polynomial plus how they were obtained.
#[derive(Debug, Clone, Serialize)]
pub struct SolveResult {
    /// Degree of the input
    pub degree: usize,
    /// Exactly `degree` roots, with multiplicity
    pub roots: Vec<Root>,
    /// Method that produced `roots`
    pub method: Method,
    /// Largest absolute residual
    pub max_residual: f64,
    /// Largest relative residual
    pub max_relative_residual: f64,
    /// Relative error of the coefficients rebuilt from the roots
    pub coefficient_error: f64,
    /// Discriminant class (degrees 2 and 3)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminant: Option<Discriminant>,
    /// False only for best-effort results inside [`SolveError::NonConvergence`]
    pub converged: bool,
    /// Iterations spent by an iterative method
    pub iterations: usize,
    /// Attempt that was rejected before the fallback ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_from: Option<RejectedAttempt>,
}

impl SolveResult {
    /// Numerical root values.
    pub fn values(&self) -> Vec<Complex64> {
        self.roots.iter().map(|r| r.value).collect()
    }

    /// Whether every relative residual is within `tolerance`.
    #[must_use]
    pub fn meets(&self, tolerance: f64) -> bool {
        self.max_relative_residual <= tolerance
    }
}

/// Roots a strategy produced, before verification.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub roots: Vec<Complex64>,
    pub forms: Vec<Option<AlgebraicForm>>,
    pub method: Method,
    pub discriminant: Option<Discriminant>,
}

impl Candidate {
    pub fn numeric(method: Method, roots: Vec<Complex64>) -> Self {
        let forms = vec![None; roots.len()];
        Self {
            roots,
            forms,
            method,
            discriminant: None,
        }
    }

    /// Attach exact forms, pairing each root with the nearest unused form.
    ///
    /// Forms whose value leaves the `f64` range cannot be paired and are
    /// dropped.
    pub fn with_forms(mut self, forms: Vec<AlgebraicForm>) -> Self {
        if forms.iter().any(|f| !f.value().is_finite()) {
            return self;
        }
        let mut pool: Vec<Option<AlgebraicForm>> = forms.into_iter().map(Some).collect();
        for (root, slot) in self.roots.iter().zip(self.forms.iter_mut()) {
            let nearest = pool
                .iter()
                .enumerate()
                .filter_map(|(i, f)| f.as_ref().map(|f| (i, (f.value() - root).norm())))
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((i, _)) = nearest {
                *slot = pool[i].take();
            }
        }
        self
    }

    pub fn with_discriminant(mut self, discriminant: Discriminant) -> Self {
        self.discriminant = Some(discriminant);
        self
    }
}

/// Strategy chosen for a degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Degree 1
    Linear,
    /// Degree 2
    Quadratic,
    /// Degree 3
    Cubic,
    /// Degree 4
    Quartic,
    /// Degree 5
    Quintic,
    /// Degree 6 and up
    General,
}

impl Strategy {
    /// Strategy for `degree`; `None` for constants.
    pub fn for_degree(degree: usize) -> Option<Strategy> {
        match degree {
            0 => None,
            1 => Some(Self::Linear),
            2 => Some(Self::Quadratic),
            3 => Some(Self::Cubic),
            4 => Some(Self::Quartic),
            5 => Some(Self::Quintic),
            _ => Some(Self::General),
        }
    }
}

/// Strategy output plus iteration bookkeeping.
struct Outcome {
    candidate: Candidate,
    iterations: usize,
    converged: bool,
    fallback_from: Option<RejectedAttempt>,
}

impl Outcome {
    fn exact(candidate: Candidate) -> Self {
        Self {
            candidate,
            iterations: 0,
            converged: true,
            fallback_from: None,
        }
    }
}

/// Polynomial root solver
#[derive(Debug, Clone, Default)]
pub struct RootSolver {
    config: SolverConfig,
}

impl RootSolver {
    /// Create a solver; fails if the configuration is invalid.
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in force.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Convenience: build a polynomial from real coefficients and solve it.
    pub fn solve_real(&self, coefficients: &[f64]) -> Result<SolveResult> {
        self.solve(&Polynomial::from_real(coefficients)?)
    }

    /// Find all roots of `poly`, with multiplicity.
    ///
    /// Fails with [`SolveError::Degree`] for constants and with
    /// [`SolveError::NonConvergence`] when an iterative method hits its cap.
    pub fn solve(&self, poly: &Polynomial) -> Result<SolveResult> {
        let degree = poly.degree();
        let strategy = Strategy::for_degree(degree).ok_or(SolveError::Degree {
            degree,
            operation: "solve",
        })?;
        debug!(degree, ?strategy, "Solving {}", poly);

        let outcome = self.run(strategy, poly)?;
        let result = self.finish(poly, outcome);

        if !result.converged {
            warn!(
                iterations = result.iterations,
                max_residual = result.max_residual,
                "Iteration cap reached"
            );
            return Err(SolveError::NonConvergence {
                iterations: result.iterations,
                best_effort: Box::new(result),
            });
        }

        info!(
            degree,
            method = %result.method,
            max_residual = result.max_residual,
            "Solved"
        );
        Ok(result)
    }

    fn run(&self, strategy: Strategy, poly: &Polynomial) -> Result<Outcome> {
        match strategy {
            Strategy::Linear => self.closed_form(poly, quadratic::linear(poly)),
            Strategy::Quadratic => self.closed_form(poly, quadratic::solve(poly)),
            Strategy::Cubic => self.closed_form(poly, cubic::solve(poly)?),
            Strategy::Quartic => match quartic::solve(poly)? {
                Some(candidate) => self.closed_form(poly, candidate),
                None => {
                    debug!("Resolvent root vanished, solving quartic numerically");
                    self.general(poly)
                }
            },
            Strategy::Quintic | Strategy::General => self.high_degree(poly),
        }
    }

    fn high_degree(&self, poly: &Polynomial) -> Result<Outcome> {
        if let Some(c) = poly.binomial_constant() {
            debug!(constant = %c, "Binomial form");
            return self.closed_form(poly, quintic::binomial(poly, c));
        }

        let (reduced, zeros) = poly.strip_zero_roots();
        if zeros > 0 {
            debug!(zeros, "Deflating exact zero roots");
            // Not a binomial, so at least one nonzero root remains.
            let strategy = Strategy::for_degree(reduced.degree()).ok_or(SolveError::Degree {
                degree: reduced.degree(),
                operation: "solve",
            })?;
            let mut outcome = self.run(strategy, &reduced)?;
            let zero = Complex64::new(0.0, 0.0);
            let candidate = &mut outcome.candidate;
            candidate.roots.splice(0..0, std::iter::repeat_n(zero, zeros));
            candidate.forms.splice(
                0..0,
                std::iter::repeat_n(Some(AlgebraicForm::Rational(BigRational::zero())), zeros),
            );
            candidate.discriminant = None;
            return Ok(outcome);
        }

        let mut fallback_from = None;
        if poly.degree() == 5 && self.config.attempt_hypergeometric {
            match self.try_hypergeometric(poly) {
                Ok(candidate) => return Ok(Outcome::exact(candidate)),
                Err(SolveError::ExperimentalRejected {
                    max_residual,
                    tolerance,
                }) => {
                    let reason = if max_residual.is_finite() {
                        format!("relative residual {max_residual:.3e} exceeds {tolerance:.3e}")
                    } else {
                        "not applicable".to_string()
                    };
                    warn!(%reason, "Experimental quintic method rejected, using fallback");
                    fallback_from = Some(RejectedAttempt {
                        method: Method::HypergeometricExperimental,
                        max_relative_residual: max_residual,
                        reason,
                    });
                }
                Err(other) => return Err(other),
            }
        }

        let mut outcome = self.general(poly)?;
        outcome.fallback_from = fallback_from;
        Ok(outcome)
    }

    /// Gate a closed-form candidate on the verifier.
    ///
    /// Non-finite roots, or a relative residual above the tolerance, hand the
    /// polynomial to the general method. A finite candidate is still kept when
    /// the fallback does no better.
    fn closed_form(&self, poly: &Polynomial, candidate: Candidate) -> Result<Outcome> {
        let tolerance = self.config.tolerance;
        let polished = self.polish_all(poly, candidate.clone());
        let verification = RootVerifier::verify(poly, &polished.roots);
        let finite = polished.roots.iter().all(|r| r.is_finite());
        if finite && verification.accepts(tolerance) {
            return Ok(Outcome::exact(candidate));
        }

        let max_relative_residual = verification.max_relative_residual;
        let reason = if finite {
            format!("relative residual {max_relative_residual:.3e} exceeds {tolerance:.3e}")
        } else {
            "non-finite root".to_string()
        };
        warn!(method = %candidate.method, %reason, "Closed form rejected, using fallback");

        let outcome = self.general(poly)?;
        if finite {
            let fallback_residual = if outcome.converged {
                let fallback = self.polish_all(poly, outcome.candidate.clone());
                RootVerifier::verify(poly, &fallback.roots).max_relative_residual
            } else {
                f64::INFINITY
            };
            if !(fallback_residual < max_relative_residual) {
                debug!(fallback_residual, "Fallback is no better, keeping the closed form");
                return Ok(Outcome::exact(candidate));
            }
        }

        Ok(Outcome {
            fallback_from: Some(RejectedAttempt {
                method: candidate.method,
                max_relative_residual,
                reason,
            }),
            ..outcome
        })
    }

    /// Run the experimental method and gate it on the verifier.
    fn try_hypergeometric(&self, poly: &Polynomial) -> Result<Candidate> {
        let tolerance = self.config.tolerance;
        let candidate = quintic::bring_jerrard(poly, &self.config).map_err(|declined| {
            debug!(reason = declined.0, "Bring radical declined");
            SolveError::ExperimentalRejected {
                max_residual: f64::INFINITY,
                tolerance,
            }
        })?;

        let polished = self.polish_all(poly, candidate);
        let verification = RootVerifier::verify(poly, &polished.roots);
        if !verification.accepts(tolerance) {
            return Err(SolveError::ExperimentalRejected {
                max_residual: verification.max_relative_residual,
                tolerance,
            });
        }
        Ok(polished)
    }

    fn general(&self, poly: &Polynomial) -> Result<Outcome> {
        if self.config.fallback == FallbackMethod::Companion {
            if let Some(roots) = numerical::companion_roots(poly, self.config.max_iterations) {
                return Ok(Outcome::exact(Candidate::numeric(
                    Method::NumericalCompanion,
                    roots,
                )));
            }
            warn!("Companion eigenvalues unavailable, switching to Durand-Kerner");
        }

        let iteration = numerical::durand_kerner(
            poly,
            self.config.max_iterations,
            self.config.step_tolerance(),
        );
        debug!(
            iterations = iteration.iterations,
            converged = iteration.converged,
            "Durand-Kerner finished"
        );
        Ok(Outcome {
            candidate: Candidate::numeric(Method::NumericalIterative, iteration.roots),
            iterations: iteration.iterations,
            converged: iteration.converged,
            fallback_from: None,
        })
    }

    fn polish_all(&self, poly: &Polynomial, mut candidate: Candidate) -> Candidate {
        let real = poly.is_real();
        for root in &mut candidate.roots {
            let mut x = polish(
                poly,
                *root,
                self.config.polish_steps,
                self.config.step_tolerance(),
            );
            if real {
                x = snap_to_real(poly, x);
            }
            *root = x;
        }
        candidate
    }

    fn finish(&self, poly: &Polynomial, outcome: Outcome) -> SolveResult {
        let Outcome {
            candidate,
            iterations,
            converged,
            fallback_from,
        } = outcome;
        let candidate = if converged {
            self.polish_all(poly, candidate)
        } else {
            candidate
        };

        let extended = self.config.wants_extended_precision();
        let digits = self.config.precision_digits;
        let mut roots: Vec<Root> = candidate
            .roots
            .iter()
            .zip(candidate.forms)
            .map(|(&value, form)| Root {
                value,
                decimal: form
                    .as_ref()
                    .filter(|_| extended)
                    .and_then(|f| f.to_decimal(digits)),
                algebraic_form: form,
                residual: 0.0,
                relative_residual: 0.0,
            })
            .collect();
        roots.sort_by(|a, b| {
            a.value
                .re
                .total_cmp(&b.value.re)
                .then(a.value.im.total_cmp(&b.value.im))
        });

        let mut result = SolveResult {
            degree: poly.degree(),
            roots,
            method: candidate.method,
            max_residual: 0.0,
            max_relative_residual: 0.0,
            coefficient_error: 0.0,
            discriminant: candidate.discriminant,
            converged,
            iterations,
            fallback_from,
        };
        RootVerifier::attach(poly, &mut result);
        result
    }
}

/// Guarded Newton: a step is kept only if it lowers `|P(x)|`.
pub(crate) fn polish(
    poly: &Polynomial,
    root: Complex64,
    steps: usize,
    step_tolerance: f64,
) -> Complex64 {
    let mut x = root;
    let (mut fx, mut dfx) = poly.evaluate_with_derivative(x);
    for _ in 0..steps {
        if fx.norm() == 0.0 || dfx.norm() == 0.0 {
            break;
        }
        let step = divide(fx, dfx);
        let next = x - step;
        let (fn_, dfn) = poly.evaluate_with_derivative(next);
        if !(fn_.norm() < fx.norm()) {
            break;
        }
        x = next;
        fx = fn_;
        dfx = dfn;
        if step.norm() <= step_tolerance * x.norm().max(1.0) {
            break;
        }
    }
    x
}

/// Drop a rounding-level imaginary part when that does not raise the residual.
fn snap_to_real(poly: &Polynomial, x: Complex64) -> Complex64 {
    if x.im == 0.0 || x.im.abs() > f64::EPSILON.sqrt() * x.norm().max(1.0) {
        return x;
    }
    let real = Complex64::new(x.re, 0.0);
    if poly.evaluate(real).norm() <= poly.evaluate(x).norm() {
        real
    } else {
        x
    }
}
