//! Solver configuration.
//!
//! Every knob the solver reads lives here and is passed explicitly to
//! [`RootSolver::new`](crate::solver::RootSolver::new). There is no global
//! precision state.

use crate::error::{Result, SolveError};
use serde::{Deserialize, Serialize};

/// Decimal digits carried by an IEEE-754 double.
pub const DOUBLE_PRECISION_DIGITS: u32 = 15;

/// Largest number of digits a double can faithfully round-trip.
pub const DOUBLE_MAX_DIGITS: u32 = 17;

/// General numerical method used when no closed form applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackMethod {
    /// Eigenvalues of the companion matrix (backward stable)
    #[default]
    Companion,
    /// Durand-Kerner simultaneous iteration
    DurandKerner,
}

impl FallbackMethod {
    /// Name as used in configuration files and on the command line
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Companion => "companion",
            Self::DurandKerner => "durand-kerner",
        }
    }
}

/// Configuration for [`RootSolver`](crate::solver::RootSolver).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Relative residual threshold for accepting experimental results
    pub tolerance: f64,
    /// Iteration cap for every iterative method
    pub max_iterations: usize,
    /// Working precision in decimal digits
    pub precision_digits: u32,
    /// Try the hypergeometric method on quintics before the fallback
    pub attempt_hypergeometric: bool,
    /// General method for quintics and higher degrees
    pub fallback: FallbackMethod,
    /// Guarded Newton steps applied to closed-form and eigenvalue roots
    pub polish_steps: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 200,
            precision_digits: DOUBLE_PRECISION_DIGITS,
            attempt_hypergeometric: true,
            fallback: FallbackMethod::Companion,
            polish_steps: 3,
        }
    }
}

impl SolverConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the acceptance tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the working precision.
    pub fn with_precision_digits(mut self, digits: u32) -> Self {
        self.precision_digits = digits;
        self
    }

    /// Enable or disable the experimental quintic method.
    pub fn with_hypergeometric(mut self, enabled: bool) -> Self {
        self.attempt_hypergeometric = enabled;
        self
    }

    /// Choose the general fallback.
    pub fn with_fallback(mut self, fallback: FallbackMethod) -> Self {
        self.fallback = fallback;
        self
    }

    /// Set the number of Newton polishing steps (0 disables polishing).
    pub fn with_polish_steps(mut self, steps: usize) -> Self {
        self.polish_steps = steps;
        self
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(SolveError::invalid_input(format!(
                "tolerance must be finite and positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(SolveError::invalid_input(
                "max_iterations must be at least 1",
            ));
        }
        if !(1..=1000).contains(&self.precision_digits) {
            return Err(SolveError::invalid_input(format!(
                "precision_digits must be in 1..=1000, got {}",
                self.precision_digits
            )));
        }
        Ok(())
    }

    /// Whether exact roots should get an arbitrary-precision expansion.
    #[must_use]
    pub fn wants_extended_precision(&self) -> bool {
        self.precision_digits > DOUBLE_MAX_DIGITS
    }

    /// Relative step size below which Newton polishing stops.
    pub(crate) fn step_tolerance(&self) -> f64 {
        let digits = self.precision_digits.min(DOUBLE_PRECISION_DIGITS) as i32;
        10f64.powi(-digits).max(f64::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.tolerance, 1e-6);
        assert_eq!(config.max_iterations, 200);
        assert_eq!(config.precision_digits, 15);
        assert!(config.attempt_hypergeometric);
        assert_eq!(config.fallback, FallbackMethod::Companion);
        assert!(config.validate().is_ok());
        assert!(!config.wants_extended_precision());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(SolverConfig::new().with_tolerance(0.0).validate().is_err());
        assert!(
            SolverConfig::new()
                .with_tolerance(f64::NAN)
                .validate()
                .is_err()
        );
        assert!(SolverConfig::new().with_max_iterations(0).validate().is_err());
        assert!(
            SolverConfig::new()
                .with_precision_digits(0)
                .validate()
                .is_err()
        );
        assert!(
            SolverConfig::new()
                .with_precision_digits(50)
                .wants_extended_precision()
        );
    }

    #[test]
    fn test_deserialize_partial() {
        let config: SolverConfig =
            serde_json::from_str(r#"{"tolerance": 1e-9, "fallback": "durand-kerner"}"#).unwrap();
        assert_eq!(config.tolerance, 1e-9);
        assert_eq!(config.fallback, FallbackMethod::DurandKerner);
        assert_eq!(config.max_iterations, 200);
    }

    #[test]
    fn test_step_tolerance() {
        let config = SolverConfig::default();
        assert!((config.step_tolerance() - 1e-15).abs() < 1e-20);
        let coarse = SolverConfig::new().with_precision_digits(6);
        assert!((coarse.step_tolerance() - 1e-6).abs() < 1e-18);
    }
}
