//! Error types for dskypoly-math

use crate::solver::SolveResult;
use thiserror::Error;

/// Result type alias using the solver's error
pub type Result<T> = std::result::Result<T, SolveError>;

/// Errors that can occur while building, parsing or solving polynomials
#[derive(Error, Debug, Clone)]
pub enum SolveError {
    /// Coefficient sequence is empty, non-finite, or has a zero leading term
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Why the input was refused
        reason: String,
    },

    /// Degree outside what the requested operation supports
    #[error("Unsupported degree {degree} for '{operation}'")]
    Degree {
        /// Degree of the offending polynomial
        degree: usize,
        /// The operation name
        operation: &'static str,
    },

    /// Iterative root finding hit its iteration cap
    ///
    /// The best-effort roots are attached, already verified, so callers can
    /// inspect how far off they are.
    #[error(
        "No convergence after {iterations} iterations (max residual {:.3e})",
        best_effort.max_residual
    )]
    NonConvergence {
        /// Iterations spent before giving up
        iterations: usize,
        /// Roots reached when the cap was hit
        best_effort: Box<SolveResult>,
    },

    /// The experimental quintic method produced roots that failed verification
    ///
    /// Internal to the degree-5 strategy: the solver recovers from it by
    /// running the general fallback.
    #[error("Experimental method rejected: relative residual {max_residual:.3e} exceeds {tolerance:.3e}")]
    ExperimentalRejected {
        /// Relative residual of the rejected roots (infinite if the method declined)
        max_residual: f64,
        /// Acceptance threshold in force
        tolerance: f64,
    },

    /// Symbolic polynomial text could not be parsed
    #[error("Parse error at column {column}: {message}")]
    Parse {
        /// 1-based column of the offending character
        column: usize,
        /// Description of the problem
        message: String,
    },
}

impl SolveError {
    /// Create an invalid input error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create a parse error
    pub fn parse(column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            column,
            message: message.into(),
        }
    }

    /// Best-effort result carried by a non-convergence error
    pub fn best_effort(&self) -> Option<&SolveResult> {
        match self {
            Self::NonConvergence { best_effort, .. } => Some(best_effort),
            _ => None,
        }
    }
}
