//! DSKYpoly Math - Polynomial Root Finding
//!
//! This crate finds every complex root of a univariate polynomial and says
//! how much to trust each one:
//! - Closed forms for degrees 1-4 (quadratic formula, Cardano, Ferrari)
//! - Exact radicals for binomials `a xⁿ + a₀` of any degree
//! - An experimental Bring radical method for Bring-Jerrard quintics
//! - Companion-matrix eigenvalues or Durand-Kerner iteration for the rest
//! - Residual, backward-error and root-to-coefficient verification
//!
//! # Examples
//!
//! ## Solving a Quintic
//!
//! ```
//! use dskypoly_math::{Method, RootSolver, SolverConfig};
//!
//! let solver = RootSolver::new(SolverConfig::default()).unwrap();
//! let result = solver.solve_real(&[1.0, 0.0, 0.0, 0.0, -1.0, 1.0]).unwrap();
//!
//! assert_eq!(result.roots.len(), 5);
//! assert!(result.max_residual < 1e-6);
//! // x⁵ - x + 1 is outside the experimental method's reach
//! assert_eq!(result.method, Method::NumericalCompanion);
//! assert!(result.fallback_from.is_some());
//! ```
//!
//! ## Parsing and Exact Forms
//!
//! ```
//! use dskypoly_math::{parse_polynomial, RootSolver};
//!
//! let poly = parse_polynomial("x^2 - x - 1").unwrap();
//! let result = RootSolver::default().solve(&poly).unwrap();
//! let form = result.roots[1].algebraic_form.as_ref().unwrap();
//! assert_eq!(form.to_string(), "1/2 + 1/2·√5");
//! assert_eq!(form.to_decimal(20).unwrap(), "1.61803398874989484820");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod algebraic;
pub mod config;
pub mod error;
pub mod factor;
pub mod parse;
pub mod polynomial;
pub mod report;
pub mod solver;
pub mod verify;

pub use algebraic::AlgebraicForm;
pub use config::{FallbackMethod, SolverConfig};
pub use error::{Result, SolveError};
pub use factor::{Factor, Factorization};
pub use parse::{parse_coefficient_list, parse_polynomial};
pub use polynomial::Polynomial;
pub use report::{JsonPlotExporter, PlotData, Visualizer};
pub use solver::{Discriminant, Method, RejectedAttempt, Root, RootSolver, SolveResult, Strategy};
pub use verify::{RootVerifier, Verification};

/// Re-exported complex type used throughout the API
pub use num_complex::Complex64;
