//! Property-based tests for dskypoly-math
//!
//! This module contains property tests for:
//! - Root finding across every degree strategy
//! - Depression and other polynomial transforms
//! - Root verification

mod depression_properties;
mod root_properties;
mod verifier_properties;
