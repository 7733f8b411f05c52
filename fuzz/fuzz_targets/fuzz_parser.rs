//! Fuzz target for the polynomial expression parser
//!
//! Arbitrary text must either parse into a polynomial or fail with an error,
//! never panic.

#![no_main]

use dskypoly_math::{parse_coefficient_list, parse_polynomial};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(poly) = parse_polynomial(input) {
            // Whatever parses has a non-zero leading coefficient
            assert!(poly.leading().norm() > 0.0);
        }
        let _ = parse_coefficient_list(input);
    }
});
