//! Symbolic polynomial input.
//!
//! Accepts the notation people type: `x^5 - x + 1`, `x⁵ − x + 1`,
//! `2*x^2 + 3x - 0.5`, `-x³ = 0`. Repeated powers are summed. Only the
//! variable `x` is recognized.

use crate::error::{Result, SolveError};
use crate::polynomial::{Polynomial, superscript_value};
use num_complex::Complex64;
use std::collections::BTreeMap;

/// Highest exponent accepted from text.
pub const MAX_PARSE_DEGREE: usize = 1000;

/// Parse an expression into a polynomial.
pub fn parse_polynomial(input: &str) -> Result<Polynomial> {
    let coefficients = parse_coefficients(input)?;
    Polynomial::from_real(&coefficients)
}

/// Parse an expression into coefficients, highest degree first.
///
/// Leading terms that cancel out are dropped; an expression that cancels
/// entirely is rejected.
pub fn parse_coefficients(input: &str) -> Result<Vec<f64>> {
    let mut parser = Parser::new(input);
    let terms = parser.expression()?;

    let degree = terms.keys().next_back().copied().unwrap_or(0);
    let mut coefficients: Vec<f64> = (0..=degree)
        .rev()
        .map(|power| terms.get(&power).copied().unwrap_or(0.0))
        .collect();
    let first_nonzero = coefficients.iter().position(|&c| c != 0.0).ok_or_else(|| {
        SolveError::invalid_input("expression has no non-zero terms")
    })?;
    coefficients.drain(..first_nonzero);
    Ok(coefficients)
}

/// Parse comma or whitespace separated numbers, highest degree first.
pub fn parse_coefficient_list(input: &str) -> Result<Vec<Complex64>> {
    let mut column = 1;
    let mut values = Vec::new();
    for token in input.split(|c: char| c == ',' || c.is_whitespace()) {
        if !token.is_empty() {
            let value: f64 = token
                .parse()
                .map_err(|_| SolveError::parse(column, format!("'{token}' is not a number")))?;
            values.push(Complex64::new(value, 0.0));
        }
        column += token.chars().count() + 1;
    }
    if values.is_empty() {
        return Err(SolveError::invalid_input("no coefficients given"));
    }
    Ok(values)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    /// 1-based column of the current position.
    fn column(&self) -> usize {
        self.pos + 1
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T> {
        Err(SolveError::parse(self.column(), message))
    }

    /// Optional sign; `−` is accepted as minus.
    fn sign(&mut self) -> Option<f64> {
        self.skip_whitespace();
        match self.peek()? {
            '+' => {
                self.pos += 1;
                Some(1.0)
            }
            '-' | '−' => {
                self.pos += 1;
                Some(-1.0)
            }
            _ => None,
        }
    }

    fn expression(&mut self) -> Result<BTreeMap<usize, f64>> {
        let mut terms = BTreeMap::new();
        let mut first = true;
        loop {
            self.skip_whitespace();
            match self.peek() {
                None if first => return self.error("empty expression"),
                None => break,
                Some('=') => {
                    if first {
                        return self.error("expected a term before '='");
                    }
                    self.zero_rhs()?;
                    break;
                }
                Some(_) => {}
            }

            let sign = match self.sign() {
                Some(sign) => sign,
                None if first => 1.0,
                None => {
                    let found = self.peek().unwrap_or(' ');
                    return self.error(format!("expected '+' or '-', found '{found}'"));
                }
            };
            let (coefficient, power) = self.term()?;
            *terms.entry(power).or_insert(0.0) += sign * coefficient;
            first = false;
        }
        Ok(terms)
    }

    /// `= 0` at the end of the input.
    fn zero_rhs(&mut self) -> Result<()> {
        self.pos += 1;
        self.skip_whitespace();
        let start = self.pos;
        let value = self.number()?;
        if value != Some(0.0) {
            self.pos = start;
            return self.error("only '= 0' is supported on the right-hand side");
        }
        self.skip_whitespace();
        if let Some(c) = self.peek() {
            return self.error(format!("unexpected '{c}' after '= 0'"));
        }
        Ok(())
    }

    /// `[number] [*] [x [^digits | superscripts]]`
    fn term(&mut self) -> Result<(f64, usize)> {
        self.skip_whitespace();
        let coefficient = self.number()?;
        self.skip_whitespace();

        let has_star = self.peek() == Some('*');
        if has_star {
            if coefficient.is_none() {
                return self.error("'*' without a coefficient");
            }
            self.pos += 1;
            self.skip_whitespace();
        }

        if self.peek() != Some('x') {
            return match coefficient {
                Some(value) if !has_star => Ok((value, 0)),
                _ => {
                    let found = self.peek().map_or("end of input".to_string(), |c| format!("'{c}'"));
                    self.error(format!("expected a number or 'x', found {found}"))
                }
            };
        }
        self.pos += 1;

        let power = self.exponent()?;
        if power > MAX_PARSE_DEGREE {
            return self.error(format!("exponent {power} exceeds {MAX_PARSE_DEGREE}"));
        }
        Ok((coefficient.unwrap_or(1.0), power))
    }

    fn exponent(&mut self) -> Result<usize> {
        self.skip_whitespace();
        if self.peek() == Some('^') {
            self.pos += 1;
            self.skip_whitespace();
            let start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
            if start == self.pos {
                return self.error("expected digits after '^'");
            }
            let digits: String = self.chars[start..self.pos].iter().collect();
            return digits.parse().or_else(|_| {
                self.pos = start;
                self.error("exponent is too large")
            });
        }

        let mut power: Option<usize> = None;
        while let Some(d) = self.peek().and_then(superscript_value) {
            power = Some(power.unwrap_or(0).saturating_mul(10).saturating_add(d as usize));
            self.pos += 1;
        }
        Ok(power.unwrap_or(1))
    }

    /// Unsigned decimal number, if one starts here.
    fn number(&mut self) -> Result<Option<f64>> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || c == '.')
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Ok(None);
        }
        // Scientific notation, e.g. 1e-3 or 2.5E4
        if matches!(self.peek(), Some('e' | 'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some('+' | '-')) {
                self.pos += 1;
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
            } else {
                self.pos = mark;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Some(value)),
            _ => {
                self.pos = start;
                self.error(format!("invalid number '{text}'"))
            }
        }
    }
}
