//! Hand-off of solved roots to plotting tools.
//!
//! The solver never depends on a renderer. A [`Visualizer`] receives the
//! coefficients and the verified roots after solving; [`JsonPlotExporter`]
//! is the bundled one and writes [`PlotData`] as JSON for an external
//! plotting script.

use crate::polynomial::Polynomial;
use crate::solver::{Method, Root, SolveResult};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Consumer of solved roots.
pub trait Visualizer {
    /// Error produced while rendering
    type Error;

    /// Render `roots` of the polynomial with `coefficients` (highest degree
    /// first).
    fn render(
        &mut self,
        coefficients: &[Complex64],
        roots: &[Root],
        method: Method,
    ) -> Result<(), Self::Error>;

    /// Render a whole result.
    fn render_result(
        &mut self,
        polynomial: &Polynomial,
        result: &SolveResult,
    ) -> Result<(), Self::Error> {
        self.render(polynomial.coefficients(), &result.roots, result.method)
    }
}

/// One root in the complex plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    /// Real part
    pub re: f64,
    /// Imaginary part
    pub im: f64,
    /// `|P(x)|` at the root
    pub residual: f64,
    /// Exact form, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Everything a plotting script needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotData {
    /// Coefficients as `[re, im]` pairs, highest degree first
    pub coefficients: Vec<[f64; 2]>,
    /// Method that found the roots
    pub method: Method,
    /// Roots as points
    pub roots: Vec<PlotPoint>,
    /// Half-width of a square view containing every root
    pub extent: f64,
}

impl PlotData {
    /// Build plot data from coefficients and roots.
    pub fn new(coefficients: &[Complex64], roots: &[Root], method: Method) -> Self {
        let points: Vec<PlotPoint> = roots
            .iter()
            .map(|root| PlotPoint {
                re: root.value.re,
                im: root.value.im,
                residual: root.residual,
                label: root.algebraic_form.as_ref().map(ToString::to_string),
            })
            .collect();
        let extent = points
            .iter()
            .map(|p| p.re.abs().max(p.im.abs()))
            .filter(|e| e.is_finite())
            .fold(1.0, f64::max)
            * 1.1;
        Self {
            coefficients: coefficients.iter().map(|c| [c.re, c.im]).collect(),
            method,
            roots: points,
            extent,
        }
    }
}

/// Writes [`PlotData`] as pretty-printed JSON.
pub struct JsonPlotExporter<W: Write> {
    writer: W,
}

impl<W: Write> JsonPlotExporter<W> {
    /// Export to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Visualizer for JsonPlotExporter<W> {
    type Error = serde_json::Error;

    fn render(
        &mut self,
        coefficients: &[Complex64],
        roots: &[Root],
        method: Method,
    ) -> Result<(), Self::Error> {
        let data = PlotData::new(coefficients, roots, method);
        serde_json::to_writer_pretty(&mut self.writer, &data)?;
        self.writer.write_all(b"\n").map_err(serde_json::Error::io)
    }
}
