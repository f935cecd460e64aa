//! Diagnostics returned alongside the engine's measurements.
//!
//! [`AreaDiagnostics`] describes how the surface-area quadrature converged and
//! [`EdgeDiagnostics`] describes the sampling behind a boundary-length
//! estimate. Both carry human-readable warnings and, when the
//! `engine_metrics` feature is enabled, a timing report.

use std::fmt;

use super::metrics::GeomTimingReport;

/// Convergence information for a surface-area estimate.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AreaDiagnostics {
    /// Estimated absolute error of the area.
    pub error_estimate: f64,

    /// Error threshold the estimate was accepted against.
    pub tolerance: f64,

    /// Total integrand evaluations across the outer and all inner passes.
    pub evaluations: usize,

    /// Number of subintervals in the final outer (`u`) partition.
    pub outer_subintervals: usize,

    /// Optional timing breakdown; only populated with `engine_metrics`.
    pub timing: Option<GeomTimingReport>,

    pub warnings: Vec<String>,
}

impl AreaDiagnostics {
    /// Returns a short summary string suitable for logging.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "err:{:.3e} tol:{:.3e} evals:{} u-intervals:{}",
            self.error_estimate, self.tolerance, self.evaluations, self.outer_subintervals
        )
    }
}

impl fmt::Display for AreaDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())?;
        for warning in &self.warnings {
            write!(f, "\n  warning: {warning}")?;
        }
        Ok(())
    }
}

/// Sampling information for a boundary-length estimate.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EdgeDiagnostics {
    /// Points sampled per boundary arc.
    pub samples: usize,

    /// Polyline lengths of the `+w/2` and `-w/2` arcs.
    pub edge_lengths: [f64; 2],

    /// Shortest segment over both arcs.
    ///
    /// Stays well above zero: closing each arc at `u = 2π` does not produce a
    /// degenerate seam segment.
    pub shortest_segment: f64,

    /// Longest segment over both arcs; bounds the chord error of the estimate.
    pub longest_segment: f64,

    /// Distance between the end of each arc and the start of the other.
    /// Zero up to rounding, since the arcs chain into one closed boundary.
    pub seam_gap: f64,

    /// Optional timing breakdown; only populated with `engine_metrics`.
    pub timing: Option<GeomTimingReport>,

    pub warnings: Vec<String>,
}

impl EdgeDiagnostics {
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.edge_lengths[0] + self.edge_lengths[1]
    }

    /// Returns a short summary string suitable for logging.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "samples:{} len:{:.6} seg:[{:.3e}, {:.3e}] seam-gap:{:.3e}",
            self.samples,
            self.total_length(),
            self.shortest_segment,
            self.longest_segment,
            self.seam_gap
        )
    }
}

impl fmt::Display for EdgeDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())?;
        for warning in &self.warnings {
            write!(f, "\n  warning: {warning}")?;
        }
        Ok(())
    }
}
