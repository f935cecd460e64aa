//! Validated construction and query interface for a single Möbius strip.
//!
//! [`MobiusStrip`] owns nothing but its [`ShapeParameters`]. Every query
//! re-evaluates the surface from scratch; grids and boundary samples are never
//! cached between calls.

use serde::{Deserialize, Serialize};

use super::area::{integrate_surface_area, surface_area};
use super::core::Tolerance;
use super::diagnostics::{AreaDiagnostics, EdgeDiagnostics};
use super::edge::{EdgeCurve, boundary_edges, boundary_length, boundary_loop};
use super::error::{GeomError, GeomResult};
use super::grid::{ParameterGrid, PointGrid, sample_point_grid};
use super::mesh::GeomMesh;
use super::metrics::{GeomMetrics, TimingBucket};
use super::quadrature::QuadOptions;
use super::surface::MobiusSurface;

/// Largest grid resolution. `resolution²` stays below `2³²`, so vertex counts
/// fit a 32-bit `usize` and mesh indices fit `u32`.
pub const MAX_RESOLUTION: usize = 1 << 15;

/// Largest number of points per boundary arc.
pub const MAX_EDGE_SAMPLES: usize = 1 << 20;

/// Shape and sampling configuration.
///
/// Deserializes from any serde format; missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeParameters {
    /// Radius `R` of the centerline circle.
    pub center_radius: f64,
    /// Strip width `w`; `v` ranges over `[-w/2, w/2]`.
    pub width: f64,
    /// Points per axis of the display grid.
    pub resolution: usize,
    /// Points per boundary arc for edge length. Falls back to `resolution`.
    pub edge_samples: Option<usize>,
    pub quadrature: QuadOptions,
}

impl Default for ShapeParameters {
    fn default() -> Self {
        Self {
            center_radius: 1.0,
            width: 0.3,
            resolution: 100,
            edge_samples: None,
            quadrature: QuadOptions::default(),
        }
    }
}

impl ShapeParameters {
    #[must_use]
    pub fn with_center_radius(mut self, center_radius: f64) -> Self {
        self.center_radius = center_radius;
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    #[must_use]
    pub fn with_edge_samples(mut self, edge_samples: usize) -> Self {
        self.edge_samples = Some(edge_samples);
        self
    }

    #[must_use]
    pub fn with_quadrature(mut self, quadrature: QuadOptions) -> Self {
        self.quadrature = quadrature;
        self
    }

    #[must_use]
    pub fn edge_sample_count(&self) -> usize {
        self.edge_samples.unwrap_or(self.resolution)
    }

    pub fn validate(&self) -> GeomResult<()> {
        MobiusSurface::new(self.center_radius, self.width)?;
        if !(2..=MAX_RESOLUTION).contains(&self.resolution) {
            return Err(GeomError::invalid(
                "resolution",
                format!("must be in 2..={MAX_RESOLUTION}, got {}", self.resolution),
            ));
        }
        if let Some(samples) = self
            .edge_samples
            .filter(|s| !(2..=MAX_EDGE_SAMPLES).contains(s))
        {
            return Err(GeomError::invalid(
                "edge_samples",
                format!("must be in 2..={MAX_EDGE_SAMPLES}, got {samples}"),
            ));
        }
        self.quadrature.validate()
    }
}

/// Serializable summary of one strip's measurements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobiusReport {
    pub center_radius: f64,
    pub width: f64,
    pub resolution: usize,
    pub edge_samples: usize,
    pub surface_area: f64,
    pub edge_length: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MobiusStrip {
    params: ShapeParameters,
    surface: MobiusSurface,
}

impl MobiusStrip {
    /// Validates `params`; invalid values are rejected here, never at query time.
    pub fn new(params: ShapeParameters) -> GeomResult<Self> {
        params.validate()?;
        let surface = MobiusSurface::new(params.center_radius, params.width)?;

        let strip = Self { params, surface };
        if strip.is_self_intersecting() {
            log::warn!(
                "width {} >= 2 * center radius {}: the strip self-intersects",
                params.width,
                params.center_radius
            );
        }
        log::debug!(
            "mobius strip R={} w={} resolution={} edge samples={}",
            params.center_radius,
            params.width,
            params.resolution,
            params.edge_sample_count()
        );

        Ok(strip)
    }

    /// True when `width >= 2R`, where the inner edge crosses the axis.
    #[must_use]
    pub fn is_self_intersecting(&self) -> bool {
        self.surface.width >= 2.0 * self.surface.center_radius
    }

    #[must_use]
    pub fn params(&self) -> &ShapeParameters {
        &self.params
    }

    #[must_use]
    pub fn surface(&self) -> &MobiusSurface {
        &self.surface
    }

    #[must_use]
    pub fn parameter_grid(&self) -> ParameterGrid {
        ParameterGrid::over_domain(&self.surface, self.params.resolution, self.params.resolution)
    }

    #[must_use]
    pub fn point_grid(&self) -> PointGrid {
        sample_point_grid(&self.surface, &self.parameter_grid())
    }

    /// Triangulated display mesh with per-vertex `(u, v)`.
    #[must_use]
    pub fn mesh(&self) -> GeomMesh {
        let mut metrics = GeomMetrics::default();
        metrics.begin();

        let mesh = metrics.time(TimingBucket::PointGrid, || {
            let params = self.parameter_grid();
            sample_point_grid(&self.surface, &params).to_mesh(&params)
        });
        if let Some(timing) = metrics.end() {
            log::debug!("mesh: {} vertices in {:.3} ms", mesh.vertex_count(), timing.total_ms());
        }
        mesh
    }

    /// The `+w/2` and `-w/2` boundary arcs used for edge length.
    #[must_use]
    pub fn edge_curves(&self) -> [EdgeCurve; 2] {
        boundary_edges(&self.surface, self.params.edge_sample_count())
    }

    /// The boundary as one closed curve over `u ∈ [0, 4π]`.
    #[must_use]
    pub fn boundary_loop(&self) -> EdgeCurve {
        boundary_loop(&self.surface, self.params.edge_sample_count())
    }

    pub fn surface_area(&self) -> GeomResult<f64> {
        let area = surface_area(&self.surface, &self.params.quadrature)?;
        log::debug!("surface area {area}");
        Ok(area)
    }

    pub fn surface_area_with_diagnostics(&self) -> GeomResult<(f64, AreaDiagnostics)> {
        let mut metrics = GeomMetrics::default();
        metrics.begin();

        let options = &self.params.quadrature;
        let result = metrics.time(TimingBucket::SurfaceArea, || {
            integrate_surface_area(&self.surface, options)
        });

        let mut warnings = Vec::new();
        if self.is_self_intersecting() {
            warnings.push(format!(
                "width {} >= 2 * center radius {}: area counts overlapping sheets",
                self.surface.width, self.surface.center_radius
            ));
        }
        if result.converged && 2 * result.subintervals > options.limit {
            warnings.push(format!(
                "outer pass used {} of {} subintervals",
                result.subintervals, options.limit
            ));
        }

        let diagnostics = AreaDiagnostics {
            error_estimate: result.error,
            tolerance: result.tolerance,
            evaluations: result.neval,
            outer_subintervals: result.subintervals,
            timing: metrics.end(),
            warnings,
        };
        log::debug!("surface area diagnostics: {}", diagnostics.summary());

        if !result.converged {
            log::warn!("surface area quadrature did not converge: {}", diagnostics.summary());
        }
        let area = result.into_converged(options)?;
        Ok((area, diagnostics))
    }

    /// Total length of both boundary arcs.
    #[must_use]
    pub fn edge_length(&self) -> f64 {
        let length = boundary_length(&self.surface, self.params.edge_sample_count());
        log::debug!("edge length {length}");
        length
    }

    #[must_use]
    pub fn edge_length_with_diagnostics(&self) -> (f64, EdgeDiagnostics) {
        let mut metrics = GeomMetrics::default();
        metrics.begin();

        let samples = self.params.edge_sample_count();
        let [upper, lower] = metrics.time(TimingBucket::EdgeLength, || self.edge_curves());

        let upper_segments = upper.segments();
        let lower_segments = lower.segments();

        let shortest = [upper_segments.shortest, lower_segments.shortest]
            .into_iter()
            .flatten()
            .map(|(_, len)| len)
            .fold(f64::INFINITY, f64::min);
        let longest = [upper_segments.longest, lower_segments.longest]
            .into_iter()
            .flatten()
            .map(|(_, len)| len)
            .fold(0.0, f64::max);

        let seam_gap = match (upper.first(), upper.last(), lower.first(), lower.last()) {
            (Some(uf), Some(ul), Some(lf), Some(ll)) => ul.distance_to(lf).max(ll.distance_to(uf)),
            _ => 0.0,
        };

        let mut warnings = Vec::new();
        if Tolerance::ZERO_LENGTH.is_zero_length(shortest) {
            warnings.push(format!("degenerate boundary segment of length {shortest:.3e}"));
        }
        if longest > 0.1 * self.surface.center_radius {
            warnings.push(format!(
                "coarse boundary sampling: longest segment {longest:.3e} with {samples} samples"
            ));
        }

        let diagnostics = EdgeDiagnostics {
            samples,
            edge_lengths: [upper_segments.total_length, lower_segments.total_length],
            shortest_segment: shortest,
            longest_segment: longest,
            seam_gap,
            timing: metrics.end(),
            warnings,
        };
        log::debug!("edge length diagnostics: {}", diagnostics.summary());

        (diagnostics.total_length(), diagnostics)
    }

    /// Area and edge length in one report.
    pub fn measure(&self) -> GeomResult<MobiusReport> {
        Ok(MobiusReport {
            center_radius: self.params.center_radius,
            width: self.params.width,
            resolution: self.params.resolution,
            edge_samples: self.params.edge_sample_count(),
            surface_area: self.surface_area()?,
            edge_length: self.edge_length(),
        })
    }
}

impl Default for MobiusStrip {
    fn default() -> Self {
        let params = ShapeParameters::default();
        Self {
            surface: MobiusSurface {
                center_radius: params.center_radius,
                width: params.width,
            },
            params,
        }
    }
}
