mod area;
mod core;
mod diagnostics;
mod edge;
mod error;
mod grid;
mod mesh;
mod metrics;
mod mobius;
mod quadrature;
mod surface;
mod triangulation;

pub use area::{integrate_surface_area, surface_area};
pub use self::core::{BBox, Point3, Tolerance, Vec3};
pub use diagnostics::{AreaDiagnostics, EdgeDiagnostics};
pub use edge::{
    EdgeCurve, SegmentLengthAnalysis, analyze_segments, boundary_edges, boundary_length,
    boundary_loop, polyline_length,
};
pub use error::{GeomError, GeomResult};
pub use grid::{ParameterGrid, PointGrid, linspace, sample_point_grid};
pub use mesh::GeomMesh;
pub use metrics::{GeomMetrics, GeomTimingReport, TimingBucket};
pub use mobius::{MAX_EDGE_SAMPLES, MAX_RESOLUTION, MobiusReport, MobiusStrip, ShapeParameters};
pub use quadrature::{QuadOptions, QuadResult, dblquad, quad};
pub use surface::{MobiusSurface, Surface, SurfaceJet};
pub use triangulation::triangulate_grid;

#[cfg(test)]
mod tests;
