use std::f64::consts::TAU;

use crate::geom::{
    GeomError, MobiusStrip, MobiusSurface, Point3, QuadOptions, ShapeParameters, Surface,
    integrate_surface_area, surface_area,
};

const AREA_TOL: f64 = 1e-6;

/// Reference area for `R = 1`, `w = 0.3`.
const REFERENCE_AREA: f64 = 1.886_733_250_2;

fn strip(center_radius: f64, width: f64) -> MobiusStrip {
    MobiusStrip::new(
        ShapeParameters::default()
            .with_center_radius(center_radius)
            .with_width(width),
    )
    .unwrap()
}

struct FlatRectangle {
    width: f64,
    height: f64,
}

impl Surface for FlatRectangle {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        Point3::new(u * self.width, v * self.height, 0.0)
    }
}

#[test]
fn reference_strip_area() {
    let area = strip(1.0, 0.3).surface_area().unwrap();
    assert!((area - REFERENCE_AREA).abs() < AREA_TOL, "area {area}");
}

#[test]
fn larger_strip_area() {
    let area = strip(2.0, 0.5).surface_area().unwrap();
    assert!((area - 6.287_292_784).abs() < AREA_TOL, "area {area}");
}

#[test]
fn area_is_reproducible() {
    let strip = strip(1.0, 0.3);
    let first = strip.surface_area().unwrap();
    let second = strip.surface_area().unwrap();
    assert_eq!(first.to_bits(), second.to_bits());
}

#[test]
fn area_does_not_depend_on_resolution() {
    let coarse = MobiusStrip::new(ShapeParameters::default().with_resolution(2)).unwrap();
    let fine = MobiusStrip::new(ShapeParameters::default().with_resolution(500)).unwrap();
    assert_eq!(coarse.surface_area().unwrap(), fine.surface_area().unwrap());
}

#[test]
fn area_is_positive_and_grows_with_width() {
    let mut previous = 0.0;
    for &width in &[0.05, 0.1, 0.3, 0.6, 1.0, 1.5] {
        let area = strip(1.0, width).surface_area().unwrap();
        assert!(area > previous, "w={width}: {area} <= {previous}");
        // The twist only adds area over the flat annulus 2πRw.
        assert!(area >= TAU * width, "w={width}: {area}");
        previous = area;
    }
}

#[test]
fn degenerate_width_approaches_flat_band() {
    let width = 1e-4;
    let area = strip(1.0, width).surface_area().unwrap();
    assert!(area > 0.0);
    assert!((area - TAU * width).abs() < 1e-10, "area {area}");
}

#[test]
fn self_intersecting_strip_still_integrates() {
    let area = strip(1.0, 2.5).surface_area().unwrap();
    assert!(area.is_finite() && area > 0.0);
}

#[test]
fn self_intersection_is_flagged_in_diagnostics() {
    let wide = strip(1.0, 2.5);
    assert!(wide.is_self_intersecting());
    let (_, diagnostics) = wide.surface_area_with_diagnostics().unwrap();
    assert!(diagnostics.warnings.iter().any(|w| w.contains("overlapping")));

    assert!(!strip(1.0, 0.3).is_self_intersecting());
}

#[test]
fn generic_surface_uses_finite_difference_partials() {
    let rectangle = FlatRectangle {
        width: 2.0,
        height: 3.0,
    };
    let area = surface_area(&rectangle, &QuadOptions::default()).unwrap();
    assert!((area - 6.0).abs() < 1e-8, "area {area}");
}

#[test]
fn diagnostics_report_convergence() {
    let strip = strip(1.0, 0.3);
    let (area, diagnostics) = strip.surface_area_with_diagnostics().unwrap();
    assert_eq!(area, strip.surface_area().unwrap());
    assert!(diagnostics.error_estimate <= diagnostics.tolerance);
    assert!(diagnostics.evaluations >= 15 * 15);
    assert!(diagnostics.outer_subintervals >= 1);
    assert!(diagnostics.warnings.is_empty());
}

#[test]
fn raw_result_exposes_evaluation_counts() {
    let surface = MobiusSurface::new(1.0, 0.3).unwrap();
    let result = integrate_surface_area(&surface, &QuadOptions::default());
    assert!(result.converged);
    assert!(result.neval > 0);
    assert!((result.integral - REFERENCE_AREA).abs() < AREA_TOL);
}

#[test]
fn unreachable_tolerance_reports_divergence() {
    let options = QuadOptions {
        rtol: 0.0,
        atol: 0.0,
        limit: 1,
    };
    let strip = MobiusStrip::new(ShapeParameters::default().with_quadrature(options)).unwrap();

    match strip.surface_area() {
        Err(GeomError::IntegrationDivergence {
            estimate, limit, ..
        }) => {
            assert_eq!(limit, 1);
            assert!((estimate - REFERENCE_AREA).abs() < 1e-3);
        }
        other => panic!("expected divergence, got {other:?}"),
    }
    assert!(strip.surface_area_with_diagnostics().is_err());
    assert!(strip.measure().is_err());
}
