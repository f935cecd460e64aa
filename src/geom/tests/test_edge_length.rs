use std::f64::consts::TAU;

use crate::geom::{MobiusStrip, MobiusSurface, ShapeParameters, boundary_edges, boundary_loop};

const SEAM_TOL: f64 = 1e-12;

fn strip_with_samples(width: f64, samples: usize) -> MobiusStrip {
    MobiusStrip::new(
        ShapeParameters::default()
            .with_width(width)
            .with_edge_samples(samples),
    )
    .unwrap()
}

#[test]
fn default_resolution_edge_length() {
    let length = MobiusStrip::default().edge_length();
    assert!((length - 12.599_941_029_959).abs() < 1e-8, "length {length}");
}

#[test]
fn estimate_converges_from_below() {
    let lengths: Vec<f64> = [50, 500, 5000]
        .iter()
        .map(|&n| strip_with_samples(0.3, n).edge_length())
        .collect();

    assert!(lengths[0] < lengths[1] && lengths[1] < lengths[2], "{lengths:?}");
    let coarse_step = lengths[1] - lengths[0];
    let fine_step = lengths[2] - lengths[1];
    assert!(fine_step < coarse_step / 10.0, "{lengths:?}");
    assert!((lengths[2] - 12.602_064_106_7).abs() < 1e-8, "{lengths:?}");
}

#[test]
fn degenerate_width_approaches_double_circumference() {
    // The single boundary of a thin strip wraps the centerline twice.
    let length = strip_with_samples(1e-4, 2000).edge_length();
    assert!((length - 2.0 * TAU).abs() < 1e-4, "length {length}");
}

#[test]
fn arcs_chain_across_the_seam() {
    let surface = MobiusSurface::new(1.0, 0.3).unwrap();
    let [upper, lower] = boundary_edges(&surface, 100);

    assert_eq!(upper.points.len(), 100);
    assert_eq!(lower.points.len(), 100);
    assert!(upper.last().unwrap().distance_to(lower.first().unwrap()) < SEAM_TOL);
    assert!(lower.last().unwrap().distance_to(upper.first().unwrap()) < SEAM_TOL);
}

#[test]
fn final_segment_is_not_degenerate() {
    let surface = MobiusSurface::new(1.0, 0.3).unwrap();
    for edge in boundary_edges(&surface, 100) {
        let segments = edge.segments();
        let mean = segments.total_length / segments.lengths.len() as f64;
        let last = *segments.lengths.last().unwrap();
        assert!(last > 0.5 * mean, "last segment {last}, mean {mean}");
    }
}

#[test]
fn boundary_loop_matches_the_two_arcs() {
    let surface = MobiusSurface::new(1.0, 0.3).unwrap();
    let samples = 100;
    let loop_curve = boundary_loop(&surface, samples);
    let [upper, lower] = boundary_edges(&surface, samples);

    assert_eq!(loop_curve.points.len(), 2 * samples - 1);
    assert!(loop_curve.first().unwrap().distance_to(loop_curve.last().unwrap()) < SEAM_TOL);
    assert!((loop_curve.length() - (upper.length() + lower.length())).abs() < 1e-9);
}

#[test]
fn boundary_loop_handles_tiny_sample_counts() {
    let surface = MobiusSurface::new(1.0, 0.3).unwrap();
    assert!(boundary_loop(&surface, 0).points.is_empty());
    assert_eq!(boundary_loop(&surface, 1).points.len(), 1);
    assert_eq!(boundary_loop(&surface, 2).points.len(), 3);
}

#[test]
fn edge_samples_override_resolution() {
    let split = MobiusStrip::new(
        ShapeParameters::default()
            .with_resolution(10)
            .with_edge_samples(500),
    )
    .unwrap();
    let shared = MobiusStrip::new(ShapeParameters::default().with_resolution(500)).unwrap();

    assert_eq!(split.edge_length(), shared.edge_length());
    assert_eq!(split.point_grid().cols, 10);
}

#[test]
fn edge_length_is_reproducible() {
    let strip = strip_with_samples(0.3, 321);
    assert_eq!(strip.edge_length().to_bits(), strip.edge_length().to_bits());
}

#[test]
fn diagnostics_describe_the_sampling() {
    let strip = strip_with_samples(0.3, 200);
    let (length, diagnostics) = strip.edge_length_with_diagnostics();

    assert_eq!(length, strip.edge_length());
    assert_eq!(diagnostics.samples, 200);
    assert!(diagnostics.seam_gap < SEAM_TOL);
    assert!(diagnostics.shortest_segment > 0.0);
    assert!(diagnostics.shortest_segment <= diagnostics.longest_segment);
    assert!(diagnostics.warnings.is_empty());
}

#[test]
fn coarse_sampling_is_flagged() {
    let (length, diagnostics) = strip_with_samples(0.3, 4).edge_length_with_diagnostics();
    assert!(length > 0.0);
    assert_eq!(diagnostics.warnings.len(), 1);
}
