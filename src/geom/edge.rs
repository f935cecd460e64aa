//! Boundary curves of the Möbius strip and their polyline lengths.
//!
//! The boundary is sampled as two arcs at `v = +w/2` and `v = -w/2`, each over
//! the closed range `u ∈ [0, 2π]`. Because of the half-twist, the `+w/2` arc
//! ends at `P(2π, w/2) = P(0, -w/2)`, which is where the `-w/2` arc starts (and
//! vice versa). The two arcs therefore chain into the single closed boundary,
//! and including both `u = 0` and `u = 2π` in each arc closes that chain
//! without a zero-length seam segment.

use std::f64::consts::TAU;

use serde::Serialize;

use super::core::Point3;
use super::grid::linspace;
use super::surface::{MobiusSurface, Surface};

/// A boundary curve sampled at fixed `v`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeCurve {
    pub v: f64,
    pub points: Vec<Point3>,
}

impl EdgeCurve {
    /// Samples `surface` at `samples` evenly spaced `u` values over the closed
    /// u-domain, holding `v` fixed.
    #[must_use]
    pub fn sample(surface: &impl Surface, v: f64, samples: usize) -> Self {
        let (u0, u1) = surface.domain_u();
        let points = linspace(u0, u1, samples)
            .into_iter()
            .map(|u| surface.point_at(u, v))
            .collect();
        Self { v, points }
    }

    /// Sum of the Euclidean lengths of consecutive segments.
    #[must_use]
    pub fn length(&self) -> f64 {
        polyline_length(&self.points)
    }

    #[must_use]
    pub fn first(&self) -> Option<Point3> {
        self.points.first().copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<Point3> {
        self.points.last().copied()
    }

    #[must_use]
    pub fn segments(&self) -> SegmentLengthAnalysis {
        analyze_segments(&self.points)
    }
}

/// Segment-length statistics of an open polyline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SegmentLengthAnalysis {
    /// Length of each segment.
    pub lengths: Vec<f64>,
    /// Total length of all segments.
    pub total_length: f64,
    /// Index and length of the shortest segment.
    pub shortest: Option<(usize, f64)>,
    /// Index and length of the longest segment.
    pub longest: Option<(usize, f64)>,
}

#[must_use]
pub fn polyline_length(points: &[Point3]) -> f64 {
    points.windows(2).map(|w| w[1].distance_to(w[0])).sum()
}

#[must_use]
pub fn analyze_segments(points: &[Point3]) -> SegmentLengthAnalysis {
    if points.len() < 2 {
        return SegmentLengthAnalysis::default();
    }

    let mut lengths = Vec::with_capacity(points.len() - 1);
    let mut total = 0.0;
    let mut shortest: Option<(usize, f64)> = None;
    let mut longest: Option<(usize, f64)> = None;

    for (i, window) in points.windows(2).enumerate() {
        let len = window[1].distance_to(window[0]);
        lengths.push(len);
        total += len;

        match shortest {
            Some((_, min_len)) if len >= min_len => {}
            _ => shortest = Some((i, len)),
        }
        match longest {
            Some((_, max_len)) if len <= max_len => {}
            _ => longest = Some((i, len)),
        }
    }

    SegmentLengthAnalysis {
        lengths,
        total_length: total,
        shortest,
        longest,
    }
}

/// The two boundary arcs at `v = +w/2` and `v = -w/2`.
#[must_use]
pub fn boundary_edges(surface: &MobiusSurface, samples: usize) -> [EdgeCurve; 2] {
    let half = surface.half_width();
    [
        EdgeCurve::sample(surface, half, samples),
        EdgeCurve::sample(surface, -half, samples),
    ]
}

/// Total boundary length approximated with `samples` points per arc.
#[must_use]
pub fn boundary_length(surface: &MobiusSurface, samples: usize) -> f64 {
    boundary_edges(surface, samples).iter().map(EdgeCurve::length).sum()
}

/// The single closed boundary, traversed at `v = +w/2` over `u ∈ [0, 4π]`.
///
/// Uses `2 * samples - 1` points so that its vertices coincide with the
/// concatenation of the two [`boundary_edges`] arcs sampled with `samples`
/// points each.
#[must_use]
pub fn boundary_loop(surface: &MobiusSurface, samples: usize) -> EdgeCurve {
    let count = samples.saturating_mul(2).saturating_sub(1);
    let points = linspace(0.0, 2.0 * TAU, count)
        .into_iter()
        .map(|u| surface.point_at(u, surface.half_width()))
        .collect();
    EdgeCurve {
        v: surface.half_width(),
        points,
    }
}
