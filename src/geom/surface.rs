use std::f64::consts::TAU;

use super::core::{Point3, Tolerance, Vec3};
use super::error::{GeomError, GeomResult};

/// A parametric surface `P(u, v)` over a rectangular domain.
pub trait Surface {
    fn point_at(&self, u: f64, v: f64) -> Point3;

    #[must_use]
    fn domain_u(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn domain_v(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    /// Partial derivatives `(∂P/∂u, ∂P/∂v)` at a parametric point.
    ///
    /// The default implementation uses central finite differences with a step
    /// relative to the domain span, falling back to one-sided differences at the
    /// domain boundary. Surfaces with closed-form derivatives should override it.
    #[must_use]
    fn partial_derivatives_at(&self, u: f64, v: f64) -> (Vec3, Vec3) {
        let (u0, u1) = self.domain_u();
        let (v0, v1) = self.domain_v();

        let u = u.clamp(u0, u1);
        let v = v.clamp(v0, v1);

        let du = central_difference(u, u0, u1, |t| self.point_at(t, v));
        let dv = central_difference(v, v0, v1, |t| self.point_at(u, t));
        (du, dv)
    }

    #[must_use]
    fn normal_at(&self, u: f64, v: f64) -> Option<Vec3> {
        let (du, dv) = self.partial_derivatives_at(u, v);
        du.cross(dv).normalized()
    }

    /// Local area element `‖∂P/∂u × ∂P/∂v‖`.
    #[must_use]
    fn area_element_at(&self, u: f64, v: f64) -> f64 {
        let (du, dv) = self.partial_derivatives_at(u, v);
        du.cross(dv).length()
    }
}

fn central_difference(t: f64, t0: f64, t1: f64, eval: impl Fn(f64) -> Point3) -> Vec3 {
    let span = t1 - t0;
    if !span.is_finite() || span == 0.0 {
        return Vec3::ZERO;
    }

    let h = Tolerance::DERIVATIVE.relative_to(span);
    let ta = (t - h).max(t0);
    let tb = (t + h).min(t1);
    if ta == tb {
        return Vec3::ZERO;
    }

    eval(tb).sub_point(eval(ta)).mul_scalar(1.0 / (tb - ta))
}

/// Position and first partial derivatives evaluated together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceJet {
    pub point: Point3,
    pub du: Vec3,
    pub dv: Vec3,
}

/// The Möbius strip of center radius `R` and width `w`:
///
/// ```text
/// x = (R + v·cos(u/2))·cos(u)
/// y = (R + v·cos(u/2))·sin(u)
/// z = v·sin(u/2)
/// ```
///
/// with `u ∈ [0, 2π]` and `v ∈ [-w/2, w/2]`. The surface is not closed in `u`
/// in the usual sense: the half-twist identifies `P(u + 2π, v)` with `P(u, -v)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MobiusSurface {
    pub center_radius: f64,
    pub width: f64,
}

impl MobiusSurface {
    pub fn new(center_radius: f64, width: f64) -> GeomResult<Self> {
        if !center_radius.is_finite() || center_radius <= 0.0 {
            return Err(GeomError::invalid(
                "center_radius",
                format!("must be finite and > 0, got {center_radius}"),
            ));
        }
        if !width.is_finite() || width <= 0.0 {
            return Err(GeomError::invalid(
                "width",
                format!("must be finite and > 0, got {width}"),
            ));
        }
        Ok(Self {
            center_radius,
            width,
        })
    }

    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.width * 0.5
    }

    /// Evaluates the position and both partial derivatives from one set of
    /// trigonometric terms, so the three stay consistent with each other.
    #[must_use]
    pub fn jet_at(&self, u: f64, v: f64) -> SurfaceJet {
        let (sin_u, cos_u) = u.sin_cos();
        let (sin_half, cos_half) = (0.5 * u).sin_cos();
        let radial = self.center_radius + v * cos_half;

        let point = Point3::new(radial * cos_u, radial * sin_u, v * sin_half);

        let twist = 0.5 * v * sin_half;
        let du = Vec3::new(
            -radial * sin_u - twist * cos_u,
            radial * cos_u - twist * sin_u,
            0.5 * v * cos_half,
        );
        let dv = Vec3::new(cos_half * cos_u, cos_half * sin_u, sin_half);

        SurfaceJet { point, du, dv }
    }
}

impl Surface for MobiusSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        self.jet_at(u, v).point
    }

    fn domain_u(&self) -> (f64, f64) {
        (0.0, TAU)
    }

    fn domain_v(&self) -> (f64, f64) {
        let half = self.half_width();
        (-half, half)
    }

    fn partial_derivatives_at(&self, u: f64, v: f64) -> (Vec3, Vec3) {
        let jet = self.jet_at(u, v);
        (jet.du, jet.dv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_dimensions() {
        assert!(MobiusSurface::new(0.0, 0.3).is_err());
        assert!(MobiusSurface::new(-1.0, 0.3).is_err());
        assert!(MobiusSurface::new(1.0, 0.0).is_err());
        assert!(MobiusSurface::new(1.0, f64::NAN).is_err());
        assert!(MobiusSurface::new(f64::INFINITY, 0.3).is_err());
        assert!(MobiusSurface::new(1.0, 0.3).is_ok());
    }

    #[test]
    fn centerline_is_a_circle() {
        let surface = MobiusSurface::new(2.0, 0.5).unwrap();
        for i in 0..16 {
            let u = TAU * f64::from(i) / 16.0;
            let p = surface.point_at(u, 0.0);
            assert!((p.x.hypot(p.y) - 2.0).abs() < 1e-12);
            assert!(p.z.abs() < 1e-12);
        }
    }

    #[test]
    fn domain_matches_width() {
        let surface = MobiusSurface::new(1.0, 0.3).unwrap();
        assert_eq!(surface.domain_u(), (0.0, TAU));
        assert_eq!(surface.domain_v(), (-0.15, 0.15));
    }

    #[test]
    fn normal_is_unit_length() {
        let surface = MobiusSurface::new(1.0, 0.3).unwrap();
        let n = surface.normal_at(1.3, 0.1).unwrap();
        assert!((n.length() - 1.0).abs() < 1e-12);
    }
}
