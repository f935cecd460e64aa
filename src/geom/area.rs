use super::error::GeomResult;
use super::quadrature::{QuadOptions, QuadResult, dblquad};
use super::surface::Surface;

/// Integrates the area element `‖∂P/∂u × ∂P/∂v‖` over the surface's full
/// parameter domain, `u` in the outer pass and `v` in the inner one.
#[must_use]
pub fn integrate_surface_area<S>(surface: &S, options: &QuadOptions) -> QuadResult
where
    S: Surface + Sync + ?Sized,
{
    dblquad(
        |u, v| surface.area_element_at(u, v),
        surface.domain_u(),
        surface.domain_v(),
        options,
    )
}

/// Surface area, or `IntegrationDivergence` if the quadrature did not meet
/// its tolerance within `options.limit` subintervals.
pub fn surface_area<S>(surface: &S, options: &QuadOptions) -> GeomResult<f64>
where
    S: Surface + Sync + ?Sized,
{
    let result = integrate_surface_area(surface, options);
    if !result.converged {
        log::warn!(
            "surface area quadrature did not converge: estimate {} error {:e} tolerance {:e}",
            result.integral,
            result.error,
            result.tolerance
        );
    }
    result.into_converged(options)
}
