//! Adaptive Gauss–Kronrod quadrature.
//!
//! [`quad`] is a globally adaptive 15-point Gauss–Kronrod integrator: it keeps
//! a list of subintervals and repeatedly bisects the one with the largest
//! error estimate until the summed error drops below
//! `max(atol, rtol * |integral|)` or the subinterval budget is spent.
//!
//! [`dblquad`] nests two passes (outer over `x`, inner over `y`). The inner
//! integrals at the outer nodes of one Kronrod rule are independent of each
//! other and run on the rayon pool when the `parallel` feature is enabled.
//!
//! Integrands are evaluated in batches (`&[f64] -> Vec<f64>`), one batch per
//! Kronrod rule.

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use super::error::{GeomError, GeomResult};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Kronrod abscissae on `[0, 1]`, outermost first. Odd indices are the
/// embedded 7-point Gauss abscissae, the last entry is the center.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

const WGK: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

/// Gauss weights for `XGK[1]`, `XGK[3]`, `XGK[5]` and the center.
const WG: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

const RULE_POINTS: usize = 15;

/// Options for adaptive quadrature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadOptions {
    /// Relative tolerance (default: 1.49e-8)
    pub rtol: f64,
    /// Absolute tolerance (default: 1.49e-8)
    pub atol: f64,
    /// Maximum number of subintervals per adaptive pass (default: 50)
    pub limit: usize,
}

impl Default for QuadOptions {
    fn default() -> Self {
        Self {
            rtol: 1.49e-8,
            atol: 1.49e-8,
            limit: 50,
        }
    }
}

impl QuadOptions {
    pub fn validate(&self) -> GeomResult<()> {
        if !self.rtol.is_finite() || self.rtol < 0.0 {
            return Err(GeomError::invalid(
                "quadrature.rtol",
                format!("must be finite and >= 0, got {}", self.rtol),
            ));
        }
        if !self.atol.is_finite() || self.atol < 0.0 {
            return Err(GeomError::invalid(
                "quadrature.atol",
                format!("must be finite and >= 0, got {}", self.atol),
            ));
        }
        if self.limit == 0 {
            return Err(GeomError::invalid("quadrature.limit", "must be at least 1"));
        }
        Ok(())
    }

    #[must_use]
    pub fn tolerance_for(&self, integral: f64) -> f64 {
        self.atol.max(self.rtol * integral.abs())
    }
}

/// Result of adaptive quadrature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadResult {
    /// Computed integral value
    pub integral: f64,
    /// Estimated absolute error
    pub error: f64,
    /// Error threshold the estimate was held against
    pub tolerance: f64,
    /// Number of integrand evaluations
    pub neval: usize,
    /// Number of subintervals in the final partition (outer pass for [`dblquad`])
    pub subintervals: usize,
    /// Whether integration converged
    pub converged: bool,
}

impl QuadResult {
    /// Returns the integral, or [`GeomError::IntegrationDivergence`] when the
    /// pass did not converge.
    pub fn into_converged(self, options: &QuadOptions) -> GeomResult<f64> {
        if self.converged {
            Ok(self.integral)
        } else {
            Err(GeomError::IntegrationDivergence {
                estimate: self.integral,
                error: self.error,
                tolerance: self.tolerance,
                limit: options.limit,
            })
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    integral: f64,
    error: f64,
}

fn rule_abscissae(center: f64, half_length: f64) -> [f64; RULE_POINTS] {
    let mut nodes = [center; RULE_POINTS];
    for k in 0..7 {
        let offset = half_length * XGK[k];
        nodes[1 + 2 * k] = center - offset;
        nodes[2 + 2 * k] = center + offset;
    }
    nodes
}

fn gauss_kronrod_15<F>(f: &F, a: f64, b: f64) -> Segment
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let center = 0.5 * (a + b);
    let half_length = 0.5 * (b - a);
    let abs_half_length = half_length.abs();

    let nodes = rule_abscissae(center, half_length);
    let values = f(&nodes);
    debug_assert_eq!(values.len(), RULE_POINTS);

    let fc = values[0];
    let mut res_gauss = fc * WG[3];
    let mut res_kronrod = fc * WGK[7];
    let mut res_abs = res_kronrod.abs();

    for k in 0..7 {
        let f1 = values[1 + 2 * k];
        let f2 = values[2 + 2 * k];
        let sum = f1 + f2;
        res_kronrod += WGK[k] * sum;
        res_abs += WGK[k] * (f1.abs() + f2.abs());
        if k % 2 == 1 {
            res_gauss += WG[k / 2] * sum;
        }
    }

    let mean = 0.5 * res_kronrod;
    let mut res_asc = WGK[7] * (fc - mean).abs();
    for k in 0..7 {
        res_asc += WGK[k] * ((values[1 + 2 * k] - mean).abs() + (values[2 + 2 * k] - mean).abs());
    }

    let integral = res_kronrod * half_length;
    res_abs *= abs_half_length;
    res_asc *= abs_half_length;

    let mut error = ((res_kronrod - res_gauss) * half_length).abs();
    if res_asc != 0.0 && error != 0.0 {
        error = res_asc * (200.0 * error / res_asc).powf(1.5).min(1.0);
    }
    if res_abs > f64::MIN_POSITIVE / (50.0 * f64::EPSILON) {
        error = error.max(50.0 * f64::EPSILON * res_abs);
    }

    Segment {
        a,
        b,
        integral,
        error,
    }
}

/// Integrates `f` over `[a, b]`.
///
/// `f` receives a batch of abscissae and must return one value per abscissa.
/// A NaN anywhere in the integrand poisons the error estimate, so the pass
/// reports `converged == false` instead of returning a meaningless value.
pub fn quad<F>(f: F, a: f64, b: f64, options: &QuadOptions) -> QuadResult
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    if a == b {
        return QuadResult {
            integral: 0.0,
            error: 0.0,
            tolerance: options.tolerance_for(0.0),
            neval: 0,
            subintervals: 0,
            converged: true,
        };
    }

    let mut segments = vec![gauss_kronrod_15(&f, a, b)];
    let mut neval = RULE_POINTS;

    loop {
        let integral: f64 = segments.iter().map(|s| s.integral).sum();
        let error: f64 = segments.iter().map(|s| s.error).sum();
        let tolerance = options.tolerance_for(integral);

        let converged = error <= tolerance;
        let exhausted = segments.len() >= options.limit;

        let worst = segments
            .iter()
            .enumerate()
            .max_by(|(_, x), (_, y)| x.error.total_cmp(&y.error))
            .map(|(idx, _)| idx);

        let split = match worst {
            Some(idx) if !converged && !exhausted => {
                let s = segments[idx];
                let mid = 0.5 * (s.a + s.b);
                (mid != s.a && mid != s.b).then_some((idx, s, mid))
            }
            _ => None,
        };

        let Some((idx, s, mid)) = split else {
            return QuadResult {
                integral,
                error,
                tolerance,
                neval,
                subintervals: segments.len(),
                converged,
            };
        };

        segments[idx] = gauss_kronrod_15(&f, s.a, mid);
        segments.push(gauss_kronrod_15(&f, mid, s.b));
        neval += 2 * RULE_POINTS;
    }
}

/// Computes `∫_a^b ∫_c^d f(x, y) dy dx` with nested adaptive quadrature.
///
/// Every inner pass uses the same `options`. If any inner pass fails to
/// converge, the combined result is marked unconverged and carries that
/// pass's error and tolerance.
pub fn dblquad<F>(f: F, (a, b): (f64, f64), (c, d): (f64, f64), options: &QuadOptions) -> QuadResult
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    let inner_neval = Cell::new(0usize);
    let inner_failure: Cell<Option<QuadResult>> = Cell::new(None);

    let outer = quad(
        |xs: &[f64]| {
            let inner = inner_integrals(&f, xs, (c, d), options);

            let mut values = Vec::with_capacity(inner.len());
            for result in inner {
                inner_neval.set(inner_neval.get() + result.neval);
                if !result.converged && inner_failure.get().is_none() {
                    inner_failure.set(Some(result));
                }
                values.push(result.integral);
            }
            values
        },
        a,
        b,
        options,
    );

    let neval = outer.neval + inner_neval.get();
    match inner_failure.get() {
        Some(failed) => QuadResult {
            integral: outer.integral,
            error: outer.error.max(failed.error),
            tolerance: failed.tolerance,
            neval,
            subintervals: outer.subintervals,
            converged: false,
        },
        None => QuadResult { neval, ..outer },
    }
}

fn inner_pass<F>(f: &F, x: f64, (c, d): (f64, f64), options: &QuadOptions) -> QuadResult
where
    F: Fn(f64, f64) -> f64,
{
    quad(|ys: &[f64]| ys.iter().map(|&y| f(x, y)).collect(), c, d, options)
}

#[cfg(feature = "parallel")]
fn inner_integrals<F>(f: &F, xs: &[f64], bounds: (f64, f64), options: &QuadOptions) -> Vec<QuadResult>
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    xs.par_iter().map(|&x| inner_pass(f, x, bounds, options)).collect()
}

#[cfg(not(feature = "parallel"))]
fn inner_integrals<F>(f: &F, xs: &[f64], bounds: (f64, f64), options: &QuadOptions) -> Vec<QuadResult>
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    xs.iter().map(|&x| inner_pass(f, x, bounds, options)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn scalar(f: impl Fn(f64) -> f64) -> impl Fn(&[f64]) -> Vec<f64> {
        move |xs| xs.iter().map(|&x| f(x)).collect()
    }

    #[test]
    fn integrates_sine_over_half_period() {
        let result = quad(scalar(f64::sin), 0.0, PI, &QuadOptions::default());
        assert!(result.converged);
        assert!((result.integral - 2.0).abs() < 1e-12);
        assert!(result.error <= result.tolerance);
        assert!(result.neval >= RULE_POINTS);
    }

    #[test]
    fn polynomial_is_exact_on_one_rule() {
        let result = quad(scalar(|x| x * x), 0.0, 1.0, &QuadOptions::default());
        assert!(result.converged);
        assert_eq!(result.subintervals, 1);
        assert!((result.integral - 1.0 / 3.0).abs() < 1e-14);
    }

    #[test]
    fn reversed_bounds_flip_the_sign() {
        let result = quad(scalar(f64::sin), PI, 0.0, &QuadOptions::default());
        assert!(result.converged);
        assert!((result.integral + 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_interval_is_zero() {
        let result = quad(scalar(f64::exp), 1.5, 1.5, &QuadOptions::default());
        assert!(result.converged);
        assert_eq!(result.integral, 0.0);
        assert_eq!(result.neval, 0);
    }

    #[test]
    fn subdivides_near_a_peak() {
        let options = QuadOptions {
            rtol: 1e-10,
            atol: 0.0,
            limit: 200,
        };
        // ∫_{-1}^{1} 1 / (1 + 100 x²) dx = atan(10) / 5
        let result = quad(scalar(|x| 1.0 / (1.0 + 100.0 * x * x)), -1.0, 1.0, &options);
        assert!(result.converged);
        assert!(result.subintervals > 1);
        assert!((result.integral - 10.0_f64.atan() / 5.0).abs() < 1e-9);
    }

    #[test]
    fn zero_tolerance_never_converges() {
        let options = QuadOptions {
            rtol: 0.0,
            atol: 0.0,
            limit: 3,
        };
        let result = quad(scalar(f64::cos), 0.0, 1.0, &options);
        assert!(!result.converged);
        assert_eq!(result.subintervals, 3);
        assert!(matches!(
            result.into_converged(&options),
            Err(GeomError::IntegrationDivergence { limit: 3, .. })
        ));
    }

    #[test]
    fn nan_integrand_is_reported_as_divergence() {
        let options = QuadOptions::default();
        let result = quad(scalar(|x| if x > 0.5 { f64::NAN } else { x }), 0.0, 1.0, &options);
        assert!(!result.converged);
        assert!(result.into_converged(&options).is_err());
    }

    #[test]
    fn double_integral_of_separable_product() {
        // ∫_0^1 ∫_0^2 x·y dy dx = 1/2 · 2 = 1
        let result = dblquad(|x, y| x * y, (0.0, 1.0), (0.0, 2.0), &QuadOptions::default());
        assert!(result.converged);
        assert!((result.integral - 1.0).abs() < 1e-12);
        assert!(result.neval > RULE_POINTS * RULE_POINTS);
    }

    #[test]
    fn double_integral_reports_inner_failure() {
        let options = QuadOptions::default();
        let result = dblquad(
            |x, y| if y > 0.9 && x > 0.5 { f64::NAN } else { 1.0 },
            (0.0, 1.0),
            (0.0, 1.0),
            &options,
        );
        assert!(!result.converged);
    }

    #[test]
    fn validate_rejects_bad_options() {
        assert!(QuadOptions::default().validate().is_ok());
        assert!(QuadOptions { rtol: -1.0, ..QuadOptions::default() }.validate().is_err());
        assert!(QuadOptions { atol: f64::NAN, ..QuadOptions::default() }.validate().is_err());
        assert!(QuadOptions { limit: 0, ..QuadOptions::default() }.validate().is_err());
    }
}
