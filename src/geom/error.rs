/// Errors reported by the Möbius geometry engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeomError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error(
        "quadrature did not converge within {limit} subintervals \
         (estimate {estimate}, error {error:e}, tolerance {tolerance:e})"
    )]
    IntegrationDivergence {
        estimate: f64,
        error: f64,
        tolerance: f64,
        limit: usize,
    },
}

impl GeomError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type GeomResult<T> = Result<T, GeomError>;
