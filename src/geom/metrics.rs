//! Opt-in timing hooks for the geometry engine.
//!
//! Timing is only collected when the `engine_metrics` feature is enabled and
//! the target is not WASM (`std::time::Instant` is unavailable there). In every
//! other build the calls compile to plain closure invocations.
//!
//! # Usage
//!
//! ```ignore
//! use mobius_engine::geom::{GeomMetrics, TimingBucket};
//!
//! let mut metrics = GeomMetrics::default();
//! metrics.begin();
//! let area = metrics.time(TimingBucket::SurfaceArea, || integrate_surface_area(&surface, &options));
//! if let Some(report) = metrics.end() {
//!     println!("quadrature: {} ns", report.surface_area_ns);
//! }
//! ```

/// Categories for timing the engine's computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Point-grid sampling and triangulation.
    PointGrid,
    /// Adaptive surface-area quadrature.
    SurfaceArea,
    /// Boundary sampling and polyline length summation.
    EdgeLength,
}

/// Cumulative timings in nanoseconds per bucket.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GeomTimingReport {
    pub point_grid_ns: u64,
    pub surface_area_ns: u64,
    pub edge_length_ns: u64,
}

impl GeomTimingReport {
    /// Returns the total time across all buckets in nanoseconds.
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.point_grid_ns
            .saturating_add(self.surface_area_ns)
            .saturating_add(self.edge_length_ns)
    }

    /// Returns the total time in milliseconds (for display purposes).
    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }
}

/// Accumulator for timing engine operations.
///
/// When the `engine_metrics` feature is disabled (or on WASM), all methods
/// are no-ops and [`end`](Self::end) returns `None`.
#[derive(Debug, Default)]
pub struct GeomMetrics {
    #[cfg(all(feature = "engine_metrics", not(target_arch = "wasm32")))]
    report: GeomTimingReport,
}

impl GeomMetrics {
    /// Resets all timing counters to zero.
    pub fn begin(&mut self) {
        #[cfg(all(feature = "engine_metrics", not(target_arch = "wasm32")))]
        {
            self.report = GeomTimingReport::default();
        }
    }

    /// Returns the accumulated timing report, or `None` if metrics are disabled.
    #[must_use]
    pub fn end(&self) -> Option<GeomTimingReport> {
        #[cfg(all(feature = "engine_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "engine_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Times the execution of `f` and accumulates the elapsed time in `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "engine_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            let slot = match bucket {
                TimingBucket::PointGrid => &mut self.report.point_grid_ns,
                TimingBucket::SurfaceArea => &mut self.report.surface_area_ns,
                TimingBucket::EdgeLength => &mut self.report.edge_length_ns,
            };
            *slot = slot.saturating_add(nanos);
            result
        }

        #[cfg(not(all(feature = "engine_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }
}
