//! Regular parameter grids and the point grids sampled over them.
//!
//! Indexing convention (same as numpy's `meshgrid(u, v)`): row `i` follows
//! `v[i]`, column `j` follows `u[j]`, and all coordinate buffers are stored
//! row-major, so point `(i, j)` lives at offset `i * cols + j`.

use serde::Serialize;

use super::core::{BBox, Point3};
use super::mesh::GeomMesh;
use super::surface::Surface;
use super::triangulation::triangulate_grid;

/// `count` evenly spaced values over `[start, end]`, both ends included.
///
/// The last value is set to `end` exactly so that closed parameter ranges hit
/// their upper bound without rounding drift.
#[must_use]
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            values[count - 1] = end;
            values
        }
    }
}

/// The two 1D parameter sequences a point grid is sampled on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterGrid {
    pub u: Vec<f64>,
    pub v: Vec<f64>,
}

impl ParameterGrid {
    /// Samples `u_count` values over the surface's u-domain and `v_count`
    /// values over its v-domain.
    #[must_use]
    pub fn over_domain(surface: &impl Surface, u_count: usize, v_count: usize) -> Self {
        let (u0, u1) = surface.domain_u();
        let (v0, v1) = surface.domain_v();
        Self {
            u: linspace(u0, u1, u_count),
            v: linspace(v0, v1, v_count),
        }
    }
}

/// Surface positions over a [`ParameterGrid`], split into row-major `x`, `y`
/// and `z` buffers that plotting front-ends consume directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointGrid {
    pub rows: usize,
    pub cols: usize,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl PointGrid {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point at row `i` (v index) and column `j` (u index).
    #[must_use]
    pub fn point(&self, i: usize, j: usize) -> Option<Point3> {
        if i >= self.rows || j >= self.cols {
            return None;
        }
        let idx = i * self.cols + j;
        Some(Point3::new(self.x[idx], self.y[idx], self.z[idx]))
    }

    pub fn points(&self) -> impl Iterator<Item = Point3> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((&x, &y), &z)| Point3::new(x, y, z))
    }

    #[must_use]
    pub fn bounds(&self) -> Option<BBox> {
        BBox::from_points(self.points())
    }

    /// Triangulates the grid into an indexed mesh. Vertex order follows the
    /// grid's row-major order and each vertex carries its `(u, v)` parameters.
    ///
    /// The grid is not wrapped across the `u` seam: because of the half-twist,
    /// column `cols - 1` meets column `0` with rows reversed.
    #[must_use]
    pub fn to_mesh(&self, params: &ParameterGrid) -> GeomMesh {
        let positions: Vec<[f64; 3]> = self.points().map(Point3::to_array).collect();
        let uvs = params
            .v
            .iter()
            .flat_map(|&v| params.u.iter().map(move |&u| [u, v]))
            .collect();
        let indices = triangulate_grid(self.cols, self.rows);
        GeomMesh::with_uvs(positions, indices, uvs)
    }
}

/// Evaluates `surface` at every `(u[j], v[i])` pair of `params`.
#[must_use]
pub fn sample_point_grid(surface: &impl Surface, params: &ParameterGrid) -> PointGrid {
    let rows = params.v.len();
    let cols = params.u.len();

    let mut x = Vec::with_capacity(rows * cols);
    let mut y = Vec::with_capacity(rows * cols);
    let mut z = Vec::with_capacity(rows * cols);

    for &v in &params.v {
        for &u in &params.u {
            let p = surface.point_at(u, v);
            x.push(p.x);
            y.push(p.y);
            z.push(p.z);
        }
    }

    PointGrid { rows, cols, x, y, z }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_hits_both_ends() {
        let values = linspace(0.0, std::f64::consts::TAU, 7);
        assert_eq!(values.len(), 7);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[6], std::f64::consts::TAU);
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.5, 1.0, 1), vec![0.5]);
        assert_eq!(linspace(-0.15, 0.15, 2), vec![-0.15, 0.15]);
    }

    #[test]
    fn out_of_range_point_is_none() {
        let grid = PointGrid {
            rows: 1,
            cols: 2,
            x: vec![0.0, 1.0],
            y: vec![0.0, 0.0],
            z: vec![0.0, 0.0],
        };
        assert_eq!(grid.point(0, 1), Some(Point3::new(1.0, 0.0, 0.0)));
        assert_eq!(grid.point(1, 0), None);
        assert_eq!(grid.point(0, 2), None);
    }
}
