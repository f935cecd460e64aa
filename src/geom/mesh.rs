use serde::Serialize;

/// Indexed triangle mesh handed to renderers.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GeomMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
    /// Surface parameters `(u, v)` of each vertex.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uvs: Option<Vec<[f64; 2]>>,
}

impl GeomMesh {
    /// Create a new mesh with positions and indices only.
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            uvs: None,
        }
    }

    #[must_use]
    pub fn with_uvs(positions: Vec<[f64; 3]>, indices: Vec<u32>, uvs: Vec<[f64; 2]>) -> Self {
        Self {
            positions,
            indices,
            uvs: Some(uvs),
        }
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if any vertex position contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite() || !p[2].is_finite())
    }

    /// Returns true if all vertex indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len() as u32;
        self.indices.iter().all(|&i| i < n)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.indices.len() % 3 != 0 {
            return Err("mesh indices are not a triangle list (len % 3 != 0)".to_string());
        }
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        if self.uvs.as_ref().is_some_and(|uvs| uvs.len() != self.positions.len()) {
            return Err("mesh uv buffer does not match vertex count".to_string());
        }
        Ok(())
    }

    /// Returns the position buffer as a flat `Vec`: `[x0, y0, z0, x1, y1, z1, ...]`.
    #[must_use]
    pub fn positions_flat(&self) -> Vec<f64> {
        self.positions.iter().flatten().copied().collect()
    }
}
