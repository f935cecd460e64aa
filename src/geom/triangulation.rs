/// Triangle indices for a `u_count × v_count` vertex grid stored row-major
/// with `u` varying fastest. Each grid cell becomes two triangles.
#[must_use]
pub fn triangulate_grid(u_count: usize, v_count: usize) -> Vec<u32> {
    if u_count < 2 || v_count < 2 {
        return Vec::new();
    }

    let quad_u = u_count - 1;
    let quad_v = v_count - 1;
    let mut indices = Vec::with_capacity(quad_u * quad_v * 6);

    let stride = u_count;
    for v in 0..quad_v {
        for u in 0..quad_u {
            let i0 = (v * stride + u) as u32;
            let i1 = (v * stride + u + 1) as u32;
            let i2 = ((v + 1) * stride + u) as u32;
            let i3 = ((v + 1) * stride + u + 1) as u32;

            indices.extend_from_slice(&[i0, i1, i2]);
            indices.extend_from_slice(&[i2, i1, i3]);
        }
    }

    indices
}
