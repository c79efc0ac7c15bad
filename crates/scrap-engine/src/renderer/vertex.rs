use bytemuck::{Pod, Zeroable};

/// Vertex layout uploaded to GPU vertex buffers.
/// 4 floats = 16 bytes stride: position (x, y) then texture coordinate (u, v).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub u: f32,
    pub v: f32,
}

impl Vertex {
    pub const FLOATS: usize = 4;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self { x, y, u, v }
    }
}

/// Unit quad centred on the origin, as two triangles.
/// Texture coordinates assume bottom-up (flipped) texture storage.
pub const QUAD_VERTICES: [Vertex; 6] = [
    Vertex::new(-0.5, -0.5, 0.0, 0.0),
    Vertex::new(0.5, -0.5, 1.0, 0.0),
    Vertex::new(0.5, 0.5, 1.0, 1.0),
    Vertex::new(-0.5, -0.5, 0.0, 0.0),
    Vertex::new(0.5, 0.5, 1.0, 1.0),
    Vertex::new(-0.5, 0.5, 0.0, 1.0),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_matches_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), Vertex::STRIDE_BYTES);
    }

    #[test]
    fn quad_is_unit_sized() {
        let min_x = QUAD_VERTICES.iter().map(|v| v.x).fold(f32::MAX, f32::min);
        let max_x = QUAD_VERTICES.iter().map(|v| v.x).fold(f32::MIN, f32::max);
        assert_eq!(max_x - min_x, 1.0);
        assert_eq!(bytemuck::cast_slice::<Vertex, u8>(&QUAD_VERTICES).len(), 6 * 16);
    }
}
