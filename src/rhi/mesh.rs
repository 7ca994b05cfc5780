#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Topology {
    TriangleList,
    TriangleStrip,
    LineList,
    LineStrip,
    PointList,
}

/// The three vertex layouts the engine's passes draw with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VertexFormat {
    /// Bare position (v3); used for the depth-only sun-shadow pass.
    Position,
    /// `{ pos: v3, tex: v2, rgba: u32, normal: v3 }`; the immediate-mode batcher's format.
    Immediate,
    /// `{ pos: v3, uv: v2, lightmap_uv: v2, normal: v3 }`; the map pass's format.
    Brush,
}

impl VertexFormat {
    pub const fn stride(self) -> usize {
        match self {
            Self::Position => 12,
            Self::Immediate => 12 + 8 + 4 + 12,
            Self::Brush => 12 + 8 + 8 + 12,
        }
    }
}

pub struct MeshUpload {
    pub format: VertexFormat,
    pub topology: Topology,
    pub vertices: Vec<u8>,
    pub indices: Vec<u32>,
}

impl MeshUpload {
    pub fn vertex_count(&self) -> usize {
        if self.format.stride() == 0 {
            0
        } else {
            self.vertices.len() / self.format.stride()
        }
    }
}
