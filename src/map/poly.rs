use crate::{mem::Handle, rhi::Texture};
use glam::Vec3;

/// One plane's triangle-fan triangulation.
///
/// `first_index`/`index_count` and `first_vertex`/`vertex_count` slice into the map's flattened
/// `indices`/`positions` (and parallel `uvs`/`lightmap_uvs`/`normals`) arrays.
#[derive(Clone, Copy, Debug)]
pub struct Poly {
    pub plane: u32,
    pub brush: u32,
    pub first_index: u32,
    pub index_count: u32,
    pub first_vertex: u32,
    pub vertex_count: u32,
    pub normal: Vec3,
    pub texture: Handle<Texture>,
    pub lightmap: Handle<Texture>,
}
