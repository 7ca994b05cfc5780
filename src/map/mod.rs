//! The map model: brushes, planes, polys, lights, and the BVH that spatially indexes them.
//!
//! Parsing the Quake-style `.map` text format is an external collaborator; this
//! module owns what happens *after* parsing — the construction pipeline in [`build`] and the
//! flattened, render- and bake-ready representation in [`Map`].

mod brush;
mod bvh;
pub mod build;
mod entity;
mod light;
mod plane;
mod poly;

pub use self::{
    brush::Brush,
    bvh::BvhNode,
    entity::Entity,
    light::PointLight,
    plane::{LightmapBasis, MapPlane},
    poly::Poly,
};

use crate::{math::Aabb, mem::Handle, rhi::Texture};

/// The texel size lightmap basis dimensions are rounded up to.
pub const LIGHTMAP_SCALE: u32 = 16;

/// The fully built, render- and bake-ready map.
///
/// All cross-references inside a `Map` are indices or handles, never back-pointers:
/// polys point at planes by index, planes point at textures by [`Handle`], the BVH points at
/// `brush_edges` entries by range.
#[derive(Default)]
pub struct Map {
    pub entities: Vec<Entity>,
    pub brushes: Vec<Brush>,
    pub planes: Vec<MapPlane>,
    pub polys: Vec<Poly>,
    pub lights: Vec<PointLight>,
    pub nodes: Vec<BvhNode>,
    /// Permutation recording each entity's original brush index after brushes were reordered to
    /// match BVH leaf order.
    pub brush_edges: Vec<u32>,

    pub positions: Vec<glam::Vec3>,
    pub uvs: Vec<glam::Vec2>,
    pub lightmap_uvs: Vec<glam::Vec2>,
    pub normals: Vec<glam::Vec3>,
    pub indices: Vec<u32>,

    pub fogmap: Handle<Texture>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every poly's index range must lie within the flattened index buffer.
    pub fn check_invariants(&self) -> bool {
        let total_indices = self.indices.len() as u32;
        let total_vertices = self.positions.len() as u32;

        let polys_ok = self.polys.iter().all(|poly| {
            poly.first_index + poly.index_count <= total_indices
                && poly.first_vertex + poly.vertex_count <= total_vertices
        });

        let plane_poly_counts: u32 = self.brushes.iter().map(|b| b.plane_count).sum();
        let planes_ok = plane_poly_counts == self.planes.len() as u32
            || self.brushes.is_empty() && self.planes.is_empty();

        polys_ok && planes_ok
    }

    pub fn aabb(&self) -> Aabb {
        self.nodes.first().map(|n| n.bounds).unwrap_or_else(Aabb::empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_satisfies_invariants() {
        assert!(Map::new().check_invariants());
    }
}
