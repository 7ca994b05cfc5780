use crate::math::Plane;
use glam::Vec3;

/// Per-plane lightmap rasterisation basis: origin plus an `(S, T)` tangent frame and the texel
/// scale/size that minimises lightmap area among the triangle-fan's candidate edge orientations
///.
#[derive(Clone, Copy, Debug)]
pub struct LightmapBasis {
    pub origin: Vec3,
    pub s: Vec3,
    pub t: Vec3,
    pub scale_x: f32,
    pub scale_y: f32,
    pub tex_w: u32,
    pub tex_h: u32,
}

impl LightmapBasis {
    /// Lightmap-space UV for a world position:
    pub fn uv(&self, position: Vec3) -> glam::Vec2 {
        let u = (position - self.origin).dot(self.s) / self.scale_x / self.tex_w as f32;
        let v = (position - self.origin).dot(self.t) / self.scale_y / self.tex_h as f32;
        glam::vec2(u, v)
    }
}

/// A map plane: its equation, texture projection, and lightmap basis.
#[derive(Clone, Debug)]
pub struct MapPlane {
    pub plane: Plane,
    pub texture: String,
    /// Texture-space S projection vector; `w` carries the offset.
    pub s: Vec3,
    pub s_offset: f32,
    /// Texture-space T projection vector; `w` carries the offset.
    pub t: Vec3,
    pub t_offset: f32,
    /// Texture scale factors parsed from the `.map` plane line (distinct from the lightmap
    /// basis's own `scale_x`/`scale_y`, which size the lightmap texel grid rather than the
    /// albedo texture's UVs).
    pub tex_scale_x: f32,
    pub tex_scale_y: f32,
    pub tex_w: u32,
    pub tex_h: u32,
    pub lightmap: LightmapBasis,
}

impl MapPlane {
    /// Texture-space UV for a world position:
    pub fn texture_uv(&self, position: Vec3) -> glam::Vec2 {
        let u = (position.dot(self.s) + self.s_offset) / self.tex_w as f32 / self.tex_scale_x;
        let v = (position.dot(self.t) + self.t_offset) / self.tex_h as f32 / self.tex_scale_y;
        glam::vec2(u, v)
    }
}
