//! The CPU-side pixel source the baker reads albedo from.
//!
//! [`crate::rhi::Device`] only exposes GPU-resident textures (upload-only, no readback), so the
//! baker needs its own source of decoded pixels keyed by the same texture name a [`MapPlane`]
//! carries. A real asset pipeline would hand this the same decoded images it uploads to the GPU;
//! tests use [`ConstantAlbedo`].
//!
//! [`MapPlane`]: crate::map::MapPlane

use glam::Vec2;

/// Anything that can answer "what color is this texture at this (wrapped) UV".
pub trait AlbedoSource: Send + Sync {
    fn sample(&self, texture: &str, uv: Vec2) -> glam::Vec3;
}

/// A decoded RGB image sampled with nearest-neighbour + UV wrap.
#[derive(Clone, Debug)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    /// Linear-space RGB, row-major.
    pub pixels: Vec<glam::Vec3>,
}

impl Image {
    pub fn solid(width: u32, height: u32, color: glam::Vec3) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width * height) as usize],
        }
    }

    fn sample(&self, uv: Vec2) -> glam::Vec3 {
        let wrap = |v: f32| v - v.floor();
        let x = (wrap(uv.x) * self.width as f32) as u32 % self.width.max(1);
        let y = (wrap(uv.y) * self.height as f32) as u32 % self.height.max(1);
        self.pixels[(y * self.width + x) as usize]
    }
}

/// A named set of decoded images, used as the baker's albedo source over a real map.
#[derive(Default)]
pub struct ImageLibrary {
    images: std::collections::HashMap<String, Image>,
}

impl ImageLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, image: Image) {
        self.images.insert(name.into(), image);
    }
}

impl AlbedoSource for ImageLibrary {
    fn sample(&self, texture: &str, uv: Vec2) -> glam::Vec3 {
        self.images
            .get(texture)
            .map(|image| image.sample(uv))
            .unwrap_or(glam::Vec3::splat(1.0))
    }
}

/// Every texture samples to the same flat color; used by tests and by headless bake smoke-runs.
pub struct ConstantAlbedo(pub glam::Vec3);

impl AlbedoSource for ConstantAlbedo {
    fn sample(&self, _texture: &str, _uv: Vec2) -> glam::Vec3 {
        self.0
    }
}
