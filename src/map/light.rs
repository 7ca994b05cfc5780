use glam::Vec3;

/// A point light: `origin`, and `color` pre-multiplied by `brightness` at bake time via
/// [`PointLight::radiance`].
#[derive(Clone, Copy, Debug)]
pub struct PointLight {
    pub origin: Vec3,
    pub color: Vec3,
    pub brightness: f32,
}

impl PointLight {
    pub fn radiance(&self) -> Vec3 {
        self.color * self.brightness
    }
}
