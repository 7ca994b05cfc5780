//! Sun-shadow view/projection construction.
//!
//! Reverse-Z (`depth func = greater, clear to 0`) is achieved the usual way: swap the near and
//! far planes passed into the standard orthographic projection, so a surface at the near plane
//! maps to depth `1` and the far plane maps to depth `0`.

use crate::math::{Mat4, Vec3};

/// World-space distance the shadow camera sits behind the tracked camera along `-sun_dir`.
pub const SHADOW_CAMERA_OFFSET: f32 = 256.0;
/// Half-extent of the orthographic frustum's near plane (spec: "orthographic 2048x2048").
pub const SHADOW_ORTHO_EXTENT: f32 = 2048.0;
pub const SHADOW_FAR: f32 = 512.0;

/// `look_from(camera - 256*sun_dir) toward(-sun_dir)`.
pub fn sun_shadow_view(camera: Vec3, sun_dir: Vec3) -> Mat4 {
    let sun_dir = sun_dir.normalize_or_zero();
    let eye = camera - SHADOW_CAMERA_OFFSET * sun_dir;
    let target = eye - sun_dir;
    let up = if sun_dir.abs().dot(Vec3::Y) > 0.99 { Vec3::Z } else { Vec3::Y };
    Mat4::look_at_rh(eye, target, up)
}

/// Orthographic `2048x2048`, far `512`, reverse-Z.
pub fn sun_shadow_projection() -> Mat4 {
    let half = SHADOW_ORTHO_EXTENT * 0.5;
    Mat4::orthographic_rh(-half, half, -half, half, SHADOW_FAR, 0.0)
}
