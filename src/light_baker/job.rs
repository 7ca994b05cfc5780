//! The per-plane lightmap job and the fogmap job.

use {
    super::{
        sample::AlbedoSource,
        trace::{intersect_bvh, occluded, RAY_BIAS},
    },
    crate::map::{Map, MapPlane},
    glam::Vec3,
    rand::{rngs::SmallRng, Rng, SeedableRng},
    std::sync::atomic::{AtomicBool, Ordering},
};

/// Baker-wide parameters that don't vary per-job.
#[derive(Clone, Debug)]
pub struct BakeConfig {
    pub sun_dir: Vec3,
    pub sun_color: Vec3,
    pub ambient_color: Vec3,
    /// If `true`, the sun is left out of the bake (a runtime shadow map handles it instead).
    pub dynamic_sun_shadows: bool,
    pub ray_count: u32,
    pub ray_recursion: u32,
    pub fog_light_sample_count: u32,
    /// Fogmap grid resolution is `shadowmap_resolution / fogmap_scale` per axis.
    pub fogmap_scale: u32,
    pub shadowmap_resolution: u32,
}

/// One plane's baked lightmap: a `width×height` RGBA8 buffer, row-major.
pub struct PlaneBakeResult {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// The fogmap's baked single-scattering volume: a `w×h×d` RGBA8 buffer.
pub struct FogmapResult {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub pixels: Vec<u8>,
}

fn cosine_hemisphere(rng: &mut SmallRng, normal: Vec3) -> Vec3 {
    let u1: f32 = rng.gen();
    let u2: f32 = rng.gen();
    let r = u1.sqrt();
    let theta = std::f32::consts::TAU * u2;
    let x = r * theta.cos();
    let y = r * theta.sin();
    let z = (1.0 - u1).max(0.0).sqrt();

    let up = if normal.z.abs() < 0.999 { Vec3::Z } else { Vec3::X };
    let tangent = up.cross(normal).normalize();
    let bitangent = normal.cross(tangent);

    (tangent * x + bitangent * y + normal * z).normalize()
}

/// Direct lighting at `position` with normal `n`: a sun shadow ray plus ambient if the sun is
/// missed or not baked at all.
fn direct_lighting(map: &Map, config: &BakeConfig, position: Vec3, normal: Vec3) -> Vec3 {
    if config.dynamic_sun_shadows {
        return config.ambient_color;
    }

    let n_dot_l = normal.dot(-config.sun_dir).max(0.0);
    if n_dot_l <= 0.0 {
        return config.ambient_color;
    }

    let origin = position + normal * RAY_BIAS;
    if occluded(map, origin, -config.sun_dir, f32::INFINITY) {
        config.ambient_color
    } else {
        config.sun_color * n_dot_l + config.ambient_color
    }
}

/// One path sample: shoots a cosine-weighted ray, recurses up to `depth_remaining` bounces,
/// and returns the radiance it gathers.
fn trace_path(
    map: &Map,
    albedo: &dyn AlbedoSource,
    config: &BakeConfig,
    origin: Vec3,
    dir: Vec3,
    depth_remaining: u32,
    rng: &mut SmallRng,
) -> Vec3 {
    let Some(hit) = intersect_bvh(map, origin, dir) else {
        return config.ambient_color;
    };

    let plane = &map.planes[map.polys[hit.poly as usize].plane as usize];
    let surface_albedo = albedo.sample(&plane.texture, hit.uv);
    let direct = direct_lighting(map, config, hit.position, hit.normal);

    let indirect = if depth_remaining > 0 {
        let bounce_dir = cosine_hemisphere(rng, hit.normal);
        let bounce_origin = hit.position + hit.normal * RAY_BIAS;
        trace_path(map, albedo, config, bounce_origin, bounce_dir, depth_remaining - 1, rng)
    } else {
        Vec3::ZERO
    };

    surface_albedo * (direct + indirect)
}

fn dither(rng: &mut SmallRng) -> f32 {
    (rng.gen::<f32>() - 0.5) / 255.0
}

fn pack_rgba8(color: Vec3, rng: &mut SmallRng) -> [u8; 4] {
    let d = dither(rng);
    let channel = |c: f32| ((c + d).clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(color.x), channel(color.y), channel(color.z), 255]
}

/// Bakes one plane's lightmap; `plane_index` must be in range of `map.planes`.
///
/// Checks `cancel` before every texel so a cancelled bake returns promptly without finishing the
/// buffer (the caller discards the result either way).
pub fn bake_plane(
    config: &BakeConfig,
    map: &Map,
    albedo: &dyn AlbedoSource,
    plane_index: usize,
    cancel: &AtomicBool,
) -> Option<PlaneBakeResult> {
    let plane: &MapPlane = &map.planes[plane_index];
    let basis = &plane.lightmap;
    let (w, h) = (basis.tex_w, basis.tex_h);
    let mut pixels = vec![0u8; (w * h * 4) as usize];
    let mut rng = SmallRng::seed_from_u64(plane_index as u64 ^ 0x9e37_79b9_7f4a_7c15);

    let normal = plane.plane.normal();

    for v in 0..h {
        for u in 0..w {
            if cancel.load(Ordering::Acquire) {
                return None;
            }

            let position = basis.origin
                + basis.s * (u as f32 + 0.5) * basis.scale_x
                + basis.t * (v as f32 + 0.5) * basis.scale_y;
            let origin = position + normal * RAY_BIAS;

            let mut accum = direct_lighting(map, config, position, normal);

            for _ in 0..config.ray_count {
                let dir = cosine_hemisphere(&mut rng, normal);
                accum += trace_path(
                    map,
                    albedo,
                    config,
                    origin,
                    dir,
                    config.ray_recursion.saturating_sub(1),
                    &mut rng,
                );
            }

            let divisor = 1.0 + config.ray_count as f32;
            let color = accum / divisor;
            let rgba = pack_rgba8(color, &mut rng);
            let pixel = ((v * w + u) * 4) as usize;
            pixels[pixel..pixel + 4].copy_from_slice(&rgba);
        }
    }

    Some(PlaneBakeResult { width: w, height: h, pixels })
}

/// Single-scattering fog integration over the map's AABB at `fogmap_scale`-reduced resolution.
pub fn bake_fogmap(config: &BakeConfig, map: &Map, cancel: &AtomicBool) -> Option<FogmapResult> {
    let res = (config.shadowmap_resolution / config.fogmap_scale.max(1)).max(1);
    let aabb = map.aabb();
    let extent = aabb.extent();
    let mut pixels = vec![0u8; (res * res * res * 4) as usize];
    let mut rng = SmallRng::seed_from_u64(fog_map_seed());

    for z in 0..res {
        for y in 0..res {
            for x in 0..res {
                if cancel.load(Ordering::Acquire) {
                    return None;
                }

                let cell_origin = Vec3::new(x as f32, y as f32, z as f32) / res as f32;

                let mut accum = Vec3::ZERO;
                for _ in 0..config.fog_light_sample_count.max(1) {
                    let jitter = uniform_sphere(&mut rng).abs() * 0.5 / res as f32;
                    let position = aabb.min() + (cell_origin + jitter) * extent;
                    if !occluded(map, position, -config.sun_dir, f32::INFINITY) {
                        accum += config.sun_color;
                    }
                }
                let color = accum / config.fog_light_sample_count.max(1) as f32;

                let rgba = pack_rgba8(color, &mut rng);
                let pixel = (((z * res + y) * res + x) * 4) as usize;
                pixels[pixel..pixel + 4].copy_from_slice(&rgba);
            }
        }
    }

    Some(FogmapResult { width: res, height: res, depth: res, pixels })
}

fn uniform_sphere(rng: &mut SmallRng) -> Vec3 {
    let z = rng.gen_range(-1.0f32..=1.0);
    let theta = rng.gen_range(0.0f32..std::f32::consts::TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * theta.cos(), r * theta.sin(), z)
}

fn fog_map_seed() -> u64 {
    0x666f_676d_6170u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{light_baker::sample::ConstantAlbedo, map::build::{build_map, BrushDef, PlaneDef}, math::Plane};

    fn axis_plane(normal: Vec3, distance: f32, texture: &str) -> PlaneDef {
        PlaneDef {
            plane: Plane::new(normal, distance),
            texture: texture.into(),
            s: Vec3::X,
            s_offset: 0.0,
            t: Vec3::Y,
            t_offset: 0.0,
            tex_scale_x: 1.0,
            tex_scale_y: 1.0,
            tex_w: 16,
            tex_h: 16,
        }
    }

    fn box_map() -> Map {
        let brush = BrushDef {
            planes: vec![
                axis_plane(Vec3::new(0.0, 0.0, 1.0), 32.0, "floor"),
                axis_plane(Vec3::new(0.0, 0.0, -1.0), 32.0, "ceiling"),
                axis_plane(Vec3::new(1.0, 0.0, 0.0), 32.0, "wall"),
                axis_plane(Vec3::new(-1.0, 0.0, 0.0), 32.0, "wall"),
                axis_plane(Vec3::new(0.0, 1.0, 0.0), 32.0, "wall"),
                axis_plane(Vec3::new(0.0, -1.0, 0.0), 32.0, "wall"),
            ],
        };
        build_map(&[brush], vec![], vec![]).expect("box builds")
    }

    fn config() -> BakeConfig {
        BakeConfig {
            sun_dir: Vec3::new(0.0, 0.0, -1.0),
            sun_color: Vec3::splat(1.0),
            ambient_color: Vec3::splat(0.05),
            dynamic_sun_shadows: false,
            ray_count: 4,
            ray_recursion: 2,
            fog_light_sample_count: 2,
            fogmap_scale: 8,
            shadowmap_resolution: 16,
        }
    }

    #[test]
    fn floor_plane_bakes_to_a_nonzero_lightmap() {
        let map = box_map();
        let albedo = ConstantAlbedo(Vec3::splat(0.8));
        let cancel = AtomicBool::new(false);

        let floor_plane = map
            .planes
            .iter()
            .position(|p| p.plane.normal().z > 0.5)
            .expect("floor plane exists");

        let result = bake_plane(&config(), &map, &albedo, floor_plane, &cancel).expect("not cancelled");
        assert_eq!(result.pixels.len(), (result.width * result.height * 4) as usize);
        assert!(result.pixels.iter().any(|&b| b > 0));
    }

    #[test]
    fn cancelling_mid_bake_returns_none() {
        let map = box_map();
        let albedo = ConstantAlbedo(Vec3::splat(0.8));
        let cancel = AtomicBool::new(true);

        let result = bake_plane(&config(), &map, &albedo, 0, &cancel);
        assert!(result.is_none());
    }

    #[test]
    fn fogmap_covers_the_requested_grid() {
        let map = box_map();
        let cancel = AtomicBool::new(false);
        let result = bake_fogmap(&config(), &map, &cancel).expect("not cancelled");
        assert_eq!(result.width, 2);
        assert_eq!(result.pixels.len(), (result.width * result.height * result.depth * 4) as usize);
    }
}
