//! Optional path-visualisation recording.
//!
//! Kept out of the hot per-texel loop in [`super::job`]: recording every ray of every bake would
//! be both slow and mostly useless, so this is a standalone, non-recursive re-trace of a single
//! path from a chosen texel, used by tools that want to draw the bounce chain.

use {
    super::{
        sample::AlbedoSource,
        trace::{intersect_bvh, occluded, RAY_BIAS},
    },
    crate::{light_baker::job::BakeConfig, map::Map},
    glam::Vec3,
    rand::{rngs::SmallRng, Rng, SeedableRng},
};

/// One bounce of a recorded path.
#[derive(Clone, Copy, Debug)]
pub struct PathVertexRecord {
    pub position: Vec3,
    pub normal: Vec3,
    pub albedo: Vec3,
    /// `false` if the sun shadow ray fired at this vertex was occluded.
    pub sun_visible: bool,
    pub contribution: Vec3,
}

/// A full recorded path from its source texel through every traced bounce.
#[derive(Clone, Debug)]
pub struct PathDebugRecord {
    pub plane_index: usize,
    pub texel: (u32, u32),
    pub vertices: Vec<PathVertexRecord>,
}

fn cosine_hemisphere(rng: &mut SmallRng, normal: Vec3) -> Vec3 {
    let u1: f32 = rng.gen();
    let u2: f32 = rng.gen();
    let r = u1.sqrt();
    let theta = std::f32::consts::TAU * u2;
    let (x, y) = (r * theta.cos(), r * theta.sin());
    let z = (1.0 - u1).max(0.0).sqrt();

    let up = if normal.z.abs() < 0.999 { Vec3::Z } else { Vec3::X };
    let tangent = up.cross(normal).normalize();
    let bitangent = normal.cross(tangent);

    (tangent * x + bitangent * y + normal * z).normalize()
}

/// Re-traces a single path starting at texel `(u, v)` of `plane_index`, recording every vertex.
///
/// This is a diagnostic aid, not the bake kernel; it shares the same sampling rules as
/// [`super::job::bake_plane`] so a recorded path matches what that texel actually accumulated,
/// but it is not seeded identically and so won't reproduce the exact same bounce directions.
pub fn trace_debug_path(
    config: &BakeConfig,
    map: &Map,
    albedo: &dyn AlbedoSource,
    plane_index: usize,
    texel: (u32, u32),
    seed: u64,
) -> PathDebugRecord {
    let plane = &map.planes[plane_index];
    let basis = &plane.lightmap;
    let normal = plane.plane.normal();

    let position = basis.origin
        + basis.s * (texel.0 as f32 + 0.5) * basis.scale_x
        + basis.t * (texel.1 as f32 + 0.5) * basis.scale_y;

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut vertices = Vec::with_capacity(config.ray_recursion as usize + 1);

    let sun_visible = !occluded(map, position + normal * RAY_BIAS, -config.sun_dir, f32::INFINITY);
    vertices.push(PathVertexRecord {
        position,
        normal,
        albedo: Vec3::splat(1.0),
        sun_visible,
        contribution: if sun_visible {
            config.sun_color * normal.dot(-config.sun_dir).max(0.0) + config.ambient_color
        } else {
            config.ambient_color
        },
    });

    let mut current_position = position;
    let mut current_normal = normal;
    for _ in 0..config.ray_recursion {
        let dir = cosine_hemisphere(&mut rng, current_normal);
        let origin = current_position + current_normal * RAY_BIAS;
        let Some(hit) = intersect_bvh(map, origin, dir) else {
            break;
        };

        let hit_plane = &map.planes[map.polys[hit.poly as usize].plane as usize];
        let hit_albedo = albedo.sample(&hit_plane.texture, hit.uv);
        let sun_visible = !occluded(map, hit.position + hit.normal * RAY_BIAS, -config.sun_dir, f32::INFINITY);
        let direct = if sun_visible {
            config.sun_color * hit.normal.dot(-config.sun_dir).max(0.0) + config.ambient_color
        } else {
            config.ambient_color
        };

        vertices.push(PathVertexRecord {
            position: hit.position,
            normal: hit.normal,
            albedo: hit_albedo,
            sun_visible,
            contribution: hit_albedo * direct,
        });

        current_position = hit.position;
        current_normal = hit.normal;
    }

    PathDebugRecord { plane_index, texel, vertices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        light_baker::sample::ConstantAlbedo,
        map::build::{build_map, BrushDef, PlaneDef},
        math::Plane,
    };

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
            tex_w: 8,
            tex_h: 8,
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

    #[test]
    fn recorded_path_has_a_vertex_per_bounce_at_most() {
        let map = box_map();
        let albedo = ConstantAlbedo(Vec3::splat(0.8));
        let config = BakeConfig {
            sun_dir: Vec3::new(0.0, 0.0, -1.0),
            sun_color: Vec3::splat(1.0),
            ambient_color: Vec3::splat(0.05),
            dynamic_sun_shadows: false,
            ray_count: 1,
            ray_recursion: 3,
            fog_light_sample_count: 1,
            fogmap_scale: 8,
            shadowmap_resolution: 16,
        };

        let floor_plane = map
            .planes
            .iter()
            .position(|p| p.plane.normal().z > 0.5)
            .expect("floor plane exists");

        let record = trace_debug_path(&config, &map, &albedo, floor_plane, (2, 2), 42);
        assert!(record.vertices.len() >= 1);
        assert!(record.vertices.len() <= config.ray_recursion as usize + 1);
    }
}
