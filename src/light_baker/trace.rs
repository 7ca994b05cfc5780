//! Ray/map intersection used by the path tracer: a BVH traversal down to brush leaves, then
//! Möller–Trumbore against each candidate poly's triangle fan.

use crate::map::Map;
use glam::{Vec2, Vec3};

/// A small bias added along the hit normal before tracing a continuation ray, to avoid the new
/// ray immediately re-hitting the surface it left due to floating point error.
pub const RAY_BIAS: f32 = 1e-3;

#[derive(Clone, Copy, Debug)]
pub struct Hit {
    pub t: f32,
    pub poly: u32,
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

fn intersect_triangle(origin: Vec3, dir: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<(f32, f32, f32)> {
    const EPS: f32 = 1e-7;

    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let p = dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < EPS {
        return None;
    }

    let inv_det = 1.0 / det;
    let t_vec = origin - v0;
    let u = t_vec.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = t_vec.cross(e1);
    let v = dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(q) * inv_det;
    if t <= EPS {
        return None;
    }

    Some((t, u, v))
}

fn intersect_poly(map: &Map, poly_index: u32, origin: Vec3, dir: Vec3) -> Option<Hit> {
    let poly = &map.polys[poly_index as usize];
    let indices = &map.indices[poly.first_index as usize..(poly.first_index + poly.index_count) as usize];

    let mut best: Option<Hit> = None;
    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let (v0, v1, v2) = (map.positions[i0], map.positions[i1], map.positions[i2]);

        if let Some((t, u, v)) = intersect_triangle(origin, dir, v0, v1, v2) {
            if best.map_or(true, |h| t < h.t) {
                let w = 1.0 - u - v;
                let uv = map.uvs[i0] * w + map.uvs[i1] * u + map.uvs[i2] * v;
                best = Some(Hit {
                    t,
                    poly: poly_index,
                    position: origin + dir * t,
                    normal: poly.normal,
                    uv,
                });
            }
        }
    }
    best
}

/// Traverses the map's BVH, returning the closest hit (if any) along `origin + t*dir`, `t > 0`.
pub fn intersect_bvh(map: &Map, origin: Vec3, dir: Vec3) -> Option<Hit> {
    if map.nodes.is_empty() {
        return None;
    }

    let inv_dir = Vec3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z);
    let mut stack = vec![0u32];
    let mut best: Option<Hit> = None;

    while let Some(node_index) = stack.pop() {
        let node = &map.nodes[node_index as usize];
        let Some((t_enter, _)) = node.bounds.intersect_ray(origin, inv_dir) else {
            continue;
        };
        if let Some(h) = &best {
            if t_enter > h.t {
                continue;
            }
        }

        if node.is_leaf() {
            for edge in node.left_first..node.left_first + node.count {
                let brush_index = map.brush_edges[edge as usize];
                for (poly_index, poly) in map.polys.iter().enumerate() {
                    if poly.brush != brush_index {
                        continue;
                    }
                    if let Some(hit) = intersect_poly(map, poly_index as u32, origin, dir) {
                        if best.map_or(true, |h| hit.t < h.t) {
                            best = Some(hit);
                        }
                    }
                }
            }
        } else {
            stack.push(node.left_first);
            stack.push(node.left_first + 1);
        }
    }

    best
}

/// `true` if anything blocks `origin -> origin + dir*max_t` (a shadow ray).
pub fn occluded(map: &Map, origin: Vec3, dir: Vec3, max_t: f32) -> bool {
    intersect_bvh(map, origin, dir).map_or(false, |h| h.t < max_t)
}
