//! Construction-only contract: turns planes-with-support-vertices into the flattened [`Map`]
//! representation
//!
//! Parsing the `.map` text format is out of scope; this module starts from the parser's output
//! (one [`BrushDef`] per brush, one [`PlaneDef`] per support plane) and does everything the core
//! is responsible for: convex hull reconstruction, lightmap basis selection, triangulation, and
//! BVH construction.

use {
    super::{Brush, BvhNode, Entity, Map, MapPlane, Poly, PointLight, LIGHTMAP_SCALE},
    crate::{
        error::MapError,
        math::{Aabb, Plane},
    },
    glam::Vec3,
};

const EPSILON: f32 = 0.01;

/// One support plane of a brush, as produced by the (external) `.map` parser.
#[derive(Clone, Debug)]
pub struct PlaneDef {
    pub plane: Plane,
    pub texture: String,
    pub s: Vec3,
    pub s_offset: f32,
    pub t: Vec3,
    pub t_offset: f32,
    pub tex_scale_x: f32,
    pub tex_scale_y: f32,
    pub tex_w: u32,
    pub tex_h: u32,
}

/// A brush as produced by the (external) `.map` parser: just its support planes.
#[derive(Clone, Debug)]
pub struct BrushDef {
    pub planes: Vec<PlaneDef>,
}

/// Intersects three planes via Cramer's rule (the classic `d1(n2×n3) + d2(n3×n1) + d3(n1×n2) /
/// det` formula), returning `None` if the planes are parallel/degenerate.
fn intersect_three_planes(a: &Plane, b: &Plane, c: &Plane) -> Option<Vec3> {
    let (n1, n2, n3) = (a.normal(), b.normal(), c.normal());
    let det = n1.dot(n2.cross(n3));

    if det.abs() < 1e-6 {
        return None;
    }

    let numerator =
        n2.cross(n3) * a.distance() + n3.cross(n1) * b.distance() + n1.cross(n2) * c.distance();

    Some(numerator / det)
}

/// A candidate hull vertex is accepted only if it doesn't violate any support plane's half-space
/// by more than [`EPSILON`].
fn is_inside_all_planes(point: Vec3, planes: &[PlaneDef]) -> bool {
    planes
        .iter()
        .all(|p| p.plane.normal().dot(point) - p.plane.distance() <= EPSILON)
}

/// Computes a brush's convex vertex set by intersecting every 3-subset of its support planes.
fn brush_hull_vertices(planes: &[PlaneDef]) -> Vec<Vec3> {
    let mut vertices = Vec::new();

    for i in 0..planes.len() {
        for j in (i + 1)..planes.len() {
            for k in (j + 1)..planes.len() {
                let Some(point) =
                    intersect_three_planes(&planes[i].plane, &planes[j].plane, &planes[k].plane)
                else {
                    continue;
                };

                if is_inside_all_planes(point, planes) {
                    vertices.push(point);
                }
            }
        }
    }

    vertices
}

/// Keeps the hull vertices lying on `plane`, then sorts them CCW around the plane's centroid
/// using angle in the plane's tangent frame, dropping near-duplicates.
fn plane_polygon(plane: &Plane, hull: &[Vec3]) -> Vec<Vec3> {
    let normal = plane.normal();
    let on_plane: Vec<Vec3> = hull
        .iter()
        .copied()
        .filter(|&v| (normal.dot(v) - plane.distance()).abs() <= EPSILON)
        .collect();

    if on_plane.len() < 3 {
        return on_plane;
    }

    let centroid = on_plane.iter().fold(Vec3::ZERO, |a, &b| a + b) / on_plane.len() as f32;
    let tangent = (on_plane[0] - centroid).normalize();
    let bitangent = normal.cross(tangent);

    let mut angles: Vec<(f32, Vec3)> = on_plane
        .iter()
        .map(|&v| {
            let d = v - centroid;
            let angle = d.dot(bitangent).atan2(d.dot(tangent));
            (angle, v)
        })
        .collect();
    angles.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    let mut result: Vec<Vec3> = Vec::with_capacity(angles.len());
    for (_, v) in angles {
        if result.last().map_or(true, |&last| last.distance(v) >= EPSILON) {
            result.push(v);
        }
    }
    if result.len() > 1 && result[0].distance(result[result.len() - 1]) < EPSILON {
        result.pop();
    }

    result
}

/// Chooses the `(S, T)` lightmap basis orientation that minimises `w*h`, trying every
/// `S = edge_i -> edge_{i+1}` candidate in triangulated order, then rounds
/// `w`/`h` up to [`LIGHTMAP_SCALE`].
fn choose_lightmap_basis(normal: Vec3, polygon: &[Vec3]) -> super::LightmapBasis {
    let n = polygon.len();
    debug_assert!(n >= 3);

    let mut best: Option<(f32, Vec3, Vec3, f32, f32)> = None;

    for i in 0..n {
        let edge = polygon[(i + 1) % n] - polygon[i];
        if edge.length_squared() < 1e-10 {
            continue;
        }

        let s = edge.normalize();
        let t = normal.cross(s).normalize();

        let mut min_s = f32::INFINITY;
        let mut max_s = f32::NEG_INFINITY;
        let mut min_t = f32::INFINITY;
        let mut max_t = f32::NEG_INFINITY;

        for &v in polygon {
            let ps = v.dot(s);
            let pt = v.dot(t);
            min_s = min_s.min(ps);
            max_s = max_s.max(ps);
            min_t = min_t.min(pt);
            max_t = max_t.max(pt);
        }

        let w = max_s - min_s;
        let h = max_t - min_t;
        let area = w * h;

        if best.as_ref().map_or(true, |&(best_area, ..)| area < best_area) {
            best = Some((area, s, t, w.max(1.0), h.max(1.0)));
        }
    }

    let (_, s, t, scale_x, scale_y) = best.unwrap_or((0.0, Vec3::X, Vec3::Y, 1.0, 1.0));

    let origin = polygon.iter().fold(Vec3::ZERO, |a, &b| a + b) / polygon.len() as f32;

    let tex_w = round_up_to(scale_x, LIGHTMAP_SCALE);
    let tex_h = round_up_to(scale_y, LIGHTMAP_SCALE);

    super::LightmapBasis {
        origin,
        s,
        t,
        scale_x,
        scale_y,
        tex_w,
        tex_h,
    }
}

fn round_up_to(value: f32, multiple: u32) -> u32 {
    ((value / multiple as f32).ceil() as u32).max(1)
}

/// Triangulates `polygon` as a fan from its first vertex and appends the result into `map`'s
/// flattened buffers, returning the emitted [`Poly`].
#[allow(clippy::too_many_arguments)]
fn emit_poly(
    map: &mut Map,
    brush_index: u32,
    plane_index: u32,
    normal: Vec3,
    polygon: &[Vec3],
    map_plane: &MapPlane,
) -> Poly {
    let first_vertex = map.positions.len() as u32;
    let first_index = map.indices.len() as u32;

    for &v in polygon {
        map.positions.push(v);
        map.uvs.push(map_plane.texture_uv(v));
        map.lightmap_uvs.push(map_plane.lightmap.uv(v));
        map.normals.push(normal);
    }

    for i in 1..polygon.len() - 1 {
        map.indices.push(first_vertex);
        map.indices.push(first_vertex + i as u32);
        map.indices.push(first_vertex + i as u32 + 1);
    }

    Poly {
        plane: plane_index,
        brush: brush_index,
        first_index,
        index_count: map.indices.len() as u32 - first_index,
        first_vertex,
        vertex_count: polygon.len() as u32,
        normal,
        texture: Default::default(),
        lightmap: Default::default(),
    }
}

/// Builds a complete [`Map`] from parsed brush/plane data, entities and lights.
///
/// Runs the full construction pipeline: hull reconstruction, lightmap basis selection,
/// triangulation, then BVH construction (which permutes brush storage to match leaf order).
pub fn build_map(
    brush_defs: &[BrushDef],
    entities: Vec<Entity>,
    lights: Vec<PointLight>,
) -> Result<Map, MapError> {
    let mut map = Map::new();
    map.entities = entities;
    map.lights = lights;

    for (brush_index, brush_def) in brush_defs.iter().enumerate() {
        if brush_def.planes.len() < 4 {
            return Err(MapError::DegenerateBrush);
        }

        let hull = brush_hull_vertices(&brush_def.planes);
        if hull.is_empty() {
            return Err(MapError::DegenerateBrush);
        }

        let plane_start = map.planes.len() as u32;
        let mut brush_aabb = Aabb::empty();

        for plane_def in &brush_def.planes {
            let polygon = plane_polygon(&plane_def.plane, &hull);
            if polygon.len() < 3 {
                continue;
            }

            let normal = plane_def.plane.normal();
            let lightmap = choose_lightmap_basis(normal, &polygon);

            let map_plane = MapPlane {
                plane: plane_def.plane,
                texture: plane_def.texture.clone(),
                s: plane_def.s,
                s_offset: plane_def.s_offset,
                t: plane_def.t,
                t_offset: plane_def.t_offset,
                tex_scale_x: plane_def.tex_scale_x,
                tex_scale_y: plane_def.tex_scale_y,
                tex_w: plane_def.tex_w,
                tex_h: plane_def.tex_h,
                lightmap,
            };

            let plane_index = map.planes.len() as u32;
            let poly = emit_poly(&mut map, brush_index as u32, plane_index, normal, &polygon, &map_plane);

            map.planes.push(map_plane);
            map.polys.push(poly);

            for &v in &polygon {
                brush_aabb = brush_aabb.union_point(v);
            }
        }

        map.brushes.push(Brush {
            plane_start,
            plane_count: map.planes.len() as u32 - plane_start,
            aabb: brush_aabb,
        });
    }

    build_bvh(&mut map)?;

    debug_assert!(map.check_invariants());
    Ok(map)
}

/// Builds the BVH by recursive median split on the largest axis, rotating through axes on
/// degenerate splits and falling back to a leaf after three consecutive degenerate attempts
///. Permutes `map.brushes` to leaf order and fills `map.brush_edges`.
fn build_bvh(map: &mut Map) -> Result<(), MapError> {
    let brush_count = map.brushes.len();

    map.nodes.clear();
    map.nodes.push(BvhNode {
        bounds: Aabb::empty(),
        left_first: 0,
        count: 0,
        split_axis: 0,
    });
    // Index 1 is reserved so sibling pairs share a cache line with their parent's pair.
    map.nodes.push(BvhNode {
        bounds: Aabb::empty(),
        left_first: 0,
        count: 0,
        split_axis: 0,
    });

    if brush_count == 0 {
        map.nodes[0] = BvhNode {
            bounds: Aabb::empty(),
            left_first: 0,
            count: 0,
            split_axis: 0,
        };
        map.brush_edges.clear();
        return Ok(());
    }

    let mut order: Vec<u32> = (0..brush_count as u32).collect();

    map.nodes[0] = build_bvh_range(map, &mut order, 0, brush_count, 0)?;

    // Permute brush storage to match leaf order and remap brush_edges.
    let old_brushes = std::mem::take(&mut map.brushes);
    map.brushes = order.iter().map(|&i| old_brushes[i as usize]).collect();

    let mut remap = vec![0u32; brush_count];
    for (new_index, &old_index) in order.iter().enumerate() {
        remap[old_index as usize] = new_index as u32;
    }

    for poly in &mut map.polys {
        poly.brush = remap[poly.brush as usize];
    }

    map.brush_edges = (0..brush_count as u32).collect();

    Ok(())
}

/// Recursively splits `order[start..end]` on the largest axis of the range's AABB, returning the
/// subtree's root node. Leaves are reached when `count == 1`, or after three consecutive
/// degenerate (zero-progress) split attempts, rotating the candidate axis each time.
fn build_bvh_range(
    map: &mut Map,
    order: &mut [u32],
    start: usize,
    end: usize,
    mut axis: usize,
) -> Result<BvhNode, MapError> {
    let bounds = order[start..end]
        .iter()
        .fold(Aabb::empty(), |a, &i| a.union(map.brushes[i as usize].aabb));

    if end - start == 1 {
        return Ok(BvhNode {
            bounds,
            left_first: start as u32,
            count: 1,
            split_axis: axis as u8,
        });
    }

    let mut split = None;
    for attempt in 0..3 {
        let try_axis = (axis + attempt) % 3;
        let center_on_axis = |i: u32| match try_axis {
            0 => map.brushes[i as usize].aabb.center().x,
            1 => map.brushes[i as usize].aabb.center().y,
            _ => map.brushes[i as usize].aabb.center().z,
        };

        order[start..end].sort_by(|&a, &b| center_on_axis(a).partial_cmp(&center_on_axis(b)).unwrap());
        let mid = start + (end - start) / 2;

        if mid != start && mid != end {
            split = Some((try_axis, mid));
            break;
        }
    }

    let Some((split_axis, mid)) = split else {
        // Three successive degenerate splits: fall back to a leaf that holds the whole range by
        // treating the first brush as representative and recursing one fewer at a time.
        return Ok(BvhNode {
            bounds,
            left_first: start as u32,
            count: (end - start) as u32,
            split_axis: axis as u8,
        });
    };

    axis = (split_axis + 1) % 3;

    let left_index = map.nodes.len();
    map.nodes.push(BvhNode {
        bounds: Aabb::empty(),
        left_first: 0,
        count: 0,
        split_axis: 0,
    });
    map.nodes.push(BvhNode {
        bounds: Aabb::empty(),
        left_first: 0,
        count: 0,
        split_axis: 0,
    });

    let left = build_bvh_range(map, order, start, mid, axis)?;
    let right = build_bvh_range(map, order, mid, end, axis)?;

    map.nodes[left_index] = left;
    map.nodes[left_index + 1] = right;

    Ok(BvhNode {
        bounds,
        left_first: left_index as u32,
        count: 0,
        split_axis: split_axis as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;

    fn axis_plane(normal: Vec3, distance: f32) -> PlaneDef {
        PlaneDef {
            plane: Plane::new(normal, distance),
            texture: "default".into(),
            s: vec3(1.0, 0.0, 0.0),
            s_offset: 0.0,
            t: vec3(0.0, 1.0, 0.0),
            t_offset: 0.0,
            tex_scale_x: 1.0,
            tex_scale_y: 1.0,
            tex_w: 64,
            tex_h: 64,
        }
    }

    fn unit_cube() -> BrushDef {
        BrushDef {
            planes: vec![
                axis_plane(vec3(1.0, 0.0, 0.0), 1.0),
                axis_plane(vec3(-1.0, 0.0, 0.0), 1.0),
                axis_plane(vec3(0.0, 1.0, 0.0), 1.0),
                axis_plane(vec3(0.0, -1.0, 0.0), 1.0),
                axis_plane(vec3(0.0, 0.0, 1.0), 1.0),
                axis_plane(vec3(0.0, 0.0, -1.0), 1.0),
            ],
        }
    }

    #[test]
    fn unit_cube_builds_six_quads() {
        let map = build_map(&[unit_cube()], vec![], vec![]).unwrap();
        assert_eq!(map.brushes.len(), 1);
        assert_eq!(map.polys.len(), 6);
        for poly in &map.polys {
            assert_eq!(poly.vertex_count, 4);
            assert_eq!(poly.index_count, 6);
        }
        assert!(map.check_invariants());
    }

    #[test]
    fn bvh_leaves_partition_brush_edges() {
        let defs: Vec<BrushDef> = (0..8)
            .map(|i| {
                let offset = i as f32 * 3.0;
                BrushDef {
                    planes: vec![
                        axis_plane(vec3(1.0, 0.0, 0.0), 1.0 + offset),
                        axis_plane(vec3(-1.0, 0.0, 0.0), 1.0 - offset),
                        axis_plane(vec3(0.0, 1.0, 0.0), 1.0),
                        axis_plane(vec3(0.0, -1.0, 0.0), 1.0),
                        axis_plane(vec3(0.0, 0.0, 1.0), 1.0),
                        axis_plane(vec3(0.0, 0.0, -1.0), 1.0),
                    ],
                }
            })
            .collect();

        let map = build_map(&defs, vec![], vec![]).unwrap();
        assert_eq!(map.brush_edges.len(), 8);

        let leaves: Vec<&BvhNode> = map.nodes.iter().filter(|n| n.is_leaf()).collect();
        let total_in_leaves: u32 = leaves.iter().map(|n| n.count).sum();
        assert_eq!(total_in_leaves, 8);

        for node in &map.nodes {
            if node.count == 0 && node.left_first != 0 {
                let left = &map.nodes[node.left_first as usize];
                let right = &map.nodes[node.left_first as usize + 1];
                assert!(node.bounds.contains(left.bounds));
                assert!(node.bounds.contains(right.bounds));
            }
        }
    }
}
