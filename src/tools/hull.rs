//! Gift-wrapping convex hull construction over a point cloud.
//!
//! Used by offline tools (not the per-frame engine), e.g. to compute a collision hull for a
//! brush's vertex set or to visualize how a point cloud's hull is built. Every directed edge is
//! processed at most once, which is what bounds the algorithm's termination: the queue can only
//! ever hold `O(n)` distinct directed edges before it drains.

use {
    glam::Vec3,
    std::collections::{HashSet, VecDeque},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HullError {
    /// Gift wrapping needs at least 4 points to bound a volume.
    TooFewPoints,
}

/// One gift-wrapping step, recorded for visualization.
#[derive(Clone, Debug)]
pub struct HullStep {
    /// The directed edge this step processed.
    pub edge: (u32, u32),
    /// The third vertex found to close the edge into a triangle.
    pub third: u32,
    /// The triangle emitted this step.
    pub triangle: [u32; 3],
    /// Directed edges newly enqueued as a result (already-processed edges are filtered out).
    pub enqueued: Vec<(u32, u32)>,
}

const EPSILON: f32 = 1e-5;

/// Builds the convex hull of `points` by gift wrapping, returning the hull's triangles (as
/// indices into `points`) and a step-by-step debug trace of how they were found.
pub fn build_hull(points: &[Vec3]) -> Result<(Vec<[u32; 3]>, Vec<HullStep>), HullError> {
    if points.len() < 4 {
        return Err(HullError::TooFewPoints);
    }

    let seed = lexicographic_min(points);
    // An "upward ghost point": not a member of the point set, used only to seed the first real
    // edge off the extreme vertex `seed`.
    let ghost = points[seed as usize] + Vec3::new(0.0, 0.0, 1.0);
    let first_third = find_third(points, points[seed as usize], ghost, None);

    let mut triangles = Vec::new();
    let mut steps = Vec::new();
    let mut processed: HashSet<(u32, u32)> = HashSet::new();
    let mut queue: VecDeque<(u32, u32)> = VecDeque::new();

    queue.push_back((seed, first_third));

    while let Some(edge @ (a, b)) = queue.pop_front() {
        if !processed.insert(edge) {
            continue;
        }

        let q = find_third(points, points[a as usize], points[b as usize], Some((a, b)));
        triangles.push([a, b, q]);

        let mut enqueued = Vec::new();
        for next in [(b, q), (q, a)] {
            if !processed.contains(&next) {
                queue.push_back(next);
                enqueued.push(next);
            }
        }

        steps.push(HullStep {
            edge,
            third: q,
            triangle: [a, b, q],
            enqueued,
        });
    }

    Ok((triangles, steps))
}

fn lexicographic_min(points: &[Vec3]) -> u32 {
    let mut best = 0u32;
    for (i, p) in points.iter().enumerate().skip(1) {
        let cur = points[best as usize];
        if (p.x, p.y, p.z) < (cur.x, cur.y, cur.z) {
            best = i as u32;
        }
    }
    best
}

/// Finds the vertex `q` that closes edge `(a, b)` into a supporting-plane triangle: every other
/// point lies on (or behind) the plane through `a, b, q`. Ties (coplanar candidates) are broken
/// by picking the larger `(a, b, candidate)` triangle area.
fn find_third(points: &[Vec3], a: Vec3, b: Vec3, exclude: Option<(u32, u32)>) -> u32 {
    let skip = |i: u32| -> bool {
        match exclude {
            Some((ea, eb)) => i == ea || i == eb,
            None => false,
        }
    };

    let mut candidate = (0..points.len() as u32).find(|&i| !skip(i)).expect("at least one eligible point");

    for i in 0..points.len() as u32 {
        if i == candidate || skip(i) {
            continue;
        }
        let p = points[i as usize];
        let normal = (b - a).cross(points[candidate as usize] - a);
        let volume = normal.dot(p - a);

        if volume > EPSILON {
            // p sits outside the plane through (a, b, candidate): it must become the new
            // candidate so the supporting plane keeps expanding outward.
            candidate = i;
        } else if volume.abs() <= EPSILON {
            let area_candidate = normal.length_squared();
            let area_p = (b - a).cross(p - a).length_squared();
            if area_p > area_candidate {
                candidate = i;
            }
        }
    }

    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;

    fn cube() -> Vec<Vec3> {
        let mut pts = Vec::new();
        for &x in &[0.0, 1.0] {
            for &y in &[0.0, 1.0] {
                for &z in &[0.0, 1.0] {
                    pts.push(vec3(x, y, z));
                }
            }
        }
        pts
    }

    #[test]
    fn too_few_points_is_rejected() {
        let pts = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        assert!(matches!(build_hull(&pts), Err(HullError::TooFewPoints)));
    }

    #[test]
    fn cube_hull_uses_every_vertex() {
        let pts = cube();
        let (triangles, steps) = build_hull(&pts).unwrap();

        assert!(!triangles.is_empty());
        assert!(!steps.is_empty());

        let mut used: HashSet<u32> = HashSet::new();
        for tri in &triangles {
            used.extend(tri.iter().copied());
        }
        assert_eq!(used.len(), pts.len(), "every cube vertex should appear on its own hull");
    }

    #[test]
    fn interior_point_never_becomes_a_hull_vertex() {
        let mut pts = cube();
        pts.push(vec3(0.5, 0.5, 0.5));
        let interior_index = (pts.len() - 1) as u32;

        let (triangles, _) = build_hull(&pts).unwrap();
        assert!(triangles.iter().all(|tri| !tri.contains(&interior_index)));
    }

    #[test]
    fn every_directed_edge_is_processed_at_most_once() {
        let pts = cube();
        let (_, steps) = build_hull(&pts).unwrap();

        let mut seen = HashSet::new();
        for step in &steps {
            assert!(seen.insert(step.edge), "edge {:?} processed twice", step.edge);
        }
    }
}
