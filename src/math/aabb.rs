use super::{vec3, vec3_is_finite, Vec3};

/// An axis-aligned bounding box, used throughout the map's BVH and brush storage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    /// An AABB with no extent, positioned so that unioning it with anything yields that thing.
    pub fn empty() -> Self {
        Self {
            min: vec3(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: vec3(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(vec3_is_finite(min));
        debug_assert!(vec3_is_finite(max));
        debug_assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z);

        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb = aabb.union_point(p);
        }
        aabb
    }

    pub const fn min(&self) -> Vec3 {
        self.min
    }

    pub const fn max(&self) -> Vec3 {
        self.max
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// The axis (0=x, 1=y, 2=z) along which this box is longest.
    pub fn largest_axis(&self) -> usize {
        let extent = self.extent();
        if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        }
    }

    pub fn union(&self, other: Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn union_point(&self, p: Vec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    pub fn contains(&self, other: Aabb) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.min.z <= other.min.z
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
            && self.max.z >= other.max.z
    }

    pub fn intersects(&self, other: Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Ray/box intersection via the slab method; returns the entry/exit `t` range if it is
    /// non-empty and in front of the ray origin.
    pub fn intersect_ray(&self, origin: Vec3, inv_dir: Vec3) -> Option<(f32, f32)> {
        let t0 = (self.min - origin) * inv_dir;
        let t1 = (self.max - origin) * inv_dir;

        let tmin = t0.min(t1);
        let tmax = t0.max(t1);

        let t_enter = tmin.x.max(tmin.y).max(tmin.z).max(0.0);
        let t_exit = tmax.x.min(tmax.y).min(tmax.z);

        if t_enter <= t_exit {
            Some((t_enter, t_exit))
        } else {
            None
        }
    }
}
