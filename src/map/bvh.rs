use crate::math::Aabb;

/// A BVH node over brush AABBs.
///
/// Leaves have `count > 0` and `left_first` indexing into `Map::brush_edges`; inner nodes have
/// `count == 0` and `left_first` indexing the first of two contiguous children (the second is
/// `left_first + 1`). Index 0 is the root; index 1 is reserved so sibling pairs share a cache
/// line with their parent's pair
#[derive(Clone, Copy, Debug)]
pub struct BvhNode {
    pub bounds: Aabb,
    pub left_first: u32,
    pub count: u32,
    pub split_axis: u8,
}

impl BvhNode {
    pub fn is_leaf(&self) -> bool {
        self.count > 0
    }
}
