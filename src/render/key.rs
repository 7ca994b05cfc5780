//! The 64-bit sort key every render command carries, and the radix sort over it.
//!
//! Bit layout, MSB to LSB: `screen_layer(2) | view(6) | view_layer(2) | kind(4) | depth(20) |
//! material_id(30)`, per spec §3. Two commands that land on the same view/view_layer/kind/depth/
//! material still tie on key; the LSD radix pass below is stable, so submission order breaks the
//! tie, matching the byte-bucket sort the front-end is specified to use.

/// The far plane used to quantize depth into the key's 20-bit field.
pub const DEFAULT_FAR: f32 = 8192.0;

const MATERIAL_BITS: u32 = 30;
const DEPTH_BITS: u32 = 20;
const KIND_BITS: u32 = 4;
const VIEW_LAYER_BITS: u32 = 2;
const VIEW_BITS: u32 = 6;
const SCREEN_LAYER_BITS: u32 = 2;

const MATERIAL_MASK: u64 = (1 << MATERIAL_BITS) - 1;
const DEPTH_MASK: u64 = (1 << DEPTH_BITS) - 1;
const KIND_MASK: u64 = (1 << KIND_BITS) - 1;
const VIEW_LAYER_MASK: u64 = (1 << VIEW_LAYER_BITS) - 1;
const VIEW_MASK: u64 = (1 << VIEW_BITS) - 1;
const SCREEN_LAYER_MASK: u64 = (1 << SCREEN_LAYER_BITS) - 1;

const MATERIAL_SHIFT: u32 = 0;
const DEPTH_SHIFT: u32 = MATERIAL_SHIFT + MATERIAL_BITS;
const KIND_SHIFT: u32 = DEPTH_SHIFT + DEPTH_BITS;
const VIEW_LAYER_SHIFT: u32 = KIND_SHIFT + KIND_BITS;
const VIEW_SHIFT: u32 = VIEW_LAYER_SHIFT + VIEW_LAYER_BITS;
const SCREEN_LAYER_SHIFT: u32 = VIEW_SHIFT + VIEW_BITS;

/// Orthogonal layer selectors that both contribute to the sort key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Layer {
    Scene,
    Ui,
}

impl Layer {
    fn bits(self) -> u64 {
        matches!(self, Self::Ui) as u64
    }
}

/// The command kind, packed into the key's 4-bit `kind` field (spec §3) so that two commands
/// sharing a view/view_layer/material/depth still sort deterministically by draw type rather than
/// falling through to submission order alone.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CommandKind {
    Mesh,
    Immediate,
    UiRects,
    DebugLines,
}

impl CommandKind {
    fn bits(self) -> u64 {
        match self {
            Self::Mesh => 0,
            Self::Immediate => 1,
            Self::UiRects => 2,
            Self::DebugLines => 3,
        }
    }
}

/// Maps `depth / far` into the key's 20-bit field; saturates outside `[0, far]`.
pub fn quantize_depth(depth: f32, far: f32) -> u32 {
    let normalized = (depth / far).clamp(0.0, 1.0);
    (normalized * DEPTH_MASK as f32) as u32
}

#[allow(clippy::too_many_arguments)]
pub fn pack_sort_key(
    screen_layer: Layer,
    view_layer: Layer,
    view_index: u8,
    kind: CommandKind,
    depth: f32,
    far: f32,
    material_id: u32,
) -> u64 {
    debug_assert!((view_index as u64) <= VIEW_MASK);

    let depth_bits = quantize_depth(depth, far) as u64 & DEPTH_MASK;
    let material_bits = material_id as u64 & MATERIAL_MASK;
    let view_bits = view_index as u64 & VIEW_MASK;

    let mut key = (screen_layer.bits() & SCREEN_LAYER_MASK) << SCREEN_LAYER_SHIFT;
    key |= view_bits << VIEW_SHIFT;
    key |= (view_layer.bits() & VIEW_LAYER_MASK) << VIEW_LAYER_SHIFT;
    key |= (kind.bits() & KIND_MASK) << KIND_SHIFT;
    key |= depth_bits << DEPTH_SHIFT;
    key |= material_bits << MATERIAL_SHIFT;
    key
}

/// Sorts `items` by `key(item)` using an 8-pass LSD radix (counting) sort over the 64-bit key (one
/// byte per pass), stable within equal keys. `O(n)` per pass rather than `O(n log n)`.
pub fn radix_sort_by_key<T: Clone>(items: &mut Vec<T>, key: impl Fn(&T) -> u64) {
    let n = items.len();
    if n < 2 {
        return;
    }

    let keys: Vec<u64> = items.iter().map(&key).collect();
    let mut order: Vec<u32> = (0..n as u32).collect();
    let mut scratch = vec![0u32; n];

    for pass in 0..8 {
        let shift = pass * 8;
        let mut counts = [0u32; 257];
        for &i in &order {
            let bucket = ((keys[i as usize] >> shift) & 0xFF) as usize;
            counts[bucket + 1] += 1;
        }
        for b in 0..256 {
            counts[b + 1] += counts[b];
        }
        for &i in &order {
            let bucket = ((keys[i as usize] >> shift) & 0xFF) as usize;
            scratch[counts[bucket] as usize] = i;
            counts[bucket] += 1;
        }
        order.copy_from_slice(&scratch);
    }

    let original = items.clone();
    for (dst, &src_index) in items.iter_mut().zip(order.iter()) {
        *dst = original[src_index as usize].clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_layer_sorts_after_scene_layer() {
        let scene = pack_sort_key(Layer::Scene, Layer::Scene, 0, CommandKind::DebugLines, 0.0, DEFAULT_FAR, 0);
        let ui = pack_sort_key(Layer::Ui, Layer::Ui, 0, CommandKind::DebugLines, 0.0, DEFAULT_FAR, 0);
        assert!(scene < ui);
    }

    #[test]
    fn nearer_depth_sorts_first_within_same_layer_and_material() {
        let near = pack_sort_key(Layer::Scene, Layer::Scene, 0, CommandKind::Mesh, 1.0, 100.0, 3);
        let far = pack_sort_key(Layer::Scene, Layer::Scene, 0, CommandKind::Mesh, 50.0, 100.0, 3);
        assert!(near < far);
    }

    #[test]
    fn radix_sort_preserves_submission_order_for_equal_keys() {
        let mut items = vec![(7u64, "a"), (7u64, "b"), (3u64, "c"), (7u64, "d")];
        radix_sort_by_key(&mut items, |(k, _)| *k);
        let labels: Vec<_> = items.iter().map(|(_, l)| *l).collect();
        assert_eq!(labels, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn kind_breaks_ties_within_equal_view_layer_depth_and_material() {
        let mesh = pack_sort_key(Layer::Scene, Layer::Scene, 2, CommandKind::Mesh, 10.0, DEFAULT_FAR, 9);
        let immediate = pack_sort_key(Layer::Scene, Layer::Scene, 2, CommandKind::Immediate, 10.0, DEFAULT_FAR, 9);
        assert!(mesh < immediate);
    }
}
