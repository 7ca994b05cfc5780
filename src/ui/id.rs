//! 64-bit widget identity.
//!
//! Every id is seeded by whatever is on top of the id stack, which containers (panels, windows)
//! push onto before laying out their children. That gives two widgets with the same label in
//! different windows distinct ids without either caller having to know about the other.

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Value `0` is reserved to mean "no id"; a real hash that happens to land on `0` collapses to
/// `!0` instead so it never aliases that sentinel.
fn reserve(hash: u64) -> u64 {
    if hash == 0 {
        !0
    } else {
        hash
    }
}

fn fnv1a(seed: u64, bytes: &[u8]) -> u64 {
    let mut hash = seed;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// The root seed used when the id stack is otherwise empty.
pub const ROOT_SEED: u64 = FNV_OFFSET;

/// Hashes `label` seeded by `seed` (normally the top of the id stack).
pub fn ui_id(seed: u64, label: &str) -> u64 {
    reserve(fnv1a(seed, label.as_bytes()))
}

/// Hashes an arbitrary pointer's bits, for widgets identified by a caller-owned address rather
/// than a label.
pub fn ui_id_pointer<T>(seed: u64, ptr: *const T) -> u64 {
    reserve(fnv1a(seed, &(ptr as usize).to_ne_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_label_same_seed_is_stable() {
        assert_eq!(ui_id(ROOT_SEED, "button"), ui_id(ROOT_SEED, "button"));
    }

    #[test]
    fn different_seeds_scope_the_same_label_apart() {
        let a = ui_id(ROOT_SEED, "button");
        let b = ui_id(ui_id(ROOT_SEED, "window"), "button");
        assert_ne!(a, b);
    }

    #[test]
    fn reserved_zero_never_escapes() {
        // Hunt for a (seed, label) pair that hashes to zero, then confirm it collapses.
        let mut seed = ROOT_SEED;
        for i in 0..10_000u32 {
            let label = i.to_string();
            let raw = fnv1a(seed, label.as_bytes());
            if raw == 0 {
                assert_eq!(ui_id(seed, &label), !0);
                return;
            }
            seed = raw;
        }
    }
}
