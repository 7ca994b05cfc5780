//! Diagnostic tools used by offline utilities rather than the per-frame engine loop.

mod hull;

pub use self::hull::{build_hull, HullError, HullStep};
