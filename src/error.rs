//! Central error taxonomy.
//!
//! Recoverable failures (stale handles, decode failures, missing resources) are represented
//! as ordinary enums returned by fallible functions; they never unwind. Programmer errors and
//! unrecoverable conditions (OOM, shader compile failure, device loss) go through
//! [`fatal_error!`], which logs and exits the process — there is no recovery path for them,
//! matching the "assert, break into debugger, abort" policy of the original design.

use std::fmt::{self, Display, Formatter};

/// Logs the given message at `error!` and exits the process with status `1`.
///
/// Used for conditions the design treats as unrecoverable: arena OOM, shader compile failure,
/// and RHI device-removed. Never call this for a condition a caller could reasonably recover
/// from; return a `Result`/`Option` instead.
#[macro_export]
macro_rules! fatal_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
        std::process::exit(1)
    }};
}

/// Errors returned by the memory substrate (arenas, handle pools).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MemError {
    /// A handle's generation did not match the slot's current generation; the resource is gone.
    Stale,
    /// The pool has no free slots and is not allowed to grow.
    Exhausted,
}

impl Display for MemError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stale => write!(f, "handle generation mismatch (resource was freed)"),
            Self::Exhausted => write!(f, "pool exhausted"),
        }
    }
}

impl std::error::Error for MemError {}

/// Errors returned while constructing or querying a [`crate::map::Map`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MapError {
    /// A brush's support planes do not bound a finite convex volume.
    DegenerateBrush,
    /// The BVH could not make progress after repeated degenerate splits.
    DegenerateBvh,
}

impl Display for MapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateBrush => write!(f, "brush has no finite convex hull"),
            Self::DegenerateBvh => write!(f, "bvh split produced no progress"),
        }
    }
}

impl std::error::Error for MapError {}

/// Errors from the RHI trait contract (see [`crate::rhi`]).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DriverError {
    /// The handle was never valid, or has since been destroyed.
    InvalidHandle,
    /// The device cannot satisfy the given resource description.
    Unsupported,
    /// The underlying device was lost; this is treated as fatal by callers.
    DeviceRemoved,
}

impl Display for DriverError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHandle => write!(f, "invalid or destroyed resource handle"),
            Self::Unsupported => write!(f, "unsupported resource description"),
            Self::DeviceRemoved => write!(f, "device removed"),
        }
    }
}

impl std::error::Error for DriverError {}

/// Errors from the light baker's lifecycle (see [`crate::light_baker::BakeState`]).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BakeError {
    /// `bake_finalize` was called before every job finished (or was cancelled out).
    StillRunning,
}

impl Display for BakeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::StillRunning => write!(f, "bake has outstanding jobs"),
        }
    }
}

impl std::error::Error for BakeError {}

/// Errors from the mixer's command interface.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MixerError {
    /// The voice id does not refer to a live voice (already stopped, or never valid).
    InvalidVoice,
}

impl Display for MixerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidVoice => write!(f, "invalid or expired voice id"),
        }
    }
}

impl std::error::Error for MixerError {}

/// A parse error from the (external, out-of-scope) `.map` text loader, bubbled up as a result
/// rather than the original's `setjmp`/`longjmp`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MapParseError {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl Display for MapParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.file, self.line, self.column, self.message
        )
    }
}

impl std::error::Error for MapParseError {}
