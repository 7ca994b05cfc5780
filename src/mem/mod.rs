//! Memory arenas, generational handle pools, and stretchy buffers.
//!
//! This is the substrate every other subsystem is built on: the render front-end's per-frame
//! data heap, the light baker's per-thread scratch, and the map/UI/mixer handle pools are all
//! instances of the types in this module.

mod arena;
mod handle;
mod pool;
mod sb;

pub use self::{
    arena::{Arena, ArenaMark, ScratchArena},
    handle::{Handle, RawHandle},
    pool::{ConcurrentPool, Pool},
    sb::StretchyBuffer,
};
