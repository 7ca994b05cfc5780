//! The offline lightmap/fogmap baker: a CPU path tracer run over the job queue, one job per map
//! plane plus one fogmap job.
//!
//! [`sample`] supplies the CPU-readable albedo the GPU-only [`crate::rhi::Device`] can't give
//! back; [`trace`] is the BVH/triangle intersection kernel; [`job`] is the per-plane and fogmap
//! kernels built on top of it; [`state`] drives a bake to completion and publishes the result;
//! [`debug`] re-traces a single path for visualisation tools.

mod debug;
mod job;
mod sample;
mod state;
mod trace;

pub use self::{
    debug::{trace_debug_path, PathDebugRecord, PathVertexRecord},
    job::{bake_fogmap, bake_plane, BakeConfig, FogmapResult, PlaneBakeResult},
    sample::{AlbedoSource, ConstantAlbedo, Image, ImageLibrary},
    state::BakeState,
    trace::{intersect_bvh, occluded, Hit, RAY_BIAS},
};
