//! The rendering hardware interface: a capability-oriented trait describing the operations the
//! render passes depend on. A real backend (D3D11, Vulkan, ...) is an out-of-scope
//! collaborator; this module defines the contract plus [`mock::MockDevice`], an in-process
//! reference implementation used by tests and by tools that don't render to a real swapchain.

mod mesh;
mod mock;
mod texture;
mod timing;

pub use self::{
    mesh::{MeshUpload, Topology, VertexFormat},
    mock::MockDevice,
    texture::{MipLevels, PixelFormat, Texture, TextureDesc, TextureState, TextureType, TextureUpload},
    timing::{RegionTiming, TimestampRing},
};

use crate::{error::DriverError, mem::Handle};

/// A GPU mesh: an immutable vertex/index buffer pair tagged with its topology.
#[derive(Clone, Copy, Debug)]
pub struct Mesh;

/// The capability-oriented device interface every render pass is written against.
///
/// Implementations must uphold the texture state machine:
/// `None -> Reserved -> Loading -> Loaded -> (DestroyPending) -> None`, and must make
/// `populate_texture`/`destroy_texture` safe to call from any thread.
pub trait Device: Send + Sync {
    fn resolution(&self) -> (u32, u32);

    fn describe_texture(&self, handle: Handle<Texture>) -> Option<TextureDesc>;

    /// `None` if the handle is unrecognised. Passes consult this to decide whether to sample the
    /// backing SRV or fall back to the built-in missing-texture pattern.
    fn texture_state(&self, handle: Handle<Texture>) -> Option<TextureState>;

    /// Thread-safe; the returned handle samples as the missing-texture fallback until
    /// [`Self::populate_texture`] completes.
    fn reserve_texture(&self, desc: TextureDesc) -> Handle<Texture>;

    /// May be called from any thread; transitions `Reserved -> Loading -> Loaded`. A concurrent
    /// [`Self::destroy_texture`] that observes `DestroyPending` first aborts the upload instead
    /// of publishing it.
    fn populate_texture(&self, handle: Handle<Texture>, upload: TextureUpload) -> Result<(), DriverError>;

    fn upload_texture(&self, desc: TextureDesc, upload: TextureUpload) -> Result<Handle<Texture>, DriverError> {
        let handle = self.reserve_texture(desc);
        self.populate_texture(handle, upload)?;
        Ok(handle)
    }

    /// Defers to the next frame boundary if the texture is still `Loading`; safe to call from
    /// any thread.
    fn destroy_texture(&self, handle: Handle<Texture>);

    fn upload_mesh(&self, upload: MeshUpload) -> Result<Handle<Mesh>, DriverError>;

    fn destroy_mesh(&self, handle: Handle<Mesh>);

    /// Begins a new frame's timestamp-ring slot; the render pass schedule wraps every named
    /// region between this and [`Self::end_timing_frame`].
    fn begin_timing_frame(&self) -> usize;

    fn record_timing_region(&self, slot: usize, name: &str, milliseconds: f32);

    fn end_timing_frame(&self, slot: usize);

    /// The most-recently completed frame's per-region timings.
    fn timings(&self) -> Vec<RegionTiming>;
}

/// The built-in 2D and cubemap fallback patterns sampled while a texture is not yet `Loaded`.
pub const MISSING_TEXTURE_SIZE: u32 = 64;
