//! An in-process reference [`Device`] implementation: no real GPU, just the state machine and
//! concurrency contract every pass is written against. Used by tests, headless tools, and the
//! light baker (which calls [`Device::upload_texture`] from worker threads).

use {
    super::{
        mesh::MeshUpload,
        texture::{AtomicTextureState, TextureDesc, TextureState, TextureUpload},
        Device, Mesh, RegionTiming, Texture, TimestampRing,
    },
    crate::{error::DriverError, mem::ConcurrentPool},
    parking_lot::Mutex,
    crate::mem::Handle,
};

struct TextureRecord {
    desc: TextureDesc,
    state: AtomicTextureState,
    data: Mutex<Option<TextureUpload>>,
}

struct MeshRecord {
    #[allow(dead_code)]
    upload: MeshUpload,
}

/// A headless [`Device`] backed by ordinary heap allocations instead of a real swapchain/driver.
pub struct MockDevice {
    resolution: Mutex<(u32, u32)>,
    textures: ConcurrentPool<TextureRecord>,
    meshes: ConcurrentPool<MeshRecord>,
    /// Serializes the parts of populate/destroy that would, on a real backend, touch the
    /// immediate device context.
    context_lock: Mutex<()>,
    timings: TimestampRing,
}

impl MockDevice {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            resolution: Mutex::new((width, height)),
            textures: ConcurrentPool::new(),
            meshes: ConcurrentPool::new(),
            context_lock: Mutex::new(()),
            timings: TimestampRing::new(),
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        *self.resolution.lock() = (width, height);
    }
}

impl Device for MockDevice {
    fn resolution(&self) -> (u32, u32) {
        *self.resolution.lock()
    }

    fn describe_texture(&self, handle: Handle<Texture>) -> Option<TextureDesc> {
        self.textures.with(handle, |record| record.desc)
    }

    fn texture_state(&self, handle: Handle<Texture>) -> Option<TextureState> {
        self.textures.with(handle, |record| record.state.load())
    }

    fn reserve_texture(&self, desc: TextureDesc) -> Handle<Texture> {
        self.textures.add(TextureRecord {
            desc,
            state: AtomicTextureState::new(TextureState::Reserved),
            data: Mutex::new(None),
        })
    }

    fn populate_texture(&self, handle: Handle<Texture>, upload: TextureUpload) -> Result<(), DriverError> {
        let transitioned = self
            .textures
            .with(handle, |record| {
                record.state.try_transition(TextureState::Reserved, TextureState::Loading)
            })
            .ok_or(DriverError::InvalidHandle)?;

        if !transitioned {
            return Err(DriverError::Unsupported);
        }

        {
            let _guard = self.context_lock.lock();
            self.textures.with(handle, |record| {
                *record.data.lock() = Some(upload);
            });
        }

        let published = self
            .textures
            .with(handle, |record| {
                if record.state.try_transition(TextureState::Loading, TextureState::Loaded) {
                    true
                } else {
                    // A concurrent destroy_texture moved us to DestroyPending; finish tearing
                    // down without publishing.
                    record.state.try_transition(TextureState::DestroyPending, TextureState::None);
                    *record.data.lock() = None;
                    false
                }
            })
            .unwrap_or(false);

        if !published && self.texture_state(handle) == Some(TextureState::None) {
            self.textures.remove(handle);
        }

        Ok(())
    }

    fn destroy_texture(&self, handle: Handle<Texture>) {
        loop {
            let Some(state) = self.texture_state(handle) else { return };

            match state {
                TextureState::None => return,
                TextureState::Reserved => {
                    if self
                        .textures
                        .with(handle, |r| r.state.try_transition(TextureState::Reserved, TextureState::None))
                        .unwrap_or(false)
                    {
                        self.textures.remove(handle);
                        return;
                    }
                }
                TextureState::Loaded => {
                    if self
                        .textures
                        .with(handle, |r| r.state.try_transition(TextureState::Loaded, TextureState::None))
                        .unwrap_or(false)
                    {
                        self.textures.with(handle, |r| *r.data.lock() = None);
                        self.textures.remove(handle);
                        return;
                    }
                }
                TextureState::Loading => {
                    self.textures
                        .with(handle, |r| r.state.try_transition(TextureState::Loading, TextureState::DestroyPending));
                    std::thread::yield_now();
                }
                TextureState::DestroyPending => {
                    std::thread::yield_now();
                }
            }
        }
    }

    fn upload_mesh(&self, upload: MeshUpload) -> Result<Handle<Mesh>, DriverError> {
        Ok(self.meshes.add(MeshRecord { upload }))
    }

    fn destroy_mesh(&self, handle: Handle<Mesh>) {
        self.meshes.remove(handle);
    }

    fn begin_timing_frame(&self) -> usize {
        self.timings.begin_frame()
    }

    fn record_timing_region(&self, slot: usize, name: &str, milliseconds: f32) {
        self.timings.record_region(slot, name, milliseconds);
    }

    fn end_timing_frame(&self, slot: usize) {
        self.timings.end_frame(slot);
    }

    fn timings(&self) -> Vec<RegionTiming> {
        self.timings.oldest_completed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rhi::{PixelFormat, TextureDesc};

    #[test]
    fn sampling_before_populate_sees_non_loaded_state() {
        let device = MockDevice::new(1920, 1080);
        let desc = TextureDesc::texture_2d(4, 4, PixelFormat::Rgba8);
        let handle = device.reserve_texture(desc);
        assert_eq!(device.texture_state(handle), Some(TextureState::Reserved));
    }

    #[test]
    fn upload_then_describe_reports_same_desc() {
        let device = MockDevice::new(1920, 1080);
        let desc = TextureDesc::texture_2d(8, 8, PixelFormat::Rgba8);
        let handle = device
            .upload_texture(desc, TextureUpload::Flat { pitch: 32, pixels: vec![0u8; 32 * 8] })
            .unwrap();

        assert_eq!(device.texture_state(handle), Some(TextureState::Loaded));
        let described = device.describe_texture(handle).unwrap();
        assert_eq!(described.width, desc.width);
        assert_eq!(described.height, desc.height);
    }

    #[test]
    fn destroy_on_reserved_handle_frees_it() {
        let device = MockDevice::new(1920, 1080);
        let desc = TextureDesc::texture_2d(4, 4, PixelFormat::Rgba8);
        let handle = device.reserve_texture(desc);
        device.destroy_texture(handle);
        assert_eq!(device.describe_texture(handle), None);
    }

    #[test]
    fn zero_size_mesh_upload_is_accepted() {
        let device = MockDevice::new(1920, 1080);
        let handle = device
            .upload_mesh(MeshUpload {
                format: super::super::VertexFormat::Position,
                topology: super::super::Topology::TriangleList,
                vertices: Vec::new(),
                indices: Vec::new(),
            })
            .unwrap();
        device.destroy_mesh(handle);
    }
}
