//! Orchestrates a bake across the job queue: one job per plane plus one fogmap job, tracked by
//! atomics so the host can poll progress, cancel, and finalize without blocking.

use {
    super::{
        job::{bake_fogmap, bake_plane, BakeConfig, FogmapResult, PlaneBakeResult},
        sample::AlbedoSource,
    },
    crate::{
        job::{JobQueue, Priority},
        map::Map,
        mem::Handle,
        rhi::{Device, PixelFormat, Texture, TextureDesc, TextureUpload},
    },
    parking_lot::Mutex,
    std::sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

/// Tracks an in-flight (or finished) bake. Cheap to poll from the main thread while worker
/// threads fill in [`Self::plane_results`]/[`Self::fog_result`] in the background.
pub struct BakeState {
    job_count: usize,
    jobs_completed: AtomicUsize,
    cancel: AtomicBool,
    finalized: AtomicBool,
    plane_results: Vec<Mutex<Option<PlaneBakeResult>>>,
    fog_result: Mutex<Option<FogmapResult>>,
}

impl BakeState {
    pub fn new(plane_count: usize) -> Arc<Self> {
        Arc::new(Self {
            job_count: plane_count + 1,
            jobs_completed: AtomicUsize::new(0),
            cancel: AtomicBool::new(false),
            finalized: AtomicBool::new(false),
            plane_results: (0..plane_count).map(|_| Mutex::new(None)).collect(),
            fog_result: Mutex::new(None),
        })
    }

    /// Submits every plane's job plus the fogmap job to `queue`, at [`Priority::Low`] (bakes
    /// yield to whatever interactive work is already queued).
    pub fn bake_start(
        self: &Arc<Self>,
        queue: &JobQueue,
        config: BakeConfig,
        map: Arc<Map>,
        albedo: Arc<dyn AlbedoSource>,
    ) {
        let config = Arc::new(config);

        for plane_index in 0..self.plane_results.len() {
            let state = Arc::clone(self);
            let map = Arc::clone(&map);
            let albedo = Arc::clone(&albedo);
            let config = Arc::clone(&config);

            queue.add_job(Priority::Low, None, move |_ctx| {
                let result = bake_plane(&config, &map, &*albedo, plane_index, &state.cancel);
                *state.plane_results[plane_index].lock() = result;
                state.jobs_completed.fetch_add(1, Ordering::AcqRel);
            });
        }

        let state = Arc::clone(self);
        let config = Arc::clone(&config);
        queue.add_job(Priority::Low, None, move |_ctx| {
            let result = bake_fogmap(&config, &map, &state.cancel);
            *state.fog_result.lock() = result;
            state.jobs_completed.fetch_add(1, Ordering::AcqRel);
        });
    }

    /// Fraction of jobs completed, in `[0, 1]`.
    pub fn bake_progress(&self) -> f32 {
        if self.job_count == 0 {
            return 1.0;
        }
        self.jobs_completed.load(Ordering::Acquire) as f32 / self.job_count as f32
    }

    /// Requests every in-flight job exit early without producing output. Already-queued jobs
    /// still run (and still increment `jobs_completed`); they just skip their work.
    pub fn bake_cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    /// `true` once every job has completed (or exited early via [`Self::bake_cancel`]).
    fn all_jobs_done(&self) -> bool {
        self.jobs_completed.load(Ordering::Acquire) >= self.job_count
    }

    /// Idempotent: returns `false` while jobs are still outstanding. On the call that observes
    /// completion, uploads every baked lightmap (and the fogmap, if produced) to `device` and
    /// assigns the resulting handles onto `map`; later calls just return `true` again without
    /// re-uploading.
    pub fn bake_finalize(&self, device: &dyn Device, map: &mut Map) -> bool {
        if !self.all_jobs_done() {
            return false;
        }

        if self.finalized.swap(true, Ordering::AcqRel) {
            return true;
        }

        for (plane_index, slot) in self.plane_results.iter().enumerate() {
            let Some(result) = slot.lock().take() else { continue };
            let handle = upload_lightmap(device, &result);
            assign_lightmap(map, plane_index, handle);
        }

        if let Some(fog) = self.fog_result.lock().take() {
            let desc = TextureDesc::texture_3d(fog.width, fog.height, fog.depth, PixelFormat::Rgba8);
            let upload = TextureUpload::Flat {
                pitch: fog.width * 4,
                pixels: fog.pixels,
            };
            if let Ok(handle) = device.upload_texture(desc, upload) {
                map.fogmap = handle;
            }
        }

        true
    }
}

fn upload_lightmap(device: &dyn Device, result: &PlaneBakeResult) -> Option<Handle<Texture>> {
    let desc = TextureDesc::texture_2d(result.width, result.height, PixelFormat::Rgba8);
    let upload = TextureUpload::Flat {
        pitch: result.width * 4,
        pixels: result.pixels.clone(),
    };
    device.upload_texture(desc, upload).ok()
}

fn assign_lightmap(map: &mut Map, plane_index: usize, handle: Option<Handle<Texture>>) {
    let Some(handle) = handle else { return };
    for poly in map.polys.iter_mut().filter(|p| p.plane as usize == plane_index) {
        poly.lightmap = handle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        job::JobQueue,
        light_baker::sample::ConstantAlbedo,
        map::build::{build_map, BrushDef, PlaneDef},
        math::Plane,
        rhi::MockDevice,
    };
    use glam::Vec3;
    use std::{thread, time::Duration};

    fn axis_plane(normal: Vec3, distance: f32, texture: &str) -> PlaneDef {
        PlaneDef {
            plane: Plane::new(normal, distance),
            texture: texture.into(),
            s: Vec3::X,
            s_offset: 0.0,
            t: Vec3::Y,
            t_offset: 0.0,
            tex_scale_x: 1.0,
            tex_scale_y: 1.0,
            tex_w: 8,
            tex_h: 8,
        }
    }

    /// `build_map` is a pure function of its `BrushDef`s, so calling it twice from the same
    /// literal brush yields two independent `Map`s with identical geometry: one held behind an
    /// `Arc` for the bake's worker threads to trace against, one owned outright for
    /// `bake_finalize` to mutate once baking completes.
    fn box_map() -> Map {
        let brush = BrushDef {
            planes: vec![
                axis_plane(Vec3::new(0.0, 0.0, 1.0), 32.0, "floor"),
                axis_plane(Vec3::new(0.0, 0.0, -1.0), 32.0, "ceiling"),
                axis_plane(Vec3::new(1.0, 0.0, 0.0), 32.0, "wall"),
                axis_plane(Vec3::new(-1.0, 0.0, 0.0), 32.0, "wall"),
                axis_plane(Vec3::new(0.0, 1.0, 0.0), 32.0, "wall"),
                axis_plane(Vec3::new(0.0, -1.0, 0.0), 32.0, "wall"),
            ],
        };
        build_map(&[brush], vec![], vec![]).expect("box builds")
    }

    fn config() -> BakeConfig {
        BakeConfig {
            sun_dir: Vec3::new(0.0, 0.0, -1.0),
            sun_color: Vec3::splat(1.0),
            ambient_color: Vec3::splat(0.05),
            dynamic_sun_shadows: false,
            ray_count: 2,
            ray_recursion: 1,
            fog_light_sample_count: 1,
            fogmap_scale: 8,
            shadowmap_resolution: 16,
        }
    }

    #[test]
    fn finalize_waits_for_every_job_then_assigns_lightmaps() {
        let trace_map = Arc::new(box_map());
        let mut own_map = box_map();
        let state = BakeState::new(trace_map.planes.len());
        let queue = JobQueue::new(2, 64);
        let albedo: Arc<dyn AlbedoSource> = Arc::new(ConstantAlbedo(Vec3::splat(0.8)));
        let device = MockDevice::new(1, 1);

        state.bake_start(&queue, config(), trace_map, albedo);

        let mut tries = 0;
        while !state.bake_finalize(&device, &mut own_map) {
            thread::sleep(Duration::from_millis(5));
            tries += 1;
            assert!(tries < 200, "bake never finished");
        }

        assert_eq!(state.bake_progress(), 1.0);
        for poly in &own_map.polys {
            assert_ne!(poly.lightmap, Handle::NULL);
        }
    }

    #[test]
    fn cancel_still_lets_finalize_complete() {
        let trace_map = Arc::new(box_map());
        let mut own_map = box_map();
        let state = BakeState::new(trace_map.planes.len());
        let queue = JobQueue::new(2, 64);
        let albedo: Arc<dyn AlbedoSource> = Arc::new(ConstantAlbedo(Vec3::splat(0.8)));
        let device = MockDevice::new(1, 1);

        state.bake_start(&queue, config(), trace_map, albedo);
        state.bake_cancel();

        let mut tries = 0;
        while !state.bake_finalize(&device, &mut own_map) {
            thread::sleep(Duration::from_millis(5));
            tries += 1;
            assert!(tries < 200, "bake never finished");
        }
    }
}
