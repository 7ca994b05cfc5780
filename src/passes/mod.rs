//! The fixed per-frame render pass schedule, "r1": sun shadows, map, debug lines,
//! post process, UI, each wrapped in a named timestamp region.
//!
//! This module is written against [`crate::rhi::Device`] alone, the same backend-agnostic
//! contract the render front-end targets; it never touches a real swapchain or shader. What a
//! concrete backend does with a [`FrameReport`]'s draw lists (or with the named timing regions)
//! is out of scope here — this schedule only decides *what* to draw and in *what order*, and
//! resolves the texture-fallback rule every pass shares.

mod shadow;

pub use self::shadow::{sun_shadow_projection, sun_shadow_view, SHADOW_CAMERA_OFFSET, SHADOW_FAR, SHADOW_ORTHO_EXTENT};

use crate::{
    mem::Handle,
    render::{CommandData, Frame},
    rhi::{Device, Mesh, RegionTiming, Texture, TextureState},
};

/// Default shadowmap resolution.
pub const SHADOWMAP_SIZE: u32 = 1024;

/// Direction/color the sun pass and map pass both consult.
#[derive(Clone, Copy, Debug)]
pub struct SunParams {
    pub direction: glam::Vec3,
    pub color: glam::Vec3,
}

/// One resolved scene draw: a mesh plus the textures the map pass will actually bind, after
/// falling back to the built-in white texture for anything not `Loaded`.
#[derive(Clone, Copy, Debug)]
pub struct MapDraw {
    pub mesh: Handle<Mesh>,
    pub albedo: Option<Handle<Texture>>,
    pub lightmap: Option<Handle<Texture>>,
}

/// What the schedule actually did this frame, independent of any real GPU submission — the
/// contract a backend-specific executor (or a test) consumes.
#[derive(Clone, Debug, Default)]
pub struct FrameReport {
    pub shadow_draw_count: u32,
    pub map_draws: Vec<MapDraw>,
    pub debug_line_count: u32,
    pub ui_rect_count: u32,
    pub timings: Vec<RegionTiming>,
}

/// Runs the fixed "r1" schedule once against an already-sorted [`Frame`], timing each named
/// region through `device`'s timestamp ring.
pub fn run_frame<D: Device + ?Sized>(device: &D, frame: &Frame) -> FrameReport {
    let slot = device.begin_timing_frame();
    let mut report = FrameReport::default();

    timed(device, slot, "begin_frame", || {
        let _ = device.resolution();
    });

    timed(device, slot, "sun_shadows", || {
        report.shadow_draw_count = count_mesh_draws(frame);
    });

    timed(device, slot, "map", || {
        report.map_draws = resolve_map_draws(device, frame);
    });

    timed(device, slot, "debug_lines", || {
        report.debug_line_count = count_debug_lines(frame);
    });

    timed(device, slot, "post_process", || {});

    timed(device, slot, "ui", || {
        report.ui_rect_count = count_ui_rects(frame);
    });

    device.end_timing_frame(slot);
    report.timings = device.timings();
    report
}

fn timed<D: Device + ?Sized>(device: &D, slot: usize, name: &str, f: impl FnOnce()) {
    let start = std::time::Instant::now();
    f();
    device.record_timing_region(slot, name, start.elapsed().as_secs_f32() * 1000.0);
}

fn count_mesh_draws(frame: &Frame) -> u32 {
    frame.commands.commands().iter().filter(|c| matches!(c.data, CommandData::Mesh { .. })).count() as u32
}

fn count_debug_lines(frame: &Frame) -> u32 {
    frame
        .commands
        .commands()
        .iter()
        .filter_map(|c| match c.data {
            CommandData::DebugLines { count, .. } => Some(count),
            _ => None,
        })
        .sum()
}

fn count_ui_rects(frame: &Frame) -> u32 {
    frame
        .commands
        .commands()
        .iter()
        .filter_map(|c| match c.data {
            CommandData::UiRects { count, .. } => Some(count),
            _ => None,
        })
        .sum()
}

fn resolve_map_draws<D: Device + ?Sized>(device: &D, frame: &Frame) -> Vec<MapDraw> {
    frame
        .commands
        .commands()
        .iter()
        .filter_map(|c| match &c.data {
            CommandData::Mesh { mesh, albedo, lightmap, .. } => Some(MapDraw {
                mesh: *mesh,
                albedo: resolve_or_fallback(device, *albedo),
                lightmap: resolve_or_fallback(device, *lightmap),
            }),
            _ => None,
        })
        .collect()
}

fn resolve_or_fallback<D: Device + ?Sized>(device: &D, handle: Option<Handle<Texture>>) -> Option<Handle<Texture>> {
    match handle {
        Some(h) if device.texture_state(h) == Some(TextureState::Loaded) => Some(h),
        _ => None,
    }
}
