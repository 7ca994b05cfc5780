//! Immediate-mode batching: a small state machine that accumulates vertices/indices into shared
//! pools and flushes one `Immediate` command whenever a setting changes or the caller asks (spec
//! §4.5).

use {
    super::command::{CommandBuffer, CommandData},
    super::key::Layer,
    crate::{
        math::RectF,
        mem::{Handle, StretchyBuffer},
        rhi::{Texture, Topology},
    },
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BlendMode {
    PremultipliedAlpha,
    Additive,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CullMode {
    None,
    Front,
    Back,
}

/// Packed vertex layout matching [`crate::rhi::VertexFormat::Immediate`]: `pos: v3, tex: v2,
/// rgba: u32, normal: v3`.
#[derive(Clone, Copy, Debug)]
pub struct ImmediateVertex {
    pub pos: crate::math::Vec3,
    pub tex: crate::math::Vec2,
    pub rgba: u32,
    pub normal: crate::math::Vec3,
}

/// The batcher's current draw state. Any field change flushes the pending batch first.
#[derive(Clone, Copy, Debug)]
pub struct ImmediateSettings {
    pub shader: u32,
    pub topology: Topology,
    pub blend_mode: BlendMode,
    pub cull_mode: CullMode,
    pub clip_rect: RectF,
    pub texture: Option<Handle<Texture>>,
    pub use_depth: bool,
    pub depth_bias: f32,
    pub transform: crate::math::Mat4,
}

impl Default for ImmediateSettings {
    fn default() -> Self {
        Self {
            shader: 0,
            topology: Topology::TriangleList,
            blend_mode: BlendMode::PremultipliedAlpha,
            cull_mode: CullMode::None,
            clip_rect: RectF::new(0.0, 0.0, 0.0, 0.0),
            texture: None,
            use_depth: false,
            depth_bias: 0.0,
            transform: crate::math::Mat4::IDENTITY,
        }
    }
}

impl PartialEq for ImmediateSettings {
    fn eq(&self, other: &Self) -> bool {
        self.shader == other.shader
            && self.topology == other.topology
            && self.blend_mode == other.blend_mode
            && self.cull_mode == other.cull_mode
            && self.clip_rect.pos.x.to_bits() == other.clip_rect.pos.x.to_bits()
            && self.clip_rect.pos.y.to_bits() == other.clip_rect.pos.y.to_bits()
            && self.clip_rect.dims.x.to_bits() == other.clip_rect.dims.x.to_bits()
            && self.clip_rect.dims.y.to_bits() == other.clip_rect.dims.y.to_bits()
            && self.texture == other.texture
            && self.use_depth == other.use_depth
            && self.depth_bias.to_bits() == other.depth_bias.to_bits()
            && self.transform.to_cols_array() == other.transform.to_cols_array()
    }
}

/// Per-frame vertex/index pools plus the current batcher state.
pub struct ImmediateBatcher {
    vertices: StretchyBuffer<ImmediateVertex>,
    indices: StretchyBuffer<u32>,
    settings: ImmediateSettings,
    batch_start_vertex: u32,
    batch_start_index: u32,
    dirty: bool,
}

impl ImmediateBatcher {
    pub fn new() -> Self {
        Self {
            vertices: StretchyBuffer::new(),
            indices: StretchyBuffer::new(),
            settings: ImmediateSettings::default(),
            batch_start_vertex: 0,
            batch_start_index: 0,
            dirty: false,
        }
    }

    /// Changes the draw state, flushing the pending batch first if it is non-empty.
    pub fn set_settings(&mut self, commands: &mut CommandBuffer, settings: ImmediateSettings) {
        if settings != self.settings {
            self.flush(commands);
            self.settings = settings;
        }
    }

    pub fn vertex(&mut self, v: ImmediateVertex) -> u32 {
        self.dirty = true;
        self.vertices.push(v)
    }

    pub fn index(&mut self, i: u32) {
        self.dirty = true;
        self.indices.push(i);
    }

    /// Flushes any pending vertices/indices into one `Immediate` command. The clip rect is
    /// intersected with the active view's clip rect; an empty clip defaults to the full
    /// framebuffer.
    pub fn flush(&mut self, commands: &mut CommandBuffer) {
        if !self.dirty {
            return;
        }

        let vertex_end = self.vertices.count();
        let index_end = self.indices.count();

        let view_clip = commands.view_params(commands.current_view()).clip_rect;
        let clip_rect = if self.settings.clip_rect.dims.x <= 0.0 || self.settings.clip_rect.dims.y <= 0.0 {
            view_clip
        } else {
            intersect_rect(self.settings.clip_rect, view_clip)
        };

        let mut settings = self.settings;
        settings.clip_rect = clip_rect;

        let data = CommandData::Immediate {
            settings,
            vertex_range: (self.batch_start_vertex, vertex_end),
            index_range: (self.batch_start_index, index_end),
        };
        commands.submit_command(Layer::Scene, Layer::Scene, data.kind(), 0.0, settings.shader, data, 0);

        self.batch_start_vertex = vertex_end;
        self.batch_start_index = index_end;
        self.dirty = false;
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.batch_start_vertex = 0;
        self.batch_start_index = 0;
        self.dirty = false;
    }

    pub fn vertices(&self) -> &[ImmediateVertex] {
        self.vertices.as_slice()
    }

    pub fn indices(&self) -> &[u32] {
        self.indices.as_slice()
    }
}

impl Default for ImmediateBatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn intersect_rect(a: RectF, b: RectF) -> RectF {
    let ax0 = a.pos.x;
    let ay0 = a.pos.y;
    let ax1 = a.pos.x + a.dims.x;
    let ay1 = a.pos.y + a.dims.y;

    let bx0 = b.pos.x;
    let by0 = b.pos.y;
    let bx1 = b.pos.x + b.dims.x;
    let by1 = b.pos.y + b.dims.y;

    let x0 = ax0.max(bx0);
    let y0 = ay0.max(by0);
    let x1 = ax1.min(bx1);
    let y1 = ay1.min(by1);

    RectF::new(x0, y0, (x1 - x0).max(0.0), (y1 - y0).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::command::ViewParams;

    fn buffer() -> CommandBuffer {
        let mut buf = CommandBuffer::new(super::super::key::DEFAULT_FAR);
        buf.push_view(ViewParams {
            world_to_clip: crate::math::Mat4::IDENTITY,
            clip_rect: RectF::new(0.0, 0.0, 1920.0, 1080.0),
        });
        buf
    }

    #[test]
    fn settings_change_flushes_pending_batch() {
        let mut batcher = ImmediateBatcher::new();
        let mut commands = buffer();

        batcher.vertex(ImmediateVertex {
            pos: crate::math::vec3(0.0, 0.0, 0.0),
            tex: crate::math::vec2(0.0, 0.0),
            rgba: 0xFFFF_FFFF,
            normal: crate::math::vec3(0.0, 0.0, 1.0),
        });

        let mut next = ImmediateSettings::default();
        next.shader = 1;
        batcher.set_settings(&mut commands, next);

        assert_eq!(commands.commands().len(), 1);
    }

    #[test]
    fn clip_rect_only_change_still_flushes_and_is_recorded() {
        let mut batcher = ImmediateBatcher::new();
        let mut commands = buffer();

        let mut first = ImmediateSettings::default();
        first.clip_rect = RectF::new(0.0, 0.0, 100.0, 100.0);
        batcher.set_settings(&mut commands, first);

        batcher.vertex(ImmediateVertex {
            pos: crate::math::vec3(0.0, 0.0, 0.0),
            tex: crate::math::vec2(0.0, 0.0),
            rgba: 0xFFFF_FFFF,
            normal: crate::math::vec3(0.0, 0.0, 1.0),
        });

        let mut second = first;
        second.clip_rect = RectF::new(10.0, 10.0, 50.0, 50.0);
        batcher.set_settings(&mut commands, second);

        assert_eq!(commands.commands().len(), 1, "changing only clip_rect must flush the pending batch");
        match &commands.commands()[0].data {
            CommandData::Immediate { settings, .. } => {
                assert_eq!((settings.clip_rect.pos.x, settings.clip_rect.dims.x), (0.0, 100.0));
            }
            _ => panic!("expected an Immediate command"),
        }

        batcher.vertex(ImmediateVertex {
            pos: crate::math::vec3(0.0, 0.0, 0.0),
            tex: crate::math::vec2(0.0, 0.0),
            rgba: 0xFFFF_FFFF,
            normal: crate::math::vec3(0.0, 0.0, 1.0),
        });
        batcher.flush(&mut commands);

        match &commands.commands()[1].data {
            CommandData::Immediate { settings, .. } => {
                assert_eq!((settings.clip_rect.pos.x, settings.clip_rect.dims.x), (10.0, 50.0));
            }
            _ => panic!("expected an Immediate command"),
        }
    }

    #[test]
    fn transform_only_change_still_flushes() {
        let mut batcher = ImmediateBatcher::new();
        let mut commands = buffer();

        batcher.vertex(ImmediateVertex {
            pos: crate::math::vec3(0.0, 0.0, 0.0),
            tex: crate::math::vec2(0.0, 0.0),
            rgba: 0xFFFF_FFFF,
            normal: crate::math::vec3(0.0, 0.0, 1.0),
        });

        let mut next = ImmediateSettings::default();
        next.transform = crate::math::Mat4::from_translation(crate::math::vec3(1.0, 0.0, 0.0));
        batcher.set_settings(&mut commands, next);

        assert_eq!(commands.commands().len(), 1, "changing only transform must flush the pending batch");
    }

    #[test]
    fn empty_clip_rect_defaults_to_view_clip() {
        let mut batcher = ImmediateBatcher::new();
        let mut commands = buffer();
        batcher.vertex(ImmediateVertex {
            pos: crate::math::vec3(0.0, 0.0, 0.0),
            tex: crate::math::vec2(0.0, 0.0),
            rgba: 0xFFFF_FFFF,
            normal: crate::math::vec3(0.0, 0.0, 1.0),
        });
        batcher.flush(&mut commands);

        match &commands.commands()[0].data {
            CommandData::Immediate { settings, .. } => {
                assert_eq!(settings.clip_rect.dims.x, 1920.0);
            }
            _ => panic!("expected an Immediate command"),
        }
    }
}
