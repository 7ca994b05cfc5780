//! Per-frame command buffer: views, submitted draw commands, and the POD data heap they point
//! into.

use {
    super::key::{self, CommandKind, Layer},
    crate::{
        math::{Mat4, RectF},
        mem::Handle,
        rhi::{Mesh, Texture},
    },
};

/// Parameters for one view (camera); `push_view`/`pop_view` reference these by index.
#[derive(Clone, Copy, Debug)]
pub struct ViewParams {
    pub world_to_clip: Mat4,
    pub clip_rect: RectF,
}

/// The payload a submitted command carries. Rust's tagged union replaces the original's untyped
/// `alloc_command_data` blob plus a `kind` enum — same contract (POD payload keyed by kind), no
/// unsafe reinterpretation needed at consumption time.
#[derive(Clone, Debug)]
pub enum CommandData {
    Mesh {
        mesh: Handle<Mesh>,
        albedo: Option<Handle<Texture>>,
        lightmap: Option<Handle<Texture>>,
        transform: Mat4,
    },
    Immediate {
        settings: super::immediate::ImmediateSettings,
        vertex_range: (u32, u32),
        index_range: (u32, u32),
    },
    UiRects {
        first: u32,
        count: u32,
        texture: Option<Handle<Texture>>,
    },
    DebugLines {
        first: u32,
        count: u32,
    },
}

impl CommandData {
    /// The `kind` tag that goes into the sort key's 4-bit `kind` field (spec §3) for this
    /// payload's variant.
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Mesh { .. } => CommandKind::Mesh,
            Self::Immediate { .. } => CommandKind::Immediate,
            Self::UiRects { .. } => CommandKind::UiRects,
            Self::DebugLines { .. } => CommandKind::DebugLines,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Command {
    pub key: u64,
    pub data: CommandData,
    /// Caller-supplied opaque tag (e.g. entity id), carried through unsorted for debugging.
    pub identifier: u64,
}

/// Collects one frame's render commands, to be radix-sorted and consumed by the passes.
pub struct CommandBuffer {
    views: Vec<ViewParams>,
    view_stack: Vec<u8>,
    commands: Vec<Command>,
    far: f32,
}

const MAX_VIEWS: usize = 16;

impl CommandBuffer {
    pub fn new(far: f32) -> Self {
        Self {
            views: Vec::new(),
            view_stack: Vec::new(),
            commands: Vec::new(),
            far,
        }
    }

    /// Allocates a new view index (at most [`MAX_VIEWS`] live at once) and pushes it; every
    /// subsequent `submit_command` inherits it until the matching `pop_view`.
    pub fn push_view(&mut self, view: ViewParams) -> u8 {
        assert!(self.views.len() < MAX_VIEWS, "too many concurrent views");
        let index = self.views.len() as u8;
        self.views.push(view);
        self.view_stack.push(index);
        index
    }

    pub fn pop_view(&mut self) {
        self.view_stack.pop().expect("pop_view without a matching push_view");
    }

    pub fn current_view(&self) -> u8 {
        *self.view_stack.last().expect("no active view")
    }

    pub fn view_params(&self, index: u8) -> &ViewParams {
        &self.views[index as usize]
    }

    /// Pushes one command, per spec §4.5's `submit_command(kind, depth, material_id, data_ptr,
    /// identifier)` contract (`view_layer`/`screen_layer` select the two layer bits of the key).
    /// Callers normally pass `data.kind()`; see [`CommandData::kind`].
    pub fn submit_command(
        &mut self,
        view_layer: Layer,
        screen_layer: Layer,
        kind: CommandKind,
        depth: f32,
        material_id: u32,
        data: CommandData,
        identifier: u64,
    ) {
        let key = key::pack_sort_key(screen_layer, view_layer, self.current_view(), kind, depth, self.far, material_id);
        self.commands.push(Command { key, data, identifier });
    }

    /// Sorts the accumulated commands in place.
    pub fn sort(&mut self) {
        key::radix_sort_by_key(&mut self.commands, |c| c.key);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.views.clear();
        self.view_stack.clear();
        self.commands.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> ViewParams {
        ViewParams {
            world_to_clip: crate::math::Mat4::IDENTITY,
            clip_rect: RectF::new(0.0, 0.0, 1920.0, 1080.0),
        }
    }

    #[test]
    fn sorted_commands_are_monotonic_by_key() {
        let mut buf = CommandBuffer::new(key::DEFAULT_FAR);
        buf.push_view(view());
        for depth in [30.0, 10.0, 20.0] {
            let data = CommandData::DebugLines { first: 0, count: 0 };
            buf.submit_command(Layer::Scene, Layer::Scene, data.kind(), depth, 0, data, 0);
        }
        buf.sort();
        let keys: Vec<u64> = buf.commands().iter().map(|c| c.key).collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    #[should_panic(expected = "without a matching push_view")]
    fn unbalanced_pop_view_panics() {
        let mut buf = CommandBuffer::new(key::DEFAULT_FAR);
        buf.pop_view();
    }
}
