//! The render front-end: collects one frame into a sorted command list for the passes to consume
//!. Nothing here talks to the RHI directly; it only builds data the passes iterate.

mod command;
mod debug_lines;
mod immediate;
mod key;
mod ui_rect;

pub use self::{
    command::{Command, CommandBuffer, CommandData, ViewParams},
    debug_lines::{DebugLineRing, DebugLineVertex},
    immediate::{BlendMode, CullMode, ImmediateBatcher, ImmediateSettings, ImmediateVertex},
    key::{pack_sort_key, quantize_depth, radix_sort_by_key, CommandKind, Layer, DEFAULT_FAR},
    ui_rect::{UiRect, UiRectPool},
};

/// One frame's worth of front-end state: the command buffer plus the batchers that feed it.
pub struct Frame {
    pub commands: CommandBuffer,
    pub immediate: ImmediateBatcher,
    pub ui_rects: UiRectPool,
    pub debug_lines: DebugLineRing,
}

impl Frame {
    pub fn new() -> Self {
        Self {
            commands: CommandBuffer::new(DEFAULT_FAR),
            immediate: ImmediateBatcher::new(),
            ui_rects: UiRectPool::new(),
            debug_lines: DebugLineRing::new(),
        }
    }

    /// Flushes every batcher and sorts the accumulated commands; call once per frame, after the
    /// caller has finished submitting.
    pub fn finish(&mut self) {
        self.immediate.flush(&mut self.commands);
        self.ui_rects.flush(&mut self.commands);
        self.debug_lines.flush(&mut self.commands);
        self.commands.sort();
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.immediate.clear();
        self.ui_rects.clear();
        self.debug_lines.clear();
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}
