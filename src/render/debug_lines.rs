//! Debug line ring: carried over from the original's `r_immediate_line` diagram drawing
//! (supplemental feature, not excluded by any named non-goal). A small per-frame buffer of line
//! segments consumed by the debug-line pass; unlike the immediate batcher it has no settings to
//! flush on, so it emits at most one command per frame.

use {
    super::{command::CommandData, CommandBuffer, Layer},
    crate::math::Vec3,
    crate::mem::StretchyBuffer,
};

/// One world-space line segment with a packed RGBA color, duplicated onto both endpoints so the
/// pass can feed a plain line-list draw without per-vertex indexing.
#[derive(Clone, Copy, Debug)]
pub struct DebugLineVertex {
    pub position: Vec3,
    pub rgba: u32,
}

pub struct DebugLineRing {
    vertices: StretchyBuffer<DebugLineVertex>,
    run_start: u32,
}

impl DebugLineRing {
    pub fn new() -> Self {
        Self {
            vertices: StretchyBuffer::new(),
            run_start: 0,
        }
    }

    pub fn push(&mut self, start: Vec3, end: Vec3, rgba: u32) {
        self.vertices.push(DebugLineVertex { position: start, rgba });
        self.vertices.push(DebugLineVertex { position: end, rgba });
    }

    /// Submits the accumulated segments as one `DebugLines` command, if any were pushed this
    /// frame.
    pub fn flush(&mut self, commands: &mut CommandBuffer) {
        let end = self.vertices.count();
        if end == self.run_start {
            return;
        }

        let data = CommandData::DebugLines {
            first: self.run_start,
            count: end - self.run_start,
        };
        commands.submit_command(Layer::Scene, Layer::Scene, data.kind(), 0.0, 0, data, 0);

        self.run_start = end;
    }

    pub fn vertices(&self) -> &[DebugLineVertex] {
        self.vertices.as_slice()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.run_start = 0;
    }
}

impl Default for DebugLineRing {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::command::ViewParams;
    use crate::math::RectF;

    fn buffer() -> CommandBuffer {
        let mut buf = CommandBuffer::new(super::super::key::DEFAULT_FAR);
        buf.push_view(ViewParams {
            world_to_clip: crate::math::Mat4::IDENTITY,
            clip_rect: RectF::new(0.0, 0.0, 1920.0, 1080.0),
        });
        buf
    }

    #[test]
    fn empty_ring_emits_no_command() {
        let mut ring = DebugLineRing::new();
        let mut commands = buffer();
        ring.flush(&mut commands);
        assert_eq!(commands.commands().len(), 0);
    }

    #[test]
    fn each_segment_contributes_two_vertices() {
        let mut ring = DebugLineRing::new();
        let mut commands = buffer();

        ring.push(Vec3::ZERO, Vec3::X, 0xFFFF_FFFF);
        ring.push(Vec3::Y, Vec3::Z, 0xFF00_00FF);
        ring.flush(&mut commands);

        assert_eq!(commands.commands().len(), 1);
        match &commands.commands()[0].data {
            CommandData::DebugLines { first, count } => {
                assert_eq!((*first, *count), (0, 4));
            }
            _ => panic!("expected DebugLines"),
        }
        assert_eq!(ring.vertices().len(), 4);
    }

    #[test]
    fn clear_resets_the_run_and_drops_vertices() {
        let mut ring = DebugLineRing::new();
        ring.push(Vec3::ZERO, Vec3::X, 0xFFFF_FFFF);
        ring.clear();
        assert_eq!(ring.vertices().len(), 0);

        let mut commands = buffer();
        ring.flush(&mut commands);
        assert_eq!(commands.commands().len(), 0);
    }
}
