//! The UI-rect pool: `r_ui_rect` appends to a shared buffer; flushing is driven purely by texture
//! changes, same shape as the immediate-mode batcher but without settings beyond the one texture
//!.

use {
    super::{command::CommandData, CommandBuffer, Layer},
    crate::{
        math::RectF,
        mem::{Handle, StretchyBuffer},
        rhi::Texture,
    },
};

/// One instanced quad: screen-space rect, texture-space rect, and a packed RGBA tint.
#[derive(Clone, Copy, Debug)]
pub struct UiRect {
    pub rect: RectF,
    pub uv_rect: RectF,
    pub rgba: u32,
}

pub struct UiRectPool {
    rects: StretchyBuffer<UiRect>,
    run_start: u32,
    texture: Option<Handle<Texture>>,
}

impl UiRectPool {
    pub fn new() -> Self {
        Self {
            rects: StretchyBuffer::new(),
            run_start: 0,
            texture: None,
        }
    }

    /// Appends a rect under `texture`, flushing first if the texture changed.
    pub fn push(&mut self, commands: &mut CommandBuffer, texture: Option<Handle<Texture>>, rect: UiRect) {
        if texture != self.texture && self.rects.count() > self.run_start {
            self.flush(commands);
        }
        self.texture = texture;
        self.rects.push(rect);
    }

    pub fn flush(&mut self, commands: &mut CommandBuffer) {
        let end = self.rects.count();
        if end == self.run_start {
            return;
        }

        let data = CommandData::UiRects {
            first: self.run_start,
            count: end - self.run_start,
            texture: self.texture,
        };
        commands.submit_command(Layer::Ui, Layer::Ui, data.kind(), 0.0, 0, data, 0);

        self.run_start = end;
    }

    pub fn rects(&self) -> &[UiRect] {
        self.rects.as_slice()
    }

    pub fn clear(&mut self) {
        self.rects.clear();
        self.run_start = 0;
        self.texture = None;
    }
}

impl Default for UiRectPool {
    fn default() -> Self {
        Self::new()
    }
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

    fn rect() -> UiRect {
        UiRect {
            rect: RectF::new(0.0, 0.0, 10.0, 10.0),
            uv_rect: RectF::new(0.0, 0.0, 1.0, 1.0),
            rgba: 0xFFFF_FFFF,
        }
    }

    #[test]
    fn texture_change_flushes_a_new_run() {
        let mut pool = UiRectPool::new();
        let mut commands = buffer();

        pool.push(&mut commands, None, rect());
        pool.push(&mut commands, None, rect());
        pool.push(&mut commands, Some(Handle::NULL), rect());
        pool.flush(&mut commands);

        assert_eq!(commands.commands().len(), 2);
        match &commands.commands()[0].data {
            CommandData::UiRects { first, count, .. } => {
                assert_eq!((*first, *count), (0, 2));
            }
            _ => panic!("expected UiRects"),
        }
    }
}
