//! Rect-cut layout and the panel stack.
//!
//! Each panel owns a shrinking "remaining" rect; `add_top`/`add_bottom`/`add_left`/`add_right`
//! carve a strip off one side and return it, the same rect-cut technique described in Martin
//! Donald's write-up that the original engine's panel code is itself an implementation of.

use crate::math::RectF;

fn cut_top(rect: &mut RectF, amount: f32) -> RectF {
    let amount = amount.min(rect.dims.y).max(0.0);
    let cut = RectF::new(rect.pos.x, rect.pos.y, rect.dims.x, amount);
    rect.pos.y += amount;
    rect.dims.y -= amount;
    cut
}

fn cut_bottom(rect: &mut RectF, amount: f32) -> RectF {
    let amount = amount.min(rect.dims.y).max(0.0);
    rect.dims.y -= amount;
    RectF::new(rect.pos.x, rect.pos.y + rect.dims.y, rect.dims.x, amount)
}

fn cut_left(rect: &mut RectF, amount: f32) -> RectF {
    let amount = amount.min(rect.dims.x).max(0.0);
    let cut = RectF::new(rect.pos.x, rect.pos.y, amount, rect.dims.y);
    rect.pos.x += amount;
    rect.dims.x -= amount;
    cut
}

fn cut_right(rect: &mut RectF, amount: f32) -> RectF {
    let amount = amount.min(rect.dims.x).max(0.0);
    rect.dims.x -= amount;
    RectF::new(rect.pos.x + rect.dims.x, rect.pos.y, amount, rect.dims.y)
}

pub fn rect_contains(rect: RectF, point: crate::math::Vec2) -> bool {
    point.x >= rect.pos.x
        && point.y >= rect.pos.y
        && point.x < rect.pos.x + rect.dims.x
        && point.y < rect.pos.y + rect.dims.y
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PanelFlags(u32);

impl PanelFlags {
    pub const NONE: Self = Self(0);
    pub const SCROLLABLE_VERTICAL: Self = Self(1 << 0);

    pub const fn empty() -> Self {
        Self::NONE
    }

    pub const fn contains(self, flag: Self) -> bool {
        self.0 & flag.0 == flag.0
    }
}

impl std::ops::BitOr for PanelFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// One entry on the panel stack: a rect-cut cursor plus (if scrollable) the bookkeeping needed
/// to clamp and apply a scroll offset once the panel's content height is known.
pub struct Panel {
    pub id: u64,
    pub flags: PanelFlags,
    view_rect: RectF,
    cursor: RectF,
    pub scroll_offset: f32,
}

impl Panel {
    pub fn new(id: u64, rect: RectF, flags: PanelFlags, scroll_offset: f32) -> Self {
        Self {
            id,
            flags,
            view_rect: rect,
            cursor: rect,
            scroll_offset,
        }
    }

    fn translate_vertical(&self, mut rect: RectF) -> RectF {
        if self.flags.contains(PanelFlags::SCROLLABLE_VERTICAL) {
            rect.pos.y -= self.scroll_offset;
        }
        rect
    }

    pub fn add_top(&mut self, amount: f32) -> RectF {
        self.translate_vertical(cut_top(&mut self.cursor, amount))
    }

    pub fn add_bottom(&mut self, amount: f32) -> RectF {
        self.translate_vertical(cut_bottom(&mut self.cursor, amount))
    }

    pub fn add_left(&mut self, amount: f32) -> RectF {
        self.translate_vertical(cut_left(&mut self.cursor, amount))
    }

    pub fn add_right(&mut self, amount: f32) -> RectF {
        self.translate_vertical(cut_right(&mut self.cursor, amount))
    }

    /// The rect still available for further cuts, in view (untranslated) space.
    pub fn remaining(&self) -> RectF {
        self.cursor
    }

    pub fn view_rect(&self) -> RectF {
        self.view_rect
    }

    /// How much vertical space has been consumed by cuts so far — the content height a
    /// scrollable panel clamps its offset against.
    pub fn content_height(&self) -> f32 {
        (self.view_rect.dims.y - self.cursor.dims.y).max(0.0)
    }

    /// Feeds a frame's wheel delta in, clamping the resulting offset to `[0, content_height -
    /// view_height]`.
    pub fn scroll(&mut self, wheel_delta: f32, scroll_speed: f32) {
        if !self.flags.contains(PanelFlags::SCROLLABLE_VERTICAL) {
            return;
        }
        let max_offset = (self.content_height() - self.view_rect.dims.y).max(0.0);
        self.scroll_offset = (self.scroll_offset - wheel_delta * scroll_speed).clamp(0.0, max_offset);
    }
}
