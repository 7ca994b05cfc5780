//! The hot/active widget protocol.
//!
//! At most one widget is ever `active`; only the active widget (or no widget, if none is active)
//! can become `hot`. This is the same interaction model popularized by Casey Muratori's IMGUI
//! talks, and it's what makes drag/click behave predictably when widgets overlap during a
//! transition (e.g. a button moving under the cursor mid-drag never steals `hot` from whatever
//! is `active`).

use {
    super::{
        input::{MouseButton, UiInput},
        layout::rect_contains,
    },
    crate::math::{RectF, Vec2},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WidgetColorState {
    Cold,
    Hot,
    Active,
    Fired,
}

/// What happened to a widget this frame; a caller checks `fired` to know "the user activated
/// this control".
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct WidgetEvent {
    pub pressed: bool,
    pub released: bool,
    /// Set alongside `released`, only when the release also happened over the widget's rect
    ///.
    pub fired: bool,
}

/// Tracks which single widget (if any) is hot and which single widget (if any) is active across
/// frames. Owned by [`super::Ui`]; `next_hot` is latched into `hot` at the start of each frame.
#[derive(Default)]
pub struct WidgetInteraction {
    hot: Option<u64>,
    next_hot: Option<u64>,
    active: Option<u64>,
    drag_anchor: Vec2,
}

impl WidgetInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latches `next_hot` into `hot`, but only while no widget is active.
    pub(super) fn begin_frame(&mut self) {
        if self.active.is_none() {
            self.hot = self.next_hot.take();
        } else {
            self.next_hot = None;
        }
    }

    pub fn is_hot(&self, id: u64) -> bool {
        self.hot == Some(id)
    }

    pub fn is_active(&self, id: u64) -> bool {
        self.active == Some(id)
    }

    pub fn drag_delta(&self, rect: RectF, mouse: Vec2) -> Vec2 {
        let center = Vec2::new(rect.pos.x + rect.dims.x * 0.5, rect.pos.y + rect.dims.y * 0.5);
        (mouse - center) - self.drag_anchor
    }

    /// Runs the per-widget state machine for `id` over `rect` against this frame's `input`,
    /// mutating hot/active as needed and returning what happened.
    pub fn behaviour(&mut self, id: u64, rect: RectF, input: &UiInput) -> WidgetEvent {
        let mut event = WidgetEvent::default();
        let over = rect_contains(rect, input.position);

        if self.is_active(id) {
            if input.released(MouseButton::Left) {
                event.released = true;
                event.fired = over;
                self.active = None;
            }
        } else if over && self.active.is_none() {
            self.next_hot = Some(id);

            if input.pressed(MouseButton::Left) {
                event.pressed = true;
                let center = Vec2::new(rect.pos.x + rect.dims.x * 0.5, rect.pos.y + rect.dims.y * 0.5);
                self.drag_anchor = input.position - center;
                self.active = Some(id);
            }
        }

        event
    }

    pub fn color_state(&self, id: u64) -> WidgetColorState {
        if self.is_active(id) {
            WidgetColorState::Active
        } else if self.is_hot(id) {
            WidgetColorState::Hot
        } else {
            WidgetColorState::Cold
        }
    }
}
