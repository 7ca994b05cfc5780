//! Per-frame input feed.
//!
//! The host pumps `submit_*` calls (translated from whatever window-system events it received)
//! before calling [`super::Ui::begin`]; this module owns none of the platform event translation,
//! only the pressed/released edge tracking every widget reads.

use crate::math::Vec2;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

const BUTTON_COUNT: usize = 3;

fn button_index(button: MouseButton) -> usize {
    match button {
        MouseButton::Left => 0,
        MouseButton::Right => 1,
        MouseButton::Middle => 2,
    }
}

/// A cursor shape hint a widget can request for the current frame (e.g. a resize tray wants a
/// diagonal-resize cursor); the platform host is responsible for actually setting it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CursorHint {
    Arrow,
    Text,
    ResizeHorizontal,
    ResizeVertical,
    ResizeDiagonal,
}

/// Accumulated mouse/keyboard state for one UI frame.
#[derive(Clone, Debug)]
pub struct UiInput {
    down: [bool; BUTTON_COUNT],
    pressed: [bool; BUTTON_COUNT],
    released: [bool; BUTTON_COUNT],
    pub position: Vec2,
    pub previous_position: Vec2,
    pub wheel: f32,
    pub text: String,
    cursor_hint: CursorHint,
}

impl UiInput {
    pub fn new() -> Self {
        Self {
            down: [false; BUTTON_COUNT],
            pressed: [false; BUTTON_COUNT],
            released: [false; BUTTON_COUNT],
            position: Vec2::ZERO,
            previous_position: Vec2::ZERO,
            wheel: 0.0,
            text: String::new(),
            cursor_hint: CursorHint::Arrow,
        }
    }

    pub fn submit_mouse_button(&mut self, button: MouseButton, down: bool) {
        let i = button_index(button);
        if down && !self.down[i] {
            self.pressed[i] = true;
        } else if !down && self.down[i] {
            self.released[i] = true;
        }
        self.down[i] = down;
    }

    pub fn submit_mouse_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn submit_wheel(&mut self, delta: f32) {
        self.wheel += delta;
    }

    pub fn submit_text(&mut self, utf8: &str) {
        self.text.push_str(utf8);
    }

    pub fn down(&self, button: MouseButton) -> bool {
        self.down[button_index(button)]
    }

    pub fn pressed(&self, button: MouseButton) -> bool {
        self.pressed[button_index(button)]
    }

    pub fn released(&self, button: MouseButton) -> bool {
        self.released[button_index(button)]
    }

    pub fn request_cursor(&mut self, hint: CursorHint) {
        self.cursor_hint = hint;
    }

    pub fn cursor_hint(&self) -> CursorHint {
        self.cursor_hint
    }

    /// Called once per frame by [`super::Ui::begin`], after the previous frame's edges have been
    /// read: clears the one-frame `pressed`/`released` latches and rolls `position` forward.
    pub(super) fn begin_frame(&mut self) {
        self.pressed = [false; BUTTON_COUNT];
        self.released = [false; BUTTON_COUNT];
        self.previous_position = self.position;
        self.wheel = 0.0;
        self.text.clear();
        self.cursor_hint = CursorHint::Arrow;
    }
}

impl Default for UiInput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_then_release_edges_latch_for_one_frame_each() {
        let mut input = UiInput::new();

        input.submit_mouse_button(MouseButton::Left, true);
        assert!(input.pressed(MouseButton::Left));
        assert!(input.down(MouseButton::Left));

        input.begin_frame();
        assert!(!input.pressed(MouseButton::Left));
        assert!(input.down(MouseButton::Left));

        input.submit_mouse_button(MouseButton::Left, false);
        assert!(input.released(MouseButton::Left));
        assert!(!input.down(MouseButton::Left));

        input.begin_frame();
        assert!(!input.released(MouseButton::Left));
    }

    #[test]
    fn wheel_accumulates_until_begin_frame() {
        let mut input = UiInput::new();
        input.submit_wheel(1.0);
        input.submit_wheel(0.5);
        assert_eq!(input.wheel, 1.5);
        input.begin_frame();
        assert_eq!(input.wheel, 0.0);
    }
}
