//! Windows: draggable, resizable, focus/z-ordered containers.
//!
//! Draw order equals list order, front = the tail of [`WindowManager::order`]; moving a window to
//! front is just removing it from the middle of that list and pushing it back on.

use {
    super::{input::UiInput, layout::rect_contains},
    crate::math::{RectF, Vec2},
};

/// Tray width for the eight-direction resize band around a window's title+content union.
pub const TRAY_WIDTH: f32 = 6.0;
pub const MIN_WINDOW_SIZE: f32 = 64.0;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum DragMode {
    Move,
    ResizeLeft,
    ResizeRight,
    ResizeTop,
    ResizeBottom,
    ResizeTopLeft,
    ResizeTopRight,
    ResizeBottomLeft,
    ResizeBottomRight,
}

pub struct Window {
    pub id: u64,
    pub title: String,
    pub rect: RectF,
    drag: Option<(DragMode, Vec2)>,
}

/// Owns every live window plus z-order and focus. A window's `rect` persists on the `Window`
/// itself rather than in the generic per-id persistent-state map.
#[derive(Default)]
pub struct WindowManager {
    windows: Vec<Window>,
    focused: Option<u64>,
}

impl WindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds the window for `id`, creating it at `default_rect` (pushed to front) if this is the
    /// first frame it's been seen.
    fn get_or_create(&mut self, id: u64, title: &str, default_rect: RectF) -> usize {
        if let Some(index) = self.windows.iter().position(|w| w.id == id) {
            return index;
        }
        self.windows.push(Window {
            id,
            title: title.to_owned(),
            rect: default_rect,
            drag: None,
        });
        self.focused = Some(id);
        self.windows.len() - 1
    }

    fn bring_to_front(&mut self, id: u64) {
        if let Some(index) = self.windows.iter().position(|w| w.id == id) {
            let window = self.windows.remove(index);
            self.windows.push(window);
        }
    }

    pub fn is_focused(&self, id: u64) -> bool {
        self.focused == Some(id)
    }

    /// Draw order, front-most last.
    pub fn order(&self) -> &[Window] {
        &self.windows
    }

    /// Runs one frame of window behaviour: creates the window if new, handles title-drag and
    /// tray-resize, re-focuses/raises on any click inside, defocuses on a click outside every
    /// window. Returns the header rect and the remaining content rect.
    pub fn update(
        &mut self,
        id: u64,
        title: &str,
        default_rect: RectF,
        header_height: f32,
        input: &UiInput,
    ) -> (RectF, RectF) {
        use crate::ui::input::MouseButton;

        let index = self.get_or_create(id, title, default_rect);

        // A click anywhere outside every window defocuses (checked once per frame is fine since
        // windows are processed front-to-back by the caller; the last window checked "wins" a
        // click that lands on more than one, which can't happen because rects don't overlap in
        // mouse-hit order once z-order is respected by the caller).
        if input.pressed(MouseButton::Left) {
            let hit_any = self.windows.iter().any(|w| rect_contains(union_rect(w.rect, header_height), input.position));
            if !hit_any {
                self.focused = None;
            }
        }

        let window = &mut self.windows[index];
        let header_rect = RectF::new(window.rect.pos.x, window.rect.pos.y - header_height, window.rect.dims.x, header_height);
        let union = union_rect(window.rect, header_height);
        let tray = tray_mode(union, input.position);
        let clicked_inside = input.pressed(MouseButton::Left) && rect_contains(union, input.position);

        if clicked_inside {
            let mode = if rect_contains(header_rect, input.position) {
                Some(DragMode::Move)
            } else {
                tray
            };
            if let Some(mode) = mode {
                window.drag = Some((mode, input.position));
            }
            self.focused = Some(id);
            self.bring_to_front(id);
        }

        if input.released(MouseButton::Left) {
            if let Some(w) = self.windows.iter_mut().find(|w| w.id == id) {
                w.drag = None;
            }
        }

        let window = self.windows.iter_mut().find(|w| w.id == id).expect("just created");
        if let Some((mode, anchor)) = window.drag {
            let delta = input.position - anchor;
            apply_drag(&mut window.rect, mode, delta);
            window.drag = Some((mode, input.position));
        }

        let window = self.windows.iter().find(|w| w.id == id).expect("just created");
        let header_rect = RectF::new(window.rect.pos.x, window.rect.pos.y - header_height, window.rect.dims.x, header_height);
        (header_rect, window.rect)
    }
}

fn union_rect(content: RectF, header_height: f32) -> RectF {
    RectF::new(content.pos.x, content.pos.y - header_height, content.dims.x, content.dims.y + header_height)
}

fn tray_mode(union: RectF, mouse: Vec2) -> Option<DragMode> {
    let left = union.pos.x;
    let top = union.pos.y;
    let right = union.pos.x + union.dims.x;
    let bottom = union.pos.y + union.dims.y;

    let near_left = (mouse.x - left).abs() <= TRAY_WIDTH;
    let near_right = (mouse.x - right).abs() <= TRAY_WIDTH;
    let near_top = (mouse.y - top).abs() <= TRAY_WIDTH;
    let near_bottom = (mouse.y - bottom).abs() <= TRAY_WIDTH;

    match (near_left, near_right, near_top, near_bottom) {
        (true, _, true, _) => Some(DragMode::ResizeTopLeft),
        (_, true, true, _) => Some(DragMode::ResizeTopRight),
        (true, _, _, true) => Some(DragMode::ResizeBottomLeft),
        (_, true, _, true) => Some(DragMode::ResizeBottomRight),
        (true, false, false, false) => Some(DragMode::ResizeLeft),
        (false, true, false, false) => Some(DragMode::ResizeRight),
        (false, false, true, false) => Some(DragMode::ResizeTop),
        (false, false, false, true) => Some(DragMode::ResizeBottom),
        _ => None,
    }
}

fn apply_drag(rect: &mut RectF, mode: DragMode, delta: Vec2) {
    match mode {
        DragMode::Move => {
            rect.pos.x += delta.x;
            rect.pos.y += delta.y;
        }
        DragMode::ResizeLeft => extrude_left(rect, delta.x),
        DragMode::ResizeRight => extrude_right(rect, delta.x),
        DragMode::ResizeTop => extrude_top(rect, delta.y),
        DragMode::ResizeBottom => extrude_bottom(rect, delta.y),
        DragMode::ResizeTopLeft => {
            extrude_left(rect, delta.x);
            extrude_top(rect, delta.y);
        }
        DragMode::ResizeTopRight => {
            extrude_right(rect, delta.x);
            extrude_top(rect, delta.y);
        }
        DragMode::ResizeBottomLeft => {
            extrude_left(rect, delta.x);
            extrude_bottom(rect, delta.y);
        }
        DragMode::ResizeBottomRight => {
            extrude_right(rect, delta.x);
            extrude_bottom(rect, delta.y);
        }
    }
}

fn extrude_left(rect: &mut RectF, delta: f32) {
    let new_width = (rect.dims.x - delta).max(MIN_WINDOW_SIZE);
    rect.pos.x += rect.dims.x - new_width;
    rect.dims.x = new_width;
}

fn extrude_right(rect: &mut RectF, delta: f32) {
    rect.dims.x = (rect.dims.x + delta).max(MIN_WINDOW_SIZE);
}

fn extrude_top(rect: &mut RectF, delta: f32) {
    let new_height = (rect.dims.y - delta).max(MIN_WINDOW_SIZE);
    rect.pos.y += rect.dims.y - new_height;
    rect.dims.y = new_height;
}

fn extrude_bottom(rect: &mut RectF, delta: f32) {
    rect.dims.y = (rect.dims.y + delta).max(MIN_WINDOW_SIZE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{math::vec2, ui::input::MouseButton};

    #[test]
    fn clicking_a_back_window_brings_it_to_front_and_focuses_it() {
        let mut windows = WindowManager::new();
        let mut input = UiInput::new();

        windows.update(1, "A", RectF::new(0.0, 20.0, 100.0, 100.0), 20.0, &input);
        windows.update(2, "B", RectF::new(50.0, 20.0, 100.0, 100.0), 20.0, &input);
        assert_eq!(windows.order()[1].id, 2);

        // Click inside A's header (A is behind B, but the header itself does not overlap B).
        input.submit_mouse_position(vec2(10.0, 10.0));
        input.submit_mouse_button(MouseButton::Left, true);
        windows.update(1, "A", RectF::new(0.0, 20.0, 100.0, 100.0), 20.0, &input);

        assert_eq!(windows.order().last().unwrap().id, 1);
        assert!(windows.is_focused(1));
    }

    #[test]
    fn clicking_outside_every_window_defocuses() {
        let mut windows = WindowManager::new();
        let mut input = UiInput::new();
        windows.update(1, "A", RectF::new(0.0, 20.0, 100.0, 100.0), 20.0, &input);
        assert!(windows.is_focused(1));

        input.submit_mouse_position(vec2(900.0, 900.0));
        input.submit_mouse_button(MouseButton::Left, true);
        windows.update(1, "A", RectF::new(0.0, 20.0, 100.0, 100.0), 20.0, &input);
        assert!(!windows.is_focused(1));
    }

    #[test]
    fn dragging_the_title_translates_the_window() {
        let mut windows = WindowManager::new();
        let mut input = UiInput::new();
        windows.update(1, "A", RectF::new(0.0, 20.0, 100.0, 100.0), 20.0, &input);

        input.submit_mouse_position(vec2(10.0, 10.0));
        input.submit_mouse_button(MouseButton::Left, true);
        windows.update(1, "A", RectF::new(0.0, 20.0, 100.0, 100.0), 20.0, &input);
        input.begin_frame();

        input.submit_mouse_position(vec2(30.0, 25.0));
        let (_, content) = windows.update(1, "A", RectF::new(0.0, 20.0, 100.0, 100.0), 20.0, &input);
        assert_eq!(content.pos.x, 20.0);
        assert_eq!(content.pos.y, 35.0);
    }
}
