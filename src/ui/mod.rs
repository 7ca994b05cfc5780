//! Immediate-mode UI: a retained-state IMGUI with interpolated per-widget animation, windows with
//! focus/z-order, and scrollable panels.
//!
//! Callers drive it the same way every frame: feed input via `submit_*` on [`input::UiInput`],
//! call [`Ui::begin`], build windows/panels/widgets (each call both updates persistent state and
//! lowers to [`crate::render::Frame`]'s UI-rect pool), then call [`Ui::end`].

mod anim;
mod id;
mod input;
mod layout;
mod style;
mod widget;
mod window;

pub use self::{
    anim::AnimState,
    id::{ui_id, ui_id_pointer, ROOT_SEED},
    input::{CursorHint, MouseButton, UiInput},
    layout::{Panel, PanelFlags},
    style::{Rgba, Style, StyleValues},
    widget::{WidgetColorState, WidgetEvent, WidgetInteraction},
    window::{Window, WindowManager, MIN_WINDOW_SIZE, TRAY_WIDTH},
};

use crate::{
    math::RectF,
    render::{Frame, UiRect},
};

const SCROLL_SPEED: f32 = 16.0;

#[derive(Clone, Copy)]
struct Tracked<T> {
    value: T,
    last_touched: u64,
}

/// Top-level UI state: id scoping, input, interaction, windows/panels, style, and the two
/// GC'd-by-frame-index pools that back persistent per-widget state.
pub struct Ui {
    frame_index: u64,
    input: UiInput,
    id_stack: Vec<u64>,
    interaction: WidgetInteraction,
    panels: Vec<Panel>,
    windows: WindowManager,
    style: Style,
    anims: std::collections::HashMap<u64, Tracked<AnimState>>,
    persistent: std::collections::HashMap<u64, Tracked<f32>>,
}

impl Ui {
    pub fn new() -> Self {
        Self {
            frame_index: 0,
            input: UiInput::new(),
            id_stack: vec![ROOT_SEED],
            interaction: WidgetInteraction::new(),
            panels: Vec::new(),
            windows: WindowManager::new(),
            style: Style::new(),
            anims: std::collections::HashMap::new(),
            persistent: std::collections::HashMap::new(),
        }
    }

    pub fn input_mut(&mut self) -> &mut UiInput {
        &mut self.input
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    fn current_seed(&self) -> u64 {
        *self.id_stack.last().expect("id stack is never empty")
    }

    /// Hashes `label` against the current scope without pushing it; widgets use this directly.
    pub fn id(&self, label: &str) -> u64 {
        ui_id(self.current_seed(), label)
    }

    fn push_id_scope(&mut self, id: u64) {
        self.id_stack.push(id);
    }

    fn pop_id_scope(&mut self) {
        assert!(self.id_stack.len() > 1, "pop_id_scope without a matching push");
        self.id_stack.pop();
    }

    fn touch_persistent(&mut self, id: u64, default: f32) -> f32 {
        let frame_index = self.frame_index;
        self.persistent
            .entry(id)
            .and_modify(|t| t.last_touched = frame_index)
            .or_insert(Tracked { value: default, last_touched: frame_index })
            .value
    }

    fn set_persistent(&mut self, id: u64, value: f32) {
        let frame_index = self.frame_index;
        self.persistent.insert(id, Tracked { value, last_touched: frame_index });
    }

    /// Steps (or creates) the spring driving `id`'s display color toward `state`, returning the
    /// color to draw this frame.
    fn animate_color(&mut self, id: u64, state: WidgetColorState) -> Rgba {
        let style = self.style.current();
        let target = state_value(state);
        let frame_index = self.frame_index;

        let tracked = self.anims.entry(id).or_insert_with(|| Tracked {
            value: AnimState::new(target, style.anim_stiffness, style.anim_damping),
            last_touched: frame_index,
        });
        tracked.last_touched = frame_index;
        tracked.value.set_target(target);

        color_for_value(&style, tracked.value.current)
    }

    /// Begins a frame: advances the frame index, latches `hot`, steps every tracked spring, and
    /// garbage-collects persistent/animation state untouched since before the previous frame
    ///.
    pub fn begin(&mut self, dt: f32) {
        assert!(self.panels.is_empty(), "panel stack not empty at begin (missing pop_panel)");
        assert_eq!(self.id_stack.len(), 1, "id stack not empty at begin (missing pop_id)");

        self.frame_index += 1;
        self.input.begin_frame();
        self.interaction.begin_frame();

        for tracked in self.anims.values_mut() {
            tracked.value.step(dt);
        }

        let cutoff = self.frame_index.saturating_sub(1);
        self.anims.retain(|_, t| t.last_touched >= cutoff);
        self.persistent.retain(|_, t| t.last_touched >= cutoff);
    }

    /// Ends a frame: asserts every panel/id scope was balanced`... asserts the
    /// panel stack and id stack are empty").
    pub fn end(&mut self) {
        assert!(self.panels.is_empty(), "panel stack not empty at end (missing pop_panel)");
        assert_eq!(self.id_stack.len(), 1, "id stack not empty at end (missing pop_id)");
    }

    pub fn cursor_hint(&self) -> CursorHint {
        self.input.cursor_hint()
    }

    // --- Panels -----------------------------------------------------------------------------

    pub fn push_panel(&mut self, label: &str, rect: RectF, flags: PanelFlags) -> u64 {
        let id = self.id(label);
        self.push_id_scope(id);

        let mut scroll_offset = self.touch_persistent(id, 0.0);
        if flags.contains(PanelFlags::SCROLLABLE_VERTICAL) && layout::rect_contains(rect, self.input.position) {
            scroll_offset = (scroll_offset - self.input.wheel * SCROLL_SPEED).max(0.0);
        }

        self.panels.push(Panel::new(id, rect, flags, scroll_offset));
        id
    }

    pub fn pop_panel(&mut self) {
        let panel = self.panels.pop().expect("pop_panel without a matching push_panel");
        let max_offset = (panel.content_height() - panel.view_rect().dims.y).max(0.0);
        self.set_persistent(panel.id, panel.scroll_offset.min(max_offset));
        self.pop_id_scope();
    }

    pub fn panel(&mut self) -> &mut Panel {
        self.panels.last_mut().expect("no active panel")
    }

    // --- Windows -----------------------------------------------------------------------------

    /// Header height used for every window's title bar.
    pub const HEADER_HEIGHT: f32 = 24.0;

    /// Runs one window's frame: creates it on first use, handles drag/resize/focus, and returns
    /// the content rect a subsequent [`Self::push_panel`] should lay out into. Must be paired
    /// with [`Self::window_end`].
    pub fn window_begin(&mut self, title: &str, default_rect: RectF) -> RectF {
        let id = self.id(title);
        let (_, content) = self.windows.update(id, title, default_rect, Self::HEADER_HEIGHT, &self.input);
        self.push_id_scope(id);
        content
    }

    pub fn window_end(&mut self) {
        self.pop_id_scope();
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    // --- Widgets -----------------------------------------------------------------------------

    pub fn button(&mut self, frame: &mut Frame, label: &str, rect: RectF) -> WidgetEvent {
        let id = self.id(label);
        let event = self.interaction.behaviour(id, rect, &self.input);
        self.draw_widget_rect(frame, id, rect);
        event
    }

    pub fn checkbox(&mut self, frame: &mut Frame, label: &str, rect: RectF, value: &mut bool) -> WidgetEvent {
        let id = self.id(label);
        let event = self.interaction.behaviour(id, rect, &self.input);
        if event.fired {
            *value = !*value;
        }
        self.draw_widget_rect(frame, id, rect);
        event
    }

    /// A horizontal slider: dragging anywhere on the track sets `value` proportionally to the
    /// pointer's x position within `rect`.
    pub fn slider(&mut self, frame: &mut Frame, label: &str, rect: RectF, value: &mut f32, min: f32, max: f32) -> WidgetEvent {
        let id = self.id(label);
        let event = self.interaction.behaviour(id, rect, &self.input);

        if self.interaction.is_active(id) && rect.dims.x > 0.0 {
            let t = ((self.input.position.x - rect.pos.x) / rect.dims.x).clamp(0.0, 1.0);
            *value = min + t * (max - min);
        }

        self.draw_widget_rect(frame, id, rect);

        let ratio = if max > min { ((*value - min) / (max - min)).clamp(0.0, 1.0) } else { 0.0 };
        let handle_width = (rect.dims.x * self.style.current().slider_ratio).max(4.0);
        let handle = RectF::new(
            rect.pos.x + ratio * (rect.dims.x - handle_width),
            rect.pos.y,
            handle_width,
            rect.dims.y,
        );
        let color = self.animate_color(id, WidgetColorState::Active);
        frame.ui_rects.push(
            &mut frame.commands,
            None,
            UiRect { rect: handle, uv_rect: RectF::new(0.0, 0.0, 1.0, 1.0), rgba: color.0 },
        );

        event
    }

    fn draw_widget_rect(&mut self, frame: &mut Frame, id: u64, rect: RectF) {
        let color = self.animate_color(id, self.interaction.color_state(id));
        frame.ui_rects.push(&mut frame.commands, None, UiRect { rect, uv_rect: RectF::new(0.0, 0.0, 1.0, 1.0), rgba: color.0 });
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

fn state_value(state: WidgetColorState) -> f32 {
    match state {
        WidgetColorState::Cold => 0.0,
        WidgetColorState::Hot => 1.0,
        WidgetColorState::Active => 2.0,
        WidgetColorState::Fired => 3.0,
    }
}

fn lerp_channel(a: u32, b: u32, shift: u32, t: f32) -> u32 {
    let a = ((a >> shift) & 0xFF) as f32;
    let b = ((b >> shift) & 0xFF) as f32;
    (((a + (b - a) * t).clamp(0.0, 255.0)) as u32) << shift
}

fn color_for_value(style: &StyleValues, value: f32) -> Rgba {
    let clamped = value.clamp(0.0, 3.0);
    let lo = clamped.floor() as i32;
    let hi = (lo + 1).min(3);
    let t = clamped - lo as f32;

    let pick = |i: i32| -> u32 {
        match i {
            0 => style.color_cold.0,
            1 => style.color_hot.0,
            2 => style.color_active.0,
            _ => style.color_fired.0,
        }
    };
    let (a, b) = (pick(lo), pick(hi));

    Rgba(lerp_channel(a, b, 24, t) | lerp_channel(a, b, 16, t) | lerp_channel(a, b, 8, t) | lerp_channel(a, b, 0, t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ViewParams;

    fn frame() -> Frame {
        let mut frame = Frame::new();
        frame.commands.push_view(ViewParams {
            world_to_clip: crate::math::Mat4::IDENTITY,
            clip_rect: RectF::new(0.0, 0.0, 1920.0, 1080.0),
        });
        frame
    }

    #[test]
    fn button_fires_on_press_then_release_inside() {
        let mut ui = Ui::new();
        let mut f = frame();
        let rect = RectF::new(0.0, 0.0, 40.0, 20.0);

        ui.begin(1.0 / 60.0);
        ui.button(&mut f, "ok", rect);
        ui.end();

        ui.input_mut().submit_mouse_position(crate::math::vec2(10.0, 10.0));
        ui.input_mut().submit_mouse_button(MouseButton::Left, true);
        ui.begin(1.0 / 60.0);
        let pressed = ui.button(&mut f, "ok", rect);
        ui.end();
        assert!(pressed.pressed);

        ui.input_mut().submit_mouse_button(MouseButton::Left, false);
        ui.begin(1.0 / 60.0);
        let released = ui.button(&mut f, "ok", rect);
        ui.end();
        assert!(released.fired);
    }

    #[test]
    fn checkbox_toggles_on_fire() {
        let mut ui = Ui::new();
        let mut f = frame();
        let rect = RectF::new(0.0, 0.0, 20.0, 20.0);
        let mut value = false;

        ui.input_mut().submit_mouse_position(crate::math::vec2(5.0, 5.0));
        ui.input_mut().submit_mouse_button(MouseButton::Left, true);
        ui.begin(1.0 / 60.0);
        ui.checkbox(&mut f, "cb", rect, &mut value);
        ui.end();

        ui.input_mut().submit_mouse_button(MouseButton::Left, false);
        ui.begin(1.0 / 60.0);
        ui.checkbox(&mut f, "cb", rect, &mut value);
        ui.end();

        assert!(value);
    }

    #[test]
    fn panel_scope_must_balance() {
        let mut ui = Ui::new();
        ui.begin(1.0 / 60.0);
        ui.push_panel("p", RectF::new(0.0, 0.0, 100.0, 100.0), PanelFlags::empty());
        // intentionally not popped
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| ui.end()));
        assert!(result.is_err());
    }

    #[test]
    fn unused_animation_state_is_garbage_collected() {
        let mut ui = Ui::new();
        let mut f = frame();
        let rect = RectF::new(0.0, 0.0, 20.0, 20.0);

        ui.begin(1.0 / 60.0);
        ui.button(&mut f, "transient", rect);
        ui.end();
        assert_eq!(ui.anims.len(), 1);

        // Three frames without touching "transient" should drop its animation state.
        for _ in 0..3 {
            ui.begin(1.0 / 60.0);
            ui.end();
        }
        assert!(ui.anims.is_empty());
    }
}
