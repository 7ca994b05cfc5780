//! Window z-order from outside the crate: two overlapping windows, then a click on the back
//! window's header brings it to front and focuses it.

use quartz_engine::{
    math::{vec2, RectF},
    ui::{MouseButton, Ui},
};

#[test]
fn clicking_a_back_windows_header_raises_and_focuses_it() {
    let mut ui = Ui::new();

    ui.begin(1.0 / 60.0);
    ui.window_begin("A", RectF::new(0.0, 20.0, 100.0, 100.0));
    ui.window_end();
    ui.window_begin("B", RectF::new(50.0, 20.0, 100.0, 100.0));
    ui.window_end();
    ui.end();

    assert_eq!(ui.windows().order().last().unwrap().title, "B");

    // Click inside A's header, which B does not overlap.
    ui.input_mut().submit_mouse_position(vec2(10.0, 10.0));
    ui.input_mut().submit_mouse_button(MouseButton::Left, true);

    ui.begin(1.0 / 60.0);
    ui.window_begin("A", RectF::new(0.0, 20.0, 100.0, 100.0));
    ui.window_end();
    ui.window_begin("B", RectF::new(50.0, 20.0, 100.0, 100.0));
    ui.window_end();
    ui.end();

    assert_eq!(ui.windows().order().last().unwrap().title, "A");
    let a_id = ui.id("A");
    assert!(ui.windows().is_focused(a_id));
}
