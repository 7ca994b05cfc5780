//! Command sort order from outside the crate: scene commands sort before UI commands (so UI
//! draws on top), and within a layer, nearer depth sorts first.

use quartz_engine::{
    math::{Mat4, RectF},
    render::{CommandBuffer, CommandData, Layer, ViewParams, DEFAULT_FAR},
};

fn view() -> ViewParams {
    ViewParams { world_to_clip: Mat4::IDENTITY, clip_rect: RectF::new(0.0, 0.0, 1920.0, 1080.0) }
}

fn debug_lines() -> CommandData {
    CommandData::DebugLines { first: 0, count: 0 }
}

#[test]
fn scene_commands_sort_before_ui_commands_so_ui_draws_on_top() {
    let mut buf = CommandBuffer::new(DEFAULT_FAR);
    buf.push_view(view());

    let data = debug_lines();
    buf.submit_command(Layer::Ui, Layer::Ui, data.kind(), 0.0, 0, data, 1);
    let data = debug_lines();
    buf.submit_command(Layer::Scene, Layer::Scene, data.kind(), 0.0, 0, data, 2);
    buf.sort();

    let identifiers: Vec<u64> = buf.commands().iter().map(|c| c.identifier).collect();
    assert_eq!(identifiers, vec![2, 1], "scene command should precede the UI command after sort");
}

#[test]
fn nearer_commands_sort_before_farther_ones_within_the_scene_layer() {
    let mut buf = CommandBuffer::new(DEFAULT_FAR);
    buf.push_view(view());

    let data = debug_lines();
    buf.submit_command(Layer::Scene, Layer::Scene, data.kind(), 50.0, 0, data, 1);
    let data = debug_lines();
    buf.submit_command(Layer::Scene, Layer::Scene, data.kind(), 5.0, 0, data, 2);
    let data = debug_lines();
    buf.submit_command(Layer::Scene, Layer::Scene, data.kind(), 25.0, 0, data, 3);
    buf.sort();

    let identifiers: Vec<u64> = buf.commands().iter().map(|c| c.identifier).collect();
    assert_eq!(identifiers, vec![2, 3, 1]);
}

#[test]
fn kind_breaks_ties_when_view_layer_depth_and_material_all_match() {
    let mut buf = CommandBuffer::new(DEFAULT_FAR);
    buf.push_view(view());

    let mesh = CommandData::Mesh { mesh: Default::default(), albedo: None, lightmap: None, transform: Mat4::IDENTITY };
    let immediate = CommandData::Immediate {
        settings: quartz_engine::render::ImmediateSettings::default(),
        vertex_range: (0, 0),
        index_range: (0, 0),
    };

    buf.submit_command(Layer::Scene, Layer::Scene, immediate.kind(), 0.0, 0, immediate, 1);
    buf.submit_command(Layer::Scene, Layer::Scene, mesh.kind(), 0.0, 0, mesh, 2);
    buf.sort();

    let identifiers: Vec<u64> = buf.commands().iter().map(|c| c.identifier).collect();
    assert_eq!(identifiers, vec![2, 1], "Mesh should sort before Immediate at equal view/depth/material");
}
