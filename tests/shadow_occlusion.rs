//! Shadow occlusion: two cubes stacked along -Z with the sun straight overhead. A ray from the
//! lower cube's top face toward the sun must be occluded by the upper cube; the same ray from the
//! upper cube's top face must not be.

use quartz_engine::{
    light_baker::occluded,
    map::build::{build_map, BrushDef, PlaneDef},
    math::Plane,
};

fn axis_plane(normal: glam::Vec3, distance: f32) -> PlaneDef {
    PlaneDef {
        plane: Plane::new(normal, distance),
        texture: "wall".into(),
        s: glam::Vec3::X,
        s_offset: 0.0,
        t: glam::Vec3::Y,
        t_offset: 0.0,
        tex_scale_x: 1.0,
        tex_scale_y: 1.0,
        tex_w: 16,
        tex_h: 16,
    }
}

/// A cube brush of half-extent `half`, centered at `center`.
fn cube(center: glam::Vec3, half: f32) -> BrushDef {
    BrushDef {
        planes: vec![
            axis_plane(glam::Vec3::new(1.0, 0.0, 0.0), center.x + half),
            axis_plane(glam::Vec3::new(-1.0, 0.0, 0.0), half - center.x),
            axis_plane(glam::Vec3::new(0.0, 1.0, 0.0), center.y + half),
            axis_plane(glam::Vec3::new(0.0, -1.0, 0.0), half - center.y),
            axis_plane(glam::Vec3::new(0.0, 0.0, 1.0), center.z + half),
            axis_plane(glam::Vec3::new(0.0, 0.0, -1.0), half - center.z),
        ],
    }
}

#[test]
fn the_upper_cube_casts_a_shadow_onto_the_lower_cube() {
    // Upper cube sits from z=10..20, lower cube from z=-10..0; a 5-unit air gap between them.
    let upper = cube(glam::Vec3::new(0.0, 0.0, 15.0), 5.0);
    let lower = cube(glam::Vec3::new(0.0, 0.0, -5.0), 5.0);
    let map = build_map(&[upper, lower], vec![], vec![]).expect("both cubes build");

    let sun_dir = glam::Vec3::new(0.0, 0.0, -1.0);

    // Just above the lower cube's top face (z=0): the upper cube sits directly in the sun's path.
    let lower_top = glam::Vec3::new(0.0, 0.0, 0.01);
    assert!(occluded(&map, lower_top, -sun_dir, f32::INFINITY), "lower cube's top face should be shadowed");

    // Just above the upper cube's top face (z=20): nothing stands between it and the sun.
    let upper_top = glam::Vec3::new(0.0, 0.0, 20.01);
    assert!(!occluded(&map, upper_top, -sun_dir, f32::INFINITY), "upper cube's top face should be lit");
}
