//! Builds a small scene by hand, converts it and prints the render graph.
//!
//! ```text
//! RUST_LOG=debug cargo run --example convert_scene [settings.json]
//! ```

use std::sync::Arc;

use glam::{Mat4, Vec3, Vec4};
use sgconv::scene::{ArrayData, Geometry, Scene};
use sgconv::state::{
    BlendFunc, MaterialParams, Mode, Program, StateAttribute, StateFragment, TextureBinding,
    UniformValue,
};
use sgconv::{ConvertSettings, convert_scene};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = match std::env::args().nth(1) {
        Some(path) => ConvertSettings::from_path(path)?,
        None => ConvertSettings::default(),
    };

    let scene = build_scene();
    let conversion = convert_scene(&scene, &settings)?;

    println!("{}", conversion.graph);
    println!("{:#?}", conversion.stats);
    Ok(())
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    let lit = scene.add_state(
        StateFragment::new()
            .with_mode(Mode::Lighting, true)
            .with_mode(Mode::DepthTest, true),
    );
    let brick = scene.add_state(
        StateFragment::new()
            .with_texture(0, TextureBinding::new_2d("brick.png"))
            .with_attribute(StateAttribute::Material(MaterialParams {
                diffuse: Vec4::new(0.8, 0.4, 0.3, 1.0),
                ..Default::default()
            })),
    );
    let glass = scene.add_state(
        StateFragment::new()
            .with_mode(Mode::Blend, true)
            .with_attribute(StateAttribute::BlendFunc(BlendFunc::default()))
            .with_uniform("opacity", UniformValue::Float(0.35)),
    );
    let outline = scene.add_state(
        StateFragment::new().with_attribute(StateAttribute::Program(Program::named("outline"))),
    );

    let cube = Arc::new(Geometry {
        normals: Some(ArrayData::Vec3(vec![Vec3::Z; 4])),
        ..Geometry::triangles(
            vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
            vec![0, 1, 2, 0, 2, 3],
        )
    });

    let root = scene.add_root(sgconv::SceneNode::group().with_name("world"));
    scene.set_state(root, Some(lit));

    // A row of brick walls.
    for i in 0..3 {
        let xf = scene.add_transform(Mat4::from_translation(Vec3::new(i as f32 * 2.0, 0.0, 0.0)));
        scene.set_state(xf, Some(brick));
        let wall = scene.add_geometry(Arc::clone(&cube));
        scene.set_name(wall, &format!("wall_{i}"));
        scene.add_child(xf, wall);
        scene.add_child(root, xf);
    }

    // A glass pane at the origin and a billboarded marker.
    let pane = scene.add_geometry(Arc::clone(&cube));
    scene.set_name(pane, "pane");
    scene.set_state(pane, Some(glass));
    scene.add_child(root, pane);

    let markers = scene.add_billboard();
    scene.set_state(markers, Some(outline));
    let marker = scene.add_geometry(Arc::clone(&cube));
    scene.set_name(marker, "marker");
    scene.add_billboard_child(markers, marker, Vec3::new(0.0, 3.0, 0.0));
    scene.add_child(root, markers);

    scene
}
