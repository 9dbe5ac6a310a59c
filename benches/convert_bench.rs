use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use glam::{Mat4, Vec3};
use sgconv::scene::{Geometry, NodeKey, Scene};
use sgconv::state::{Mode, StateFragment, TextureBinding};
use sgconv::{ConvertSettings, NestingPolicy, convert};

/// A city-block style scene: `blocks` transforms, each with a handful of
/// buildings that draw from a small pool of materials and a shared mesh.
fn build_scene(blocks: usize) -> (Scene, NodeKey) {
    let mut scene = Scene::new();
    let root = scene.add_group();
    let lit = scene.add_state(StateFragment::new().with_mode(Mode::Lighting, true));
    scene.set_state(root, Some(lit));

    let materials: Vec<_> = ["brick.png", "glass.png", "concrete.png", "roof.png"]
        .into_iter()
        .map(|image| scene.add_state(StateFragment::new().with_texture(0, TextureBinding::new_2d(image))))
        .collect();

    let mesh = Arc::new(Geometry::triangles(
        vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE],
        vec![0, 1, 2, 1, 3, 2],
    ));

    for i in 0..blocks {
        let offset = Vec3::new((i % 32) as f32 * 10.0, 0.0, (i / 32) as f32 * 10.0);
        let block = scene.add_transform(Mat4::from_translation(offset));
        scene.add_child(root, block);

        for (j, &material) in materials.iter().enumerate() {
            let building = scene.add_geometry(Arc::clone(&mesh));
            scene.set_state(building, Some(material));
            if j % 2 == 0 {
                scene.add_child(block, building);
            } else {
                let lift = scene.add_transform(Mat4::from_translation(Vec3::Y * j as f32));
                scene.add_child(lift, building);
                scene.add_child(block, lift);
            }
        }
    }

    (scene, root)
}

fn bench_convert(c: &mut Criterion) {
    let (scene, root) = build_scene(1_000);

    let mut group = c.benchmark_group("Scene Conversion");

    group.bench_function("Auto nesting (4k geometries)", |b| {
        let settings = ConvertSettings::default();
        b.iter(|| black_box(convert(&scene, root, &settings)));
    });

    group.bench_function("Transform outer (4k geometries)", |b| {
        let settings = ConvertSettings {
            nesting: NestingPolicy::TransformOuter,
            ..Default::default()
        };
        b.iter(|| black_box(convert(&scene, root, &settings)));
    });

    group.bench_function("No geometry sharing (4k geometries)", |b| {
        let settings = ConvertSettings {
            share_geometry: false,
            ..Default::default()
        };
        b.iter(|| black_box(convert(&scene, root, &settings)));
    });

    group.finish();
}

criterion_group!(benches, bench_convert);
criterion_main!(benches);
