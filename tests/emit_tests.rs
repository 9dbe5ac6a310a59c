//! Render Graph Emission Tests
//!
//! Tests for:
//! - Single-child collapse and identity-transform elision
//! - Nesting order selection per pipeline state
//! - Geometry sharing and unconvertible geometry
//! - Whole-pipeline conversion of small reference scenes

use std::sync::Arc;

use glam::{Mat4, Vec3};
use sgconv::render::{RenderGraph, RenderKey, RenderNode, StateCommand};
use sgconv::scene::{ArrayData, Geometry, NodeKey, PrimitiveMode, PrimitiveSet, Scene};
use sgconv::state::{Mode, StateFragment, TextureBinding};
use sgconv::{Conversion, ConvertSettings, NestingPolicy, convert, convert_scene};

fn triangle() -> Arc<Geometry> {
    Arc::new(Geometry::triangles(
        vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        vec![0, 1, 2],
    ))
}

fn lit_textured(image: &str) -> StateFragment {
    StateFragment::new()
        .with_mode(Mode::Lighting, true)
        .with_texture(0, TextureBinding::new_2d(image))
}

fn run(scene: &Scene, root: NodeKey) -> Conversion {
    convert(scene, root, &ConvertSettings::default()).expect("conversion succeeds")
}

fn run_with(scene: &Scene, root: NodeKey, settings: ConvertSettings) -> Conversion {
    convert(scene, root, &settings).expect("conversion succeeds")
}

fn node(graph: &RenderGraph, key: RenderKey) -> &RenderNode {
    graph.node(key).expect("child key is valid")
}

/// The reference scene: a group `A` and a transform `B`, both carrying the
/// same state, each over one geometry.
fn reference_scene() -> (Scene, NodeKey, Mat4) {
    let t = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));

    let mut scene = Scene::new();
    let s1 = scene.add_state(lit_textured("brick.png"));

    let root = scene.add_group();
    let a = scene.add_group();
    scene.set_state(a, Some(s1));
    let g1 = scene.add_geometry(triangle());
    scene.set_name(g1, "G1");
    scene.add_child(a, g1);

    let b = scene.add_transform(t);
    scene.set_state(b, Some(s1));
    let g2 = scene.add_geometry(triangle());
    scene.set_name(g2, "G2");
    scene.add_child(b, g2);

    scene.add_child(root, a);
    scene.add_child(root, b);
    (scene, root, t)
}

// ============================================================================
// Reference Scene
// ============================================================================

#[test]
fn reference_scene_groups_under_one_pipeline() {
    let (scene, root, t) = reference_scene();
    let Conversion { graph, stats } = run(&scene, root);

    // One stack sequence, resolved once and reused.
    assert_eq!(stats.resolved_cache_misses, 1);
    assert_eq!(stats.resolved_cache_hits, 1);
    assert_eq!(stats.unique_fragments, 2);
    assert_eq!(stats.pipeline_states, 1);

    // Two transforms but one data state: data-outer, with the lone data
    // state bound directly on the pipeline group.
    assert_eq!(stats.emit.data_outer_groups, 1);
    let RenderNode::StateGroup { commands, children } = graph.root_node().unwrap() else {
        panic!("root should collapse into the pipeline group");
    };
    assert_eq!(commands.len(), 2);
    assert!(commands[0].is_pipeline());
    assert!(matches!(commands[1], StateCommand::BindDescriptors(_)));
    assert!(commands[0].state().mode(Mode::Lighting).unwrap());
    assert_eq!(commands[1].state().texture_attributes.len(), 1);

    // G1 sits directly under the group; G2 under a transform.
    assert_eq!(children.len(), 2);
    let g1 = node(&graph, children[0]).as_geometry().unwrap();
    assert_eq!(g1.name.as_deref(), Some("G1"));

    let RenderNode::Transform { matrix, children: inner } = node(&graph, children[1]) else {
        panic!("second child should be the transform");
    };
    assert_eq!(*matrix, t);
    assert_eq!(inner.len(), 1);
    let g2 = node(&graph, inner[0]).as_geometry().unwrap();
    assert_eq!(g2.name.as_deref(), Some("G2"));

    assert_eq!(graph.len(), 4);
}

#[test]
fn forced_transform_outer_wraps_data_per_transform() {
    let (scene, root, _) = reference_scene();
    let settings = ConvertSettings {
        nesting: NestingPolicy::TransformOuter,
        ..Default::default()
    };
    let Conversion { graph, stats } = run_with(&scene, root, settings);
    assert_eq!(stats.emit.transform_outer_groups, 1);

    let root_node = graph.root_node().unwrap();
    assert_eq!(root_node.commands().len(), 1);
    let children = root_node.children();
    assert_eq!(children.len(), 2);

    // Identity: the data group hangs directly off the pipeline group.
    let first = node(&graph, children[0]);
    assert!(first.is_state_group());
    assert!(matches!(first.commands(), [StateCommand::BindDescriptors(_)]));

    let second = node(&graph, children[1]);
    assert!(second.is_transform());
    assert!(node(&graph, second.children()[0]).is_state_group());
}

#[test]
fn lone_data_state_keeps_its_group_without_collapse() {
    let (scene, root, _) = reference_scene();
    let settings = ConvertSettings {
        collapse_single_child: false,
        ..Default::default()
    };
    let Conversion { graph, .. } = run_with(&scene, root, settings);

    let RenderNode::Group { children } = graph.root_node().unwrap() else {
        panic!("root group should be kept");
    };
    assert_eq!(children.len(), 1);

    let pipeline = node(&graph, children[0]);
    assert!(matches!(pipeline.commands(), [StateCommand::BindPipeline(_)]));
    assert_eq!(pipeline.children().len(), 1);

    let data = node(&graph, pipeline.children()[0]);
    assert!(matches!(data.commands(), [StateCommand::BindDescriptors(_)]));
    assert_eq!(data.children().len(), 2);
    assert!(node(&graph, data.children()[0]).as_geometry().is_some());
    assert!(node(&graph, data.children()[1]).is_transform());
}

// ============================================================================
// Nesting Order
// ============================================================================

/// One shared transform over geometries that differ only in texture.
fn textured_variants(transform: Mat4) -> (Scene, NodeKey) {
    let mut scene = Scene::new();
    let root = scene.add_transform(transform);
    for image in ["brick.png", "stone.png", "wood.png"] {
        let state = scene.add_state(lit_textured(image));
        let leaf = scene.add_geometry(triangle());
        scene.set_state(leaf, Some(state));
        scene.add_child(root, leaf);
    }
    (scene, root)
}

#[test]
fn fewer_transforms_than_data_states_nests_transforms_outside() {
    let (scene, root) = textured_variants(Mat4::IDENTITY);
    let Conversion { graph, stats } = run(&scene, root);
    assert_eq!(stats.emit.transform_outer_groups, 1);

    let root_node = graph.root_node().unwrap();
    assert!(matches!(root_node.commands(), [StateCommand::BindPipeline(_)]));
    assert_eq!(root_node.children().len(), 3);
    for &child in root_node.children() {
        let group = node(&graph, child);
        assert!(matches!(group.commands(), [StateCommand::BindDescriptors(_)]));
        assert_eq!(group.children().len(), 1);
    }
}

#[test]
fn shared_non_identity_transform_appears_once() {
    let t = Mat4::from_rotation_y(1.0);
    let (scene, root) = textured_variants(t);
    let Conversion { graph, .. } = run(&scene, root);

    let root_node = graph.root_node().unwrap();
    assert_eq!(root_node.children().len(), 1);
    let RenderNode::Transform { matrix, children } = node(&graph, root_node.children()[0]) else {
        panic!("expected a single transform");
    };
    assert_eq!(*matrix, t);
    assert_eq!(children.len(), 3);
}

#[test]
fn forced_state_outer_keeps_data_groups_outside() {
    let (scene, root) = textured_variants(Mat4::IDENTITY);
    let settings = ConvertSettings {
        nesting: NestingPolicy::StateOuter,
        ..Default::default()
    };
    let Conversion { graph, stats } = run_with(&scene, root, settings);
    assert_eq!(stats.emit.data_outer_groups, 1);

    let root_node = graph.root_node().unwrap();
    assert_eq!(root_node.children().len(), 3);
    for &child in root_node.children() {
        let group = node(&graph, child);
        assert!(group.is_state_group());
        assert!(node(&graph, group.children()[0]).as_geometry().is_some());
    }
}

#[test]
fn distinct_pipelines_get_distinct_groups_in_first_seen_order() {
    let mut scene = Scene::new();
    let root = scene.add_group();
    let lit = scene.add_state(StateFragment::new().with_mode(Mode::Lighting, true));
    let unlit = scene.add_state(StateFragment::new().with_mode(Mode::Lighting, false));
    for state in [lit, unlit] {
        let leaf = scene.add_geometry(triangle());
        scene.set_state(leaf, Some(state));
        scene.add_child(root, leaf);
    }

    let Conversion { graph, stats } = run(&scene, root);
    assert_eq!(stats.emit.pipeline_groups, 2);

    let RenderNode::Group { children } = graph.root_node().unwrap() else {
        panic!("two pipeline groups need a root group");
    };
    let first = node(&graph, children[0]).commands()[0].state();
    let second = node(&graph, children[1]).commands()[0].state();
    assert_eq!(first.mode(Mode::Lighting), Some(true));
    assert_eq!(second.mode(Mode::Lighting), Some(false));
}

// ============================================================================
// Collapse and Identity Elision
// ============================================================================

fn lit_leaves(count: usize) -> (Scene, NodeKey) {
    let mut scene = Scene::new();
    let lit = scene.add_state(StateFragment::new().with_mode(Mode::Lighting, true));
    let root = scene.add_group();
    scene.set_state(root, Some(lit));
    for _ in 0..count {
        let leaf = scene.add_geometry(triangle());
        scene.add_child(root, leaf);
    }
    (scene, root)
}

#[test]
fn no_redundant_wrappers_by_default() {
    let (scene, root) = lit_leaves(3);
    let Conversion { graph, .. } = run(&scene, root);

    graph.walk(|_, n, _| {
        assert!(!n.is_transform(), "identity transform was emitted");
        if let RenderNode::Group { children } = n {
            assert!(children.len() != 1, "single-child group was emitted");
        }
    });

    // Pipeline-only state: no descriptor binding.
    let root_node = graph.root_node().unwrap();
    assert!(matches!(root_node.commands(), [StateCommand::BindPipeline(_)]));
    assert_eq!(root_node.children().len(), 3);
    assert_eq!(graph.len(), 4);
}

#[test]
fn collapse_can_be_disabled() {
    let (scene, root) = lit_leaves(1);
    let settings = ConvertSettings {
        collapse_single_child: false,
        ..Default::default()
    };
    let Conversion { graph, .. } = run_with(&scene, root, settings);

    let RenderNode::Group { children } = graph.root_node().unwrap() else {
        panic!("root group should be kept");
    };
    assert_eq!(children.len(), 1);
    assert!(node(&graph, children[0]).is_state_group());
}

#[test]
fn identity_transforms_can_be_kept() {
    let (scene, root) = lit_leaves(2);
    let settings = ConvertSettings {
        omit_identity_transforms: false,
        ..Default::default()
    };
    let Conversion { graph, .. } = run_with(&scene, root, settings);

    let mut transforms = 0;
    graph.walk(|_, n, _| {
        if let RenderNode::Transform { matrix, .. } = n {
            assert_eq!(*matrix, Mat4::IDENTITY);
            transforms += 1;
        }
    });
    assert_eq!(transforms, 1);
}

// ============================================================================
// Geometry
// ============================================================================

fn shared_under_two_transforms() -> (Scene, NodeKey) {
    let mut scene = Scene::new();
    let root = scene.add_group();
    let shared = scene.add_geometry(triangle());
    for x in [1.0, 2.0] {
        let xf = scene.add_transform(Mat4::from_translation(Vec3::new(x, 0.0, 0.0)));
        scene.add_child(xf, shared);
        scene.add_child(root, xf);
    }
    (scene, root)
}

fn geometry_nodes(graph: &RenderGraph) -> usize {
    graph.iter().filter(|(_, n)| n.as_geometry().is_some()).count()
}

#[test]
fn shared_geometry_is_converted_once() {
    let (scene, root) = shared_under_two_transforms();
    let Conversion { graph, stats } = run(&scene, root);

    assert_eq!(geometry_nodes(&graph), 1);
    assert_eq!(graph.reachable_geometries().len(), 2);
    assert_eq!(stats.emit.shared_geometry_hits, 1);
}

#[test]
fn sharing_can_be_disabled() {
    let (scene, root) = shared_under_two_transforms();
    let settings = ConvertSettings {
        share_geometry: false,
        ..Default::default()
    };
    let Conversion { graph, stats } = run_with(&scene, root, settings);

    assert_eq!(geometry_nodes(&graph), 2);
    assert_eq!(stats.emit.shared_geometry_hits, 0);
}

#[test]
fn named_nodes_sharing_geometry_keep_their_names() {
    let mut scene = Scene::new();
    let root = scene.add_group();
    let geometry = triangle();

    let left = scene.add_geometry(Arc::clone(&geometry));
    scene.set_name(left, "Left");
    scene.add_child(root, left);

    let xf = scene.add_transform(Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0)));
    let right = scene.add_geometry(Arc::clone(&geometry));
    scene.set_name(right, "Right");
    scene.add_child(xf, right);
    scene.add_child(root, xf);

    let Conversion { graph, stats } = run(&scene, root);
    assert_eq!(geometry_nodes(&graph), 2);
    assert_eq!(stats.emit.shared_geometry_hits, 0);

    let names: Vec<_> = graph
        .reachable_geometries()
        .into_iter()
        .map(|key| node(&graph, key).as_geometry().unwrap().name.clone())
        .collect();
    assert_eq!(names, [Some("Left".to_string()), Some("Right".to_string())]);

    let top = graph.children(graph.root());
    assert_eq!(top.len(), 2);
    assert!(node(&graph, top[1]).is_transform());
}

#[test]
fn unnamed_nodes_sharing_geometry_share_the_render_node() {
    let mut scene = Scene::new();
    let root = scene.add_group();
    let geometry = triangle();
    for x in [1.0, 2.0] {
        let xf = scene.add_transform(Mat4::from_translation(Vec3::new(x, 0.0, 0.0)));
        let leaf = scene.add_geometry(Arc::clone(&geometry));
        scene.add_child(xf, leaf);
        scene.add_child(root, xf);
    }

    let Conversion { graph, stats } = run(&scene, root);
    assert_eq!(geometry_nodes(&graph), 1);
    assert_eq!(graph.reachable_geometries().len(), 2);
    assert_eq!(stats.emit.shared_geometry_hits, 1);
}

#[test]
fn unconvertible_geometry_emits_nothing() {
    let fan = Geometry {
        vertices: Some(ArrayData::Vec3(vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE])),
        primitives: vec![PrimitiveSet::DrawArrays {
            mode: PrimitiveMode::TriangleFan,
            first: 0,
            count: 4,
        }],
        ..Default::default()
    };

    let mut scene = Scene::new();
    let root = scene.add_group();
    let leaf = scene.add_geometry(Arc::new(fan));
    scene.add_child(root, leaf);

    let Conversion { graph, stats } = run(&scene, root);
    assert_eq!(stats.analysis.geometries_recorded, 1);
    assert_eq!(stats.emit.unconvertible_geometries, 1);
    assert_eq!(stats.emit.pipeline_groups, 0);
    assert!(graph.reachable_geometries().is_empty());
}

#[test]
fn geometry_bounds_are_carried_over() {
    let (scene, root) = lit_leaves(1);
    let Conversion { graph, .. } = run(&scene, root);

    let key = graph.reachable_geometries()[0];
    let bounds = node(&graph, key).as_geometry().unwrap().bounds.unwrap();
    assert_eq!(bounds.min, Vec3::ZERO);
    assert_eq!(bounds.max, Vec3::new(1.0, 1.0, 0.0));
}

// ============================================================================
// Empty Input and Multiple Roots
// ============================================================================

#[test]
fn empty_scene_yields_empty_root_group() {
    let mut scene = Scene::new();
    let root = scene.add_group();

    let Conversion { graph, stats } = run(&scene, root);
    assert_eq!(graph.len(), 1);
    assert!(matches!(graph.root_node(), Some(RenderNode::Group { children }) if children.is_empty()));
    assert_eq!(stats.emit.nodes_emitted, 1);
}

#[test]
fn convert_scene_merges_all_roots() {
    let mut scene = Scene::new();
    let lit = scene.add_state(StateFragment::new().with_mode(Mode::Lighting, true));
    for _ in 0..2 {
        let root = scene.add_root(sgconv::SceneNode::group().with_state(lit));
        let leaf = scene.add_geometry(triangle());
        scene.add_child(root, leaf);
    }

    let Conversion { graph, stats } = convert_scene(&scene, &ConvertSettings::default()).unwrap();
    assert_eq!(stats.pipeline_states, 1);
    assert_eq!(graph.reachable_geometries().len(), 2);
}

#[test]
fn invalid_settings_are_rejected() {
    let (scene, root) = lit_leaves(1);
    let settings = ConvertSettings {
        max_depth: 0,
        ..Default::default()
    };
    assert!(matches!(
        convert(&scene, root, &settings),
        Err(sgconv::ConvertError::InvalidSettings(_))
    ));
}
