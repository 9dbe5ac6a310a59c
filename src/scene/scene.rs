use std::sync::Arc;

use glam::{Mat4, Vec3};
use slotmap::SlotMap;

use crate::scene::geometry::Geometry;
use crate::scene::node::{NodeKind, ReferenceFrame, SceneNode};
use crate::scene::{NodeKey, StateKey};
use crate::state::StateFragment;

/// The source scene graph.
///
/// Nodes and state fragments live in arenas and refer to one another by key.
/// The converter only reads a `Scene`; it is built up front by a loader or by
/// hand.
///
/// ```rust,ignore
/// let mut scene = Scene::new();
/// let lit = scene.add_state(StateFragment::new().with_mode(Mode::Lighting, true));
/// let root = scene.add_group();
/// let mesh = scene.add_geometry(Arc::new(geometry));
/// scene.set_state(mesh, Some(lit));
/// scene.add_child(root, mesh);
/// ```
#[derive(Debug, Default)]
pub struct Scene {
    pub nodes: SlotMap<NodeKey, SceneNode>,
    pub states: SlotMap<StateKey, StateFragment>,
    pub root_nodes: Vec<NodeKey>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Registers a state fragment. Nodes share it by key.
    pub fn add_state(&mut self, fragment: StateFragment) -> StateKey {
        self.states.insert(fragment)
    }

    /// Inserts a detached node.
    pub fn add_node(&mut self, node: SceneNode) -> NodeKey {
        self.nodes.insert(node)
    }

    /// Inserts a node and records it as a root.
    pub fn add_root(&mut self, node: SceneNode) -> NodeKey {
        let key = self.nodes.insert(node);
        self.root_nodes.push(key);
        key
    }

    pub fn add_group(&mut self) -> NodeKey {
        self.add_node(SceneNode::group())
    }

    pub fn add_transform(&mut self, matrix: Mat4) -> NodeKey {
        self.add_node(SceneNode::transform(matrix))
    }

    pub fn add_absolute_transform(&mut self, matrix: Mat4) -> NodeKey {
        self.add_node(SceneNode::new(NodeKind::Transform {
            matrix,
            reference_frame: ReferenceFrame::Absolute,
            children: Vec::new(),
        }))
    }

    pub fn add_billboard(&mut self) -> NodeKey {
        self.add_node(SceneNode::billboard())
    }

    pub fn add_geometry(&mut self, geometry: Arc<Geometry>) -> NodeKey {
        self.add_node(SceneNode::geometry(geometry))
    }

    /// Appends `child` to `parent`. Returns `false` if `parent` is missing
    /// or is a geometry leaf.
    ///
    /// The same child may be added to several parents; it is then reachable,
    /// and converted, once per path.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> bool {
        match self.nodes.get_mut(parent).and_then(SceneNode::children_mut) {
            Some(children) => {
                children.push(child);
                true
            }
            None => {
                log::warn!("Cannot add child {child:?}: parent {parent:?} is missing or a leaf");
                false
            }
        }
    }

    /// Appends `child` to a billboard together with its placement.
    pub fn add_billboard_child(&mut self, billboard: NodeKey, child: NodeKey, position: Vec3) -> bool {
        let Some(node) = self.nodes.get_mut(billboard) else {
            return false;
        };
        match &mut node.kind {
            NodeKind::Billboard { positions, children } => {
                // Pad so that positions stay aligned with children.
                positions.resize(children.len(), Vec3::ZERO);
                positions.push(position);
                children.push(child);
                true
            }
            _ => {
                log::warn!("Node {billboard:?} is not a billboard");
                false
            }
        }
    }

    pub fn set_state(&mut self, node: NodeKey, state: Option<StateKey>) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.state = state;
        }
    }

    pub fn set_name(&mut self, node: NodeKey, name: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.name = Some(name.to_string());
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn get_node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    #[inline]
    #[must_use]
    pub fn get_state(&self, key: StateKey) -> Option<&StateFragment> {
        self.states.get(key)
    }

    #[must_use]
    pub fn get_name(&self, key: NodeKey) -> Option<&str> {
        self.nodes.get(key)?.name.as_deref()
    }
}
