use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::scene::geometry::Geometry;
use crate::scene::{NodeKey, StateKey};

/// How a transform node combines with the transform it inherits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceFrame {
    /// `world = parent_world * local`.
    #[default]
    Relative,
    /// `world = local`; inherited transforms are ignored.
    Absolute,
}

/// The closed set of node kinds the converter understands.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Plain grouping node.
    Group { children: Vec<NodeKey> },

    /// Applies `matrix` to its subtree.
    Transform {
        matrix: Mat4,
        reference_frame: ReferenceFrame,
        children: Vec<NodeKey>,
    },

    /// Places each child at its own position. `positions[i]` belongs to
    /// `children[i]`; children without a position sit at the origin.
    Billboard {
        positions: Vec<Vec3>,
        children: Vec<NodeKey>,
    },

    /// Leaf geometry. The `Arc` is the geometry's identity: the same geometry
    /// may hang under several nodes.
    Geometry(Arc<Geometry>),
}

/// A node of the source scene graph.
///
/// Any node, leaves included, may carry attached state. Nodes refer to
/// children and state by key, so one child or one state can be shared by
/// several parents.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: Option<String>,
    pub state: Option<StateKey>,
    pub kind: NodeKind,
}

impl SceneNode {
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            state: None,
            kind,
        }
    }

    #[must_use]
    pub fn group() -> Self {
        Self::new(NodeKind::Group { children: Vec::new() })
    }

    #[must_use]
    pub fn transform(matrix: Mat4) -> Self {
        Self::new(NodeKind::Transform {
            matrix,
            reference_frame: ReferenceFrame::Relative,
            children: Vec::new(),
        })
    }

    #[must_use]
    pub fn billboard() -> Self {
        Self::new(NodeKind::Billboard {
            positions: Vec::new(),
            children: Vec::new(),
        })
    }

    #[must_use]
    pub fn geometry(geometry: Arc<Geometry>) -> Self {
        Self::new(NodeKind::Geometry(geometry))
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_state(mut self, state: StateKey) -> Self {
        self.state = Some(state);
        self
    }

    /// Mutable child list, `None` for geometry leaves.
    #[inline]
    pub fn children_mut(&mut self) -> Option<&mut Vec<NodeKey>> {
        match &mut self.kind {
            NodeKind::Group { children }
            | NodeKind::Transform { children, .. }
            | NodeKind::Billboard { children, .. } => Some(children),
            NodeKind::Geometry(_) => None,
        }
    }
}
