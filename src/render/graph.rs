use std::fmt;

use glam::Mat4;
use slotmap::SlotMap;

use crate::render::geometry::GeometryNode;
use crate::render::state::StateCommand;
use crate::render::RenderKey;

/// A node of the emitted render graph.
#[derive(Debug, Clone)]
pub enum RenderNode {
    Group {
        children: Vec<RenderKey>,
    },
    Transform {
        matrix: Mat4,
        children: Vec<RenderKey>,
    },
    /// Records its commands before traversing its children.
    StateGroup {
        commands: Vec<StateCommand>,
        children: Vec<RenderKey>,
    },
    Geometry(GeometryNode),
}

impl RenderNode {
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[RenderKey] {
        match self {
            Self::Group { children }
            | Self::Transform { children, .. }
            | Self::StateGroup { children, .. } => children,
            Self::Geometry(_) => &[],
        }
    }

    #[must_use]
    pub fn commands(&self) -> &[StateCommand] {
        match self {
            Self::StateGroup { commands, .. } => commands,
            _ => &[],
        }
    }

    #[must_use]
    pub fn as_geometry(&self) -> Option<&GeometryNode> {
        match self {
            Self::Geometry(g) => Some(g),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_transform(&self) -> bool {
        matches!(self, Self::Transform { .. })
    }

    #[must_use]
    pub fn is_state_group(&self) -> bool {
        matches!(self, Self::StateGroup { .. })
    }
}

/// The converter's output: an arena of render nodes under a single root.
///
/// A node may be the child of several parents when a source geometry was
/// reached through several paths.
#[derive(Debug)]
pub struct RenderGraph {
    nodes: SlotMap<RenderKey, RenderNode>,
    root: RenderKey,
}

impl RenderGraph {
    pub(crate) fn from_parts(nodes: SlotMap<RenderKey, RenderNode>, root: RenderKey) -> Self {
        Self { nodes, root }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> RenderKey {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn node(&self, key: RenderKey) -> Option<&RenderNode> {
        self.nodes.get(key)
    }

    #[inline]
    #[must_use]
    pub fn root_node(&self) -> Option<&RenderNode> {
        self.nodes.get(self.root)
    }

    #[must_use]
    pub fn children(&self, key: RenderKey) -> &[RenderKey] {
        self.nodes.get(key).map_or(&[], RenderNode::children)
    }

    /// Number of distinct nodes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RenderKey, &RenderNode)> {
        self.nodes.iter()
    }

    /// Depth-first, pre-order walk from the root. Shared nodes are visited
    /// once per path. The callback receives the node and its depth.
    pub fn walk(&self, mut f: impl FnMut(RenderKey, &RenderNode, usize)) {
        let mut stack = vec![(self.root, 0usize)];
        while let Some((key, depth)) = stack.pop() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            f(key, node, depth);
            for &child in node.children().iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }

    /// Geometry leaves reachable from the root, once per path.
    #[must_use]
    pub fn reachable_geometries(&self) -> Vec<RenderKey> {
        let mut out = Vec::new();
        self.walk(|key, node, _| {
            if node.as_geometry().is_some() {
                out.push(key);
            }
        });
        out
    }
}

impl fmt::Display for RenderGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut result = Ok(());
        self.walk(|_, node, depth| {
            if result.is_err() {
                return;
            }
            result = write_node(f, node, depth);
        });
        result
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &RenderNode, depth: usize) -> fmt::Result {
    write!(f, "{:indent$}", "", indent = depth * 2)?;
    match node {
        RenderNode::Group { children } => writeln!(f, "Group ({} children)", children.len()),
        RenderNode::Transform { matrix, .. } => {
            let t = matrix.w_axis.truncate();
            writeln!(f, "Transform [translation {:.3} {:.3} {:.3}]", t.x, t.y, t.z)
        }
        RenderNode::StateGroup { commands, .. } => {
            write!(f, "StateGroup")?;
            for command in commands {
                match command {
                    StateCommand::BindPipeline(p) => {
                        write!(f, " [pipeline {:016x} {}]", p.defines.compilation_hash(), p.defines)?;
                    }
                    StateCommand::BindDescriptors(d) => {
                        write!(f, " [descriptors {} entries]", d.state.len())?;
                    }
                }
            }
            writeln!(f)
        }
        RenderNode::Geometry(g) => writeln!(
            f,
            "Geometry {} ({} vertices, {} draws, {:?})",
            g.name.as_deref().unwrap_or("<unnamed>"),
            g.draw.vertex_count(),
            g.draw.draws.len(),
            g.draw.features,
        ),
    }
}
