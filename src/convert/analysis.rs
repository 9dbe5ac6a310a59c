//! Scene analysis (traversal engine).
//!
//! A single depth-first pass over the source scene that keeps a state stack
//! and a matrix stack, and hands every drawable geometry leaf to the
//! classifier together with whatever state and transform are in effect.
//!
//! Shared subgraphs are not deduplicated: a node reachable through several
//! parents is visited once per path, each time under that path's state and
//! transform. An edge back to a node already on the current path is a cycle
//! and is not followed.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::convert::buckets::{Buckets, GeometryRecord};
use crate::convert::classify::{StateClassifier, TransformInterner};
use crate::errors::{ConvertError, Result};
use crate::scene::{Geometry, NodeKey, NodeKind, ReferenceFrame, Scene, StateKey};
use crate::settings::ConvertSettings;
use crate::state::FragmentInterner;

/// Counters gathered during analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    pub nodes_visited: usize,
    pub geometries_recorded: usize,
    /// Leaves dropped because they had nothing to draw.
    pub geometries_skipped: usize,
    /// Child or state keys that did not resolve.
    pub dangling_references: usize,
    /// Nodes skipped for exceeding the depth limit.
    pub depth_limited: usize,
    /// Child edges skipped because they lead back to an ancestor.
    pub cycles_skipped: usize,
}

/// Traversal state and the indices it populates.
#[derive(Debug)]
pub struct SceneAnalysis {
    max_depth: usize,

    state_stack: SmallVec<[StateKey; 8]>,
    matrix_stack: Vec<Mat4>,
    /// Nodes on the path from the current root to the node being visited.
    path: FxHashSet<NodeKey>,

    classifier: StateClassifier,
    transforms: TransformInterner,
    buckets: Buckets,

    stats: AnalysisStats,
}

impl SceneAnalysis {
    #[must_use]
    pub fn new(settings: &ConvertSettings) -> Self {
        Self {
            max_depth: settings.max_depth,
            state_stack: SmallVec::new(),
            matrix_stack: Vec::with_capacity(16),
            path: FxHashSet::default(),
            classifier: StateClassifier::new(),
            transforms: TransformInterner::new(),
            buckets: Buckets::new(),
            stats: AnalysisStats::default(),
        }
    }

    /// Traverses the subtree under `root`, adding its geometry to the
    /// indices. May be called for several roots; results accumulate.
    pub fn analyze(&mut self, scene: &Scene, root: NodeKey) -> Result<()> {
        if scene.get_node(root).is_none() {
            return Err(ConvertError::NodeNotFound(root));
        }

        self.visit(scene, root, 0);

        debug_assert!(self.state_stack.is_empty(), "state stack unbalanced after traversal");
        debug_assert!(self.matrix_stack.is_empty(), "matrix stack unbalanced after traversal");
        debug_assert!(self.path.is_empty(), "path set unbalanced after traversal");
        Ok(())
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    fn visit(&mut self, scene: &Scene, key: NodeKey, depth: usize) {
        let Some(node) = scene.get_node(key) else {
            log::warn!("Skipping dangling child reference {key:?}");
            self.stats.dangling_references += 1;
            return;
        };
        if depth >= self.max_depth {
            log::warn!("Skipping node {key:?}: depth limit {} reached", self.max_depth);
            self.stats.depth_limited += 1;
            return;
        }
        if !self.path.insert(key) {
            log::warn!("Skipping edge back to ancestor {key:?}: cycle in source graph");
            self.stats.cycles_skipped += 1;
            return;
        }

        self.stats.nodes_visited += 1;
        log::trace!("Visiting {:?} {}", key, node.name.as_deref().unwrap_or(""));

        let pushed_state = self.push_state(scene, node.state);

        match &node.kind {
            NodeKind::Group { children } => {
                for &child in children {
                    self.visit(scene, child, depth + 1);
                }
            }
            NodeKind::Transform {
                matrix,
                reference_frame,
                children,
            } => {
                let world = match reference_frame {
                    ReferenceFrame::Relative => self.local_to_world(*matrix),
                    ReferenceFrame::Absolute => *matrix,
                };
                self.matrix_stack.push(world);
                for &child in children {
                    self.visit(scene, child, depth + 1);
                }
                self.pop_matrix();
            }
            NodeKind::Billboard {
                positions,
                children,
            } => {
                // Each child gets its own placement; nothing is shared
                // between siblings.
                for (i, &child) in children.iter().enumerate() {
                    let position = positions.get(i).copied().unwrap_or(Vec3::ZERO);
                    let world = self.local_to_world(Mat4::from_translation(position));
                    self.matrix_stack.push(world);
                    self.visit(scene, child, depth + 1);
                    self.pop_matrix();
                }
            }
            NodeKind::Geometry(geometry) => self.record(scene, key, geometry),
        }

        if pushed_state {
            self.pop_state();
        }
        self.path.remove(&key);
    }

    fn record(&mut self, scene: &Scene, key: NodeKey, geometry: &Arc<Geometry>) {
        if !geometry.is_drawable() {
            log::debug!("Skipping geometry {key:?}: no vertices or no primitives");
            self.stats.geometries_skipped += 1;
            return;
        }

        let state = self.classifier.resolve(scene, &self.state_stack);
        let transform = self
            .transforms
            .intern(self.matrix_stack.last().copied().unwrap_or(Mat4::IDENTITY));

        self.buckets.insert(GeometryRecord {
            node: key,
            geometry: Arc::clone(geometry),
            state,
            transform,
        });
        self.stats.geometries_recorded += 1;
    }

    // ========================================================================
    // Stack discipline
    // ========================================================================

    fn push_state(&mut self, scene: &Scene, state: Option<StateKey>) -> bool {
        let Some(state) = state else {
            return false;
        };
        if scene.get_state(state).is_none() {
            log::warn!("Ignoring dangling state reference {state:?}");
            self.stats.dangling_references += 1;
            return false;
        }
        self.state_stack.push(state);
        true
    }

    fn pop_state(&mut self) {
        let popped = self.state_stack.pop();
        debug_assert!(popped.is_some(), "state stack underflow");
    }

    fn pop_matrix(&mut self) {
        let popped = self.matrix_stack.pop();
        debug_assert!(popped.is_some(), "matrix stack underflow");
    }

    /// `local` combined with the matrix on top of the stack, or `local`
    /// itself when the stack is empty.
    fn local_to_world(&self, local: Mat4) -> Mat4 {
        match self.matrix_stack.last() {
            Some(parent) => *parent * local,
            None => local,
        }
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// Current state-stack depth. Zero outside of a traversal.
    #[inline]
    #[must_use]
    pub fn state_depth(&self) -> usize {
        self.state_stack.len()
    }

    /// Current matrix-stack depth. Zero outside of a traversal.
    #[inline]
    #[must_use]
    pub fn matrix_depth(&self) -> usize {
        self.matrix_stack.len()
    }

    #[inline]
    #[must_use]
    pub fn classifier(&self) -> &StateClassifier {
        &self.classifier
    }

    #[inline]
    #[must_use]
    pub fn fragments(&self) -> &FragmentInterner {
        self.classifier.fragments()
    }

    /// Number of distinct state-stack sequences resolved so far.
    #[inline]
    #[must_use]
    pub fn resolved_cache_len(&self) -> usize {
        self.classifier.cached_stacks()
    }

    #[inline]
    #[must_use]
    pub fn transforms(&self) -> &TransformInterner {
        &self.transforms
    }

    #[inline]
    #[must_use]
    pub fn buckets(&self) -> &Buckets {
        &self.buckets
    }

    #[inline]
    #[must_use]
    pub fn stats(&self) -> &AnalysisStats {
        &self.stats
    }
}
