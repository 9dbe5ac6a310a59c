//! Graph re-emission.
//!
//! Turns the bucketing indices into a render graph with one pipeline state
//! group per distinct pipeline state. Below each pipeline group the nesting
//! is chosen per group:
//!
//! ```text
//! transform-outer:  Pipeline ─ Transform ─ StateGroup(data) ─ Geometry…
//! data-outer:       Pipeline ─ StateGroup(data) ─ Transform ─ Geometry…
//! ```
//!
//! Identity transforms produce no node, groups with a single child are
//! replaced by that child, and a pipeline group with a single data state
//! carries the descriptor binding itself.

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::convert::analysis::SceneAnalysis;
use crate::convert::buckets::{DataBuckets, GeometryRecord, TransformBuckets};
use crate::convert::classify::TransformId;
use crate::convert::geometry::convert_geometry;
use crate::render::{
    DescriptorBinding, GeometryNode, PipelineBinding, RenderGraph, RenderKey, RenderNode,
    StateCommand,
};
use crate::scene::{Geometry, Scene};
use crate::settings::{ConvertSettings, NestingPolicy};
use crate::state::FragmentId;

/// Counters gathered during emission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitStats {
    pub nodes_emitted: usize,
    pub pipeline_groups: usize,
    pub transform_outer_groups: usize,
    pub data_outer_groups: usize,
    /// Records whose geometry had no convertible vertices or draws.
    pub unconvertible_geometries: usize,
    /// Records that reused an already converted geometry node.
    pub shared_geometry_hits: usize,
}

/// Builds the render graph for a finished analysis.
#[must_use]
pub fn emit(scene: &Scene, analysis: &SceneAnalysis, settings: &ConvertSettings) -> (RenderGraph, EmitStats) {
    let mut emitter = Emitter::new(scene, analysis, settings);
    let root = emitter.emit_root();
    emitter.stats.nodes_emitted = emitter.nodes.len();
    (RenderGraph::from_parts(emitter.nodes, root), emitter.stats)
}

struct Emitter<'a> {
    scene: &'a Scene,
    analysis: &'a SceneAnalysis,
    settings: &'a ConvertSettings,
    nodes: SlotMap<RenderKey, RenderNode>,
    /// Converted geometry per source geometry identity and node name. `None`
    /// marks a geometry that did not convert.
    geometry_cache: FxHashMap<(*const Geometry, Option<&'a str>), Option<RenderKey>>,
    stats: EmitStats,
}

impl<'a> Emitter<'a> {
    fn new(scene: &'a Scene, analysis: &'a SceneAnalysis, settings: &'a ConvertSettings) -> Self {
        Self {
            scene,
            analysis,
            settings,
            nodes: SlotMap::with_key(),
            geometry_cache: FxHashMap::default(),
            stats: EmitStats::default(),
        }
    }

    fn emit_root(&mut self) -> RenderKey {
        let analysis = self.analysis;
        let groups: Vec<RenderKey> = analysis
            .buckets()
            .pipelines()
            .filter_map(|pipeline| self.emit_pipeline(pipeline))
            .collect();

        // The root always exists, even for an empty scene.
        if groups.is_empty() {
            return self.insert(RenderNode::Group { children: groups });
        }
        self.group(groups)
    }

    fn emit_pipeline(&mut self, pipeline: FragmentId) -> Option<RenderKey> {
        let analysis = self.analysis;
        let buckets = analysis.buckets();
        let by_transform = buckets.transform_outer(pipeline)?;
        let by_data = buckets.data_outer(pipeline)?;

        let transform_outer = match self.settings.nesting {
            NestingPolicy::Auto => by_transform.len() < by_data.len(),
            NestingPolicy::TransformOuter => true,
            NestingPolicy::StateOuter => false,
        };
        log::debug!(
            "Pipeline {:?}: {} transforms, {} data states, {} nesting",
            pipeline,
            by_transform.len(),
            by_data.len(),
            if transform_outer { "transform-outer" } else { "data-outer" }
        );

        let mut commands = vec![self.pipeline_command(pipeline)];
        let children = if transform_outer {
            self.stats.transform_outer_groups += 1;
            self.transform_outer(by_transform)
        } else {
            self.stats.data_outer_groups += 1;
            self.data_outer(by_data, &mut commands)
        };

        if children.is_empty() {
            return None;
        }
        self.stats.pipeline_groups += 1;
        Some(self.insert(RenderNode::StateGroup { commands, children }))
    }

    /// One transform per distinct transform, one data group per data state
    /// inside it.
    fn transform_outer(&mut self, by_transform: &TransformBuckets) -> Vec<RenderKey> {
        let mut out = Vec::new();
        for (&transform, by_data) in by_transform {
            let mut groups = Vec::with_capacity(by_data.len());
            for (&data, records) in by_data {
                let geometries = self.geometries(records);
                let command = self.data_command(data);
                groups.extend(self.state_group(command, geometries));
            }
            out.extend(self.wrap_transform(transform, groups));
        }
        out
    }

    /// One data group per distinct data state, one transform per transform
    /// inside it. With single-child collapse on, a lone data state is bound on
    /// the pipeline group instead.
    fn data_outer(&mut self, by_data: &DataBuckets, commands: &mut Vec<StateCommand>) -> Vec<RenderKey> {
        if by_data.len() == 1
            && self.settings.collapse_single_child
            && let Some((&data, by_transform)) = by_data.iter().next()
        {
            commands.extend(self.data_command(data));
            return self.transforms(by_transform);
        }

        let mut out = Vec::with_capacity(by_data.len());
        for (&data, by_transform) in by_data {
            let children = self.transforms(by_transform);
            let command = self.data_command(data);
            out.extend(self.state_group(command, children));
        }
        out
    }

    fn transforms(&mut self, by_transform: &BTreeMap<TransformId, Vec<GeometryRecord>>) -> Vec<RenderKey> {
        let mut out = Vec::new();
        for (&transform, records) in by_transform {
            let geometries = self.geometries(records);
            out.extend(self.wrap_transform(transform, geometries));
        }
        out
    }

    // ========================================================================
    // Node builders
    // ========================================================================

    /// Wraps `children` in a transform node, or returns them unchanged for
    /// the identity transform.
    fn wrap_transform(&mut self, transform: TransformId, children: Vec<RenderKey>) -> Vec<RenderKey> {
        if children.is_empty() {
            return children;
        }
        if transform.is_identity() && self.settings.omit_identity_transforms {
            return children;
        }
        let matrix = self.analysis.transforms().matrix(transform);
        vec![self.insert(RenderNode::Transform { matrix, children })]
    }

    /// A state group binding `command` over `children`; a plain group when
    /// there is nothing to bind.
    fn state_group(&mut self, command: Option<StateCommand>, children: Vec<RenderKey>) -> Option<RenderKey> {
        if children.is_empty() {
            return None;
        }
        match command {
            Some(command) => Some(self.insert(RenderNode::StateGroup {
                commands: vec![command],
                children,
            })),
            None => Some(self.group(children)),
        }
    }

    fn group(&mut self, mut children: Vec<RenderKey>) -> RenderKey {
        if children.len() == 1 && self.settings.collapse_single_child {
            return children.remove(0);
        }
        self.insert(RenderNode::Group { children })
    }

    fn geometries(&mut self, records: &[GeometryRecord]) -> Vec<RenderKey> {
        records.iter().filter_map(|record| self.geometry(record)).collect()
    }

    fn geometry(&mut self, record: &GeometryRecord) -> Option<RenderKey> {
        let scene: &'a Scene = self.scene;
        let name = scene.get_name(record.node);
        let identity = (Arc::as_ptr(&record.geometry), name);
        if self.settings.share_geometry
            && let Some(cached) = self.geometry_cache.get(&identity)
        {
            if cached.is_some() {
                self.stats.shared_geometry_hits += 1;
            }
            return *cached;
        }

        let key = match convert_geometry(&record.geometry) {
            Some(draw) => Some(self.insert(RenderNode::Geometry(GeometryNode {
                name: name.map(str::to_string),
                draw,
                bounds: record.geometry.bounding_box(),
            }))),
            None => {
                log::debug!("Geometry of {:?} has nothing convertible", record.node);
                self.stats.unconvertible_geometries += 1;
                None
            }
        };

        if self.settings.share_geometry {
            self.geometry_cache.insert(identity, key);
        }
        key
    }

    fn pipeline_command(&self, pipeline: FragmentId) -> StateCommand {
        let state = self.analysis.fragments().fragment(pipeline);
        StateCommand::BindPipeline(PipelineBinding::new(Arc::clone(state)))
    }

    /// Descriptor binding for a data state; `None` when it is empty.
    fn data_command(&self, data: FragmentId) -> Option<StateCommand> {
        let state = self.analysis.fragments().fragment(data);
        if state.is_empty() {
            return None;
        }
        Some(StateCommand::BindDescriptors(DescriptorBinding {
            state: Arc::clone(state),
        }))
    }

    fn insert(&mut self, node: RenderNode) -> RenderKey {
        self.nodes.insert(node)
    }
}
