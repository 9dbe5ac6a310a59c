//! Scene Conversion
//!
//! Converts a source [`Scene`] into a state-bucketed [`RenderGraph`] in two
//! phases:
//!
//! 1. [`SceneAnalysis`] walks the scene once, resolving the state and
//!    transform in effect at every geometry leaf and filing the geometry into
//!    the [`Buckets`] indices.
//! 2. [`emit`] consumes the indices and builds the output graph grouped by
//!    pipeline state, then by transform or data state.
//!
//! ```rust,ignore
//! use sgconv::{convert, ConvertSettings};
//!
//! let conversion = convert(&scene, root, &ConvertSettings::default())?;
//! println!("{}", conversion.graph);
//! ```

pub mod analysis;
pub mod buckets;
pub mod classify;
pub mod emit;
pub mod geometry;

pub use analysis::{AnalysisStats, SceneAnalysis};
pub use buckets::{Buckets, DataBuckets, GeometryRecord, TransformBuckets};
pub use classify::{ResolvedStatePair, StateClassifier, TransformId, TransformInterner};
pub use emit::{EmitStats, emit};

use crate::errors::Result;
use crate::render::RenderGraph;
use crate::scene::{NodeKey, Scene};
use crate::settings::ConvertSettings;
use crate::utils::interner;

/// Summary of one conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub analysis: AnalysisStats,
    pub emit: EmitStats,
    pub pipeline_states: usize,
    /// Distinct canonical fragments, pipeline and data parts together.
    pub unique_fragments: usize,
    pub unique_transforms: usize,
    pub resolved_cache_hits: usize,
    pub resolved_cache_misses: usize,
}

impl ConversionStats {
    fn collect(analysis: &SceneAnalysis, emit: EmitStats) -> Self {
        Self {
            analysis: *analysis.stats(),
            emit,
            pipeline_states: analysis.buckets().pipeline_count(),
            unique_fragments: analysis.fragments().len(),
            unique_transforms: analysis.transforms().len(),
            resolved_cache_hits: analysis.classifier().cache_hits(),
            resolved_cache_misses: analysis.classifier().cache_misses(),
        }
    }
}

/// Result of a conversion.
#[derive(Debug)]
pub struct Conversion {
    pub graph: RenderGraph,
    pub stats: ConversionStats,
}

/// Converts the subtree under `root`.
pub fn convert(scene: &Scene, root: NodeKey, settings: &ConvertSettings) -> Result<Conversion> {
    convert_roots(scene, &[root], settings)
}

/// Converts every root of `scene` into a single render graph.
pub fn convert_scene(scene: &Scene, settings: &ConvertSettings) -> Result<Conversion> {
    convert_roots(scene, &scene.root_nodes, settings)
}

fn convert_roots(scene: &Scene, roots: &[NodeKey], settings: &ConvertSettings) -> Result<Conversion> {
    settings.validate()?;
    interner::preload_pipeline_defines();

    let mut analysis = SceneAnalysis::new(settings);
    for &root in roots {
        analysis.analyze(scene, root)?;
    }

    let (graph, emit_stats) = emit(scene, &analysis, settings);
    let stats = ConversionStats::collect(&analysis, emit_stats);

    log::info!(
        "Converted {} nodes: {} geometries ({} skipped) into {} pipeline groups, {} render nodes",
        stats.analysis.nodes_visited,
        stats.analysis.geometries_recorded,
        stats.analysis.geometries_skipped,
        stats.emit.pipeline_groups,
        stats.emit.nodes_emitted,
    );

    Ok(Conversion { graph, stats })
}
