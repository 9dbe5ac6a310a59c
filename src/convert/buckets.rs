//! Bucketing indices.
//!
//! Every recorded geometry lands in two nested maps at once:
//!
//! ```text
//! by_transform: pipeline → transform → data     → [GeometryRecord]
//! by_data:      pipeline → data      → transform → [GeometryRecord]
//! ```
//!
//! Emission picks, per pipeline, whichever nesting has fewer top-level
//! groups. Keys are first-seen ids, so ordered maps iterate in the order
//! states and transforms were encountered.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::convert::classify::{ResolvedStatePair, TransformId};
use crate::scene::{Geometry, NodeKey};
use crate::state::FragmentId;

/// One visit of a geometry leaf with the state and transform in effect.
#[derive(Debug, Clone)]
pub struct GeometryRecord {
    /// The leaf node that was visited.
    pub node: NodeKey,
    /// Shared with the source scene; not copied.
    pub geometry: Arc<Geometry>,
    pub state: ResolvedStatePair,
    pub transform: TransformId,
}

/// transform → data → records
pub type TransformBuckets = BTreeMap<TransformId, BTreeMap<FragmentId, Vec<GeometryRecord>>>;
/// data → transform → records
pub type DataBuckets = BTreeMap<FragmentId, BTreeMap<TransformId, Vec<GeometryRecord>>>;

#[derive(Debug, Default)]
pub struct Buckets {
    by_transform: BTreeMap<FragmentId, TransformBuckets>,
    by_data: BTreeMap<FragmentId, DataBuckets>,
    len: usize,
}

impl Buckets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files `record` under both key orderings.
    pub fn insert(&mut self, record: GeometryRecord) {
        let ResolvedStatePair { pipeline, data } = record.state;
        let transform = record.transform;

        self.by_data
            .entry(pipeline)
            .or_default()
            .entry(data)
            .or_default()
            .entry(transform)
            .or_default()
            .push(record.clone());

        self.by_transform
            .entry(pipeline)
            .or_default()
            .entry(transform)
            .or_default()
            .entry(data)
            .or_default()
            .push(record);

        self.len += 1;
    }

    /// Pipeline ids in first-seen order.
    pub fn pipelines(&self) -> impl Iterator<Item = FragmentId> + '_ {
        self.by_transform.keys().copied()
    }

    #[must_use]
    pub fn transform_outer(&self, pipeline: FragmentId) -> Option<&TransformBuckets> {
        self.by_transform.get(&pipeline)
    }

    #[must_use]
    pub fn data_outer(&self, pipeline: FragmentId) -> Option<&DataBuckets> {
        self.by_data.get(&pipeline)
    }

    /// Records for one `(pipeline, transform, data)` key via the
    /// transform-outer index.
    #[must_use]
    pub fn get(&self, pipeline: FragmentId, transform: TransformId, data: FragmentId) -> &[GeometryRecord] {
        self.by_transform
            .get(&pipeline)
            .and_then(|t| t.get(&transform))
            .and_then(|d| d.get(&data))
            .map_or(&[], Vec::as_slice)
    }

    /// Records for one `(pipeline, data, transform)` key via the
    /// data-outer index.
    #[must_use]
    pub fn get_by_data(&self, pipeline: FragmentId, data: FragmentId, transform: TransformId) -> &[GeometryRecord] {
        self.by_data
            .get(&pipeline)
            .and_then(|d| d.get(&data))
            .and_then(|t| t.get(&transform))
            .map_or(&[], Vec::as_slice)
    }

    /// Number of recorded geometries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn pipeline_count(&self) -> usize {
        self.by_transform.len()
    }
}
