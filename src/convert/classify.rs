//! State and transform classification.
//!
//! Dedup happens at two levels:
//!
//! 1. [`StateClassifier`] caches the resolved `(pipeline, data)` pair per
//!    *literal* state-stack sequence. Two different stacks that merge to the
//!    same effective state miss this cache independently.
//! 2. The resulting fragments are interned by value in a
//!    [`FragmentInterner`], which recovers sharing across such stacks.
//!
//! Transforms are interned by value in a [`TransformInterner`].

use glam::Mat4;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::scene::{Scene, StateKey};
use crate::state::{FragmentId, FragmentInterner, StateFragment};

/// Sequence of state keys on the stack, outermost first.
pub type StateStackKey = SmallVec<[StateKey; 8]>;

/// Effective state at a point in the traversal, as canonical fragment ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedStatePair {
    pub pipeline: FragmentId,
    pub data: FragmentId,
}

/// Resolves state stacks into canonical `(pipeline, data)` pairs.
#[derive(Debug, Default)]
pub struct StateClassifier {
    resolved: FxHashMap<StateStackKey, ResolvedStatePair>,
    fragments: FragmentInterner,
    cache_hits: usize,
    cache_misses: usize,
}

impl StateClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the state in effect for `stack`.
    ///
    /// On a cache miss the stack is merged in order (innermost wins), split
    /// into pipeline and data parts, and both parts are interned by value.
    /// An empty stack resolves to a pair of empty fragments.
    pub fn resolve(&mut self, scene: &Scene, stack: &[StateKey]) -> ResolvedStatePair {
        if let Some(pair) = self.resolved.get(stack) {
            self.cache_hits += 1;
            return *pair;
        }
        self.cache_misses += 1;

        let (pipeline, data) = match stack {
            [] => (StateFragment::new(), StateFragment::new()),
            [single] => scene
                .get_state(*single)
                .map(StateFragment::split)
                .unwrap_or_default(),
            _ => StateFragment::merged(stack.iter().filter_map(|key| scene.get_state(*key))).split(),
        };

        let pair = ResolvedStatePair {
            pipeline: self.fragments.intern(pipeline),
            data: self.fragments.intern(data),
        };
        log::trace!("Resolved state stack of depth {} to {:?}", stack.len(), pair);

        self.resolved.insert(SmallVec::from_slice(stack), pair);
        pair
    }

    #[inline]
    #[must_use]
    pub fn fragments(&self) -> &FragmentInterner {
        &self.fragments
    }

    /// Number of distinct stack sequences resolved so far.
    #[inline]
    #[must_use]
    pub fn cached_stacks(&self) -> usize {
        self.resolved.len()
    }

    #[inline]
    #[must_use]
    pub fn cache_hits(&self) -> usize {
        self.cache_hits
    }

    #[inline]
    #[must_use]
    pub fn cache_misses(&self) -> usize {
        self.cache_misses
    }
}

// ─── Transforms ───────────────────────────────────────────────────────────────

/// Identity of a distinct accumulated transform, in first-seen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransformId(u32);

impl TransformId {
    /// The identity matrix. Always the first transform of an interner.
    pub const IDENTITY: TransformId = TransformId(0);

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    #[must_use]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }
}

/// Bitwise key of a matrix with `-0.0` folded into `0.0`.
fn matrix_key(matrix: &Mat4) -> [u32; 16] {
    let mut key = [0u32; 16];
    for (slot, v) in key.iter_mut().zip(matrix.to_cols_array()) {
        *slot = if v == 0.0 { 0 } else { v.to_bits() };
    }
    key
}

/// Value-keyed dedup of accumulated transform matrices.
#[derive(Debug)]
pub struct TransformInterner {
    matrices: Vec<Mat4>,
    lookup: FxHashMap<[u32; 16], TransformId>,
}

impl Default for TransformInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformInterner {
    #[must_use]
    pub fn new() -> Self {
        let mut interner = Self {
            matrices: Vec::new(),
            lookup: FxHashMap::default(),
        };
        interner.intern(Mat4::IDENTITY);
        interner
    }

    pub fn intern(&mut self, matrix: Mat4) -> TransformId {
        let key = matrix_key(&matrix);
        if let Some(&id) = self.lookup.get(&key) {
            return id;
        }
        let id = TransformId(self.matrices.len() as u32);
        self.matrices.push(matrix);
        self.lookup.insert(key, id);
        id
    }

    /// Matrix for `id`, which must come from this interner.
    #[inline]
    #[must_use]
    pub fn matrix(&self, id: TransformId) -> Mat4 {
        self.matrices[id.index()]
    }

    /// Number of distinct matrices, the identity included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }
}
