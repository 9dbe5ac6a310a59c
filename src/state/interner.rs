use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::fragment::StateFragment;

/// Identity of a canonical fragment within one [`FragmentInterner`].
///
/// Ids are handed out in first-seen order, so sorting by id reproduces the
/// order in which distinct states were encountered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FragmentId(u32);

impl FragmentId {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Value-keyed dedup of state fragments.
///
/// Structurally equal fragments collapse to one shared [`Arc`], so downstream
/// grouping can key on [`FragmentId`] instead of comparing fragment contents.
/// One interner lives for one conversion pass.
#[derive(Debug, Default)]
pub struct FragmentInterner {
    fragments: Vec<Arc<StateFragment>>,
    lookup: FxHashMap<Arc<StateFragment>, FragmentId>,
}

impl FragmentInterner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of the canonical fragment equal to `fragment`,
    /// registering it if no equal fragment has been seen.
    pub fn intern(&mut self, fragment: StateFragment) -> FragmentId {
        if let Some(&id) = self.lookup.get(&fragment) {
            return id;
        }

        let id = FragmentId(self.fragments.len() as u32);
        let shared = Arc::new(fragment);
        self.fragments.push(Arc::clone(&shared));
        self.lookup.insert(shared, id);
        id
    }

    /// Canonical fragment for `id`.
    ///
    /// `id` must come from this interner.
    #[inline]
    #[must_use]
    pub fn fragment(&self, id: FragmentId) -> &Arc<StateFragment> {
        &self.fragments[id.index()]
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
