use std::collections::BTreeMap;

use super::attribute::{
    AttributeKind, Mode, Program, StateAttribute, TextureBinding, TextureTarget, UniformValue,
};

/// An immutable-by-convention bundle of rendering state.
///
/// Fragments are plain values: two fragments built independently with the same
/// entries are equal and hash identically. Ordered maps keep iteration and
/// hashing independent of insertion order.
///
/// # Override semantics
///
/// [`merge_from`](Self::merge_from) lets the incoming fragment win on every
/// key it sets. Merging a state stack from outermost to innermost therefore
/// gives the innermost (last pushed) fragment precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StateFragment {
    pub modes: BTreeMap<Mode, bool>,
    pub texture_modes: BTreeMap<(u32, TextureTarget), bool>,
    pub attributes: BTreeMap<AttributeKind, StateAttribute>,
    pub texture_attributes: BTreeMap<u32, TextureBinding>,
    pub uniforms: BTreeMap<String, UniformValue>,
}

impl StateFragment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Builders
    // ========================================================================

    #[must_use]
    pub fn with_mode(mut self, mode: Mode, enabled: bool) -> Self {
        self.set_mode(mode, enabled);
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: StateAttribute) -> Self {
        self.set_attribute(attribute);
        self
    }

    /// Binds a texture to `unit` and enables its target on that unit.
    #[must_use]
    pub fn with_texture(mut self, unit: u32, texture: TextureBinding) -> Self {
        self.set_texture_and_mode(unit, texture);
        self
    }

    #[must_use]
    pub fn with_uniform(mut self, name: impl Into<String>, value: UniformValue) -> Self {
        self.set_uniform(name, value);
        self
    }

    pub fn set_mode(&mut self, mode: Mode, enabled: bool) {
        self.modes.insert(mode, enabled);
    }

    pub fn set_texture_mode(&mut self, unit: u32, target: TextureTarget, enabled: bool) {
        self.texture_modes.insert((unit, target), enabled);
    }

    /// Stores `attribute` in its kind's slot, replacing any previous one.
    pub fn set_attribute(&mut self, attribute: StateAttribute) {
        self.attributes.insert(attribute.kind(), attribute);
    }

    pub fn set_texture(&mut self, unit: u32, texture: TextureBinding) {
        self.texture_attributes.insert(unit, texture);
    }

    pub fn set_texture_and_mode(&mut self, unit: u32, texture: TextureBinding) {
        self.set_texture_mode(unit, texture.target, true);
        self.set_texture(unit, texture);
    }

    pub fn set_uniform(&mut self, name: impl Into<String>, value: UniformValue) {
        self.uniforms.insert(name.into(), value);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn mode(&self, mode: Mode) -> Option<bool> {
        self.modes.get(&mode).copied()
    }

    #[inline]
    #[must_use]
    pub fn attribute(&self, kind: AttributeKind) -> Option<&StateAttribute> {
        self.attributes.get(&kind)
    }

    #[must_use]
    pub fn program(&self) -> Option<&Program> {
        match self.attributes.get(&AttributeKind::Program) {
            Some(StateAttribute::Program(program)) => Some(program),
            _ => None,
        }
    }

    /// Total number of entries across all maps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modes.len()
            + self.texture_modes.len()
            + self.attributes.len()
            + self.texture_attributes.len()
            + self.uniforms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========================================================================
    // Merge & Split
    // ========================================================================

    /// Overlays `other` onto `self`; entries in `other` win on conflict.
    pub fn merge_from(&mut self, other: &StateFragment) {
        self.modes.extend(other.modes.iter().map(|(k, v)| (*k, *v)));
        self.texture_modes
            .extend(other.texture_modes.iter().map(|(k, v)| (*k, *v)));
        self.attributes
            .extend(other.attributes.iter().map(|(k, v)| (*k, v.clone())));
        self.texture_attributes
            .extend(other.texture_attributes.iter().map(|(k, v)| (*k, v.clone())));
        self.uniforms
            .extend(other.uniforms.iter().map(|(k, v)| (k.clone(), *v)));
    }

    /// Merges fragments in iteration order, outermost first.
    #[must_use]
    pub fn merged<'a>(fragments: impl IntoIterator<Item = &'a StateFragment>) -> StateFragment {
        let mut result = StateFragment::new();
        for fragment in fragments {
            result.merge_from(fragment);
        }
        result
    }

    /// Splits the fragment into `(pipeline, data)` parts.
    ///
    /// The pipeline part receives every mode, every texture mode and every
    /// attribute whose kind [`is_pipeline`](AttributeKind::is_pipeline). The
    /// data part receives the remaining attributes, texture bindings and
    /// uniforms. Each entry lands in exactly one part.
    #[must_use]
    pub fn split(&self) -> (StateFragment, StateFragment) {
        let mut pipeline = StateFragment {
            modes: self.modes.clone(),
            texture_modes: self.texture_modes.clone(),
            ..Default::default()
        };
        let mut data = StateFragment {
            texture_attributes: self.texture_attributes.clone(),
            uniforms: self.uniforms.clone(),
            ..Default::default()
        };

        for (kind, attribute) in &self.attributes {
            if kind.is_pipeline() {
                pipeline.attributes.insert(*kind, attribute.clone());
            } else {
                data.attributes.insert(*kind, attribute.clone());
            }
        }

        (pipeline, data)
    }
}
