//! Pipeline Shader Defines
//!
//! A pipeline fragment is summarized as a sorted set of shader macro
//! definitions. Keys and values are interned [`Symbol`]s, so two pipeline
//! groups that need the same shader variant carry identical define sets and
//! identical hashes.
//!
//! ```rust,ignore
//! use sgconv::state::{Mode, ShaderDefines, StateFragment};
//!
//! let pipeline = StateFragment::new().with_mode(Mode::Lighting, true);
//! let defines = ShaderDefines::from_pipeline_state(&pipeline);
//! assert!(defines.contains("USE_LIGHTING"));
//! ```

use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};

use super::attribute::TextureTarget;
use super::fragment::StateFragment;
use crate::utils::interner::{self, Symbol};

/// Sorted collection of `(name, value)` shader macro definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderDefines {
    defines: Vec<(Symbol, Symbol)>,
}

impl ShaderDefines {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            defines: Vec::new(),
        }
    }

    /// Derives the defines a pipeline fragment requires.
    ///
    /// Enabled modes map to their [`define_name`](super::Mode::define_name),
    /// enabled texture units to `HAS_MAP` / `HAS_CUBE_MAP` (suffixed with the
    /// unit for units above zero), and a bound program to `USE_PROGRAM`.
    /// Disabled entries contribute nothing.
    #[must_use]
    pub fn from_pipeline_state(pipeline: &StateFragment) -> Self {
        let mut defines = Self::new();

        for (mode, enabled) in &pipeline.modes {
            if *enabled {
                defines.set(mode.define_name(), "1");
            }
        }

        for ((unit, target), enabled) in &pipeline.texture_modes {
            if !*enabled {
                continue;
            }
            let base = match target {
                TextureTarget::Texture2D => "HAS_MAP",
                TextureTarget::TextureCubeMap => "HAS_CUBE_MAP",
            };
            if *unit == 0 {
                defines.set(base, "1");
            } else {
                defines.set(&format!("{base}_{unit}"), "1");
            }
        }

        if let Some(program) = pipeline.program() {
            defines.set("USE_PROGRAM", &program.name);
        }

        defines
    }

    /// Sets a define, keeping the set sorted by key symbol.
    pub fn set(&mut self, key: &str, value: &str) {
        let key = interner::intern(key);
        let value = interner::intern(value);
        match self.defines.binary_search_by_key(&key, |&(k, _)| k) {
            Ok(idx) => self.defines[idx].1 = value,
            Err(idx) => self.defines.insert(idx, (key, value)),
        }
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        interner::get(key).is_some_and(|key| {
            self.defines.binary_search_by_key(&key, |&(k, _)| k).is_ok()
        })
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'static str> {
        let key = interner::get(key)?;
        self.defines
            .binary_search_by_key(&key, |&(k, _)| k)
            .ok()
            .map(|idx| interner::resolve(self.defines[idx].1))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.defines.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    pub fn iter_strings(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.defines
            .iter()
            .map(|&(k, v)| (interner::resolve(k), interner::resolve(v)))
    }

    /// Content hash, stable within a process.
    #[must_use]
    pub fn compilation_hash(&self) -> u64 {
        rustc_hash::FxBuildHasher.hash_one(self)
    }
}

impl fmt::Display for ShaderDefines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.iter_strings().collect();
        names.sort_unstable();
        for (i, (key, value)) in names.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

impl Hash for ShaderDefines {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.defines.hash(state);
    }
}
