//! Converter Settings
//!
//! [`ConvertSettings`] controls how the bucketed render graph is shaped. The
//! defaults reproduce the reference behaviour: automatic nesting order,
//! single-child collapse and identity-transform elision.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sgconv::settings::{ConvertSettings, NestingPolicy};
//!
//! // Default behaviour
//! let settings = ConvertSettings::default();
//!
//! // Always nest transforms outside data state
//! let settings = ConvertSettings {
//!     nesting: NestingPolicy::TransformOuter,
//!     ..Default::default()
//! };
//!
//! // Or from a JSON file; missing fields fall back to their defaults
//! let settings = ConvertSettings::from_path("convert.json")?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ConvertError, Result};

// ---------------------------------------------------------------------------
// NestingPolicy
// ---------------------------------------------------------------------------

/// Nesting order used below each pipeline-state group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestingPolicy {
    /// Pick whichever order yields fewer top-level groups. Transforms go
    /// outside only when there are strictly fewer of them than data states.
    #[default]
    Auto,
    /// One transform node per distinct transform, data-state groups inside.
    TransformOuter,
    /// One data-state group per distinct data state, transform nodes inside.
    StateOuter,
}

// ---------------------------------------------------------------------------
// ConvertSettings
// ---------------------------------------------------------------------------

/// Configuration for a single conversion pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertSettings {
    /// Nesting order below each pipeline group.
    pub nesting: NestingPolicy,

    /// Replace group nodes that end up with a single child by that child.
    pub collapse_single_child: bool,

    /// Attach children of identity transforms directly to their parent.
    pub omit_identity_transforms: bool,

    /// Convert each source geometry once and share the render node between
    /// every parent that references it.
    pub share_geometry: bool,

    /// Nodes at this depth or deeper are skipped; the root is at depth 0.
    /// Bounds the traversal stacks on very deep input.
    pub max_depth: usize,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            nesting: NestingPolicy::Auto,
            collapse_single_child: true,
            omit_identity_transforms: true,
            share_geometry: true,
            max_depth: 512,
        }
    }
}

impl ConvertSettings {
    /// Parses settings from a JSON document and validates them.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::debug!("Loading converter settings from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Serializes the settings as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(ConvertError::InvalidSettings(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
