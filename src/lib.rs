#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Converts retained-mode scene graphs into renderer-facing graphs whose
//! geometry is bucketed by pipeline state, transform and data state.
//!
//! - [`scene`]: the source scene graph
//! - [`state`]: rendering state fragments and their pipeline / data split
//! - [`convert`]: traversal, classification, bucketing and re-emission
//! - [`render`]: the emitted render graph
//! - [`settings`]: conversion options

pub mod convert;
pub mod errors;
pub mod render;
pub mod scene;
pub mod settings;
pub mod state;
pub mod utils;

pub use convert::{Conversion, ConversionStats, SceneAnalysis, convert, convert_scene};
pub use errors::{ConvertError, Result};
pub use render::{RenderGraph, RenderKey, RenderNode, StateCommand};
pub use scene::{Geometry, NodeKey, Scene, SceneNode, StateKey};
pub use settings::{ConvertSettings, NestingPolicy};
pub use state::{Mode, StateAttribute, StateFragment};
