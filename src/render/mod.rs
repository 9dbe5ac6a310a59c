//! Render Graph (Conversion Output)
//!
//! The renderer-facing graph produced by a conversion:
//! - [`RenderGraph`] / [`RenderNode`]: group, transform, state-group and geometry nodes
//! - [`StateCommand`]: pipeline and descriptor bindings recorded on state groups
//! - [`VertexIndexDraw`]: GPU-ready vertex streams and draw commands
//!
//! Compiling the graph into GPU pipelines, descriptor sets and command buffers
//! is the host renderer's job.

pub mod geometry;
pub mod graph;
pub mod state;

pub use geometry::{
    DrawCommand, DrawKind, GeometryFeatures, GeometryNode, VertexBuffer, VertexIndexDraw,
    VertexSemantic,
};
pub use graph::{RenderGraph, RenderNode};
pub use state::{DescriptorBinding, PipelineBinding, StateCommand};

use slotmap::new_key_type;

new_key_type! {
    pub struct RenderKey;
}
