//! GPU-ready geometry.
//!
//! A [`VertexIndexDraw`] is the converted form of one source geometry: byte
//! buffers tagged with `wgpu` vertex formats, plus one [`DrawCommand`] per
//! convertible primitive set. Creating the actual GPU buffers is left to the
//! host renderer.

use bitflags::bitflags;
use wgpu::{IndexFormat, PrimitiveTopology, VertexFormat, VertexStepMode};

use crate::scene::BoundingBox;

bitflags! {
    /// Optional vertex streams present in a converted geometry.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct GeometryFeatures: u32 {
        const NORMALS       = 1 << 0;
        const COLORS        = 1 << 1;
        const TEX_COORDS    = 1 << 2;
        const TANGENTS      = 1 << 3;
        /// At least one stream binds one value for the whole draw.
        const INSTANCE_RATE = 1 << 4;
    }
}

/// What a vertex stream feeds in the shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexSemantic {
    Position,
    Normal,
    Color,
    TexCoord(u32),
    Tangent,
}

/// One vertex stream.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBuffer {
    pub semantic: VertexSemantic,
    pub format: VertexFormat,
    pub step_mode: VertexStepMode,
    /// Number of elements.
    pub count: u32,
    pub stride: u64,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawKind {
    /// Non-indexed draw over a vertex range.
    Draw { first_vertex: u32, vertex_count: u32 },
    /// Indexed draw with its own index buffer.
    Indexed {
        format: IndexFormat,
        index_count: u32,
        data: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub topology: PrimitiveTopology,
    pub kind: DrawKind,
}

impl DrawCommand {
    /// Vertices or indices consumed by the draw.
    #[must_use]
    pub fn element_count(&self) -> u32 {
        match &self.kind {
            DrawKind::Draw { vertex_count, .. } => *vertex_count,
            DrawKind::Indexed { index_count, .. } => *index_count,
        }
    }
}

/// Vertex streams plus the draws that consume them.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexIndexDraw {
    pub attributes: Vec<VertexBuffer>,
    pub draws: Vec<DrawCommand>,
    pub features: GeometryFeatures,
}

impl VertexIndexDraw {
    #[must_use]
    pub fn attribute(&self, semantic: VertexSemantic) -> Option<&VertexBuffer> {
        self.attributes.iter().find(|a| a.semantic == semantic)
    }

    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.attribute(VertexSemantic::Position).map_or(0, |a| a.count)
    }
}

/// A converted geometry leaf in the render graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryNode {
    pub name: Option<String>,
    pub draw: VertexIndexDraw,
    pub bounds: Option<BoundingBox>,
}
