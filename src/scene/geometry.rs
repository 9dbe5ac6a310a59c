use glam::{DVec3, Vec2, Vec3, Vec4};

// ─── Bounding volume ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Smallest box containing every point, or `None` for an empty iterator.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bb = Self { min: first, max: first };
        for p in points {
            bb.min = bb.min.min(p);
            bb.max = bb.max.max(p);
        }
        Some(bb)
    }
}

// ─── Vertex arrays ────────────────────────────────────────────────────────────

/// A typed per-vertex array as stored by the source scene graph.
///
/// Not every element type has a GPU vertex format; see
/// [`convert::geometry`](crate::convert::geometry) for which ones survive.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Float(Vec<f32>),
    Vec2(Vec<Vec2>),
    Vec3(Vec<Vec3>),
    Vec4(Vec<Vec4>),
    DVec3(Vec<DVec3>),
    UByte4(Vec<[u8; 4]>),
    Byte3(Vec<[i8; 3]>),
    Short3(Vec<[i16; 3]>),
}

impl ArrayData {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Vec2(v) => v.len(),
            Self::Vec3(v) => v.len(),
            Self::Vec4(v) => v.len(),
            Self::DVec3(v) => v.len(),
            Self::UByte4(v) => v.len(),
            Self::Byte3(v) => v.len(),
            Self::Short3(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element `i` as a position, for the array types that carry one.
    #[must_use]
    pub fn position(&self, i: usize) -> Option<Vec3> {
        match self {
            Self::Vec3(v) => v.get(i).copied(),
            Self::Vec4(v) => v.get(i).map(|p| p.truncate()),
            Self::DVec3(v) => v.get(i).map(|p| p.as_vec3()),
            Self::Vec2(v) => v.get(i).map(|p| p.extend(0.0)),
            _ => None,
        }
    }
}

// ─── Primitives ───────────────────────────────────────────────────────────────

/// Primitive assembly mode of a primitive set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
    QuadStrip,
    Polygon,
}

/// One draw of a geometry: either a vertex range or an index list.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveSet {
    DrawArrays {
        mode: PrimitiveMode,
        first: u32,
        count: u32,
    },
    ElementsU8 {
        mode: PrimitiveMode,
        indices: Vec<u8>,
    },
    ElementsU16 {
        mode: PrimitiveMode,
        indices: Vec<u16>,
    },
    ElementsU32 {
        mode: PrimitiveMode,
        indices: Vec<u32>,
    },
}

impl PrimitiveSet {
    #[must_use]
    pub fn mode(&self) -> PrimitiveMode {
        match self {
            Self::DrawArrays { mode, .. }
            | Self::ElementsU8 { mode, .. }
            | Self::ElementsU16 { mode, .. }
            | Self::ElementsU32 { mode, .. } => *mode,
        }
    }

    /// Number of vertices (or indices) the set draws.
    #[must_use]
    pub fn element_count(&self) -> usize {
        match self {
            Self::DrawArrays { count, .. } => *count as usize,
            Self::ElementsU8 { indices, .. } => indices.len(),
            Self::ElementsU16 { indices, .. } => indices.len(),
            Self::ElementsU32 { indices, .. } => indices.len(),
        }
    }

    /// Number of whole primitives the set assembles.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        let n = self.element_count();
        match self.mode() {
            PrimitiveMode::Points => n,
            PrimitiveMode::Lines => n / 2,
            PrimitiveMode::LineStrip => n.saturating_sub(1),
            PrimitiveMode::LineLoop => if n >= 2 { n } else { 0 },
            PrimitiveMode::Triangles => n / 3,
            PrimitiveMode::TriangleStrip | PrimitiveMode::TriangleFan | PrimitiveMode::Polygon => {
                n.saturating_sub(2)
            }
            PrimitiveMode::Quads => n / 4,
            PrimitiveMode::QuadStrip => n.saturating_sub(2) / 2,
        }
    }
}

// ─── Geometry ─────────────────────────────────────────────────────────────────

/// A leaf of the source scene graph: vertex streams plus primitive sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Option<ArrayData>,
    pub normals: Option<ArrayData>,
    pub colors: Option<ArrayData>,
    /// Texture coordinates, indexed by texture unit.
    pub tex_coords: Vec<ArrayData>,
    pub tangents: Option<ArrayData>,
    pub primitives: Vec<PrimitiveSet>,
}

impl Geometry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Triangle list over `positions`, drawn with 32-bit indices.
    #[must_use]
    pub fn triangles(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            vertices: Some(ArrayData::Vec3(positions)),
            primitives: vec![PrimitiveSet::ElementsU32 {
                mode: PrimitiveMode::Triangles,
                indices,
            }],
            ..Default::default()
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.as_ref().map_or(0, ArrayData::len)
    }

    /// Whether the geometry has anything to draw.
    ///
    /// A geometry without vertices, without primitive sets, or whose
    /// primitive sets assemble zero primitives is skipped by the converter.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.vertex_count() > 0
            && self.primitives.iter().any(|p| p.primitive_count() > 0)
    }

    /// Axis-aligned bounds of the vertex array.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let vertices = self.vertices.as_ref()?;
        BoundingBox::from_points((0..vertices.len()).filter_map(|i| vertices.position(i)))
    }
}
