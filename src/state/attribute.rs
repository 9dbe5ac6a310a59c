//! State attribute vocabulary.
//!
//! Every value here compares and hashes by value. Floating point fields use
//! their bit patterns so that [`StateFragment`](super::StateFragment) can be
//! used as a hash-map key: two fragments are equal exactly when every field
//! has the same bits.

use std::hash::{Hash, Hasher};

use glam::{Mat4, Vec2, Vec3, Vec4};

// ─── Enables ──────────────────────────────────────────────────────────────────

/// Fixed-function enables. All modes are pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    Lighting,
    Blend,
    CullFace,
    DepthTest,
    AlphaTest,
    Fog,
    PolygonOffset,
}

impl Mode {
    /// Shader define emitted when the mode is enabled.
    #[must_use]
    pub const fn define_name(self) -> &'static str {
        match self {
            Self::Lighting => "USE_LIGHTING",
            Self::Blend => "USE_BLEND",
            Self::CullFace => "USE_CULL_FACE",
            Self::DepthTest => "USE_DEPTH_TEST",
            Self::AlphaTest => "USE_ALPHA_TEST",
            Self::Fog => "USE_FOG",
            Self::PolygonOffset => "USE_POLYGON_OFFSET",
        }
    }
}

/// Texture target enabled on a texture unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextureTarget {
    Texture2D,
    TextureCubeMap,
}

// ─── Attribute kinds ──────────────────────────────────────────────────────────

/// Slot an attribute occupies in a fragment. A fragment holds at most one
/// attribute per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeKind {
    Material,
    BlendFunc,
    CullFace,
    AlphaFunc,
    LineWidth,
    PolygonMode,
    Program,
}

impl AttributeKind {
    /// Whether attributes of this kind select the pipeline rather than feed
    /// descriptor bindings. A bound program is stored alongside ordinary
    /// attributes but picks the shader, so it is pipeline state.
    #[inline]
    #[must_use]
    pub const fn is_pipeline(self) -> bool {
        matches!(self, Self::Program)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstColor,
    OneMinusDstColor,
    DstAlpha,
    OneMinusDstAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendFunc {
    pub src: BlendFactor,
    pub dst: BlendFactor,
}

impl Default for BlendFunc {
    fn default() -> Self {
        Self {
            src: BlendFactor::SrcAlpha,
            dst: BlendFactor::OneMinusSrcAlpha,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullFaceMode {
    Front,
    #[default]
    Back,
    FrontAndBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunc {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolygonFillMode {
    #[default]
    Fill,
    Line,
    Point,
}

// ─── Material ─────────────────────────────────────────────────────────────────

/// Fixed-function material constants.
#[derive(Debug, Clone, Copy)]
pub struct MaterialParams {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub emission: Vec4,
    pub shininess: f32,
}

impl MaterialParams {
    fn bits(&self) -> [u32; 17] {
        let mut out = [0u32; 17];
        let colors = [self.ambient, self.diffuse, self.specular, self.emission];
        for (i, c) in colors.iter().enumerate() {
            for (j, v) in c.to_array().iter().enumerate() {
                out[i * 4 + j] = v.to_bits();
            }
        }
        out[16] = self.shininess.to_bits();
        out
    }
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
            diffuse: Vec4::new(0.8, 0.8, 0.8, 1.0),
            specular: Vec4::new(0.0, 0.0, 0.0, 1.0),
            emission: Vec4::new(0.0, 0.0, 0.0, 1.0),
            shininess: 0.0,
        }
    }
}

impl PartialEq for MaterialParams {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for MaterialParams {}

impl Hash for MaterialParams {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

// ─── Program ──────────────────────────────────────────────────────────────────

/// A bound shader program. Sources are carried verbatim; generating or
/// compiling them is left to the host renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Program {
    pub name: String,
    pub vertex_source: Option<String>,
    pub fragment_source: Option<String>,
}

impl Program {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

// ─── StateAttribute ───────────────────────────────────────────────────────────

/// A single non-texture state attribute.
#[derive(Debug, Clone)]
pub enum StateAttribute {
    Material(MaterialParams),
    BlendFunc(BlendFunc),
    CullFace(CullFaceMode),
    AlphaFunc { func: CompareFunc, reference: f32 },
    LineWidth(f32),
    PolygonMode(PolygonFillMode),
    Program(Program),
}

impl StateAttribute {
    #[must_use]
    pub fn kind(&self) -> AttributeKind {
        match self {
            Self::Material(_) => AttributeKind::Material,
            Self::BlendFunc(_) => AttributeKind::BlendFunc,
            Self::CullFace(_) => AttributeKind::CullFace,
            Self::AlphaFunc { .. } => AttributeKind::AlphaFunc,
            Self::LineWidth(_) => AttributeKind::LineWidth,
            Self::PolygonMode(_) => AttributeKind::PolygonMode,
            Self::Program(_) => AttributeKind::Program,
        }
    }
}

impl PartialEq for StateAttribute {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Material(a), Self::Material(b)) => a == b,
            (Self::BlendFunc(a), Self::BlendFunc(b)) => a == b,
            (Self::CullFace(a), Self::CullFace(b)) => a == b,
            (
                Self::AlphaFunc { func: fa, reference: ra },
                Self::AlphaFunc { func: fb, reference: rb },
            ) => fa == fb && ra.to_bits() == rb.to_bits(),
            (Self::LineWidth(a), Self::LineWidth(b)) => a.to_bits() == b.to_bits(),
            (Self::PolygonMode(a), Self::PolygonMode(b)) => a == b,
            (Self::Program(a), Self::Program(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for StateAttribute {}

impl Hash for StateAttribute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Material(m) => m.hash(state),
            Self::BlendFunc(b) => b.hash(state),
            Self::CullFace(c) => c.hash(state),
            Self::AlphaFunc { func, reference } => {
                func.hash(state);
                reference.to_bits().hash(state);
            }
            Self::LineWidth(w) => w.to_bits().hash(state),
            Self::PolygonMode(p) => p.hash(state),
            Self::Program(p) => p.hash(state),
        }
    }
}

// ─── Textures ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    #[default]
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
}

/// A texture bound to a unit: the image it samples and its sampler state.
/// Images are referenced by name; loading them is the host's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureBinding {
    pub image: String,
    pub target: TextureTarget,
    pub wrap: WrapMode,
    pub filter: FilterMode,
}

impl TextureBinding {
    #[must_use]
    pub fn new_2d(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            target: TextureTarget::Texture2D,
            wrap: WrapMode::default(),
            filter: FilterMode::default(),
        }
    }
}

// ─── Uniforms ─────────────────────────────────────────────────────────────────

/// Value of a named per-instance uniform.
#[derive(Debug, Clone, Copy)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl UniformValue {
    fn bits(&self) -> (u8, [u32; 16]) {
        let mut out = [0u32; 16];
        let tag = match self {
            Self::Bool(b) => {
                out[0] = u32::from(*b);
                0
            }
            Self::Int(i) => {
                out[0] = *i as u32;
                1
            }
            Self::Float(f) => {
                out[0] = f.to_bits();
                2
            }
            Self::Vec2(v) => {
                copy_bits(&mut out, &v.to_array());
                3
            }
            Self::Vec3(v) => {
                copy_bits(&mut out, &v.to_array());
                4
            }
            Self::Vec4(v) => {
                copy_bits(&mut out, &v.to_array());
                5
            }
            Self::Mat4(m) => {
                copy_bits(&mut out, &m.to_cols_array());
                6
            }
        };
        (tag, out)
    }
}

fn copy_bits(out: &mut [u32; 16], values: &[f32]) {
    for (slot, v) in out.iter_mut().zip(values) {
        *slot = v.to_bits();
    }
}

impl PartialEq for UniformValue {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for UniformValue {}

impl Hash for UniformValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_program_is_pipeline_kind() {
        assert!(AttributeKind::Program.is_pipeline());
        assert!(!AttributeKind::Material.is_pipeline());
        assert!(!AttributeKind::BlendFunc.is_pipeline());
    }

    #[test]
    fn test_float_attributes_compare_bitwise() {
        let a = StateAttribute::LineWidth(2.0);
        let b = StateAttribute::LineWidth(2.0);
        let c = StateAttribute::LineWidth(2.5);
        assert_eq!(a, b);
        assert_ne!(a, c);

        // Same kind of value, different variant
        assert_ne!(UniformValue::Int(1), UniformValue::Bool(true));
        assert_ne!(UniformValue::Float(0.0), UniformValue::Float(-0.0));
    }
}
