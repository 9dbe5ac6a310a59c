//! Rendering State Model
//!
//! - [`StateFragment`]: a value-comparable bundle of modes, attributes,
//!   texture bindings and uniforms
//! - [`FragmentInterner`]: pass-scoped dedup of equal fragments
//! - [`ShaderDefines`]: shader variant label derived from pipeline state
//!
//! A fragment splits into a *pipeline* part (what selects the GPU pipeline)
//! and a *data* part (what only changes descriptor bindings). See
//! [`StateFragment::split`].

pub mod attribute;
pub mod fragment;
pub mod interner;
pub mod shader_defines;

pub use attribute::{
    AttributeKind, BlendFactor, BlendFunc, CompareFunc, CullFaceMode, FilterMode, MaterialParams,
    Mode, PolygonFillMode, Program, StateAttribute, TextureBinding, TextureTarget, UniformValue,
    WrapMode,
};
pub use fragment::StateFragment;
pub use interner::{FragmentId, FragmentInterner};
pub use shader_defines::ShaderDefines;
