//! Source Scene Graph
//!
//! The retained-mode input to a conversion:
//! - [`Scene`]: arenas of nodes and shared state fragments
//! - [`SceneNode`] / [`NodeKind`]: group, transform, billboard and geometry nodes
//! - [`Geometry`]: vertex arrays and primitive sets of a leaf

pub mod geometry;
pub mod node;
pub mod scene;

pub use geometry::{ArrayData, BoundingBox, Geometry, PrimitiveMode, PrimitiveSet};
pub use node::{NodeKind, ReferenceFrame, SceneNode};
pub use scene::Scene;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeKey;
    pub struct StateKey;
}
