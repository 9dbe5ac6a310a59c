//! Source geometry → GPU-ready buffers.
//!
//! Each conversion returns `None` when the value has no target-side
//! equivalent. Callers omit the corresponding stream or draw instead of
//! failing the geometry.

use wgpu::{IndexFormat, PrimitiveTopology, VertexFormat, VertexStepMode};

use crate::render::{DrawCommand, DrawKind, GeometryFeatures, VertexBuffer, VertexIndexDraw, VertexSemantic};
use crate::scene::{ArrayData, Geometry, PrimitiveMode, PrimitiveSet};

/// Vertex format and raw bytes for an array.
///
/// `Byte3` and `Short3` have no three-component vertex format and yield
/// `None`.
#[must_use]
pub fn convert_array(array: &ArrayData) -> Option<(VertexFormat, Vec<u8>)> {
    let converted = match array {
        ArrayData::Float(v) => (VertexFormat::Float32, bytemuck::cast_slice(v).to_vec()),
        ArrayData::Vec2(v) => (VertexFormat::Float32x2, bytemuck::cast_slice(v).to_vec()),
        ArrayData::Vec3(v) => (VertexFormat::Float32x3, bytemuck::cast_slice(v).to_vec()),
        ArrayData::Vec4(v) => (VertexFormat::Float32x4, bytemuck::cast_slice(v).to_vec()),
        ArrayData::DVec3(v) => (VertexFormat::Float64x3, bytemuck::cast_slice(v).to_vec()),
        ArrayData::UByte4(v) => (VertexFormat::Unorm8x4, bytemuck::cast_slice(v).to_vec()),
        ArrayData::Byte3(_) | ArrayData::Short3(_) => return None,
    };
    Some(converted)
}

/// Primitive topology for a mode. Loops, fans, quads and polygons have no
/// list or strip equivalent and yield `None`.
#[must_use]
pub fn convert_topology(mode: PrimitiveMode) -> Option<PrimitiveTopology> {
    match mode {
        PrimitiveMode::Points => Some(PrimitiveTopology::PointList),
        PrimitiveMode::Lines => Some(PrimitiveTopology::LineList),
        PrimitiveMode::LineStrip => Some(PrimitiveTopology::LineStrip),
        PrimitiveMode::Triangles => Some(PrimitiveTopology::TriangleList),
        PrimitiveMode::TriangleStrip => Some(PrimitiveTopology::TriangleStrip),
        PrimitiveMode::LineLoop
        | PrimitiveMode::TriangleFan
        | PrimitiveMode::Quads
        | PrimitiveMode::QuadStrip
        | PrimitiveMode::Polygon => None,
    }
}

/// Draw command for one primitive set.
///
/// Sets that assemble no primitives, use an unsupported mode, or reference
/// vertices past `vertex_count` yield `None`. 8-bit indices are widened to
/// 16 bits.
#[must_use]
pub fn convert_primitive_set(set: &PrimitiveSet, vertex_count: usize) -> Option<DrawCommand> {
    if set.primitive_count() == 0 {
        return None;
    }
    let topology = convert_topology(set.mode())?;

    let kind = match set {
        PrimitiveSet::DrawArrays { first, count, .. } => {
            if (*first as usize) + (*count as usize) > vertex_count {
                log::warn!("Draw range {first}+{count} exceeds {vertex_count} vertices");
                return None;
            }
            DrawKind::Draw {
                first_vertex: *first,
                vertex_count: *count,
            }
        }
        PrimitiveSet::ElementsU8 { indices, .. } => {
            let widened: Vec<u16> = indices.iter().map(|&i| u16::from(i)).collect();
            indexed(IndexFormat::Uint16, &widened, vertex_count)?
        }
        PrimitiveSet::ElementsU16 { indices, .. } => indexed(IndexFormat::Uint16, indices, vertex_count)?,
        PrimitiveSet::ElementsU32 { indices, .. } => indexed(IndexFormat::Uint32, indices, vertex_count)?,
    };

    Some(DrawCommand { topology, kind })
}

fn indexed<T>(format: IndexFormat, indices: &[T], vertex_count: usize) -> Option<DrawKind>
where
    T: bytemuck::Pod + Into<u32>,
{
    let max: u32 = indices.iter().map(|&i| i.into()).max()?;
    if max as usize >= vertex_count {
        log::warn!("Index {max} out of range for {vertex_count} vertices, dropping draw");
        return None;
    }
    Some(DrawKind::Indexed {
        format,
        index_count: indices.len() as u32,
        data: bytemuck::cast_slice(indices).to_vec(),
    })
}

/// Converts one vertex stream, deciding its step mode from its length.
///
/// A stream with one entry for the whole geometry binds per instance. Any
/// other length mismatch drops the stream.
fn convert_stream(semantic: VertexSemantic, array: &ArrayData, vertex_count: usize) -> Option<VertexBuffer> {
    let step_mode = if array.len() == vertex_count {
        VertexStepMode::Vertex
    } else if array.len() == 1 {
        VertexStepMode::Instance
    } else {
        log::warn!(
            "Dropping {semantic:?} stream: {} entries for {vertex_count} vertices",
            array.len()
        );
        return None;
    };

    let Some((format, data)) = convert_array(array) else {
        log::debug!("Dropping {semantic:?} stream: unsupported element type");
        return None;
    };

    Some(VertexBuffer {
        semantic,
        format,
        step_mode,
        count: array.len() as u32,
        stride: format.size(),
        data,
    })
}

/// Converts a whole geometry.
///
/// Returns `None` when the vertex array is missing or unsupported, or when
/// no primitive set converts.
#[must_use]
pub fn convert_geometry(geometry: &Geometry) -> Option<VertexIndexDraw> {
    let vertex_count = geometry.vertex_count();
    let positions = convert_stream(VertexSemantic::Position, geometry.vertices.as_ref()?, vertex_count)?;

    let draws: Vec<DrawCommand> = geometry
        .primitives
        .iter()
        .filter_map(|set| {
            let draw = convert_primitive_set(set, vertex_count);
            if draw.is_none() {
                log::debug!("Omitting primitive set with mode {:?}", set.mode());
            }
            draw
        })
        .collect();
    if draws.is_empty() {
        return None;
    }

    let mut features = GeometryFeatures::empty();
    let mut attributes = vec![positions];

    let optional = [
        (VertexSemantic::Normal, geometry.normals.as_ref(), GeometryFeatures::NORMALS),
        (VertexSemantic::Color, geometry.colors.as_ref(), GeometryFeatures::COLORS),
        (VertexSemantic::Tangent, geometry.tangents.as_ref(), GeometryFeatures::TANGENTS),
    ];
    let tex_coords = geometry.tex_coords.iter().enumerate().map(|(unit, array)| {
        (VertexSemantic::TexCoord(unit as u32), Some(array), GeometryFeatures::TEX_COORDS)
    });

    for (semantic, array, feature) in optional.into_iter().chain(tex_coords) {
        let Some(array) = array else { continue };
        if let Some(buffer) = convert_stream(semantic, array, vertex_count) {
            features |= feature;
            if buffer.step_mode == VertexStepMode::Instance {
                features |= GeometryFeatures::INSTANCE_RATE;
            }
            attributes.push(buffer);
        }
    }

    Some(VertexIndexDraw {
        attributes,
        draws,
        features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_topology_support() {
        assert_eq!(convert_topology(PrimitiveMode::Triangles), Some(PrimitiveTopology::TriangleList));
        assert_eq!(convert_topology(PrimitiveMode::LineStrip), Some(PrimitiveTopology::LineStrip));
        assert_eq!(convert_topology(PrimitiveMode::TriangleFan), None);
        assert_eq!(convert_topology(PrimitiveMode::Quads), None);
    }

    #[test]
    fn test_u8_indices_widen() {
        let set = PrimitiveSet::ElementsU8 {
            mode: PrimitiveMode::Triangles,
            indices: vec![0, 1, 2],
        };
        let draw = convert_primitive_set(&set, 3).unwrap();
        match draw.kind {
            DrawKind::Indexed { format, index_count, data } => {
                assert_eq!(format, IndexFormat::Uint16);
                assert_eq!(index_count, 3);
                assert_eq!(data.len(), 6);
            }
            DrawKind::Draw { .. } => panic!("expected indexed draw"),
        }
    }

    #[test]
    fn test_out_of_range_index_drops_draw() {
        let set = PrimitiveSet::ElementsU16 {
            mode: PrimitiveMode::Triangles,
            indices: vec![0, 1, 5],
        };
        assert!(convert_primitive_set(&set, 3).is_none());
    }

    #[test]
    fn test_vec3_bytes() {
        let (format, data) = convert_array(&ArrayData::Vec3(vec![Vec3::ONE; 2])).unwrap();
        assert_eq!(format, VertexFormat::Float32x3);
        assert_eq!(data.len(), 24);
    }
}
