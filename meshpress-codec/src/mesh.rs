//! Mesh compression
//!
//! Runs the per-vertex packers over a whole mesh and assembles the two packed
//! streams. Indices are narrowed to the source index width; submeshes and
//! bounds are copied through untouched.

use glam::{Vec2, Vec3, Vec4};
use rayon::prelude::*;

use crate::error::{CodecError, CodecResult};
use crate::tangent_frame::TangentFrame;
use crate::vertex::{PackedAttributes, PackedPosition, SourceVertex, pack_vertex};

/// Width of the index buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    #[default]
    U16,
    U32,
}

impl IndexFormat {
    /// Bytes per index
    pub const fn size(self) -> usize {
        match self {
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }

    /// Largest index value this width can hold
    pub const fn max_value(self) -> u32 {
        match self {
            Self::U16 => u16::MAX as u32,
            Self::U32 => u32::MAX,
        }
    }
}

/// Triangle indices at their final width
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexBuffer {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexBuffer {
    /// Narrow indices to `format`, keeping order
    pub fn narrow(indices: &[u32], format: IndexFormat) -> CodecResult<Self> {
        match format {
            IndexFormat::U32 => Ok(Self::U32(indices.to_vec())),
            IndexFormat::U16 => indices
                .iter()
                .enumerate()
                .map(|(position, &value)| {
                    u16::try_from(value).map_err(|_| CodecError::IndexOutOfRange {
                        position,
                        value,
                        format,
                    })
                })
                .collect::<CodecResult<Vec<u16>>>()
                .map(Self::U16),
        }
    }

    pub fn format(&self) -> IndexFormat {
        match self {
            Self::U16(_) => IndexFormat::U16,
            Self::U32(_) => IndexFormat::U32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U16(indices) => indices.len(),
            Self::U32(indices) => indices.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Widen back to u32
    pub fn to_u32(&self) -> Vec<u32> {
        match self {
            Self::U16(indices) => indices.iter().map(|&i| u32::from(i)).collect(),
            Self::U32(indices) => indices.clone(),
        }
    }

    /// GPU-ready byte view
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::U16(indices) => bytemuck::cast_slice(indices),
            Self::U32(indices) => bytemuck::cast_slice(indices),
        }
    }
}

/// Index range of one submesh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubMesh {
    pub index_start: u32,
    pub index_count: u32,
    pub base_vertex: u32,
    pub first_vertex: u32,
    pub vertex_count: u32,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Bounds of a point set, `None` when empty
    pub fn from_points(points: &[[f32; 3]]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let first = Vec3::from_array(*first);
        let (min, max) = rest.iter().fold((first, first), |(min, max), p| {
            let p = Vec3::from_array(*p);
            (min.min(p), max.max(p))
        });
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
}

/// Uncompressed mesh as handed over by the asset loader
#[derive(Debug, Clone, Default)]
pub struct SourceMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// xyz direction, w = ±1 handedness
    pub tangents: Vec<[f32; 4]>,
    /// May be empty, in which case UVs pack as zero
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub index_format: IndexFormat,
    pub submeshes: Vec<SubMesh>,
    pub bounds: Aabb,
}

impl SourceMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Gather vertex `i` from the parallel arrays
    ///
    /// Panics if `i` is out of range for positions, normals or tangents.
    pub fn vertex(&self, i: usize) -> SourceVertex {
        SourceVertex {
            position: Vec3::from_array(self.positions[i]),
            normal: Vec3::from_array(self.normals[i]),
            tangent: Vec4::from_array(self.tangents[i]),
            uv: self.uvs.get(i).map_or(Vec2::ZERO, |uv| Vec2::from_array(*uv)),
        }
    }
}

/// Codec tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Pack vertices on the rayon pool
    pub parallel: bool,
    /// Vertex count below which packing stays sequential
    pub parallel_threshold: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 4096,
        }
    }
}

impl CodecOptions {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    fn use_parallel(&self, vertex_count: usize) -> bool {
        self.parallel && vertex_count >= self.parallel_threshold
    }
}

/// Result of compressing a mesh
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedMesh {
    pub name: String,
    /// Stream A
    pub positions: Vec<PackedPosition>,
    /// Stream B
    pub attributes: Vec<PackedAttributes>,
    pub indices: IndexBuffer,
    pub submeshes: Vec<SubMesh>,
    pub bounds: Aabb,
}

impl CompressedMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Stream A as GPU-ready bytes
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Stream B as GPU-ready bytes
    pub fn attribute_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.attributes)
    }

    pub fn decode_positions(&self) -> Vec<Vec3> {
        self.positions.iter().map(PackedPosition::decode).collect()
    }

    pub fn decode_tangent_frames(&self) -> Vec<TangentFrame> {
        self.attributes
            .iter()
            .map(PackedAttributes::tangent_frame)
            .collect()
    }
}

fn check_length(attribute: &'static str, expected: usize, actual: usize) -> CodecResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(CodecError::AttributeLengthMismatch {
            attribute,
            expected,
            actual,
        })
    }
}

fn validate(source: &SourceMesh) -> CodecResult<usize> {
    let vertex_count = source.vertex_count();
    if vertex_count == 0 {
        return Err(CodecError::EmptyMesh);
    }
    if source.tangents.is_empty() {
        return Err(CodecError::MissingTangents);
    }
    if source.normals.is_empty() {
        return Err(CodecError::MissingNormals);
    }

    check_length("normal", vertex_count, source.normals.len())?;
    check_length("tangent", vertex_count, source.tangents.len())?;
    if !source.uvs.is_empty() {
        check_length("uv", vertex_count, source.uvs.len())?;
    }

    Ok(vertex_count)
}

/// Compress a mesh into its packed position and attribute streams
///
/// Fails without partial output if the mesh is empty, lacks tangents or
/// normals, has mismatched attribute arrays, or holds an index that does not
/// fit `source.index_format`.
pub fn compress_mesh(source: &SourceMesh, options: &CodecOptions) -> CodecResult<CompressedMesh> {
    let vertex_count = validate(source)?;
    let indices = IndexBuffer::narrow(&source.indices, source.index_format)?;

    if source.uvs.is_empty() {
        tracing::warn!("Mesh {:?} has no UVs, packing zero UVs", source.name);
    }

    let parallel = options.use_parallel(vertex_count);
    let (positions, attributes): (Vec<PackedPosition>, Vec<PackedAttributes>) = if parallel {
        (0..vertex_count)
            .into_par_iter()
            .map(|i| pack_vertex(&source.vertex(i)))
            .unzip()
    } else {
        (0..vertex_count)
            .map(|i| pack_vertex(&source.vertex(i)))
            .unzip()
    };

    tracing::debug!(
        vertex_count,
        index_count = indices.len(),
        parallel,
        "Compressed mesh {:?}",
        source.name
    );

    Ok(CompressedMesh {
        name: source.name.clone(),
        positions,
        attributes,
        indices,
        submeshes: source.submeshes.clone(),
        bounds: source.bounds,
    })
}
