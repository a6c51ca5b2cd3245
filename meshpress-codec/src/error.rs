//! Codec error types

use crate::mesh::IndexFormat;

/// Precondition fault reported by [`crate::compress_mesh`]
///
/// Any fault aborts the whole mesh; there is no partial output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Vertex count is zero
    #[error("mesh has no vertices")]
    EmptyMesh,

    /// Tangent array is empty
    #[error("mesh has no tangents - generate tangents before compressing")]
    MissingTangents,

    /// Normal array is empty
    #[error("mesh has no normals")]
    MissingNormals,

    /// A per-vertex array disagrees with the position count
    #[error("{attribute} array has {actual} entries, expected {expected}")]
    AttributeLengthMismatch {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A triangle index does not fit the declared index width
    #[error("index {value} at position {position} does not fit {format:?}")]
    IndexOutOfRange {
        position: usize,
        value: u32,
        format: IndexFormat,
    },
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
