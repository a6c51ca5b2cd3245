//! Fixed-point vertex codec
//!
//! Compresses per-vertex position, normal/tangent frame and UV into two
//! GPU-ready streams:
//!
//! - stream A: snorm16x4 position with a per-vertex divisor
//! - stream B: snorm16x4 QTangent + f16x2 UV
//!
//! Every vertex is packed independently, so the mesh loop may run on any
//! number of threads.
//!
//! # Modules
//!
//! - [`packing`] - snorm16/unorm16 conversion and f16 UVs
//! - [`tangent_frame`] - QTangent encode/decode
//! - [`position`] - adaptive divisor position packing
//! - [`vertex`] - source and packed vertex types
//! - [`mesh`] - whole-mesh compression

mod error;

pub mod mesh;
pub mod packing;
pub mod position;
pub mod tangent_frame;
pub mod vertex;

pub use error::{CodecError, CodecResult};

// Re-export commonly used items
pub use mesh::{
    Aabb, CodecOptions, CompressedMesh, IndexBuffer, IndexFormat, SourceMesh, SubMesh,
    compress_mesh,
};
pub use packing::{
    f32_to_snorm16, f32_to_unorm16, pack_uv_f16, snorm16_to_f32, unorm16_to_f32, unpack_uv_f16,
};
pub use position::{POSITION_BLOCK_SIZE, pack_position, select_divisor};
pub use tangent_frame::{TangentFrame, decode_qtangent, encode_qtangent, pack_tangent_frame};
pub use vertex::{PackedAttributes, PackedPosition, SourceVertex, pack_vertex};
