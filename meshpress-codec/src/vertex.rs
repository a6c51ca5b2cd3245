//! Source and packed vertex types
//!
//! Packed layout (both streams tightly packed, one element per vertex):
//!
//! ```text
//! stream A  PackedPosition    x:i16 y:i16 z:i16 divisor:i16       8 bytes
//! stream B  PackedAttributes  qx:i16 qy:i16 qz:i16 qw:i16 u:f16 v:f16  12 bytes
//! ```
//!
//! All i16 channels are snorm16.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};
use half::f16;

use crate::packing::{pack_uv_f16, unpack_uv_f16};
use crate::position::pack_position;
use crate::tangent_frame::{TangentFrame, decode_qtangent, encode_qtangent};

/// One vertex of the source mesh, unpacked
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceVertex {
    /// Object-space position, unbounded magnitude
    pub position: Vec3,
    /// Expected near unit length
    pub normal: Vec3,
    /// xyz direction, w = ±1 handedness
    pub tangent: Vec4,
    pub uv: Vec2,
}

/// Stream A element: position scaled into [-1, 1] plus its divisor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct PackedPosition {
    pub x: i16,
    pub y: i16,
    pub z: i16,
    /// Divisor, see [`crate::position`]
    pub w: i16,
}

const _: () = assert!(std::mem::size_of::<PackedPosition>() == PackedPosition::STRIDE);

impl PackedPosition {
    /// Bytes per element in stream A
    pub const STRIDE: usize = 8;

    pub const fn new(x: i16, y: i16, z: i16, w: i16) -> Self {
        Self { x, y, z, w }
    }
}

/// Stream B element: QTangent plus half-float UV
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PackedAttributes {
    /// Quaternion x, y, z, w as snorm16
    pub qtangent: [i16; 4],
    pub uv: [f16; 2],
}

const _: () = assert!(std::mem::size_of::<PackedAttributes>() == PackedAttributes::STRIDE);

impl PackedAttributes {
    /// Bytes per element in stream B
    pub const STRIDE: usize = 12;

    /// Reconstruct the tangent frame
    pub fn tangent_frame(&self) -> TangentFrame {
        decode_qtangent(self.qtangent)
    }

    pub fn uv(&self) -> Vec2 {
        Vec2::from_array(unpack_uv_f16(self.uv))
    }
}

/// Pack a single vertex into its stream A and stream B elements
///
/// Pure function of the vertex; safe to call from any thread in any order.
pub fn pack_vertex(vertex: &SourceVertex) -> (PackedPosition, PackedAttributes) {
    let position = pack_position(vertex.position);
    let attributes = PackedAttributes {
        qtangent: encode_qtangent(vertex.normal, vertex.tangent),
        uv: pack_uv_f16(vertex.uv.to_array()),
    };
    (position, attributes)
}
