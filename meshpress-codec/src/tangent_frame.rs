//! QTangent encoding
//!
//! Collapses a normal + tangent (+ handedness) pair into one unit quaternion
//! quantized to snorm16x4. The rotation maps the canonical basis onto the
//! vertex frame:
//!
//! - `+Z` → normal
//! - `+Y` → bitangent, `cross(normal, tangent)`
//! - `+X` → tangent
//!
//! Handedness is not stored as a separate bit. It ends up in the sign of the
//! packed `w`, which the bias step keeps away from zero.

use glam::{Mat3, Quat, Vec3, Vec4};

use crate::packing::{SNORM16_EPSILON, f32_to_snorm16, snorm16_to_f32};

/// Floor for `w` so it never quantizes to 0
pub const QTANGENT_BIAS: f32 = SNORM16_EPSILON;

/// Tangent frame reconstructed from a packed QTangent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentFrame {
    pub normal: Vec3,
    /// xyz direction, w = handedness (±1)
    pub tangent: Vec4,
    /// Unsigned bitangent, `cross(normal, tangent.xyz)`
    pub bitangent: Vec3,
}

impl TangentFrame {
    /// Handedness-corrected bitangent, as a shader would compute it
    pub fn signed_bitangent(&self) -> Vec3 {
        self.bitangent * self.tangent.w
    }
}

/// Rotation taking `+Z` to `forward` and `+Y` towards `up`
///
/// `up` is re-orthogonalized against `forward`. Degenerate input (zero or
/// parallel vectors) produces a non-finite quaternion.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let forward = forward.normalize();
    let right = up.cross(forward).normalize();
    let up = forward.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, forward))
}

/// Flip into the `w >= 0` hemisphere. `q` and `-q` are the same rotation.
pub fn positive_hemisphere(q: Quat) -> Quat {
    if q.w < 0.0 { -q } else { q }
}

/// Raise `w` to [`QTANGENT_BIAS`], rescaling xyz to stay unit length
pub fn apply_w_bias(q: Quat) -> Quat {
    if q.w < QTANGENT_BIAS {
        let factor = (1.0 - QTANGENT_BIAS * QTANGENT_BIAS).sqrt();
        Quat::from_xyzw(q.x * factor, q.y * factor, q.z * factor, QTANGENT_BIAS)
    } else {
        q
    }
}

/// Fold the tangent's handedness into the sign of the quaternion
///
/// Negates `q` when `cross(t, n)` and the handedness-dependent bitangent
/// candidate point in opposite directions. For a non-degenerate frame that is
/// exactly the case `tangent.w <= 0`.
pub fn resolve_handedness(q: Quat, normal: Vec3, tangent: Vec4) -> Quat {
    let t = tangent.truncate();
    let b = if tangent.w > 0.0 {
        t.cross(normal)
    } else {
        normal.cross(t)
    };
    let c = t.cross(normal);
    if c.dot(b) < 0.0 { -q } else { q }
}

/// Build the (unquantized) QTangent for a vertex frame
///
/// `normal` and `tangent.xyz` must be non-zero and not parallel; a degenerate
/// frame is a defect in the source mesh and yields garbage, not an error.
pub fn pack_tangent_frame(normal: Vec3, tangent: Vec4) -> Quat {
    let bitangent = normal.cross(tangent.truncate());

    let q = look_rotation(normal, bitangent).normalize();
    let q = positive_hemisphere(q);
    let q = apply_w_bias(q);
    resolve_handedness(q, normal, tangent)
}

/// Build and quantize the QTangent to snorm16x4 (x, y, z, w)
pub fn encode_qtangent(normal: Vec3, tangent: Vec4) -> [i16; 4] {
    let q = pack_tangent_frame(normal, tangent);
    [
        f32_to_snorm16(q.x),
        f32_to_snorm16(q.y),
        f32_to_snorm16(q.z),
        f32_to_snorm16(q.w),
    ]
}

/// Decode a snorm16x4 QTangent back to its frame
///
/// The rotation ignores the quaternion's sign; handedness is the sign of `w`.
pub fn decode_qtangent(packed: [i16; 4]) -> TangentFrame {
    let q = Quat::from_xyzw(
        snorm16_to_f32(packed[0]),
        snorm16_to_f32(packed[1]),
        snorm16_to_f32(packed[2]),
        snorm16_to_f32(packed[3]),
    )
    .normalize();

    let handedness = if packed[3] < 0 { -1.0 } else { 1.0 };
    TangentFrame {
        normal: q * Vec3::Z,
        tangent: (q * Vec3::X).extend(handedness),
        bitangent: q * Vec3::Y,
    }
}
