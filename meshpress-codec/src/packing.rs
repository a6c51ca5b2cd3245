//! Fixed-point conversion utilities
//!
//! Provides the scalar conversions every packed stream is built from:
//! - f32 ↔ snorm16 (signed normalized, -1.0 to 1.0)
//! - f32 ↔ unorm16 (unsigned normalized, 0.0 to 1.0)
//! - f32 → f16 (IEEE 754 half-float, used for UVs)
//!
//! Out-of-range input is clamped silently. That is the lossy part of the
//! format, not an error.

use half::f16;

/// Largest snorm16 magnitude. `1.0` encodes to this value.
pub const SNORM16_MAX: f32 = 32767.0;

/// Largest unorm16 value. `1.0` encodes to this value.
pub const UNORM16_MAX: f32 = 65535.0;

/// Smallest non-zero magnitude representable in snorm16.
pub const SNORM16_EPSILON: f32 = 1.0 / SNORM16_MAX;

// ============================================================================
// Basic Conversion Functions
// ============================================================================

/// Convert f32 to signed normalized 16-bit integer (snorm16)
///
/// Maps f32 range [-1.0, 1.0] to i16 range [-32767, 32767], rounding to
/// nearest with ties to even.
#[inline]
pub fn f32_to_snorm16(value: f32) -> i16 {
    let scaled = value.clamp(-1.0, 1.0) * SNORM16_MAX;
    scaled.round_ties_even() as i16
}

/// Convert f32 to unsigned normalized 16-bit integer (unorm16)
///
/// Maps f32 range [0.0, 1.0] to u16 range [0, 65535].
#[inline]
pub fn f32_to_unorm16(value: f32) -> u16 {
    let scaled = value.clamp(0.0, 1.0) * UNORM16_MAX;
    scaled.round_ties_even() as u16
}

/// Convert snorm16 back to f32
#[inline]
pub fn snorm16_to_f32(value: i16) -> f32 {
    f32::from(value) / SNORM16_MAX
}

/// Convert unorm16 back to f32
#[inline]
pub fn unorm16_to_f32(value: u16) -> f32 {
    f32::from(value) / UNORM16_MAX
}

// ============================================================================
// UV Packing
// ============================================================================

/// Pack a 2D UV coordinate (f32x2) to Float16x2 format
///
/// No clamping. NaN and infinities pass through as their f16 equivalents.
#[inline]
pub fn pack_uv_f16(uv: [f32; 2]) -> [f16; 2] {
    [f16::from_f32(uv[0]), f16::from_f32(uv[1])]
}

/// Unpack a Float16x2 UV coordinate
#[inline]
pub fn unpack_uv_f16(uv: [f16; 2]) -> [f32; 2] {
    [uv[0].to_f32(), uv[1].to_f32()]
}
