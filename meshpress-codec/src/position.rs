//! Adaptive snorm16 position packing
//!
//! snorm16 covers only [-1, 1]. Each vertex picks its own divisor, a multiple
//! of [`POSITION_BLOCK_SIZE`], divides its position by it and stores the
//! divisor in the fourth channel:
//!
//! ```text
//! x, y, z  snorm16(position / divisor)
//! w        snorm16(blocks / MAX_DIVISOR_BLOCKS)   blocks = divisor / 64
//! ```
//!
//! Since `blocks` is an integer, `w` ends up holding it exactly. Absolute
//! precision per axis is `divisor / 65534`, so far-away vertices get coarser.
//!
//! Consumers (shaders included) decode with
//!
//! ```text
//! divisor  = w * 64                  // w read as a raw integer
//!          = round(snorm(w) * 32767) * 64
//! position = snorm(xyz) * divisor
//! ```
//!
//! Reading `w` as a normalized value and multiplying by 64 directly
//! (`snorm(w) * 64`) does not recover the divisor.

use glam::Vec3;

use crate::packing::{f32_to_snorm16, snorm16_to_f32};
use crate::vertex::PackedPosition;

/// Divisors are whole multiples of this
pub const POSITION_BLOCK_SIZE: f32 = 64.0;

/// Largest block count the divisor channel can hold
pub const MAX_DIVISOR_BLOCKS: f32 = 32767.0;

/// Largest encodable divisor. Positions beyond it saturate.
pub const MAX_DIVISOR: f32 = POSITION_BLOCK_SIZE * MAX_DIVISOR_BLOCKS;

/// The two block multiples bracketing `magnitude`, both at least one block
#[inline]
pub fn divisor_candidates(magnitude: f32) -> (f32, f32) {
    let blocks = magnitude / POSITION_BLOCK_SIZE;
    let low = (blocks.floor() * POSITION_BLOCK_SIZE).max(POSITION_BLOCK_SIZE);
    let high = (blocks.ceil() * POSITION_BLOCK_SIZE).max(POSITION_BLOCK_SIZE);
    (low, high)
}

/// Choose the divisor for a position
///
/// Compares `|position / d - position|²` for both candidates and keeps the
/// smaller; `low` wins ties. Components larger than the chosen divisor are
/// clamped when quantized.
pub fn select_divisor(position: Vec3) -> f32 {
    let (low, high) = divisor_candidates(position.length());

    let error_low = (position / low - position).length_squared();
    let error_high = (position / high - position).length_squared();

    // Ties keep `low`. The source engine compared with `>` and kept `high`;
    // the two differ only where f32 rounding makes both errors equal, which
    // starts around |p| ~ 1e6.
    if error_high >= error_low { low } else { high }
}

/// Encode a divisor into the snorm16 fourth channel
#[inline]
pub fn encode_divisor(divisor: f32) -> i16 {
    f32_to_snorm16(divisor / POSITION_BLOCK_SIZE / MAX_DIVISOR_BLOCKS)
}

/// Decode the fourth channel back to a divisor
#[inline]
pub fn decode_divisor(packed: i16) -> f32 {
    divisor_blocks(packed) * POSITION_BLOCK_SIZE
}

#[inline]
fn divisor_blocks(packed: i16) -> f32 {
    (snorm16_to_f32(packed) * MAX_DIVISOR_BLOCKS).round()
}

/// Pack a position to snorm16x4 (x, y, z, divisor)
pub fn pack_position(position: Vec3) -> PackedPosition {
    let divisor = select_divisor(position);
    let scaled = position / divisor;

    PackedPosition::new(
        f32_to_snorm16(scaled.x),
        f32_to_snorm16(scaled.y),
        f32_to_snorm16(scaled.z),
        encode_divisor(divisor),
    )
}

impl PackedPosition {
    /// Divisor as a number of blocks
    pub fn divisor_blocks(&self) -> f32 {
        divisor_blocks(self.w)
    }

    /// Divisor in position units
    pub fn divisor(&self) -> f32 {
        decode_divisor(self.w)
    }

    /// Scaled position, each axis in [-1, 1]
    pub fn scaled(&self) -> Vec3 {
        Vec3::new(
            snorm16_to_f32(self.x),
            snorm16_to_f32(self.y),
            snorm16_to_f32(self.z),
        )
    }

    /// Reconstructed position
    pub fn decode(&self) -> Vec3 {
        self.scaled() * self.divisor()
    }
}
