//! Pick color encoding and shared pick result types.
//!
//! The GPU picker renders every triangle of the proxy mesh with a color that
//! encodes its sequential index. The mapping is a bijection between `i32` and
//! RGBA bytes, so a read-back pixel decodes to exactly one triangle:
//! - A contains bits 24-31
//! - R contains bits 16-23
//! - G contains bits 8-15
//! - B contains bits 0-7
//!
//! The background is cleared to opaque white, which decodes to `-1`.

/// Clear color of the pick target. Decodes to a negative index.
pub const BACKGROUND_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Encodes a triangle index as an RGBA pick color.
#[must_use]
pub fn index_to_rgba(index: i32) -> [u8; 4] {
    let bits = index.to_ne_bytes();
    let value = u32::from_ne_bytes(bits);
    [
        ((value >> 16) & 0xFF) as u8,
        ((value >> 8) & 0xFF) as u8,
        (value & 0xFF) as u8,
        (value >> 24) as u8,
    ]
}

/// Decodes an RGBA pick color back to a triangle index.
///
/// Negative results (the background included) mean nothing was drawn there.
#[must_use]
pub fn rgba_to_index(color: [u8; 4]) -> i32 {
    let [r, g, b, a] = color;
    let value = (u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b);
    i32::from_ne_bytes(value.to_ne_bytes())
}

/// Decodes a pick color into a triangle index, or `None` for the background.
#[must_use]
pub fn decode_triangle_id(color: [u8; 4]) -> Option<u32> {
    u32::try_from(rgba_to_index(color)).ok()
}

/// The face picking strategy a session tries first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickStrategy {
    /// Color-coded rasterization with a single pixel readback.
    Gpu,
    /// Brute-force ray casting over all faces.
    Cpu,
}
