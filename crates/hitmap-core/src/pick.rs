//! Index-as-color encoding for the pick buffer.
//!
//! The pick buffer is an offscreen framebuffer where each drawable is
//! rendered with a flat color encoding its ordinal index in the scene's
//! drawable sequence. Reading a pixel back and decoding the color recovers
//! the index of whatever was visible at that position.

/// The sentinel index decoded from the pick buffer's clear color.
///
/// The buffer is cleared to opaque white, which decodes to `0xFF_FFFF`, so
/// that value can never name a real drawable and means "background". This
/// also caps the addressable drawable count at 2^24 − 1; sequences longer
/// than that wrap by masking rather than erroring.
pub const NO_SELECTION: u32 = 0xFF_FFFF;

/// Decodes a pick color back to a drawable index.
///
/// The color is encoded as RGB where:
/// - R contains bits 16-23
/// - G contains bits 8-15
/// - B contains bits 0-7
#[must_use]
pub fn color_to_index(r: u8, g: u8, b: u8) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Encodes a drawable index as a pick color.
///
/// Returns [R, G, B] with the bit layout of [`color_to_index`]. Indices
/// above [`NO_SELECTION`] are masked to 24 bits.
#[must_use]
pub fn index_to_color(index: u32) -> [u8; 3] {
    [
        ((index >> 16) & 0xFF) as u8,
        ((index >> 8) & 0xFF) as u8,
        (index & 0xFF) as u8,
    ]
}

/// Encodes a drawable index as the normalized RGBA value bound to the
/// picking program's solid-color uniform.
///
/// Each channel is the encoded byte divided by 255; alpha is always 1.
#[must_use]
pub fn index_to_shader_color(index: u32) -> [f32; 4] {
    let [r, g, b] = index_to_color(index);
    [
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        1.0,
    ]
}
