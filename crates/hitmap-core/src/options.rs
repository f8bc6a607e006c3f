//! Texture configuration options.

use serde::{Deserialize, Serialize};

use crate::format::PixelFormat;

/// Creation options for a texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureOptions {
    /// Width in pixels. Clamped to a minimum of 4 at creation.
    pub width: u32,

    /// Height in pixels. Clamped to a minimum of 4 at creation.
    pub height: u32,

    /// Pixel format of every mip level.
    pub format: PixelFormat,

    /// Whether the texture is a cubemap (six faces per mip level).
    pub cubemap: bool,

    /// Whether storage slots for a full mip chain are created. When false
    /// the texture has a single level.
    pub auto_mipmap: bool,

    /// Hint that render pipelines should treat this texture as a
    /// high-dynamic-range attachment. Not interpreted by the texture.
    pub hdr: bool,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            width: 4,
            height: 4,
            format: PixelFormat::R8G8B8A8,
            cubemap: false,
            auto_mipmap: true,
            hdr: false,
        }
    }
}
