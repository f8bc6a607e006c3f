//! Pixel formats and format-driven storage layout.
//!
//! Every mip level of a texture is backed by a typed buffer whose element
//! type and length are pure functions of (format, level width, level
//! height). The table lives here so texture storage, device uploads, and
//! tests all agree on it.

use serde::{Deserialize, Serialize};

/// How a pixel's channels are packed into memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit alpha only.
    A8,
    /// 8-bit luminance only.
    L8,
    /// 8-bit luminance + 8-bit alpha.
    L8A8,
    /// Packed 16-bit RGB, 5-6-5.
    R5G6B5,
    /// Packed 16-bit RGBA, 5-5-5-1.
    R5G5B5A1,
    /// Packed 16-bit RGBA, 4-4-4-4.
    R4G4B4A4,
    /// 8 bits per channel RGB.
    R8G8B8,
    /// 8 bits per channel RGBA.
    R8G8B8A8,
    /// Block-compressed, 8 bytes per 4x4 block.
    Dxt1,
    /// Block-compressed, 16 bytes per 4x4 block.
    Dxt3,
    /// Block-compressed, 16 bytes per 4x4 block.
    Dxt5,
    /// 16-bit floating point RGB.
    Rgb16F,
    /// 16-bit floating point RGBA.
    Rgba16F,
    /// 32-bit floating point RGB.
    Rgb32F,
    /// 32-bit floating point RGBA.
    Rgba32F,
}

/// Element type of the buffer backing a mip level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// 8-bit unsigned elements.
    U8,
    /// 16-bit unsigned elements (packed formats).
    U16,
    /// 16-bit floating point elements.
    F16,
    /// 32-bit floating point elements.
    F32,
}

impl PixelFormat {
    /// Returns true for the block-compressed formats.
    #[must_use]
    pub fn is_compressed(self) -> bool {
        matches!(self, PixelFormat::Dxt1 | PixelFormat::Dxt3 | PixelFormat::Dxt5)
    }

    /// Returns the element type backing this format.
    #[must_use]
    pub fn element_kind(self) -> ElementKind {
        match self {
            PixelFormat::A8
            | PixelFormat::L8
            | PixelFormat::L8A8
            | PixelFormat::R8G8B8
            | PixelFormat::R8G8B8A8
            | PixelFormat::Dxt1
            | PixelFormat::Dxt3
            | PixelFormat::Dxt5 => ElementKind::U8,
            PixelFormat::R5G6B5 | PixelFormat::R5G5B5A1 | PixelFormat::R4G4B4A4 => ElementKind::U16,
            PixelFormat::Rgb16F | PixelFormat::Rgba16F => ElementKind::F16,
            PixelFormat::Rgb32F | PixelFormat::Rgba32F => ElementKind::F32,
        }
    }

    /// Elements per pixel for the uncompressed formats, `None` for the
    /// block-compressed ones (which are sized per 4x4 block instead).
    #[must_use]
    pub fn elements_per_pixel(self) -> Option<usize> {
        match self {
            PixelFormat::A8 | PixelFormat::L8 => Some(1),
            PixelFormat::L8A8 => Some(2),
            PixelFormat::R5G6B5 | PixelFormat::R5G5B5A1 | PixelFormat::R4G4B4A4 => Some(1),
            PixelFormat::R8G8B8 | PixelFormat::Rgb16F | PixelFormat::Rgb32F => Some(3),
            PixelFormat::R8G8B8A8 | PixelFormat::Rgba16F | PixelFormat::Rgba32F => Some(4),
            PixelFormat::Dxt1 | PixelFormat::Dxt3 | PixelFormat::Dxt5 => None,
        }
    }

    /// Bytes per 4x4 block for the compressed formats.
    #[must_use]
    pub fn block_bytes(self) -> Option<usize> {
        match self {
            PixelFormat::Dxt1 => Some(8),
            PixelFormat::Dxt3 | PixelFormat::Dxt5 => Some(16),
            _ => None,
        }
    }

    /// Element count of the buffer backing one mip level of the given
    /// dimensions. Compressed formats ceiling-divide to whole 4x4 blocks.
    #[must_use]
    pub fn storage_len(self, width: u32, height: u32) -> usize {
        let (w, h) = (width as usize, height as usize);
        if let Some(block_bytes) = self.block_bytes() {
            return w.div_ceil(4) * h.div_ceil(4) * block_bytes;
        }
        // elements_per_pixel is Some for every uncompressed format
        w * h * self.elements_per_pixel().unwrap_or(0)
    }
}

/// Dimensions of a mip level, halved per level and floored at 1.
#[must_use]
pub fn mip_dimensions(width: u32, height: u32, level: u32) -> (u32, u32) {
    ((width >> level).max(1), (height >> level).max(1))
}

/// Number of levels in a full mip chain for the given dimensions.
#[must_use]
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}
