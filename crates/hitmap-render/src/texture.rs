//! Texture resource with format-driven mip storage.
//!
//! A texture owns one typed buffer (or external image source) per mip
//! level, six per level for cubemaps. CPU-side writes go through
//! `lock`/`unlock`; externally decoded images go through `set_source`.
//! Either path marks the texture for upload, which is pushed to the device
//! lazily by `upload`.

use half::f16;
use hitmap_core::format::{self, ElementKind, PixelFormat};
use hitmap_core::handle::TextureId;
use hitmap_core::options::TextureOptions;
use image::RgbaImage;

use crate::device::{GraphicsDevice, TextureDesc, TextureUpload};
use crate::error::{RenderError, RenderResult};

/// Texture filtering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Nearest-neighbor.
    Nearest,
    /// Bilinear.
    Linear,
    /// Nearest within a level, nearest between levels.
    NearestMipNearest,
    /// Nearest within a level, linear between levels.
    NearestMipLinear,
    /// Linear within a level, nearest between levels.
    LinearMipNearest,
    /// Linear within a level, linear between levels (trilinear).
    #[default]
    LinearMipLinear,
}

impl FilterMode {
    /// True for the mip-mapped variants.
    #[must_use]
    pub fn uses_mips(self) -> bool {
        !matches!(self, FilterMode::Nearest | FilterMode::Linear)
    }

    /// The within-level half of the filter, i.e. the mode with mip
    /// sampling stripped.
    #[must_use]
    pub fn base(self) -> FilterMode {
        match self {
            FilterMode::Nearest | FilterMode::NearestMipNearest | FilterMode::NearestMipLinear => {
                FilterMode::Nearest
            }
            FilterMode::Linear | FilterMode::LinearMipNearest | FilterMode::LinearMipLinear => {
                FilterMode::Linear
            }
        }
    }
}

/// Texture coordinate addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    /// Tile the texture.
    #[default]
    Repeat,
    /// Clamp coordinates to the edge texel.
    ClampToEdge,
    /// Tile with mirroring.
    MirroredRepeat,
}

/// Sampler state pushed to the device alongside the texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerState {
    /// Minification filter.
    pub min_filter: FilterMode,
    /// Magnification filter.
    pub mag_filter: FilterMode,
    /// Addressing along U.
    pub address_u: AddressMode,
    /// Addressing along V.
    pub address_v: AddressMode,
    /// Anisotropic filtering level, 1 = off.
    pub anisotropy: u32,
}

/// The typed buffer backing one mip level.
#[derive(Debug, Clone, PartialEq)]
pub enum TexelBuffer {
    /// 8-bit unsigned elements.
    U8(Vec<u8>),
    /// 16-bit unsigned elements (packed formats).
    U16(Vec<u16>),
    /// 16-bit floating point elements.
    F16(Vec<f16>),
    /// 32-bit floating point elements.
    F32(Vec<f32>),
}

impl TexelBuffer {
    fn allocate(pixel_format: PixelFormat, width: u32, height: u32) -> Self {
        let len = pixel_format.storage_len(width, height);
        match pixel_format.element_kind() {
            ElementKind::U8 => TexelBuffer::U8(vec![0; len]),
            ElementKind::U16 => TexelBuffer::U16(vec![0; len]),
            ElementKind::F16 => TexelBuffer::F16(vec![f16::ZERO; len]),
            ElementKind::F32 => TexelBuffer::F32(vec![0.0; len]),
        }
    }

    /// Number of elements in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            TexelBuffer::U8(v) => v.len(),
            TexelBuffer::U16(v) => v.len(),
            TexelBuffer::F16(v) => v.len(),
            TexelBuffer::F32(v) => v.len(),
        }
    }

    /// True when the buffer has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The buffer's contents as raw bytes, for device upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            TexelBuffer::U8(v) => v,
            TexelBuffer::U16(v) => bytemuck::cast_slice(v),
            TexelBuffer::F16(v) => bytemuck::cast_slice(v),
            TexelBuffer::F32(v) => bytemuck::cast_slice(v),
        }
    }
}

/// Storage slot for one mip level face: empty until first access, then
/// either a procedurally locked buffer or an external image source, never
/// both.
#[derive(Debug, Clone, PartialEq)]
enum MipData {
    Empty,
    Texels(TexelBuffer),
    Source(RgbaImage),
}

/// Access intent for `lock`. The backing store is CPU-owned either way;
/// the mode exists for API parity with mapped GPU resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockMode {
    /// Read existing contents.
    Read,
    /// Write new contents.
    #[default]
    Write,
}

/// Options for `lock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockOptions {
    /// Mip level to lock.
    pub level: usize,
    /// Cubemap face to lock; 0 for 2D textures.
    pub face: usize,
    /// Access intent.
    pub mode: LockMode,
}

/// Externally decoded image data for `set_source`.
#[derive(Debug, Clone)]
pub enum TextureSource {
    /// A single 2D image.
    Image(RgbaImage),
    /// Six cubemap faces, all the same dimensions.
    Cube(Vec<RgbaImage>),
}

/// A texture resource.
pub struct Texture {
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
    cubemap: bool,
    auto_mipmap: bool,
    hdr: bool,
    levels: Vec<Vec<MipData>>,
    min_filter: FilterMode,
    mag_filter: FilterMode,
    address_u: AddressMode,
    address_v: AddressMode,
    anisotropy: u32,
    needs_upload: bool,
    locked: Option<(usize, usize)>,
    handle: Option<TextureId>,
    handle_desc: Option<TextureDesc>,
}

impl Texture {
    /// Creates a texture with empty storage slots for its mip chain.
    ///
    /// Dimensions are clamped to a minimum of 4. If they are not both
    /// powers of two, the default sampler state is corrected (with a
    /// warning) per [`set_min_filter`](Self::set_min_filter) and
    /// [`set_address_u`](Self::set_address_u).
    #[must_use]
    pub fn new(options: TextureOptions) -> Self {
        let width = options.width.max(4);
        let height = options.height.max(4);
        let level_count = if options.auto_mipmap {
            format::mip_level_count(width, height) as usize
        } else {
            1
        };
        let mut texture = Self {
            width,
            height,
            pixel_format: options.format,
            cubemap: options.cubemap,
            auto_mipmap: options.auto_mipmap,
            hdr: options.hdr,
            levels: empty_levels(level_count, options.cubemap),
            min_filter: FilterMode::LinearMipLinear,
            mag_filter: FilterMode::Linear,
            address_u: AddressMode::Repeat,
            address_v: AddressMode::Repeat,
            anisotropy: 1,
            needs_upload: false,
            locked: None,
            handle: None,
            handle_desc: None,
        };
        texture.revalidate_sampler();
        texture
    }

    /// Width of level 0 in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of level 0 in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format of every level.
    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.pixel_format
    }

    /// Whether the texture is a cubemap.
    #[must_use]
    pub fn cubemap(&self) -> bool {
        self.cubemap
    }

    /// Whether the texture was created as an HDR attachment hint.
    #[must_use]
    pub fn hdr(&self) -> bool {
        self.hdr
    }

    /// Number of mip levels with storage slots.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Whether CPU-side changes await a device upload.
    #[must_use]
    pub fn needs_upload(&self) -> bool {
        self.needs_upload
    }

    /// Whether a level is currently locked.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }

    /// The device-side handle, if one was allocated.
    #[must_use]
    pub fn gpu_handle(&self) -> Option<TextureId> {
        self.handle
    }

    /// Current minification filter.
    #[must_use]
    pub fn min_filter(&self) -> FilterMode {
        self.min_filter
    }

    /// Current magnification filter.
    #[must_use]
    pub fn mag_filter(&self) -> FilterMode {
        self.mag_filter
    }

    /// Current U addressing mode.
    #[must_use]
    pub fn address_u(&self) -> AddressMode {
        self.address_u
    }

    /// Current V addressing mode.
    #[must_use]
    pub fn address_v(&self) -> AddressMode {
        self.address_v
    }

    /// Current anisotropy level.
    #[must_use]
    pub fn anisotropy(&self) -> u32 {
        self.anisotropy
    }

    fn is_pot(&self) -> bool {
        self.width.is_power_of_two() && self.height.is_power_of_two()
    }

    /// Sets the minification filter.
    ///
    /// On a non-power-of-two texture a mip-mapped filter is downgraded to
    /// its base mode with a warning; the assignment never fails.
    pub fn set_min_filter(&mut self, filter: FilterMode) {
        self.min_filter = if filter.uses_mips() && !self.is_pot() {
            log::warn!(
                "{:?} min filter requires power-of-two dimensions ({}x{} given); using {:?}",
                filter,
                self.width,
                self.height,
                filter.base()
            );
            filter.base()
        } else {
            filter
        };
    }

    /// Sets the magnification filter. Mip-mapped modes do not apply to
    /// magnification and are downgraded to their base mode with a warning.
    pub fn set_mag_filter(&mut self, filter: FilterMode) {
        self.mag_filter = if filter.uses_mips() {
            log::warn!(
                "{filter:?} is not a valid mag filter; using {:?}",
                filter.base()
            );
            filter.base()
        } else {
            filter
        };
    }

    /// Sets the U addressing mode. Forced to clamp-to-edge with a warning
    /// on non-power-of-two textures.
    pub fn set_address_u(&mut self, mode: AddressMode) {
        self.address_u = self.checked_address_mode(mode);
    }

    /// Sets the V addressing mode. Forced to clamp-to-edge with a warning
    /// on non-power-of-two textures.
    pub fn set_address_v(&mut self, mode: AddressMode) {
        self.address_v = self.checked_address_mode(mode);
    }

    /// Sets the anisotropy level, clamped to at least 1.
    pub fn set_anisotropy(&mut self, level: u32) {
        self.anisotropy = level.max(1);
    }

    fn checked_address_mode(&self, mode: AddressMode) -> AddressMode {
        if mode == AddressMode::ClampToEdge || self.is_pot() {
            mode
        } else {
            log::warn!(
                "{:?} addressing requires power-of-two dimensions ({}x{} given); using ClampToEdge",
                mode,
                self.width,
                self.height
            );
            AddressMode::ClampToEdge
        }
    }

    /// Re-applies the power-of-two constraints to the current sampler
    /// state, downgrading whatever no longer fits the dimensions.
    fn revalidate_sampler(&mut self) {
        let (min, mag) = (self.min_filter, self.mag_filter);
        let (u, v) = (self.address_u, self.address_v);
        self.set_min_filter(min);
        self.set_mag_filter(mag);
        self.set_address_u(u);
        self.set_address_v(v);
    }

    /// The sampler state pushed to the device at upload.
    #[must_use]
    pub fn sampler_state(&self) -> SamplerState {
        SamplerState {
            min_filter: self.min_filter,
            mag_filter: self.mag_filter,
            address_u: self.address_u,
            address_v: self.address_v,
            anisotropy: self.anisotropy,
        }
    }

    /// Locks a mip level for CPU-side writes, lazily allocating its
    /// backing buffer sized by the pixel format and level dimensions.
    ///
    /// # Errors
    ///
    /// [`RenderError::AlreadyLocked`] when a level is locked,
    /// [`RenderError::LevelOutOfRange`] / [`RenderError::FaceOutOfRange`]
    /// for bad coordinates, and [`RenderError::LevelHasSource`] when the
    /// level holds an external image.
    pub fn lock(&mut self, options: LockOptions) -> RenderResult<&mut TexelBuffer> {
        if let Some((level, _)) = self.locked {
            return Err(RenderError::AlreadyLocked { level });
        }
        let count = self.levels.len();
        let (width, height) = (self.width, self.height);
        let pixel_format = self.pixel_format;
        let faces = self
            .levels
            .get_mut(options.level)
            .ok_or(RenderError::LevelOutOfRange {
                level: options.level,
                count,
            })?;
        let slot = faces
            .get_mut(options.face)
            .ok_or(RenderError::FaceOutOfRange { face: options.face })?;
        if matches!(slot, MipData::Empty) {
            // the level is in range here, so the shift cannot overflow
            let (level_w, level_h) = format::mip_dimensions(width, height, options.level as u32);
            *slot = MipData::Texels(TexelBuffer::allocate(pixel_format, level_w, level_h));
        }
        if let MipData::Texels(buffer) = slot {
            self.locked = Some((options.level, options.face));
            Ok(buffer)
        } else {
            Err(RenderError::LevelHasSource {
                level: options.level,
            })
        }
    }

    /// Unlocks the texture, marking it for device upload.
    ///
    /// # Errors
    ///
    /// [`RenderError::NotLocked`] when no level is locked.
    pub fn unlock(&mut self) -> RenderResult<()> {
        if self.locked.take().is_none() {
            return Err(RenderError::NotLocked);
        }
        self.needs_upload = true;
        Ok(())
    }

    /// Replaces level 0 wholesale from externally decoded image data,
    /// adopting the source's dimensions as the texture's own.
    ///
    /// Validation happens before any mutation, so a failed call leaves the
    /// texture unchanged. On success the mip chain is rebuilt for the new
    /// dimensions and the sampler state re-checked against the
    /// power-of-two constraints (corrections warn, they do not fail).
    ///
    /// # Errors
    ///
    /// [`RenderError::AlreadyLocked`] while a level is locked;
    /// [`RenderError::SourceUndersized`] when the source is smaller than
    /// the 4x4 texture minimum; shape
    /// errors ([`RenderError::SourceIsNotCubemap`],
    /// [`RenderError::SourceIsCubemap`],
    /// [`RenderError::CubemapFaceCount`],
    /// [`RenderError::CubemapFaceSizeMismatch`]) when the source does not
    /// match the texture.
    pub fn set_source(&mut self, source: TextureSource) -> RenderResult<()> {
        if let Some((level, _)) = self.locked {
            return Err(RenderError::AlreadyLocked { level });
        }
        let (width, height) = match (&source, self.cubemap) {
            (TextureSource::Image(_), true) => return Err(RenderError::SourceIsNotCubemap),
            (TextureSource::Cube(_), false) => return Err(RenderError::SourceIsCubemap),
            (TextureSource::Image(image), false) => image.dimensions(),
            (TextureSource::Cube(faces), true) => {
                if faces.len() != 6 {
                    return Err(RenderError::CubemapFaceCount { actual: faces.len() });
                }
                let expected = faces[0].dimensions();
                for face in faces {
                    if face.dimensions() != expected {
                        return Err(RenderError::CubemapFaceSizeMismatch {
                            expected,
                            actual: face.dimensions(),
                        });
                    }
                }
                expected
            }
        };
        if width < 4 || height < 4 {
            return Err(RenderError::SourceUndersized {
                actual: (width, height),
            });
        }

        self.width = width;
        self.height = height;
        let level_count = if self.auto_mipmap {
            format::mip_level_count(width, height) as usize
        } else {
            1
        };
        self.levels = empty_levels(level_count, self.cubemap);
        match source {
            TextureSource::Image(image) => self.levels[0][0] = MipData::Source(image),
            TextureSource::Cube(faces) => {
                for (face, image) in faces.into_iter().enumerate() {
                    self.levels[0][face] = MipData::Source(image);
                }
            }
        }
        self.needs_upload = true;
        self.revalidate_sampler();
        Ok(())
    }

    /// The external image occupying level 0, if one was set.
    #[must_use]
    pub fn source(&self) -> Option<&RgbaImage> {
        match self.levels.first().and_then(|faces| faces.first()) {
            Some(MipData::Source(image)) => Some(image),
            _ => None,
        }
    }

    /// Ensures a device-side texture exists and pushes any pending level
    /// data and the current sampler state. Returns the device handle.
    ///
    /// If the texture's dimensions or mip count changed since the handle
    /// was allocated (e.g. `set_source` adopted new dimensions), the stale
    /// handle is destroyed and a fresh one allocated to match.
    pub fn upload(&mut self, device: &mut dyn GraphicsDevice) -> TextureId {
        let desc = TextureDesc {
            width: self.width,
            height: self.height,
            format: self.pixel_format,
            cubemap: self.cubemap,
            mip_count: self.levels.len() as u32,
        };
        if self.handle_desc.is_some_and(|allocated| allocated != desc) {
            if let Some(stale) = self.handle.take() {
                device.destroy_texture(stale);
            }
            self.handle_desc = None;
        }
        let handle = match self.handle {
            Some(handle) => handle,
            None => {
                let handle = device.create_texture(&desc);
                self.handle = Some(handle);
                self.handle_desc = Some(desc);
                handle
            }
        };
        if self.needs_upload {
            for (level, faces) in self.levels.iter().enumerate() {
                let (level_w, level_h) =
                    format::mip_dimensions(self.width, self.height, level as u32);
                for (face, data) in faces.iter().enumerate() {
                    let bytes: &[u8] = match data {
                        MipData::Empty => continue,
                        MipData::Texels(buffer) => buffer.as_bytes(),
                        MipData::Source(image) => image.as_raw(),
                    };
                    device.upload_texture(
                        handle,
                        &TextureUpload {
                            level: level as u32,
                            face: face as u32,
                            width: level_w,
                            height: level_h,
                            bytes,
                        },
                    );
                }
            }
            self.needs_upload = false;
        }
        device.set_sampler_state(handle, &self.sampler_state());
        handle
    }

    /// Releases the device-side handle if one was allocated. Safe to call
    /// when none was, and idempotent.
    pub fn destroy(&mut self, device: &mut dyn GraphicsDevice) {
        if let Some(handle) = self.handle.take() {
            device.destroy_texture(handle);
        }
        self.handle_desc = None;
    }
}

fn empty_levels(level_count: usize, cubemap: bool) -> Vec<Vec<MipData>> {
    let faces = if cubemap { 6 } else { 1 };
    (0..level_count)
        .map(|_| (0..faces).map(|_| MipData::Empty).collect())
        .collect()
}
