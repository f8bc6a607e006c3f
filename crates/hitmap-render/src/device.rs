//! The graphics device collaborator.
//!
//! The picker and texture resources never talk to a GPU API directly; they
//! drive this trait. The device is ambient shared mutable state: exactly
//! one render target and one viewport/scissor rectangle are active at a
//! time, and callers that rebind them are expected to restore what they
//! found (see `picker::TargetScope`).

use glam::{Mat4, Vec2, Vec4};
use hitmap_core::format::PixelFormat;
use hitmap_core::handle::{
    IndexBufferId, ProgramId, RenderTargetId, TextureId, UniformId, VertexBufferId,
};
use hitmap_core::scene::{CullMode, Topology};

use crate::texture::SamplerState;

/// An axis-aligned pixel rectangle, bottom-left anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left edge in pixels.
    pub x: u32,
    /// Bottom edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Creates a rectangle.
    #[must_use]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// What a `clear` call resets. A `None` field leaves that attachment
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearOptions {
    /// Color to clear the color attachment to.
    pub color: Option<[f32; 4]>,
    /// Value to clear the depth buffer to.
    pub depth: Option<f32>,
}

/// One draw call's primitive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Primitive {
    /// Primitive topology.
    pub topology: Topology,
    /// First index (or vertex, when non-indexed).
    pub base: u32,
    /// Number of indices (or vertices).
    pub count: u32,
    /// Whether the draw reads the bound index buffer.
    pub indexed: bool,
}

/// Descriptor for allocating a device-side texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc {
    /// Width of level 0 in pixels.
    pub width: u32,
    /// Height of level 0 in pixels.
    pub height: u32,
    /// Pixel format of every level.
    pub format: PixelFormat,
    /// Whether the texture is a cubemap.
    pub cubemap: bool,
    /// Number of mip levels.
    pub mip_count: u32,
}

/// One mip level (and face) worth of pixel data to upload.
#[derive(Debug, Clone, Copy)]
pub struct TextureUpload<'a> {
    /// Target mip level.
    pub level: u32,
    /// Target cubemap face; 0 for 2D textures.
    pub face: u32,
    /// Level width in pixels.
    pub width: u32,
    /// Level height in pixels.
    pub height: u32,
    /// Raw bytes laid out per the texture's pixel format.
    pub bytes: &'a [u8],
}

/// Descriptor for allocating a device-side render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetDesc {
    /// Color attachment.
    pub color: TextureId,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Whether the target gets an implicit depth buffer.
    pub depth: bool,
}

/// A value bound to a resolved uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue<'a> {
    /// Scalar float.
    Float(f32),
    /// Two-component vector.
    Vec2(Vec2),
    /// Four-component vector.
    Vec4(Vec4),
    /// 4x4 matrix.
    Mat4(Mat4),
    /// Array of 4x4 matrices (bone palettes).
    Mat4Array(&'a [Mat4]),
    /// Texture binding.
    Texture(TextureId),
}

/// The operations the picking core consumes from a graphics device.
///
/// Object-safe so callers can hold `&mut dyn GraphicsDevice`. All calls
/// are synchronous; `read_pixels` blocks until the data is available.
pub trait GraphicsDevice {
    /// Dimensions of the device's default surface.
    fn surface_size(&self) -> (u32, u32);

    /// Whether the device can sample bone palettes from textures in the
    /// vertex stage.
    fn supports_bone_textures(&self) -> bool;

    /// Allocates a render target.
    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> RenderTargetId;

    /// Releases a render target.
    fn destroy_render_target(&mut self, target: RenderTargetId);

    /// The currently bound render target, `None` for the default surface.
    fn active_render_target(&self) -> Option<RenderTargetId>;

    /// Binds a render target, `None` for the default surface.
    fn set_render_target(&mut self, target: Option<RenderTargetId>);

    /// Sets the viewport rectangle.
    fn set_viewport(&mut self, rect: Rect);

    /// Sets the scissor rectangle.
    fn set_scissor(&mut self, rect: Rect);

    /// Clears the active render target's attachments.
    fn clear(&mut self, options: &ClearOptions);

    /// Enables or disables blending.
    fn set_blending(&mut self, enabled: bool);

    /// Sets the face culling mode.
    fn set_cull_mode(&mut self, cull: CullMode);

    /// Enables or disables depth testing.
    fn set_depth_test(&mut self, enabled: bool);

    /// Enables or disables depth writes.
    fn set_depth_write(&mut self, enabled: bool);

    /// Returns the picking program variant for static or skinned meshes.
    fn picking_program(&mut self, skinned: bool) -> ProgramId;

    /// Binds a shader program.
    fn set_program(&mut self, program: ProgramId);

    /// Resolves a named uniform to a settable handle.
    fn resolve_uniform(&mut self, name: &str) -> UniformId;

    /// Sets a resolved uniform's value.
    fn set_uniform(&mut self, uniform: UniformId, value: UniformValue<'_>);

    /// Binds a vertex buffer.
    fn set_vertex_buffer(&mut self, buffer: VertexBufferId);

    /// Binds an index buffer.
    fn set_index_buffer(&mut self, buffer: IndexBufferId);

    /// Issues a draw call with the bound buffers and program.
    fn draw(&mut self, primitive: &Primitive);

    /// Allocates a texture.
    fn create_texture(&mut self, desc: &TextureDesc) -> TextureId;

    /// Uploads one level/face of pixel data.
    fn upload_texture(&mut self, texture: TextureId, upload: &TextureUpload<'_>);

    /// Applies sampler state to a texture.
    fn set_sampler_state(&mut self, texture: TextureId, sampler: &SamplerState);

    /// Releases a texture.
    fn destroy_texture(&mut self, texture: TextureId);

    /// Reads back a rectangle of RGBA8 pixels from the active render
    /// target into `pixels`, row-major from the bottom-left origin.
    /// `pixels` must hold `width * height * 4` bytes.
    fn read_pixels(&mut self, x: u32, y: u32, width: u32, height: u32, pixels: &mut [u8]);
}
