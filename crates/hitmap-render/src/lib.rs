//! Device-facing side of hitmap.
//!
//! This crate provides the pieces that drive a graphics device:
//! - the [`GraphicsDevice`] trait the core consumes (render targets,
//!   pipeline state, draws, pixel readback)
//! - the [`Texture`] resource with format-driven mip storage and
//!   lock/unlock semantics
//! - the [`RenderTarget`] grouping a color texture with a depth buffer
//! - the [`Picker`]: prepare / `get_selection` / resize over an
//!   index-encoded off-screen buffer
//!
//! The device is ambient shared mutable state; picker operations save and
//! restore the active render target around their own rebinding so
//! interleaved use of the device observes no lasting change.

pub mod camera;
pub mod device;
pub mod error;
pub mod picker;
pub mod render_target;
pub mod texture;

pub use camera::Camera;
pub use device::{
    ClearOptions, GraphicsDevice, Primitive, Rect, RenderTargetDesc, TextureDesc, TextureUpload,
    UniformValue,
};
pub use error::{RenderError, RenderResult};
pub use picker::{PickRect, Picker};
pub use render_target::RenderTarget;
pub use texture::{
    AddressMode, FilterMode, LockMode, LockOptions, SamplerState, TexelBuffer, Texture,
    TextureSource,
};

pub use hitmap_core::format::PixelFormat;
pub use hitmap_core::options::TextureOptions;
pub use hitmap_core::pick::{color_to_index, index_to_color, NO_SELECTION};
pub use hitmap_core::scene::Drawable;
