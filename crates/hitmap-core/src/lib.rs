//! Core abstractions for hitmap.
//!
//! This crate holds the device-independent pieces of the picking system:
//! - the 24-bit index-as-color pick encoding and its background sentinel
//! - the pixel format enumeration and format-driven storage layout table
//! - opaque handles for device-side objects
//! - the drawable sequence model (topology/material predicates, mesh and
//!   skin bindings)
//! - texture creation options

pub mod format;
pub mod handle;
pub mod options;
pub mod pick;
pub mod scene;

pub use format::{mip_dimensions, mip_level_count, ElementKind, PixelFormat};
pub use handle::{
    IndexBufferId, ProgramId, RenderTargetId, TextureId, UniformId, VertexBufferId,
};
pub use options::TextureOptions;
pub use pick::{color_to_index, index_to_color, index_to_shader_color, NO_SELECTION};
pub use scene::{
    CullMode, Drawable, MaterialKind, MaterialState, MeshBinding, SkinBinding, Topology,
};
