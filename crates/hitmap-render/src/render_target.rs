//! Render target: a color texture paired with an implicit depth buffer.

use hitmap_core::handle::RenderTargetId;

use crate::device::{GraphicsDevice, RenderTargetDesc};
use crate::texture::Texture;

/// A color texture and an implicit depth buffer, grouped behind one device
/// handle. Lifetime follows its owner; the picker recreates its target
/// wholesale on resize.
pub struct RenderTarget {
    color: Texture,
    handle: RenderTargetId,
}

impl RenderTarget {
    /// Allocates a device-side target for `color`, creating the texture's
    /// GPU handle first if needed.
    pub fn new(device: &mut dyn GraphicsDevice, mut color: Texture) -> Self {
        let color_id = color.upload(device);
        let handle = device.create_render_target(&RenderTargetDesc {
            color: color_id,
            width: color.width(),
            height: color.height(),
            depth: true,
        });
        Self { color, handle }
    }

    /// The color attachment.
    #[must_use]
    pub fn color_texture(&self) -> &Texture {
        &self.color
    }

    /// The device-side target handle.
    #[must_use]
    pub fn handle(&self) -> RenderTargetId {
        self.handle
    }

    /// Width of the color attachment in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.color.width()
    }

    /// Height of the color attachment in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.color.height()
    }

    /// Releases the device-side target and its color texture.
    pub fn destroy(mut self, device: &mut dyn GraphicsDevice) {
        device.destroy_render_target(self.handle);
        self.color.destroy(device);
    }
}
