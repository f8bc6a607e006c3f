//! Color-ID picking over an off-screen render target.
//!
//! `prepare` renders every eligible drawable with its ordinal index
//! encoded as a flat color; `get_selection` reads a pixel rectangle back
//! and decodes indices into references to the caller's drawable sequence.
//! The sequence must stay index-stable between the two calls.

use std::collections::HashSet;

use glam::Vec2;
use hitmap_core::format::PixelFormat;
use hitmap_core::handle::RenderTargetId;
use hitmap_core::options::TextureOptions;
use hitmap_core::pick::{color_to_index, index_to_shader_color, NO_SELECTION};
use hitmap_core::scene::Drawable;

use crate::camera::Camera;
use crate::device::{ClearOptions, GraphicsDevice, Primitive, Rect, UniformValue};
use crate::error::{RenderError, RenderResult};
use crate::render_target::RenderTarget;
use crate::texture::{AddressMode, FilterMode, Texture};

const UNIFORM_PROJECTION: &str = "matrix_projection";
const UNIFORM_VIEW_PROJECTION: &str = "matrix_view_projection";
const UNIFORM_MODEL: &str = "matrix_model";
const UNIFORM_POSE: &str = "matrix_pose";
const UNIFORM_POSE_MAP: &str = "texture_pose_map";
const UNIFORM_POSE_MAP_SIZE: &str = "texture_pose_map_size";
const UNIFORM_COLOR: &str = "u_color";

/// Clear color of the pick buffer. Opaque white decodes to the
/// no-selection sentinel.
const CLEAR_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const CLEAR_DEPTH: f32 = 1.0;

/// The pixel rectangle queried by `get_selection`, bottom-left anchored
/// in pick-buffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickRect {
    /// Left edge in pixels.
    pub x: u32,
    /// Bottom edge in pixels.
    pub y: u32,
    /// Width in pixels, at least 1.
    pub width: u32,
    /// Height in pixels, at least 1.
    pub height: u32,
}

impl PickRect {
    /// Creates a rectangle. Zero extents are clamped to 1.
    #[must_use]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// A single-pixel query.
    #[must_use]
    pub fn pixel(x: u32, y: u32) -> Self {
        Self::new(x, y, 1, 1)
    }
}

/// Restores the previously active render target and the full-surface
/// viewport/scissor when dropped, so the pick pass leaves no lasting
/// change in the device's ambient state on any exit path.
struct TargetScope<'a> {
    device: &'a mut dyn GraphicsDevice,
    previous: Option<RenderTargetId>,
}

impl<'a> TargetScope<'a> {
    fn bind(device: &'a mut dyn GraphicsDevice, target: RenderTargetId) -> Self {
        let previous = device.active_render_target();
        device.set_render_target(Some(target));
        Self { device, previous }
    }

    fn device(&mut self) -> &mut dyn GraphicsDevice {
        &mut *self.device
    }
}

impl Drop for TargetScope<'_> {
    fn drop(&mut self) {
        let (width, height) = self.device.surface_size();
        let full = Rect::new(0, 0, width, height);
        self.device.set_viewport(full);
        self.device.set_scissor(full);
        self.device.set_render_target(self.previous);
    }
}

/// Renders drawables into an off-screen buffer with index-encoded colors
/// and answers "what is at this pixel" queries against it.
pub struct Picker {
    width: u32,
    height: u32,
    render_target: RenderTarget,
    prepared_len: Option<usize>,
}

impl Picker {
    /// Creates a picker with a pick buffer of the given resolution.
    pub fn new(device: &mut dyn GraphicsDevice, width: u32, height: u32) -> Self {
        let render_target = build_pick_target(device, width, height);
        Self {
            width: render_target.width(),
            height: render_target.height(),
            render_target,
            prepared_len: None,
        }
    }

    /// Pick buffer width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pick buffer height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The pick render target.
    #[must_use]
    pub fn render_target(&self) -> &RenderTarget {
        &self.render_target
    }

    /// Renders an index-encoded image of `drawables` as seen by `camera`
    /// into the pick buffer, leaving it ready for selection queries.
    ///
    /// Fully overwrites the buffer each call. Entries are skipped unless
    /// they are non-command, solid-topology, and pickable-material; the
    /// skipped entries still occupy their index, so the encoding stays
    /// aligned with the caller's sequence. The sequence must not change
    /// until the matching `get_selection` calls are done.
    ///
    /// The previously active render target is restored before returning,
    /// on every exit path.
    pub fn prepare<D: Drawable>(
        &mut self,
        device: &mut dyn GraphicsDevice,
        camera: &Camera,
        drawables: &[D],
    ) {
        log::trace!(
            "preparing {}x{} pick buffer for {} drawables",
            self.width,
            self.height,
            drawables.len()
        );
        let mut scope = TargetScope::bind(device, self.render_target.handle());
        let full = Rect::new(0, 0, self.width, self.height);
        scope.device().set_viewport(full);
        scope.device().set_scissor(full);
        scope.device().clear(&ClearOptions {
            color: Some(CLEAR_COLOR),
            depth: Some(CLEAR_DEPTH),
        });

        let projection = camera.projection();
        let view_projection = camera.view_projection();
        let u_projection = scope.device().resolve_uniform(UNIFORM_PROJECTION);
        let u_view_projection = scope.device().resolve_uniform(UNIFORM_VIEW_PROJECTION);
        scope
            .device()
            .set_uniform(u_projection, UniformValue::Mat4(projection));
        scope
            .device()
            .set_uniform(u_view_projection, UniformValue::Mat4(view_projection));

        let program_static = scope.device().picking_program(false);
        let program_skinned = scope.device().picking_program(true);
        let u_model = scope.device().resolve_uniform(UNIFORM_MODEL);
        let u_color = scope.device().resolve_uniform(UNIFORM_COLOR);

        for (index, drawable) in drawables.iter().enumerate() {
            if drawable.is_command() {
                continue;
            }
            let (Some(mesh), Some(material)) = (drawable.mesh(), drawable.material()) else {
                continue;
            };
            if !mesh.topology.is_solid() || !material.kind.is_pickable() {
                continue;
            }

            let dev = scope.device();
            dev.set_blending(false);
            dev.set_cull_mode(material.cull);
            dev.set_depth_write(material.depth_write);
            dev.set_depth_test(material.depth_test);
            dev.set_uniform(u_model, UniformValue::Mat4(drawable.world_transform()));

            if mesh.skinned {
                if let Some(skin) = drawable.skin() {
                    let use_palette_texture = dev.supports_bone_textures();
                    match skin.palette_texture {
                        Some((texture, width, height)) if use_palette_texture => {
                            let u_pose_map = dev.resolve_uniform(UNIFORM_POSE_MAP);
                            dev.set_uniform(u_pose_map, UniformValue::Texture(texture));
                            let u_pose_map_size = dev.resolve_uniform(UNIFORM_POSE_MAP_SIZE);
                            dev.set_uniform(
                                u_pose_map_size,
                                UniformValue::Vec2(Vec2::new(width as f32, height as f32)),
                            );
                        }
                        _ => {
                            let u_pose = dev.resolve_uniform(UNIFORM_POSE);
                            dev.set_uniform(u_pose, UniformValue::Mat4Array(&skin.matrix_palette));
                        }
                    }
                }
                dev.set_program(program_skinned);
            } else {
                dev.set_program(program_static);
            }

            let color = index_to_shader_color(index as u32);
            dev.set_uniform(u_color, UniformValue::Vec4(color.into()));

            dev.set_vertex_buffer(mesh.vertex_buffer);
            if let Some(index_buffer) = mesh.index_buffer {
                dev.set_index_buffer(index_buffer);
            }
            dev.draw(&Primitive {
                topology: mesh.topology,
                base: mesh.base,
                count: mesh.count,
                indexed: mesh.index_buffer.is_some(),
            });
        }

        self.prepared_len = Some(drawables.len());
    }

    /// Returns the distinct drawables visible within `rect` in the buffer
    /// produced by the most recent `prepare`, in first-seen row-major
    /// order from the rect's origin.
    ///
    /// `drawables` must be the same sequence that was passed to `prepare`;
    /// the picker resolves decoded indices against it.
    ///
    /// # Errors
    ///
    /// [`RenderError::NotPrepared`] when `prepare` has not run since
    /// construction or the last `resize`; [`RenderError::SceneChanged`]
    /// when the sequence length differs from the prepared one.
    pub fn get_selection<'a, D: Drawable>(
        &self,
        device: &mut dyn GraphicsDevice,
        rect: PickRect,
        drawables: &'a [D],
    ) -> RenderResult<Vec<&'a D>> {
        let prepared = self.prepared_len.ok_or(RenderError::NotPrepared)?;
        if prepared != drawables.len() {
            return Err(RenderError::SceneChanged {
                prepared,
                actual: drawables.len(),
            });
        }

        let mut pixels = vec![0_u8; (rect.width * rect.height * 4) as usize];
        {
            let mut scope = TargetScope::bind(device, self.render_target.handle());
            scope
                .device()
                .read_pixels(rect.x, rect.y, rect.width, rect.height, &mut pixels);
        }

        let mut seen = HashSet::new();
        let mut selection = Vec::new();
        for pixel in pixels.chunks_exact(4) {
            let index = color_to_index(pixel[0], pixel[1], pixel[2]);
            if index == NO_SELECTION {
                continue;
            }
            let Some(drawable) = drawables.get(index as usize) else {
                continue;
            };
            if seen.insert(index) {
                selection.push(drawable);
            }
        }
        Ok(selection)
    }

    /// Discards the pick render target and allocates a fresh one at the
    /// given resolution. The old buffer's contents are gone, so the
    /// prepared marker is cleared; queries error until the next `prepare`.
    pub fn resize(&mut self, device: &mut dyn GraphicsDevice, width: u32, height: u32) {
        let next = build_pick_target(device, width, height);
        self.width = next.width();
        self.height = next.height();
        let old = std::mem::replace(&mut self.render_target, next);
        old.destroy(device);
        self.prepared_len = None;
    }
}

/// The pick buffer is an index lookup table, not an interpolated image:
/// nearest filtering and clamp-to-edge addressing keep decoding exact.
fn build_pick_target(device: &mut dyn GraphicsDevice, width: u32, height: u32) -> RenderTarget {
    let mut color = Texture::new(TextureOptions {
        width,
        height,
        format: PixelFormat::R8G8B8A8,
        cubemap: false,
        auto_mipmap: false,
        hdr: false,
    });
    color.set_min_filter(FilterMode::Nearest);
    color.set_mag_filter(FilterMode::Nearest);
    color.set_address_u(AddressMode::ClampToEdge);
    color.set_address_v(AddressMode::ClampToEdge);
    RenderTarget::new(device, color)
}
