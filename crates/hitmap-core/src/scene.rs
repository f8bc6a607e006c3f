//! The drawable sequence model consumed by picking.
//!
//! The picker never owns drawables; it renders an externally owned,
//! index-stable ordered sequence and later resolves decoded indices back
//! into it. Mutating the sequence between `prepare` and `get_selection`
//! invalidates the results.

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::handle::{IndexBufferId, TextureId, VertexBufferId};

/// Mesh primitive topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    /// Point list.
    Points,
    /// Line list.
    Lines,
    /// Line strip.
    LineStrip,
    /// Triangle list.
    TriangleList,
    /// Triangle strip.
    TriangleStrip,
    /// Triangle fan.
    TriangleFan,
}

impl Topology {
    /// True for the solid (triangle) topologies. Points and lines are
    /// invisible to picking.
    #[must_use]
    pub fn is_solid(self) -> bool {
        matches!(
            self,
            Topology::TriangleList | Topology::TriangleStrip | Topology::TriangleFan
        )
    }
}

/// Which face winding the device culls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CullMode {
    /// No culling.
    None,
    /// Cull back faces.
    #[default]
    Back,
    /// Cull front faces.
    Front,
}

/// Material classification, used for the pickable-material predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialKind {
    /// Flat-colored material.
    Basic,
    /// Lit surface material.
    Standard,
    /// Particle effect material.
    Particle,
    /// Sky/background material.
    Sky,
}

impl MaterialKind {
    /// True for the material kinds the picker renders. Particles and sky
    /// are invisible to picking.
    #[must_use]
    pub fn is_pickable(self) -> bool {
        matches!(self, MaterialKind::Basic | MaterialKind::Standard)
    }
}

/// The render state a drawable's material contributes to the pick pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialState {
    /// Material classification.
    pub kind: MaterialKind,
    /// Face culling mode.
    pub cull: CullMode,
    /// Whether depth writes are enabled.
    pub depth_write: bool,
    /// Whether depth testing is enabled.
    pub depth_test: bool,
}

impl MaterialState {
    /// An opaque pickable material with default depth state.
    #[must_use]
    pub fn opaque(kind: MaterialKind) -> Self {
        Self {
            kind,
            cull: CullMode::Back,
            depth_write: true,
            depth_test: true,
        }
    }
}

/// Geometry bindings for one drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshBinding {
    /// Primitive topology.
    pub topology: Topology,
    /// Device-side vertex buffer.
    pub vertex_buffer: VertexBufferId,
    /// Device-side index buffer, if the draw is indexed.
    pub index_buffer: Option<IndexBufferId>,
    /// First index (or vertex, when non-indexed) of the draw range.
    pub base: u32,
    /// Number of indices (or vertices) in the draw range.
    pub count: u32,
    /// Whether the mesh is skinned.
    pub skinned: bool,
}

/// Skinning data for a skinned drawable.
///
/// A drawable may carry its bone palette baked into a texture, a flat
/// matrix array, or both. Which representation gets bound is decided at
/// draw time by the device's palette-texture capability flag.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinBinding {
    /// Bone palette baked into a texture, with its dimensions.
    pub palette_texture: Option<(TextureId, u32, u32)>,
    /// Bone palette as a flat matrix array.
    pub matrix_palette: Vec<Mat4>,
}

/// One entry of the scene's ordered drawable sequence.
///
/// The sequence may contain non-renderable command entries (state changes,
/// markers); those report `is_command` and are skipped by picking.
pub trait Drawable {
    /// True for non-renderable command entries.
    fn is_command(&self) -> bool {
        false
    }

    /// Geometry bindings; `None` for entries with nothing to draw.
    fn mesh(&self) -> Option<&MeshBinding>;

    /// Material render state; `None` for entries with no material.
    fn material(&self) -> Option<&MaterialState>;

    /// World transform of the drawable.
    fn world_transform(&self) -> Mat4;

    /// Skinning data, if the mesh is skinned.
    fn skin(&self) -> Option<&SkinBinding> {
        None
    }
}
