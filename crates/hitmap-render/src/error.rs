//! Error types for texture and picker operations.

use thiserror::Error;

/// Errors raised by texture and picker operations.
///
/// Device-level failures (lost context, allocation failure) are not
/// modeled here; the device collaborator owns those. This enum covers the
/// core's own precondition checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A mip level is already locked.
    #[error("texture level {level} is already locked")]
    AlreadyLocked {
        /// The currently locked level.
        level: usize,
    },

    /// `unlock` was called with no level locked.
    #[error("unlock called while no texture level is locked")]
    NotLocked,

    /// The requested mip level does not exist.
    #[error("mip level {level} out of range (texture has {count} levels)")]
    LevelOutOfRange {
        /// The requested level.
        level: usize,
        /// Number of levels the texture has.
        count: usize,
    },

    /// The requested cubemap face does not exist.
    #[error("cubemap face {face} out of range")]
    FaceOutOfRange {
        /// The requested face.
        face: usize,
    },

    /// The level is occupied by an external image source and cannot be
    /// locked for procedural writes.
    #[error("texture level {level} holds an external source; it cannot be locked")]
    LevelHasSource {
        /// The requested level.
        level: usize,
    },

    /// A cubemap source must supply exactly six faces.
    #[error("cubemap source requires exactly 6 faces, got {actual}")]
    CubemapFaceCount {
        /// Number of faces supplied.
        actual: usize,
    },

    /// All six cubemap faces must share the same dimensions.
    #[error("cubemap face is {actual:?}, expected {expected:?}")]
    CubemapFaceSizeMismatch {
        /// Dimensions of the first face.
        expected: (u32, u32),
        /// Dimensions of the mismatched face.
        actual: (u32, u32),
    },

    /// A source image is smaller than the 4x4 texture minimum.
    #[error("source dimensions {actual:?} are below the 4x4 minimum")]
    SourceUndersized {
        /// Dimensions of the undersized source.
        actual: (u32, u32),
    },

    /// A single-image source was given to a cubemap texture.
    #[error("cubemap texture requires a six-face source, got a single image")]
    SourceIsNotCubemap,

    /// A six-face source was given to a non-cubemap texture.
    #[error("non-cubemap texture requires a single-image source, got six faces")]
    SourceIsCubemap,

    /// `get_selection` was called before any `prepare`.
    #[error("selection requested before the pick buffer was prepared")]
    NotPrepared,

    /// The drawable sequence changed length since `prepare`.
    #[error("drawable sequence changed since prepare: had {prepared} entries, now {actual}")]
    SceneChanged {
        /// Sequence length captured at prepare time.
        prepared: usize,
        /// Sequence length seen at selection time.
        actual: usize,
    },
}

/// A specialized Result type for texture and picker operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
