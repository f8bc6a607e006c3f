//! Opaque handles for device-side objects.
//!
//! The graphics device hands these out when resources are created and
//! accepts them back for binding and destruction. They carry no meaning
//! outside the device that issued them.

macro_rules! handle_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub u32);
    };
}

handle_type!(
    /// A device-side vertex buffer.
    VertexBufferId
);
handle_type!(
    /// A device-side index buffer.
    IndexBufferId
);
handle_type!(
    /// A device-side texture.
    TextureId
);
handle_type!(
    /// A compiled shader program.
    ProgramId
);
handle_type!(
    /// A settable uniform resolved by name.
    UniformId
);
handle_type!(
    /// A device-side render target (color attachment + depth buffer).
    RenderTargetId
);
