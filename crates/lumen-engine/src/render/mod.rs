//! Rendering primitives.
//!
//! Convention: the quad is specified directly in clip space, so no viewport
//! transform happens on the CPU. Shaders receive the viewport as a uniform.

mod ctx;
mod quad;

pub use ctx::{RenderCtx, RenderTarget};
pub use quad::{QuadMesh, QuadVertex, QUAD_TOPOLOGY, QUAD_VERTICES};

/// Clear color used behind the quad.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};
