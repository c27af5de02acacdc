//! Shader program wrapper.
//!
//! A program is a vertex/fragment WGSL pair read from disk, compiled into a
//! render pipeline, plus one uniform block (`@group(0) @binding(0)`) whose
//! fields are addressed by name.
//!
//! Both stages must declare the uniform struct with the same field order the
//! [`UniformLayout`] was built with:
//!
//! ```wgsl
//! struct Uniforms {
//!     iResolution: vec2<f32>,
//!     frameCount: f32,
//! }
//! @group(0) @binding(0) var<uniform> u: Uniforms;
//! ```

mod error;
mod program;
mod source;
mod uniforms;

pub use error::{ShaderError, Stage};
pub use program::{ShaderProgram, FRAGMENT_ENTRY, VERTEX_ENTRY};
pub use source::{ShaderPaths, ShaderSources};
pub use uniforms::{UniformBlock, UniformField, UniformKind, UniformLayout, UniformLayoutBuilder};
