//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single window, wires resize and key
//! events into the redraw gate and drives the application's frames.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
