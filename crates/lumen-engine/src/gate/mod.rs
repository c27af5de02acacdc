//! Redraw gating.
//!
//! The runtime does not render continuously. Event handlers mark the gate
//! dirty (resize, shader reload) and the loop draws exactly one frame per
//! dirty transition.

mod redraw;

pub use redraw::{RedrawGate, RedrawRequest};
