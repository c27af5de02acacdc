//! Lumen engine crate.
//!
//! Window, GPU context and a redraw-gated loop for drawing one full-screen
//! quad with a user-supplied shader program.

pub mod coords;
pub mod core;
pub mod device;
pub mod gate;
pub mod input;
pub mod logging;
pub mod render;
pub mod shader;
pub mod time;
pub mod window;
