//! Input subsystem.
//!
//! Cursor and scroll events are translated but have no effect yet; only the
//! keys bound in [`Action`] change shell behavior.

mod action;
mod platform;
mod types;

pub use action::Action;
pub use platform::winit::{map_key, translate_window_event};
pub use types::{InputEvent, Key, KeyState};
