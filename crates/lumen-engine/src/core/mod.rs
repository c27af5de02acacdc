//! Contract between the runtime and the application.
//!
//! The runtime owns the window, GPU context and redraw gate; the application
//! sees them only through [`FrameCtx`] and reacts to [`Action`]s.
//!
//! [`Action`]: crate::input::Action

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
