//! Frame timing.
//!
//! The runtime keeps one [`FrameClock`] and ticks it for every frame it
//! actually presents, so `dt` is the time between two drawn frames.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
