use winit::event::WindowEvent;

use crate::input::{Action, InputEvent};
use crate::window::RuntimeCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application driven by [`Runtime`](crate::window::Runtime).
pub trait App {
    /// Raw window events, before the runtime handles them.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Translated input. Cursor and scroll land here with no default effect.
    fn on_input(&mut self, event: &InputEvent, runtime: &mut RuntimeCtx) -> AppControl {
        let _ = (event, runtime);
        AppControl::Continue
    }

    /// Key-bound actions. [`Action::Close`] is handled by the runtime and
    /// never reaches this method.
    fn on_action(&mut self, action: Action, runtime: &mut RuntimeCtx) -> AppControl {
        let _ = (action, runtime);
        AppControl::Continue
    }

    /// Called once per redraw the gate lets through.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
