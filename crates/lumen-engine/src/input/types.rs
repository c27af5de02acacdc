/// Keys the shell distinguishes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    R,
    /// Any other key, with the platform key code.
    Other(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Platform-agnostic input event.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: KeyState,
        repeat: bool,
    },

    /// Cursor position in physical pixels, top-left origin.
    CursorMoved { x: f64, y: f64 },

    /// Scroll in lines (or pixels converted to lines by the platform layer).
    Scroll { dx: f32, dy: f32 },
}
