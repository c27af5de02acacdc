use super::types::{InputEvent, Key, KeyState};

/// Shell-level commands bound to keys.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Action {
    /// Escape: close the window.
    Close,
    /// R: re-read and recompile the shader pair.
    ReloadShaders,
}

impl Action {
    /// Fires on the initial press only; releases and auto-repeat are ignored.
    pub fn from_event(event: &InputEvent) -> Option<Action> {
        match *event {
            InputEvent::Key {
                key,
                state: KeyState::Pressed,
                repeat: false,
            } => Self::from_key(key),
            _ => None,
        }
    }

    pub fn from_key(key: Key) -> Option<Action> {
        match key {
            Key::Escape => Some(Action::Close),
            Key::R => Some(Action::ReloadShaders),
            Key::Other(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: Key) -> InputEvent {
        InputEvent::Key { key, state: KeyState::Pressed, repeat: false }
    }

    #[test]
    fn escape_closes() {
        assert_eq!(Action::from_event(&press(Key::Escape)), Some(Action::Close));
    }

    #[test]
    fn r_reloads() {
        assert_eq!(Action::from_event(&press(Key::R)), Some(Action::ReloadShaders));
    }

    #[test]
    fn release_and_repeat_do_nothing() {
        let release = InputEvent::Key { key: Key::R, state: KeyState::Released, repeat: false };
        let repeat = InputEvent::Key { key: Key::R, state: KeyState::Pressed, repeat: true };
        assert_eq!(Action::from_event(&release), None);
        assert_eq!(Action::from_event(&repeat), None);
    }

    #[test]
    fn unbound_keys_and_pointer_do_nothing() {
        assert_eq!(Action::from_event(&press(Key::Other(7))), None);
        assert_eq!(Action::from_event(&InputEvent::CursorMoved { x: 1.0, y: 2.0 }), None);
        assert_eq!(Action::from_event(&InputEvent::Scroll { dx: 0.0, dy: 1.0 }), None);
    }
}
