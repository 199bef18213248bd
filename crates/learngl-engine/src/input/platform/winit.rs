use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::input::{InputEvent, Key, KeyState};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Returns `None` for events the input subsystem does not track.
pub(crate) fn translate_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::KeyboardInput { event, .. } => {
            let state = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };

            Some(InputEvent::Key {
                key: map_key(event.physical_key),
                state,
                repeat: event.repeat,
            })
        }

        _ => None,
    }
}

fn map_key(pk: PhysicalKey) -> Key {
    match pk {
        PhysicalKey::Code(code) => match code {
            KeyCode::Escape => Key::Escape,

            KeyCode::ArrowUp => Key::ArrowUp,
            KeyCode::ArrowDown => Key::ArrowDown,
            KeyCode::ArrowLeft => Key::ArrowLeft,
            KeyCode::ArrowRight => Key::ArrowRight,

            other => Key::Unknown(other as u32),
        },

        // NativeKeyCode has no stable numeric form in winit 0.30.
        PhysicalKey::Unidentified(_) => Key::Unknown(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_escape_are_named() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Escape)), Key::Escape);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ArrowUp)), Key::ArrowUp);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ArrowLeft)), Key::ArrowLeft);
    }

    #[test]
    fn unmapped_keys_are_unknown() {
        assert!(matches!(map_key(PhysicalKey::Code(KeyCode::KeyW)), Key::Unknown(_)));
    }
}
