use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState};

/// Held-key state for the window.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Folds `ev` into the held state and records transitions in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Focused(f) => {
                self.focused = f;
                if !f {
                    // Releases are not delivered to an unfocused window.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(key) {
                        frame.keys_pressed.insert(key);
                    }
                }
                KeyState::Released => {
                    if self.keys_down.remove(&key) {
                        frame.keys_released.insert(key);
                    }
                }
            },
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Additive axis value: `+1` while `positive` is held, `-1` while
    /// `negative` is held, `0` when both or neither are.
    pub fn axis(&self, negative: Key, positive: Key) -> f32 {
        let mut value = 0.0;
        if self.key_down(positive) {
            value += 1.0;
        }
        if self.key_down(negative) {
            value -= 1.0;
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    #[test]
    fn press_then_release_records_both_transitions() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::ArrowUp, KeyState::Pressed));
        assert!(state.key_down(Key::ArrowUp));
        assert!(frame.pressed(Key::ArrowUp));

        state.apply_event(&mut frame, key(Key::ArrowUp, KeyState::Released));
        assert!(!state.key_down(Key::ArrowUp));
        assert!(frame.keys_released.contains(&Key::ArrowUp));
        assert!(frame.pressed(Key::ArrowUp), "the press stays recorded until the frame is cleared");
    }

    #[test]
    fn repeated_press_is_not_a_new_transition() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Escape, KeyState::Pressed));
        frame.clear();
        state.apply_event(
            &mut frame,
            InputEvent::Key { key: Key::Escape, state: KeyState::Pressed, repeat: true },
        );

        assert!(state.key_down(Key::Escape));
        assert!(!frame.pressed(Key::Escape));
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::ArrowLeft, KeyState::Pressed));
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(!state.focused);
        assert!(state.keys_down.is_empty());
    }

    #[test]
    fn axis_is_additive() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        assert_eq!(state.axis(Key::ArrowDown, Key::ArrowUp), 0.0);

        state.apply_event(&mut frame, key(Key::ArrowUp, KeyState::Pressed));
        assert_eq!(state.axis(Key::ArrowDown, Key::ArrowUp), 1.0);

        state.apply_event(&mut frame, key(Key::ArrowDown, KeyState::Pressed));
        assert_eq!(state.axis(Key::ArrowDown, Key::ArrowUp), 0.0);

        state.apply_event(&mut frame, key(Key::ArrowUp, KeyState::Released));
        assert_eq!(state.axis(Key::ArrowDown, Key::ArrowUp), -1.0);
    }
}
