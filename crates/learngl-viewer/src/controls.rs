//! Keyboard → per-frame movement input.

use learngl_engine::core::AppControl;
use learngl_engine::input::{InputFrame, InputState, Key};

/// Input sampled for one frame.
///
/// Axes are additive and unclamped: opposite keys cancel out.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// `+1` for RIGHT, `-1` for LEFT.
    pub horizontal: f32,
    /// `+1` for UP, `-1` for DOWN.
    pub vertical: f32,
    /// ESCAPE is held, or was tapped since the last frame.
    pub close_requested: bool,
}

impl FrameInput {
    pub fn sample(input: &InputState, frame: &InputFrame) -> Self {
        Self {
            horizontal: input.axis(Key::ArrowLeft, Key::ArrowRight),
            vertical: input.axis(Key::ArrowDown, Key::ArrowUp),
            close_requested: input.key_down(Key::Escape) || frame.pressed(Key::Escape),
        }
    }

    /// `Exit` when the frame must not be drawn because the window is closing.
    pub fn control(&self) -> AppControl {
        if self.close_requested {
            AppControl::Exit
        } else {
            AppControl::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learngl_engine::input::{InputEvent, KeyState};

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    /// Samples after pressing `keys` within one frame.
    fn held(keys: &[Key]) -> FrameInput {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        for &k in keys {
            state.apply_event(&mut frame, key(k, KeyState::Pressed));
        }
        FrameInput::sample(&state, &frame)
    }

    #[test]
    fn nothing_held_is_neutral() {
        assert_eq!(held(&[]), FrameInput::default());
    }

    #[test]
    fn arrows_map_to_axes() {
        let input = held(&[Key::ArrowUp, Key::ArrowLeft]);
        assert_eq!(input.vertical, 1.0);
        assert_eq!(input.horizontal, -1.0);

        let input = held(&[Key::ArrowDown, Key::ArrowRight]);
        assert_eq!(input.vertical, -1.0);
        assert_eq!(input.horizontal, 1.0);
    }

    #[test]
    fn up_and_down_cancel() {
        let input = held(&[Key::ArrowUp, Key::ArrowDown]);
        assert_eq!(input.vertical, 0.0);
    }

    #[test]
    fn left_and_right_cancel() {
        let input = held(&[Key::ArrowLeft, Key::ArrowRight]);
        assert_eq!(input.horizontal, 0.0);
    }

    #[test]
    fn escape_requests_close() {
        assert!(held(&[Key::Escape]).close_requested);
        assert!(!held(&[Key::ArrowUp, Key::Unknown(57)]).close_requested);
    }

    #[test]
    fn escape_exits_before_drawing() {
        assert_eq!(held(&[Key::Escape, Key::ArrowUp]).control(), AppControl::Exit);
        assert_eq!(held(&[Key::ArrowUp]).control(), AppControl::Continue);
    }

    #[test]
    fn escape_tapped_between_frames_still_exits() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::Escape, KeyState::Pressed));
        state.apply_event(&mut frame, key(Key::Escape, KeyState::Released));

        let input = FrameInput::sample(&state, &frame);
        assert_eq!(input.control(), AppControl::Exit);

        frame.clear();
        assert_eq!(FrameInput::sample(&state, &frame).control(), AppControl::Continue);
    }
}
