use std::collections::HashSet;

use super::types::Key;

/// Input transitions recorded during a single frame.
///
/// `InputState` answers "is this key held"; `InputFrame` answers "did it go
/// down or up since the last frame". The runtime clears it after each frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    pub fn pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }
}
