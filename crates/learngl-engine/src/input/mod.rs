//! Keyboard input.
//!
//! The public API does not expose winit types; `platform::winit` translates
//! window events into `InputEvent`s which `InputState` folds into held-key
//! state.

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState};
