//! Frame timing.
//!
//! One `FrameClock` per render loop; call `tick()` once per frame to get the
//! delta since the previous frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
