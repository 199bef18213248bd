//! learngl engine crate.
//!
//! Platform + OpenGL runtime pieces used by the viewer: one window with a
//! core-profile context, keyboard state, frame timing and owning wrappers
//! around GL objects.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod time;
pub mod window;
