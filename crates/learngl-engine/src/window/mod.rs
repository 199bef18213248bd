//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single window, and drives an
//! [`App`](crate::core::App) once per redraw.

mod runtime;

pub use runtime::{LoopState, Runtime, RuntimeConfig};
