//! Color values handed to the GL layer.

pub mod color;

pub use color::Color;
