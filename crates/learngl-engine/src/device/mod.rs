//! OpenGL device + window surface management.
//!
//! This module is responsible for:
//! - creating the window together with a matching GL framebuffer config
//! - creating a core-profile context and making it current
//! - loading GL entry points into a `glow::Context`
//! - resizing and presenting the window surface

mod error;
mod gl;
mod init;
mod surface;

pub use error::PresentErrorAction;
pub use gl::GlDevice;
pub use init::GlInit;
