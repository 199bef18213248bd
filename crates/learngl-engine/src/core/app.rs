use anyhow::Result;
use winit::event::WindowEvent;

use crate::device::GlDevice;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application driven by [`Runtime`](crate::window::Runtime).
///
/// Call order: `init` once after the window and context exist, then
/// `on_window_event`/`on_frame` until exit, then `on_exit` while the context
/// is still current.
pub trait App {
    /// Creates GL resources. An error aborts the runtime and is returned
    /// from `Runtime::run`.
    fn init(&mut self, device: &GlDevice) -> Result<()> {
        let _ = device;
        Ok(())
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;

    /// Last chance to release GL resources before the context goes away.
    fn on_exit(&mut self) {}
}
