use std::rc::Rc;

use glow::HasContext;
use winit::window::Window;

use crate::device::{GlDevice, PresentErrorAction};
use crate::input::{InputFrame, InputState};
use crate::paint::Color;
use crate::time::FrameTime;

use super::app::AppControl;

/// Window handle for the frame being rendered.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

/// Per-frame context passed to `App::on_frame`.
pub struct FrameCtx<'a> {
    pub window: WindowCtx<'a>,
    pub device: &'a mut GlDevice,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
}

impl<'a> FrameCtx<'a> {
    /// Clears color and depth, runs `draw`, then presents the frame.
    ///
    /// A collapsed (zero-sized) window skips the frame entirely. A fatal
    /// present error turns into [`AppControl::Exit`].
    pub fn render<F>(&mut self, clear: Color, draw: F) -> AppControl
    where
        F: FnOnce(&glow::Context),
    {
        if self.device.aspect_ratio().is_none() {
            return AppControl::Continue;
        }

        let gl = Rc::clone(self.device.gl());
        let clear = clear.clamped();

        // SAFETY: state setters with plain values on the current context.
        unsafe {
            gl.clear_color(clear.r, clear.g, clear.b, clear.a);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        draw(&gl);

        self.window.window.pre_present_notify();
        match self.device.present() {
            Ok(()) => AppControl::Continue,
            Err(err) => match self.device.handle_present_error(&err) {
                PresentErrorAction::Fatal => AppControl::Exit,
                PresentErrorAction::SkipFrame => AppControl::Continue,
            },
        }
    }
}
