use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{GlDevice, GlInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "LearnOpenGL".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            resizable: true,
        }
    }
}

/// Loop state. `Closing` is terminal.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Running,
    Closing,
}

impl LoopState {
    /// State after the app answered `control`.
    pub fn after(self, control: AppControl) -> Self {
        match (self, control) {
            (LoopState::Running, AppControl::Continue) => LoopState::Running,
            _ => LoopState::Closing,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, drives `app` until it or the user closes it.
    ///
    /// Returns an error when the window/context cannot be created or when
    /// `App::init` fails. The error is not logged here; reporting it is up
    /// to the caller.
    pub fn run<A>(config: RuntimeConfig, gl_init: GlInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gl_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// `device` is declared before `window` so the GL surface is destroyed
// before the native window it renders into.
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,
    device: GlDevice,
    window: Window,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gl_init: GlInit,

    // Declared before `window` so GL objects owned by the app drop while
    // the context still exists.
    app: A,
    window: Option<WindowEntry>,

    state: LoopState,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gl_init: GlInit, app: A) -> Self {
        Self {
            config,
            gl_init,
            app,
            window: None,
            state: LoopState::Running,
            fatal: None,
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);

        let (window, device) = GlDevice::create(event_loop, attrs, &self.gl_init)
            .context("failed to create window with OpenGL context")?;

        log::info!(
            "created window {:?} ({}x{} physical)",
            self.config.title,
            device.size().width,
            device.size().height,
        );

        if let Err(e) = self.app.init(&device) {
            // Release whatever the app created before `device` goes away.
            self.app.on_exit();
            return Err(e.context("application initialization failed"));
        }

        self.window = Some(WindowEntry {
            input_state: InputState {
                focused: true,
                ..InputState::default()
            },
            input_frame: InputFrame::default(),
            clock: FrameClock::new(),
            device,
            window,
        });

        Ok(())
    }

    /// Moves to `Closing`: releases app GL resources, then the window.
    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if self.state == LoopState::Running {
            log::info!("closing");
            self.state = LoopState::Closing;
            self.app.on_exit();
            self.window = None;
        }
        event_loop.exit();
    }

    /// Keeps the first fatal error; later ones are only traced.
    fn record_fatal(&mut self, err: anyhow::Error) {
        match &self.fatal {
            None => self.fatal = Some(err),
            Some(_) => log::debug!("ignoring follow-up error: {err:#}"),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.record_fatal(err);
        self.close(event_loop);
    }

    fn redraw(&mut self) -> AppControl {
        let Some(entry) = self.window.as_mut() else {
            return AppControl::Continue;
        };

        let time = entry.clock.tick();
        log::trace!("frame {} dt={:.4}s", time.frame_index, time.dt);

        let control = {
            let mut ctx = FrameCtx {
                window: WindowCtx { window: &entry.window },
                device: &mut entry.device,
                input: &entry.input_state,
                input_frame: &entry.input_frame,
                time,
            };
            self.app.on_frame(&mut ctx)
        };

        entry.input_frame.clear();
        control
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.state == LoopState::Closing {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            self.fail(event_loop, e);
            return;
        }

        if let Some(entry) = &self.window {
            entry.window.request_redraw();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.state == LoopState::Closing {
            event_loop.exit();
            return;
        }

        // Continuous redraw.
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(entry) = &self.window {
            entry.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.state == LoopState::Closing {
            event_loop.exit();
            return;
        }

        let Some(entry) = self.window.as_mut() else {
            return;
        };
        if entry.window.id() != window_id {
            return;
        }

        if let Some(ev) = translate_window_event(&event) {
            entry.input_state.apply_event(&mut entry.input_frame, ev);
        }

        if self.state.after(self.app.on_window_event(&event)) == LoopState::Closing {
            self.close(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.close(event_loop),

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.window.as_mut() {
                    log::debug!("resized to {}x{}", new_size.width, new_size.height);
                    entry.device.resize(new_size);
                    entry.window.request_redraw();
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.window.as_mut() {
                    let new_size = entry.window.inner_size();
                    entry.device.resize(new_size);
                    entry.window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                let control = self.redraw();
                if self.state.after(control) == LoopState::Closing {
                    self.close(event_loop);
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if self.state == LoopState::Running {
            self.state = LoopState::Closing;
            self.app.on_exit();
            self.window = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Idle;

    impl App for Idle {
        fn on_frame(&mut self, _ctx: &mut FrameCtx<'_>) -> AppControl {
            AppControl::Continue
        }
    }

    #[test]
    fn exit_moves_running_to_closing() {
        assert_eq!(LoopState::Running.after(AppControl::Continue), LoopState::Running);
        assert_eq!(LoopState::Running.after(AppControl::Exit), LoopState::Closing);
    }

    #[test]
    fn closing_is_terminal() {
        assert_eq!(LoopState::Closing.after(AppControl::Continue), LoopState::Closing);
        assert_eq!(LoopState::Closing.after(AppControl::Exit), LoopState::Closing);
    }

    #[test]
    fn first_fatal_error_is_the_one_returned() {
        let mut state = AppState::new(RuntimeConfig::default(), GlInit::default(), Idle);
        state.record_fatal(anyhow::anyhow!("context creation failed"));
        state.record_fatal(anyhow::anyhow!("present failed"));

        let err = state.fatal.take().unwrap();
        assert_eq!(err.to_string(), "context creation failed");
    }

    #[test]
    fn default_window_matches_tutorial() {
        let config = RuntimeConfig::default();
        assert_eq!(config.title, "LearnOpenGL");
        assert_eq!(config.initial_size, LogicalSize::new(800.0, 600.0));
    }
}
