use std::num::NonZeroU32;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use glow::HasContext;
use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use super::surface::{classify_present_error, nonzero_size};
use super::{GlInit, PresentErrorAction};

/// Owns the GL context, the window surface and the loaded function table.
///
/// GL objects created through [`GlDevice::gl`] hold their own `Rc` to the
/// function table; they must be dropped while this device is still alive.
pub struct GlDevice {
    gl: Rc<glow::Context>,

    surface: Surface<WindowSurface>,

    context: PossiblyCurrentContext,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,
}

impl GlDevice {
    /// Creates the window and a current GL context bound to it.
    ///
    /// glutin has to pick the framebuffer config before the window exists on
    /// some platforms, so both are created together.
    pub fn create(
        event_loop: &ActiveEventLoop,
        attributes: WindowAttributes,
        init: &GlInit,
    ) -> Result<(Window, Self)> {
        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_depth_size(init.depth_bits);

        let (window, config) = catch_no_config(|| {
            DisplayBuilder::new()
                .with_window_attributes(Some(attributes))
                .build(event_loop, template, pick_config)
        })?
        .map_err(|e| anyhow!("failed to create window and GL config: {e}"))?;

        let window = window.context("display builder returned no window")?;

        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let display = config.display();
        let raw_window = window.window_handle().ok().map(|h| h.as_raw());

        let (major, minor) = init.version;
        let profile = if init.core_profile {
            GlProfile::Core
        } else {
            GlProfile::Compatibility
        };
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(profile)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(raw_window);

        // SAFETY: `raw_window` comes from `window`, which outlives the context
        // because the runtime drops the device before the window.
        let not_current = unsafe { display.create_context(&config, &context_attributes) }
            .with_context(|| format!("failed to create OpenGL {major}.{minor} context"))?;

        let surface_attributes = window
            .build_surface_attributes(SurfaceAttributesBuilder::<WindowSurface>::new())
            .context("failed to read window handle for GL surface")?;

        // SAFETY: same window lifetime argument as for the context.
        let surface = unsafe { display.create_window_surface(&config, &surface_attributes) }
            .context("failed to create GL window surface")?;

        let context = not_current
            .make_current(&surface)
            .context("failed to make GL context current")?;

        if init.vsync {
            if let Err(e) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
                log::warn!("vsync unavailable: {e}");
            }
        }

        // SAFETY: the context is current on this thread, so the returned
        // pointers belong to it.
        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name))
        };

        // SAFETY: plain state queries on the current context.
        unsafe {
            log::info!(
                "OpenGL {} ({} / {})",
                gl.get_parameter_string(glow::VERSION),
                gl.get_parameter_string(glow::VENDOR),
                gl.get_parameter_string(glow::RENDERER),
            );
            gl.viewport(0, 0, size.width as i32, size.height as i32);
        }

        Ok((
            window,
            Self {
                gl: Rc::new(gl),
                surface,
                context,
                size,
            },
        ))
    }

    /// Shared handle to the GL function table.
    pub fn gl(&self) -> &Rc<glow::Context> {
        &self.gl
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Width over height of the drawable, or `None` while it is collapsed.
    pub fn aspect_ratio(&self) -> Option<f32> {
        nonzero_size(self.size).map(|(w, h)| w.get() as f32 / h.get() as f32)
    }

    /// Resizes the surface and the viewport.
    ///
    /// A zero-sized drawable only updates the stored size.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;

        let Some((w, h)) = nonzero_size(new_size) else {
            return;
        };

        self.surface.resize(&self.context, w, h);

        // SAFETY: viewport takes plain integers; the context is current.
        unsafe {
            self.gl.viewport(0, 0, w.get() as i32, h.get() as i32);
        }
    }

    /// Swaps the back buffer onto the window.
    pub fn present(&self) -> std::result::Result<(), glutin::error::Error> {
        self.surface.swap_buffers(&self.context)
    }

    /// Converts a swap failure into a higher-level action.
    pub fn handle_present_error(&self, err: &glutin::error::Error) -> PresentErrorAction {
        let action = classify_present_error(err.error_kind());
        match action {
            PresentErrorAction::Fatal => log::error!("present failed: {err}"),
            PresentErrorAction::SkipFrame => log::warn!("present failed, skipping frame: {err}"),
        }
        action
    }
}

/// Unwind payload used when glutin offers no framebuffer config at all.
struct NoMatchingConfig;

/// Prefers the config with the most MSAA samples among those glutin offers.
///
/// glutin's picker has to return a config, so an empty set unwinds with
/// [`NoMatchingConfig`], which [`catch_no_config`] turns back into an error.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    match most_samples(configs, |c| c.num_samples()) {
        Some(config) => config,
        None => panic::panic_any(NoMatchingConfig),
    }
}

/// First item with the highest sample count.
fn most_samples<T>(items: impl Iterator<Item = T>, samples: impl Fn(&T) -> u8) -> Option<T> {
    items.reduce(|best, candidate| {
        if samples(&candidate) > samples(&best) {
            candidate
        } else {
            best
        }
    })
}

/// Runs `build`, converting a [`NoMatchingConfig`] unwind into an error.
/// Any other panic keeps unwinding.
fn catch_no_config<R>(build: impl FnOnce() -> R) -> Result<R> {
    match panic::catch_unwind(AssertUnwindSafe(build)) {
        Ok(value) => Ok(value),
        Err(payload) if payload.is::<NoMatchingConfig>() => {
            Err(anyhow!("no framebuffer config matches the requested depth and alpha sizes"))
        }
        Err(payload) => panic::resume_unwind(payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_samples_prefers_highest_and_keeps_first_on_ties() {
        let configs = [("a", 0u8), ("b", 4), ("c", 4), ("d", 2)];
        let best = most_samples(configs.into_iter(), |c| c.1);
        assert_eq!(best, Some(("b", 4)));
    }

    #[test]
    fn most_samples_of_nothing_is_none() {
        assert_eq!(most_samples(std::iter::empty::<u8>(), |s| *s), None);
    }

    #[test]
    fn missing_config_becomes_an_error() {
        let result: Result<()> = catch_no_config(|| panic::panic_any(NoMatchingConfig));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("no framebuffer config"));
    }

    #[test]
    fn successful_build_passes_through() {
        assert_eq!(catch_no_config(|| 7).unwrap(), 7);
    }

    #[test]
    #[should_panic(expected = "unrelated")]
    fn other_panics_keep_unwinding() {
        let _: Result<()> = catch_no_config(|| panic!("unrelated"));
    }
}
