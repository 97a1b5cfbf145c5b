use std::ffi::CString;
use std::num::NonZeroU32;
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use glow::HasContext;
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

/// Initialization parameters for the GL layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when
/// a concrete platform requirement exists.
#[derive(Debug, Clone)]
pub struct GlInit {
    /// Requested core-profile context version as `(major, minor)`.
    pub version: (u8, u8),

    /// Requested alpha channel size for the config, in bits.
    pub alpha_size: u8,
}

impl Default for GlInit {
    fn default() -> Self {
        Self {
            version: (3, 3),
            alpha_size: 8,
        }
    }
}

/// Owns the GL surface, the current context, and the loaded function table.
///
/// The surface is created from the window's raw handle; architecture must
/// ensure the window outlives the `GlContext` (the runtime keeps both in one
/// struct with the context declared first, so it is dropped first).
pub struct GlContext {
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    gl: Rc<glow::Context>,
}

impl GlContext {
    /// Creates the window together with a current GL context for it.
    ///
    /// Window and config are created jointly because the platform may
    /// require the config to be chosen before the window exists (see
    /// `glutin_winit::DisplayBuilder`).
    pub fn new(
        event_loop: &ActiveEventLoop,
        window_attributes: WindowAttributes,
        init: GlInit,
    ) -> Result<(Window, Self)> {
        let template = ConfigTemplateBuilder::new().with_alpha_size(init.alpha_size);
        let display_builder =
            DisplayBuilder::new().with_window_attributes(Some(window_attributes));

        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("display returned no matching GL configs")
            })
            .map_err(|err| anyhow!("failed to create window and GL display: {err}"))?;

        let window = window.context("display builder did not produce a window")?;

        let raw_window_handle = window.window_handle().ok().map(|handle| handle.as_raw());
        let (major, minor) = init.version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(raw_window_handle);

        let gl_display = gl_config.display();
        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .context("failed to create GL context")?;

        let surface_attributes = window
            .build_surface_attributes(SurfaceAttributesBuilder::default())
            .context("failed to build GL surface attributes")?;
        let surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
            .context("failed to create GL surface")?;

        let context = not_current
            .make_current(&surface)
            .context("failed to make GL context current")?;

        let gl = unsafe {
            glow::Context::from_loader_function(|symbol| {
                let symbol = CString::new(symbol).expect("GL symbol name contained NUL");
                gl_display.get_proc_address(&symbol) as *const _
            })
        };
        let gl = Rc::new(gl);

        unsafe {
            log::info!("OpenGL version: {}", gl.get_parameter_string(glow::VERSION));
            log::info!(
                "max vertex attribs: {}",
                gl.get_parameter_i32(glow::MAX_VERTEX_ATTRIBS)
            );
        }

        Ok((window, Self { surface, context, gl }))
    }

    /// Shared handle to the loaded GL function table.
    #[inline]
    pub fn gl(&self) -> &Rc<glow::Context> {
        &self.gl
    }

    /// Presents the back buffer.
    pub fn swap_buffers(&self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .context("failed to swap buffers")
    }

    /// Resizes the surface and the GL viewport rectangle.
    ///
    /// Zero-sized dimensions (minimized window) are ignored.
    pub fn resize(&self, size: PhysicalSize<u32>) {
        let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return;
        };

        self.surface.resize(&self.context, width, height);
        unsafe {
            self.gl.viewport(0, 0, size.width as i32, size.height as i32);
        }
    }
}
