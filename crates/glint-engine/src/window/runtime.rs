use std::time::Instant;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::coords::Viewport;
use crate::device::{GlContext, GlInit};
use crate::render::Renderer;
use crate::time::{FrameClock, FramePacer};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Frames per second the end-of-frame sleep aims for.
    pub target_frame_rate: u32,
    pub gl: GlInit,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "glint".to_string(),
            initial_size: LogicalSize::new(600.0, 600.0),
            target_frame_rate: 60,
            gl: GlInit::default(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs the frame loop until the window closes, the app requests exit,
    /// or initialization fails.
    ///
    /// Initialization failures (window, GL context, default shader) are
    /// fatal: they are logged and returned to the caller.
    pub fn run<A>(config: RuntimeConfig, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Everything owned per window.
///
/// `device` is declared before `window` so the GL surface is destroyed
/// before the window it was created from.
struct WindowState {
    device: GlContext,
    window: Window,
    renderer: Renderer,
    clock: FrameClock,
    pacer: FramePacer,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    app: A,
    state: Option<WindowState>,
    fatal_error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, app: A) -> Self {
        Self {
            config,
            app,
            state: None,
            fatal_error: None,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowState> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let (window, device) = GlContext::new(event_loop, attrs, self.config.gl.clone())?;

        let size = window.inner_size();
        let viewport = Viewport::new(size.width as f32, size.height as f32);
        let renderer = Renderer::new(device.gl().clone(), viewport)
            .context("failed to initialize renderer")?;

        Ok(WindowState {
            device,
            window,
            renderer,
            clock: FrameClock::default(),
            pacer: FramePacer::new(self.config.target_frame_rate),
        })
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        match self.init_window(event_loop) {
            Ok(state) => {
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(err) => {
                log::error!("initialization failed: {err:#}");
                self.fatal_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; pacing happens at the end of each frame.
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if state.window.id() != window_id {
            return;
        }

        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                state.device.resize(new_size);
                state
                    .renderer
                    .set_viewport(Viewport::new(new_size.width as f32, new_size.height as f32));
                state.window.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = state.window.inner_size();
                state.device.resize(new_size);
                state
                    .renderer
                    .set_viewport(Viewport::new(new_size.width as f32, new_size.height as f32));
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                let frame_start = Instant::now();
                let time = state.clock.tick();

                let control = {
                    let mut ctx = FrameCtx {
                        window: WindowCtx {
                            id: window_id,
                            window: &state.window,
                        },
                        renderer: &mut state.renderer,
                        time,
                    };
                    self.app.on_frame(&mut ctx)
                };

                let swapped = state.device.swap_buffers();

                // Sleep out the remainder of the frame before deciding
                // whether to continue; a failed swap skips pacing.
                match swapped {
                    Ok(()) => {
                        state.pacer.pace(frame_start.elapsed());
                        if control == AppControl::Exit {
                            event_loop.exit();
                        }
                    }
                    Err(err) => {
                        log::error!("presentation failed: {err:#}");
                        self.fatal_error = Some(err);
                        event_loop.exit();
                    }
                }
            }

            _ => {}
        }
    }
}
