//! Demo scene: rows of tinted triangles and rectangles, a polygon, and a
//! batch of spinning sprites, redrawn every frame at 60 Hz.

use anyhow::Result;
use winit::dpi::LogicalSize;

use glint_engine::core::{App, AppControl, FrameCtx};
use glint_engine::coords::Vec2;
use glint_engine::logging::{init_logging, LoggingConfig};
use glint_engine::render::{Sprite, SpriteBatch};
use glint_engine::shader::ShaderProgram;
use glint_engine::window::{Runtime, RuntimeConfig};
use glint_engine::GraphicsError;

const WINDOW_TITLE: &str = "glint demo";
const WINDOW_SIZE: (f64, f64) = (600.0, 600.0);
const TARGET_FRAME_RATE: u32 = 60;

/// Shader sources for the sprite batch, relative to the working directory.
const BATCH_VERTEX_SHADER_PATH: &str = "shaders/triangle-vert.glsl";
const BATCH_FRAGMENT_SHADER_PATH: &str = "shaders/triangle-frag.glsl";

#[derive(Default)]
struct DemoApp {
    /// Created lazily on the first frame, once a GL context exists.
    batch: Option<SpriteBatch>,
}

impl DemoApp {
    fn draw_frame(&mut self, ctx: &mut FrameCtx<'_>) -> Result<(), GraphicsError> {
        if self.batch.is_none() {
            self.batch = Some(build_batch(ctx)?);
        }

        // Poll shader files so edits show up without restarting. A failed
        // reload keeps the previous program and is only worth a warning.
        if let Err(err) = ctx.renderer.default_shader_mut().check_for_changes() {
            log::warn!("default shader reload failed, keeping previous program: {err}");
        }

        ctx.renderer.clear(0.5, 0.5, 0.8);

        let limit = 16;
        let x_offset = 32.0;
        let y_offset = 32.0;
        let y_separator = 8.0;

        for i in 0..limit {
            let t = i as f32 / limit as f32;
            ctx.renderer.set_draw_color(t, 1.0 - t, t, 1.0 - t);

            let x = x_offset + 32.0 * i as f32;
            ctx.renderer.draw_triangle(
                Vec2::new(x, y_offset + y_separator),
                Vec2::new(x + 16.0, y_offset + y_separator - 24.0),
                Vec2::new(x + 32.0, y_offset + y_separator),
            )?;
            ctx.renderer.draw_rectangle(
                Vec2::new(x, y_offset + 2.0 * y_separator),
                Vec2::new(32.0, 32.0),
            )?;
        }

        ctx.renderer.set_draw_color(0.9, 0.8, 0.2, 0.9);
        ctx.renderer.draw_polygon(&[
            Vec2::new(100.0, 100.0),
            Vec2::new(120.0, 120.0),
            Vec2::new(100.0, 140.0),
            Vec2::new(80.0, 120.0),
        ])?;

        if let Some(batch) = self.batch.as_mut() {
            if let Err(err) = batch.shader_mut().check_for_changes() {
                log::warn!("batch shader reload failed, keeping previous program: {err}");
            }

            for (k, sprite) in batch.sprites_mut().iter_mut().enumerate() {
                sprite.rotation += (30.0 + 15.0 * k as f32) * ctx.time.dt;
            }

            batch.draw(ctx.renderer.viewport())?;
        }

        Ok(())
    }
}

impl App for DemoApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        match self.draw_frame(ctx) {
            Ok(()) => AppControl::Continue,
            Err(err) => {
                log::error!("frame draw failed: {err}");
                AppControl::Exit
            }
        }
    }
}

/// A diagonal of spinning sprites drawn through one indexed call.
fn build_batch(ctx: &FrameCtx<'_>) -> Result<SpriteBatch, GraphicsError> {
    let gl = ctx.renderer.gl().clone();
    let shader =
        ShaderProgram::from_files(gl.clone(), BATCH_VERTEX_SHADER_PATH, BATCH_FRAGMENT_SHADER_PATH)?;

    let mut batch = SpriteBatch::new(gl, shader)?;
    for k in 0..4 {
        batch.add_sprite(Sprite::new(
            Vec2::new(120.0 + 90.0 * k as f32, 380.0 + 30.0 * k as f32),
            Vec2::new(48.0, 48.0),
            15.0 * k as f32,
        ));
    }
    Ok(batch)
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: WINDOW_TITLE.to_string(),
        initial_size: LogicalSize::new(WINDOW_SIZE.0, WINDOW_SIZE.1),
        target_frame_rate: TARGET_FRAME_RATE,
        ..RuntimeConfig::default()
    };

    Runtime::run(config, DemoApp::default())
}
