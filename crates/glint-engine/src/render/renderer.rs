use std::rc::Rc;

use glow::HasContext;

use crate::coords::Viewport;
use crate::error::GraphicsError;
use crate::shader::ShaderProgram;

/// Source paths for the default primitive shader, relative to the working
/// directory of the running demo.
pub const DEFAULT_VERTEX_SHADER_PATH: &str = "shaders/default-vert.glsl";
pub const DEFAULT_FRAGMENT_SHADER_PATH: &str = "shaders/default-frag.glsl";

/// Explicitly owned drawing context.
///
/// Holds the default shader used by the immediate primitives and the
/// viewport that defines the orthographic projection. All primitive draws go
/// through this type; there is no global shader state.
pub struct Renderer {
    pub(super) gl: Rc<glow::Context>,
    pub(super) default_shader: ShaderProgram,
    pub(super) viewport: Viewport,
}

impl Renderer {
    /// Loads the default shader and applies the fixed pipeline state used by
    /// the whole demo (alpha blending, polygon smoothing).
    pub fn new(gl: Rc<glow::Context>, viewport: Viewport) -> Result<Self, GraphicsError> {
        let default_shader = ShaderProgram::from_files(
            gl.clone(),
            DEFAULT_VERTEX_SHADER_PATH,
            DEFAULT_FRAGMENT_SHADER_PATH,
        )?;

        unsafe {
            gl.enable(glow::POLYGON_SMOOTH);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            gl.enable(glow::BLEND);
        }

        Ok(Self {
            gl,
            default_shader,
            viewport,
        })
    }

    /// Shared handle to the GL function table, for constructing batches and
    /// textures that live alongside this renderer.
    #[inline]
    pub fn gl(&self) -> &Rc<glow::Context> {
        &self.gl
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub(crate) fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn default_shader(&self) -> &ShaderProgram {
        &self.default_shader
    }

    /// Mutable access for hot-reload polling.
    pub fn default_shader_mut(&mut self) -> &mut ShaderProgram {
        &mut self.default_shader
    }

    /// Clears the color buffer.
    pub fn clear(&self, r: f32, g: f32, b: f32) {
        unsafe {
            self.gl.clear_color(r, g, b, 1.0);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    /// Sets the tint consumed by the default fragment shader for subsequent
    /// primitives.
    pub fn set_draw_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.default_shader.use_program();
        self.default_shader.set_vec4("inColor", r, g, b, a);
    }

    /// Orthographic projection over the current viewport: top-left origin,
    /// Y down, depth range [-1, 1].
    pub(super) fn projection(&self) -> glam::Mat4 {
        glam::Mat4::orthographic_rh_gl(
            0.0,
            self.viewport.width,
            self.viewport.height,
            0.0,
            -1.0,
            1.0,
        )
    }
}
