use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;

use glow::HasContext;

use crate::error::{GraphicsError, ShaderStage};

/// A linked vertex + fragment GPU program loaded from source files.
///
/// The program handle is owned: a successful hot reload deletes the old
/// handle, and `Drop` deletes whichever handle is current.
pub struct ShaderProgram {
    gl: Rc<glow::Context>,
    program: glow::Program,
    vertex_path: PathBuf,
    fragment_path: PathBuf,
    vertex_mtime: SystemTime,
    fragment_mtime: SystemTime,
}

impl ShaderProgram {
    /// Reads, compiles, and links the two source files.
    ///
    /// Any failure here is an init-path failure: the caller gets the full
    /// diagnostic (driver info log, and for compile errors the offending
    /// source text) and no program is created.
    pub fn from_files(
        gl: Rc<glow::Context>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, GraphicsError> {
        let vertex_path = vertex_path.as_ref().to_path_buf();
        let fragment_path = fragment_path.as_ref().to_path_buf();

        let program = compile_from_paths(&gl, &vertex_path, &fragment_path)?;
        let vertex_mtime = modified_time(&vertex_path)?;
        let fragment_mtime = modified_time(&fragment_path)?;

        Ok(Self {
            gl,
            program,
            vertex_path,
            fragment_path,
            vertex_mtime,
            fragment_mtime,
        })
    }

    #[inline]
    pub fn program(&self) -> glow::Program {
        self.program
    }

    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.program));
        }
    }

    /// Re-stats both source files and rebuilds the program if either is
    /// newer than at the last successful build.
    ///
    /// Returns `Ok(true)` when a rebuild happened and the old handle was
    /// replaced. On any error (stat, read, compile, link) the current
    /// program stays active and the error is handed to the caller to log,
    /// so shader files can be edited iteratively without killing the demo.
    pub fn check_for_changes(&mut self) -> Result<bool, GraphicsError> {
        let vertex_mtime = modified_time(&self.vertex_path)?;
        let fragment_mtime = modified_time(&self.fragment_path)?;

        if vertex_mtime <= self.vertex_mtime && fragment_mtime <= self.fragment_mtime {
            return Ok(false);
        }

        let rebuilt = compile_from_paths(&self.gl, &self.vertex_path, &self.fragment_path)?;

        unsafe {
            self.gl.delete_program(self.program);
        }
        self.program = rebuilt;
        self.vertex_mtime = vertex_mtime;
        self.fragment_mtime = fragment_mtime;

        log::info!(
            "reloaded shader program ({}, {})",
            self.vertex_path.display(),
            self.fragment_path.display()
        );

        Ok(true)
    }

    // Uniform setters resolve the location by name on every call and are
    // silent no-ops when the name does not resolve (glow treats a `None`
    // location exactly like GL treats location -1).

    pub fn set_f32(&self, name: &str, value: f32) {
        unsafe {
            let location = self.gl.get_uniform_location(self.program, name);
            self.gl.uniform_1_f32(location.as_ref(), value);
        }
    }

    pub fn set_i32(&self, name: &str, value: i32) {
        unsafe {
            let location = self.gl.get_uniform_location(self.program, name);
            self.gl.uniform_1_i32(location.as_ref(), value);
        }
    }

    pub fn set_vec4(&self, name: &str, x: f32, y: f32, z: f32, w: f32) {
        unsafe {
            let location = self.gl.get_uniform_location(self.program, name);
            self.gl.uniform_4_f32(location.as_ref(), x, y, z, w);
        }
    }

    pub fn set_mat4(&self, name: &str, matrix: &glam::Mat4) {
        unsafe {
            let location = self.gl.get_uniform_location(self.program, name);
            self.gl
                .uniform_matrix_4_f32_slice(location.as_ref(), false, &matrix.to_cols_array());
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.program);
        }
    }
}

/// Compiles and links a program from in-memory sources.
///
/// On success the intermediate shader objects are deleted, leaving only the
/// linked program. Compile failure carries the driver info log together with
/// the offending source; link failure carries the program info log.
pub fn compile_program(
    gl: &glow::Context,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<glow::Program, GraphicsError> {
    let vertex = compile_shader(gl, ShaderStage::Vertex, vertex_source)?;
    let fragment = match compile_shader(gl, ShaderStage::Fragment, fragment_source) {
        Ok(shader) => shader,
        Err(err) => {
            unsafe { gl.delete_shader(vertex) };
            return Err(err);
        }
    };

    unsafe {
        let program = match gl.create_program() {
            Ok(program) => program,
            Err(message) => {
                gl.delete_shader(vertex);
                gl.delete_shader(fragment);
                return Err(GraphicsError::Resource(message));
            }
        };

        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);

        gl.delete_shader(vertex);
        gl.delete_shader(fragment);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(GraphicsError::Link { log });
        }

        Ok(program)
    }
}

fn compile_shader(
    gl: &glow::Context,
    stage: ShaderStage,
    source: &str,
) -> Result<glow::Shader, GraphicsError> {
    let shader_type = match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    };

    unsafe {
        let shader = gl
            .create_shader(shader_type)
            .map_err(GraphicsError::Resource)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(GraphicsError::Compile {
                stage,
                log,
                source_text: source.to_string(),
            });
        }

        Ok(shader)
    }
}

fn compile_from_paths(
    gl: &glow::Context,
    vertex_path: &Path,
    fragment_path: &Path,
) -> Result<glow::Program, GraphicsError> {
    let vertex_source = read_source(vertex_path)?;
    let fragment_source = read_source(fragment_path)?;
    compile_program(gl, &vertex_source, &fragment_source)
}

fn read_source(path: &Path) -> Result<String, GraphicsError> {
    fs::read_to_string(path).map_err(|source| GraphicsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn modified_time(path: &Path) -> Result<SystemTime, GraphicsError> {
    let metadata = fs::metadata(path).map_err(|source| GraphicsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    metadata.modified().map_err(|source| GraphicsError::Io {
        path: path.to_path_buf(),
        source,
    })
}
