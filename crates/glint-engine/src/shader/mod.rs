//! GLSL shader programs.
//!
//! A [`ShaderProgram`] is compiled and linked from two source files on disk
//! and remembers their modification timestamps so it can hot-reload itself
//! while the demo is running.

mod program;

pub use program::{compile_program, ShaderProgram};
