//! Glint engine crate.
//!
//! This crate owns the platform + OpenGL runtime pieces used by the demo:
//! window/event loop, GL context bootstrap, shader programs, immediate
//! primitives, sprite batching, and texture upload.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod shader;
pub mod texture;

mod error;

pub use error::{GraphicsError, ShaderStage};
