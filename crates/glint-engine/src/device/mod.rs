//! OpenGL device + surface management.
//!
//! This module is responsible for:
//! - creating the GL display, config, context, and window surface (glutin)
//! - loading GL function pointers into a `glow::Context`
//! - swapping buffers and resizing the surface

mod context;

pub use context::{GlContext, GlInit};
