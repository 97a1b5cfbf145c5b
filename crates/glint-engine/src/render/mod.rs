//! Drawing layer.
//!
//! [`Renderer`] owns the default shader and the current viewport, and issues
//! immediate-mode primitive draws. [`SpriteBatch`] accumulates transformed
//! quads and draws them all with a single indexed call.
//!
//! Convention:
//! - CPU geometry is in pixels (top-left origin, +Y down)
//! - the vertex shader converts to NDC using a `projection` uniform

mod batch;
mod primitives;
mod renderer;
mod sprite;

pub use batch::SpriteBatch;
pub use renderer::{Renderer, DEFAULT_FRAGMENT_SHADER_PATH, DEFAULT_VERTEX_SHADER_PATH};
pub use sprite::{Sprite, UNIT_CORNERS};
