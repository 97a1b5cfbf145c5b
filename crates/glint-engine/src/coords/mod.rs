//! 2D coordinate types.
//!
//! Convention:
//! - positions are in pixels, top-left origin, +Y down
//! - the vertex shader converts to NDC using an orthographic projection

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
