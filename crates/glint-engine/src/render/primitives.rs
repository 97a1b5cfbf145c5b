//! Immediate-mode primitive drawing.
//!
//! Each call builds a fresh vertex (and, for rectangles, index) buffer,
//! uploads it in full, binds the default shader, sets the projection, and
//! issues one draw call. This is deliberately the worst-case per-primitive
//! path: one allocation, one upload, one draw per call, no batching. The
//! transient GL objects are deleted before the call returns.

use glow::HasContext;

use crate::coords::Vec2;
use crate::error::GraphicsError;

use super::renderer::Renderer;

/// Quad split used by `draw_rectangle` over corners
/// `(x,y), (x+w,y), (x+w,y+h), (x,y+h)`.
pub(super) const RECTANGLE_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

impl Renderer {
    /// Draws one tinted triangle through the default shader.
    pub fn draw_triangle(&self, a: Vec2, b: Vec2, c: Vec2) -> Result<(), GraphicsError> {
        let vertices = flatten_points(&[a, b, c]);
        self.upload_and_draw(&vertices, None, glow::TRIANGLES)
    }

    /// Draws one axis-aligned rectangle as two indexed triangles.
    pub fn draw_rectangle(&self, origin: Vec2, size: Vec2) -> Result<(), GraphicsError> {
        let vertices = rectangle_vertices(origin, size);
        self.upload_and_draw(&vertices, Some(&RECTANGLE_INDICES), glow::TRIANGLES)
    }

    /// Draws an arbitrary polygon as a triangle fan over `points`.
    ///
    /// Fewer than three points describe no area; the call is a no-op.
    pub fn draw_polygon(&self, points: &[Vec2]) -> Result<(), GraphicsError> {
        if points.len() < 3 {
            return Ok(());
        }
        let vertices = flatten_points(points);
        self.upload_and_draw(&vertices, None, glow::TRIANGLE_FAN)
    }

    /// Uploads `vertices` (xy pairs) into a transient VAO/VBO, optionally an
    /// index buffer, and issues a single draw call with the default shader.
    fn upload_and_draw(
        &self,
        vertices: &[f32],
        indices: Option<&[u32]>,
        mode: u32,
    ) -> Result<(), GraphicsError> {
        let gl = &self.gl;

        unsafe {
            let vao = gl.create_vertex_array().map_err(GraphicsError::Resource)?;
            let vbo = match gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(message) => {
                    gl.delete_vertex_array(vao);
                    return Err(GraphicsError::Resource(message));
                }
            };

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );
            gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, 2 * 4, 0);
            gl.enable_vertex_attrib_array(0);

            let ebo = match indices {
                Some(indices) => {
                    let ebo = match gl.create_buffer() {
                        Ok(ebo) => ebo,
                        Err(message) => {
                            gl.bind_vertex_array(None);
                            gl.delete_buffer(vbo);
                            gl.delete_vertex_array(vao);
                            return Err(GraphicsError::Resource(message));
                        }
                    };
                    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
                    gl.buffer_data_u8_slice(
                        glow::ELEMENT_ARRAY_BUFFER,
                        bytemuck::cast_slice(indices),
                        glow::STATIC_DRAW,
                    );
                    Some(ebo)
                }
                None => None,
            };

            self.default_shader.use_program();
            self.default_shader.set_mat4("projection", &self.projection());

            match indices {
                Some(indices) => {
                    gl.draw_elements(mode, indices.len() as i32, glow::UNSIGNED_INT, 0)
                }
                None => gl.draw_arrays(mode, 0, (vertices.len() / 2) as i32),
            }

            gl.bind_vertex_array(None);
            gl.delete_buffer(vbo);
            if let Some(ebo) = ebo {
                gl.delete_buffer(ebo);
            }
            gl.delete_vertex_array(vao);
        }

        Ok(())
    }
}

pub(super) fn rectangle_vertices(origin: Vec2, size: Vec2) -> [f32; 8] {
    let Vec2 { x, y } = origin;
    let w = size.x;
    let h = size.y;
    [x, y, x + w, y, x + w, y + h, x, y + h]
}

fn flatten_points(points: &[Vec2]) -> Vec<f32> {
    let mut vertices = Vec::with_capacity(points.len() * 2);
    for point in points {
        vertices.push(point.x);
        vertices.push(point.y);
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── rectangle geometry ────────────────────────────────────────────────

    #[test]
    fn rectangle_corners_are_clockwise_from_origin() {
        let vertices = rectangle_vertices(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0));
        assert_eq!(vertices, [10.0, 20.0, 40.0, 20.0, 40.0, 60.0, 10.0, 60.0]);
    }

    #[test]
    fn rectangle_indices_reference_all_four_corners() {
        let mut seen = RECTANGLE_INDICES.to_vec();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert!(RECTANGLE_INDICES.iter().all(|&i| i < 4));
    }

    // ── point flattening ──────────────────────────────────────────────────

    #[test]
    fn flatten_interleaves_xy_in_order() {
        let flat = flatten_points(&[Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)]);
        assert_eq!(flat, vec![1.0, 2.0, 3.0, 4.0]);
    }
}
