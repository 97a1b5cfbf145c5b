use std::rc::Rc;

use glow::HasContext;

use crate::coords::Viewport;
use crate::error::GraphicsError;
use crate::shader::ShaderProgram;

use super::sprite::Sprite;

/// Index pattern for one quad split into two triangles.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Merges many independent quads into one vertex/index buffer and draws
/// them with a single indexed call.
///
/// Invariant: each sprite occupies exactly 4 vertices and 6 indices in list
/// order; the index block for sprite `k` is `QUAD_INDICES + 4k`. Both lists
/// grow together in [`add_sprite`](Self::add_sprite), so the precomputed
/// indices always match the vertex layout produced at draw time.
pub struct SpriteBatch {
    gl: Rc<glow::Context>,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: glow::Buffer,
    shader: ShaderProgram,
    sprites: Vec<Sprite>,
    indices: Vec<u32>,
}

impl SpriteBatch {
    /// Allocates the batch's GL objects; no sprites yet.
    pub fn new(gl: Rc<glow::Context>, shader: ShaderProgram) -> Result<Self, GraphicsError> {
        unsafe {
            let vao = gl.create_vertex_array().map_err(GraphicsError::Resource)?;
            let vbo = match gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(message) => {
                    gl.delete_vertex_array(vao);
                    return Err(GraphicsError::Resource(message));
                }
            };
            let ebo = match gl.create_buffer() {
                Ok(ebo) => ebo,
                Err(message) => {
                    gl.delete_buffer(vbo);
                    gl.delete_vertex_array(vao);
                    return Err(GraphicsError::Resource(message));
                }
            };

            Ok(Self {
                gl,
                vao,
                vbo,
                ebo,
                shader,
                sprites: Vec::new(),
                indices: Vec::new(),
            })
        }
    }

    pub fn shader(&self) -> &ShaderProgram {
        &self.shader
    }

    /// Mutable access for hot-reload polling.
    pub fn shader_mut(&mut self) -> &mut ShaderProgram {
        &mut self.shader
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// In-place sprite mutation (e.g. advancing rotations each frame).
    pub fn sprites_mut(&mut self) -> &mut [Sprite] {
        &mut self.sprites
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Appends a sprite and extends the index list with the quad pattern
    /// offset by 4x the sprite's position in the list.
    pub fn add_sprite(&mut self, sprite: Sprite) {
        extend_quad_indices(&mut self.indices, self.sprites.len());
        self.sprites.push(sprite);
    }

    /// Flattens every sprite's transformed corners into one vertex buffer,
    /// uploads vertices and indices once, and issues a single indexed draw
    /// covering all sprites.
    ///
    /// An empty batch is a strict no-op: no upload, no draw call.
    pub fn draw(&self, viewport: Viewport) -> Result<(), GraphicsError> {
        let Some(vertices) = flatten_sprites(&self.sprites) else {
            return Ok(());
        };

        let projection = glam::Mat4::orthographic_rh_gl(
            0.0,
            viewport.width,
            viewport.height,
            0.0,
            -1.0,
            1.0,
        );

        let gl = &self.gl;
        unsafe {
            gl.bind_vertex_array(Some(self.vao));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&vertices),
                glow::STATIC_DRAW,
            );
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&self.indices),
                glow::STATIC_DRAW,
            );

            gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, 2 * 4, 0);
            gl.enable_vertex_attrib_array(0);

            self.shader.use_program();
            self.shader.set_mat4("projection", &projection);

            gl.draw_elements(
                glow::TRIANGLES,
                self.indices.len() as i32,
                glow::UNSIGNED_INT,
                0,
            );

            gl.bind_vertex_array(None);
        }

        Ok(())
    }
}

impl Drop for SpriteBatch {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_buffer(self.ebo);
            self.gl.delete_vertex_array(self.vao);
        }
    }
}

/// Appends the quad index pattern for the sprite at position `sprite_count`.
fn extend_quad_indices(indices: &mut Vec<u32>, sprite_count: usize) {
    let base = 4 * sprite_count as u32;
    indices.extend(QUAD_INDICES.iter().map(|index| index + base));
}

/// Flattens transformed corners of all sprites, in insertion order, into
/// interleaved xy pairs. Returns `None` for an empty sprite list so the
/// caller can skip the upload and draw entirely.
fn flatten_sprites(sprites: &[Sprite]) -> Option<Vec<f32>> {
    if sprites.is_empty() {
        return None;
    }

    let mut vertices = Vec::with_capacity(sprites.len() * 8);
    for sprite in sprites {
        for corner in sprite.transformed_corners() {
            vertices.push(corner.x);
            vertices.push(corner.y);
        }
    }
    Some(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    fn indices_after_adding(count: usize) -> Vec<u32> {
        let mut indices = Vec::new();
        for k in 0..count {
            extend_quad_indices(&mut indices, k);
        }
        indices
    }

    // ── index pattern ─────────────────────────────────────────────────────

    #[test]
    fn first_sprite_gets_the_base_quad_pattern() {
        assert_eq!(indices_after_adding(1), vec![0, 1, 2, 2, 3, 0]);
    }

    #[test]
    fn each_sprite_offsets_the_pattern_by_four() {
        let indices = indices_after_adding(3);
        let expected: Vec<u32> = (0..3u32)
            .flat_map(|k| QUAD_INDICES.iter().map(move |i| i + 4 * k))
            .collect();
        assert_eq!(indices, expected);
    }

    #[test]
    fn indices_never_reference_past_the_vertex_count() {
        for count in 1..=16 {
            let indices = indices_after_adding(count);
            assert_eq!(indices.len(), count * 6);
            assert!(indices.iter().all(|&i| i < 4 * count as u32));
        }
    }

    // ── vertex flattening ─────────────────────────────────────────────────

    #[test]
    fn empty_batch_assembles_no_mesh() {
        assert!(flatten_sprites(&[]).is_none());
    }

    #[test]
    fn one_sprite_flattens_to_its_four_corners_in_order() {
        let sprite = Sprite::new(Vec2::zero(), Vec2::new(1.0, 1.0), 0.0);
        let vertices = flatten_sprites(&[sprite]).unwrap();
        assert_eq!(vertices, vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn sprites_flatten_in_insertion_order() {
        let first = Sprite::new(Vec2::new(10.0, 0.0), Vec2::new(1.0, 1.0), 0.0);
        let second = Sprite::new(Vec2::new(20.0, 0.0), Vec2::new(1.0, 1.0), 0.0);
        let vertices = flatten_sprites(&[first, second]).unwrap();

        assert_eq!(vertices.len(), 16);
        // First corner of each sprite carries that sprite's translation.
        assert_eq!(vertices[0], 10.0);
        assert_eq!(vertices[8], 20.0);
    }
}
