use std::rc::Rc;

use glow::HasContext;
use thiserror::Error;

/// One float vertex attribute inside an interleaved vertex.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttribute {
    /// Shader `layout(location = ...)`.
    pub location: u32,
    /// Number of `f32` components (1..=4).
    pub components: i32,
}

impl VertexAttribute {
    pub const fn new(location: u32, components: i32) -> Self {
        Self { location, components }
    }
}

/// Returns `(stride, offsets)` in bytes for tightly interleaved `f32` attributes.
pub fn interleaved_layout(attributes: &[VertexAttribute]) -> (i32, Vec<i32>) {
    let float = std::mem::size_of::<f32>() as i32;
    let mut offsets = Vec::with_capacity(attributes.len());
    let mut stride = 0;
    for attr in attributes {
        offsets.push(stride);
        stride += attr.components * float;
    }
    (stride, offsets)
}

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("{0} indices do not fit in a GL draw call")]
    TooManyIndices(usize),

    #[error("failed to create {object}: {reason}")]
    Create { object: &'static str, reason: String },
}

/// Index count as the `GLsizei` taken by `glDrawElements`.
fn draw_count(len: usize) -> Result<i32, MeshError> {
    i32::try_from(len).map_err(|_| MeshError::TooManyIndices(len))
}

/// Vertex array with its own vertex and `u32` index buffers.
pub struct IndexedMesh {
    gl: Rc<glow::Context>,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: glow::Buffer,
    index_count: i32,
}

impl IndexedMesh {
    /// Uploads interleaved `vertices` and `indices` as static data and
    /// records the attribute layout in a new vertex array.
    ///
    /// Objects created before a failure are deleted again.
    pub fn new(
        gl: &Rc<glow::Context>,
        vertices: &[f32],
        indices: &[u32],
        attributes: &[VertexAttribute],
    ) -> Result<Self, MeshError> {
        let (stride, offsets) = interleaved_layout(attributes);
        let index_count = draw_count(indices.len())?;

        // SAFETY: glow wraps raw GL calls as unsafe. Buffers are bound before
        // data upload and the attribute offsets stay inside `stride`.
        unsafe {
            let vao = gl
                .create_vertex_array()
                .map_err(|reason| MeshError::Create { object: "vertex array", reason })?;

            let vbo = match gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(reason) => {
                    gl.delete_vertex_array(vao);
                    return Err(MeshError::Create { object: "vertex buffer", reason });
                }
            };

            let ebo = match gl.create_buffer() {
                Ok(ebo) => ebo,
                Err(reason) => {
                    gl.delete_buffer(vbo);
                    gl.delete_vertex_array(vao);
                    return Err(MeshError::Create { object: "index buffer", reason });
                }
            };

            gl.bind_vertex_array(Some(vao));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytemuck::cast_slice(vertices), glow::STATIC_DRAW);

            // The element binding is part of VAO state.
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(indices), glow::STATIC_DRAW);

            for (attr, offset) in attributes.iter().zip(offsets) {
                gl.vertex_attrib_pointer_f32(attr.location, attr.components, glow::FLOAT, false, stride, offset);
                gl.enable_vertex_attrib_array(attr.location);
            }

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(Self {
                gl: Rc::clone(gl),
                vao,
                vbo,
                ebo,
                index_count,
            })
        }
    }

    /// Binds the vertex array and draws all indices as triangles.
    pub fn draw(&self) {
        // SAFETY: the VAO and its element buffer are alive for `self`.
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.draw_elements(glow::TRIANGLES, self.index_count, glow::UNSIGNED_INT, 0);
        }
    }
}

impl Drop for IndexedMesh {
    fn drop(&mut self) {
        // SAFETY: all three objects are owned exclusively by `self`.
        unsafe {
            self.gl.delete_vertex_array(self.vao);
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_buffer(self.ebo);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_texcoord_layout() {
        let (stride, offsets) =
            interleaved_layout(&[VertexAttribute::new(0, 3), VertexAttribute::new(1, 2)]);
        assert_eq!(stride, 20);
        assert_eq!(offsets, vec![0, 12]);
    }

    #[test]
    fn empty_layout() {
        assert_eq!(interleaved_layout(&[]), (0, vec![]));
    }

    #[test]
    fn quad_index_count_fits() {
        assert_eq!(draw_count(6).unwrap(), 6);
    }

    #[test]
    fn oversized_index_count_is_an_error() {
        let len = i32::MAX as usize + 1;
        let err = draw_count(len).unwrap_err();
        assert!(matches!(err, MeshError::TooManyIndices(n) if n == len));
        assert!(err.to_string().contains("indices"));
    }

    #[test]
    fn create_error_names_the_object() {
        let err = MeshError::Create { object: "index buffer", reason: "out of memory".into() };
        assert_eq!(err.to_string(), "failed to create index buffer: out of memory");
    }
}
