//! GL resource wrappers.
//!
//! Every type here owns one or more GL object names and deletes them on drop.
//! All of them need the context that created them to be current.
//!
//! - [`shader`] -- program compile/link and by-name uniform upload.
//! - [`texture`] -- image decode and 2D texture upload with mipmaps.
//! - [`mesh`] -- indexed vertex array (VAO + VBO + EBO).

pub mod mesh;
pub mod shader;
pub mod texture;

pub use mesh::{interleaved_layout, IndexedMesh, MeshError, VertexAttribute};
pub use shader::{format_shader_error, ShaderError, ShaderProgram, ShaderStage};
pub use texture::{bind_unit, PixelFormat, Texture, TextureError, TextureImage, TextureParams, WrapMode};
