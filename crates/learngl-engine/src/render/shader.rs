//! Shader program compile/link and uniform upload.
//!
//! [`ShaderProgram`] owns a linked program object. Uniforms are addressed by
//! name; a name the program does not declare (or that the driver optimized
//! away) is ignored, matching plain GL behavior.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use glow::HasContext;
use thiserror::Error;

/// Programmable pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors while building a [`ShaderProgram`].
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader source {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The driver refused to allocate a shader or program object.
    #[error("failed to create GL object: {0}")]
    Create(String),

    #[error("shader compile error ({stage}):\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("shader link error:\n{0}")]
    Link(String),
}

/// Prefixes every source line with its right-aligned 1-based number and
/// appends the driver log, so log line references can be matched by eye.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let width = lines.len().max(1).to_string().len();

    let numbered = lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, _) => log.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

/// A linked vertex + fragment program.
pub struct ShaderProgram {
    gl: Rc<glow::Context>,
    program: glow::Program,
    /// Name -> location, misses included.
    locations: RefCell<HashMap<String, Option<glow::UniformLocation>>>,
}

impl ShaderProgram {
    /// Reads both stage sources from disk, then compiles and links them.
    pub fn from_files(
        gl: &Rc<glow::Context>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let vertex_src = read_source(vertex_path.as_ref())?;
        let fragment_src = read_source(fragment_path.as_ref())?;
        Self::from_sources(gl, &vertex_src, &fragment_src)
    }

    /// Compiles and links a program from in-memory GLSL.
    pub fn from_sources(
        gl: &Rc<glow::Context>,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self, ShaderError> {
        let vertex = compile_stage(gl, ShaderStage::Vertex, vertex_src)?;
        let fragment = match compile_stage(gl, ShaderStage::Fragment, fragment_src) {
            Ok(f) => f,
            Err(e) => {
                // SAFETY: `vertex` was just created on this context.
                unsafe { gl.delete_shader(vertex) };
                return Err(e);
            }
        };

        let linked = link(gl, vertex, fragment);

        // SAFETY: both handles are live; a linked program keeps its own copy.
        unsafe {
            gl.delete_shader(vertex);
            gl.delete_shader(fragment);
        }

        let program = linked?;
        log::debug!("linked shader program {program:?}");

        Ok(Self {
            gl: Rc::clone(gl),
            program,
            locations: RefCell::new(HashMap::new()),
        })
    }

    /// Makes this program current for subsequent draws and uniform uploads.
    pub fn use_program(&self) {
        // SAFETY: `self.program` is alive for as long as `self`.
        unsafe { self.gl.use_program(Some(self.program)) };
    }

    /// Uploads an `int` (or sampler unit) uniform.
    ///
    /// Like every setter here, this targets the *currently used* program and
    /// returns whether `name` resolved to a location. An unknown name is a
    /// no-op.
    pub fn set_int(&self, name: &str, value: i32) -> bool {
        self.with_location(name, |gl, loc| {
            // SAFETY: `loc` was queried from this program.
            unsafe { gl.uniform_1_i32(Some(loc), value) }
        })
    }

    pub fn set_float(&self, name: &str, value: f32) -> bool {
        self.with_location(name, |gl, loc| {
            // SAFETY: `loc` was queried from this program.
            unsafe { gl.uniform_1_f32(Some(loc), value) }
        })
    }

    /// Uploads `count` column-major 4x4 matrices from `matrix`.
    ///
    /// Only whole matrices present in the slice are sent, so a short slice
    /// uploads fewer than `count`.
    pub fn set_uniform_mat4fv(&self, name: &str, count: usize, transpose: bool, matrix: &[f32]) -> bool {
        let whole = (matrix.len() / 16).min(count);
        if whole == 0 {
            log::trace!("uniform {name}: no matrix data to upload");
            return false;
        }
        let data = &matrix[..whole * 16];

        self.with_location(name, |gl, loc| {
            // SAFETY: `data` holds `whole` full matrices; `loc` belongs to this program.
            unsafe { gl.uniform_matrix_4_f32_slice(Some(loc), transpose, data) }
        })
    }

    /// Uploads a single `glam` matrix.
    pub fn set_mat4(&self, name: &str, matrix: &glam::Mat4) -> bool {
        self.set_uniform_mat4fv(name, 1, false, &matrix.to_cols_array())
    }

    fn with_location(&self, name: &str, upload: impl FnOnce(&glow::Context, &glow::UniformLocation)) -> bool {
        let location = self.location(name);
        match location {
            Some(loc) => {
                upload(&self.gl, &loc);
                true
            }
            None => false,
        }
    }

    fn location(&self, name: &str) -> Option<glow::UniformLocation> {
        if let Some(cached) = self.locations.borrow().get(name) {
            return cached.clone();
        }

        // SAFETY: name lookup on a live program.
        let found = unsafe { self.gl.get_uniform_location(self.program, name) };
        if found.is_none() {
            log::debug!("uniform {name:?} not found in program {:?}", self.program);
        }

        self.locations
            .borrow_mut()
            .insert(name.to_owned(), found.clone());
        found
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        // SAFETY: the program is owned exclusively by `self`.
        unsafe { self.gl.delete_program(self.program) };
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn compile_stage(gl: &glow::Context, stage: ShaderStage, source: &str) -> Result<glow::Shader, ShaderError> {
    // SAFETY: glow wraps raw GL calls as unsafe. The shader is deleted on
    // the failure path.
    unsafe {
        let shader = gl.create_shader(stage.gl_enum()).map_err(ShaderError::Create)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if gl.get_shader_compile_status(shader) {
            Ok(shader)
        } else {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            Err(ShaderError::Compile {
                stage,
                log: format_shader_error(source, &log),
            })
        }
    }
}

fn link(gl: &glow::Context, vertex: glow::Shader, fragment: glow::Shader) -> Result<glow::Program, ShaderError> {
    // SAFETY: both shaders compiled successfully on this context. The
    // program is deleted on the failure path.
    unsafe {
        let program = gl.create_program().map_err(ShaderError::Create)?;
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);
        gl.detach_shader(program, vertex);
        gl.detach_shader(program, fragment);

        if gl.get_program_link_status(program) {
            Ok(program)
        } else {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            Err(ShaderError::Link(log))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_shader_error ───────────────────────────────────────────────

    #[test]
    fn numbers_each_source_line() {
        let out = format_shader_error("#version 330 core\nvoid main() {\n}", "0:2: error");
        assert!(out.contains("1: #version 330 core"), "got:\n{out}");
        assert!(out.contains("2: void main() {"), "got:\n{out}");
        assert!(out.contains("3: }"), "got:\n{out}");
        assert!(out.ends_with("0:2: error"), "got:\n{out}");
    }

    #[test]
    fn pads_numbers_to_the_widest() {
        let source = (1..=10).map(|i| format!("l{i}")).collect::<Vec<_>>().join("\n");
        let out = format_shader_error(&source, "");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], " 1: l1");
        assert_eq!(lines[9], "10: l10");
    }

    #[test]
    fn empty_source_yields_log_only() {
        assert_eq!(format_shader_error("", "boom"), "boom");
        assert_eq!(format_shader_error("", ""), "");
    }

    // ── ShaderError ───────────────────────────────────────────────────────

    #[test]
    fn compile_error_names_the_stage() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            log: "undeclared identifier".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("fragment"), "{msg}");
        assert!(msg.contains("undeclared identifier"), "{msg}");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = read_source(Path::new("definitely/not/here.vert")).unwrap_err();
        match err {
            ShaderError::Read { path, .. } => assert!(path.ends_with("here.vert")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
