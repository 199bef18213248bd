//! Texture loading with an explicit "missing" outcome.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use learngl_engine::render::{bind_unit, Texture, TextureError, TextureParams};

/// Result of loading one of the scene textures.
pub enum TextureSlot {
    Loaded(Texture),
    /// Decoding or upload failed; the unit is left unbound when drawing.
    Missing { path: PathBuf },
}

impl TextureSlot {
    /// Logs a failed load and turns it into [`TextureSlot::Missing`].
    pub fn from_result(path: &Path, result: Result<Texture, TextureError>) -> Self {
        match result {
            Ok(texture) => {
                log::info!("loaded texture {}", path.display());
                TextureSlot::Loaded(texture)
            }
            Err(err) => {
                log_failure(&err);
                TextureSlot::Missing { path: path.to_path_buf() }
            }
        }
    }

    /// Binds the texture to `unit`, or unbinds the unit for a missing one.
    pub fn bind(&self, gl: &glow::Context, unit: u32) {
        match self {
            TextureSlot::Loaded(texture) => texture.bind(unit),
            TextureSlot::Missing { .. } => bind_unit(gl, unit, None),
        }
    }
}

/// Loads a texture; failures are logged and produce [`TextureSlot::Missing`].
pub fn load_texture_slot(gl: &Rc<glow::Context>, path: &Path, params: &TextureParams) -> TextureSlot {
    TextureSlot::from_result(path, Texture::from_file(gl, path, params))
}

fn log_failure(err: &TextureError) {
    match err {
        TextureError::Decode { source, .. } => log::error!("failed to load texture data: {err}: {source}"),
        _ => log::error!("failed to load texture data: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learngl_engine::render::{PixelFormat, TextureImage, WrapMode};

    fn params() -> TextureParams {
        TextureParams::new(WrapMode::Repeat, PixelFormat::Rgba, PixelFormat::Rgba)
    }

    /// Runs the decode half of `Texture::from_file`, which fails before any
    /// GL call, and feeds the outcome to the slot.
    fn slot_for_failed_file(path: &Path) -> TextureSlot {
        let p = params();
        let err = TextureImage::decode(path, p.source_format, p.flip_vertically)
            .expect_err("decode should fail");
        TextureSlot::from_result(path, Err(err))
    }

    #[test]
    fn missing_file_yields_missing_slot() {
        let path = Path::new("assets/does-not-exist.jpg");
        match slot_for_failed_file(path) {
            TextureSlot::Missing { path: p } => assert_eq!(p, path),
            TextureSlot::Loaded(_) => panic!("missing file produced a texture"),
        }
    }

    #[test]
    fn garbage_bytes_yield_missing_slot() {
        let path = std::env::temp_dir().join(format!("learngl-garbage-{}.png", std::process::id()));
        std::fs::write(&path, b"not an image").unwrap();

        assert!(matches!(slot_for_failed_file(&path), TextureSlot::Missing { .. }));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn upload_failure_yields_missing_slot() {
        let path = Path::new("assets/bloodtrail.png");
        let slot = TextureSlot::from_result(path, Err(TextureError::Create("out of names".into())));
        assert!(matches!(slot, TextureSlot::Missing { path: p } if p == path));
    }
}
