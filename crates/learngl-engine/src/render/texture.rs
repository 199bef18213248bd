//! 2D textures decoded from image files.
//!
//! Decoding ([`TextureImage`]) is plain CPU work and independent of GL;
//! [`Texture::upload`] turns a decoded image into a mipmapped GL texture.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use glow::HasContext;
use thiserror::Error;

/// Texture coordinate wrap mode, applied to both S and T.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WrapMode {
    ClampToEdge,
    Repeat,
}

impl WrapMode {
    fn gl_enum(self) -> u32 {
        match self {
            WrapMode::ClampToEdge => glow::CLAMP_TO_EDGE,
            WrapMode::Repeat => glow::REPEAT,
        }
    }
}

/// 8-bit-per-channel pixel layouts.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PixelFormat {
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }

    fn gl_enum(self) -> u32 {
        match self {
            PixelFormat::Rgb => glow::RGB,
            PixelFormat::Rgba => glow::RGBA,
        }
    }
}

/// How a texture is decoded and stored.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TextureParams {
    pub wrap: WrapMode,
    /// GPU-side storage format.
    pub internal_format: PixelFormat,
    /// Layout the decoded pixels are converted to before upload.
    pub source_format: PixelFormat,
    /// Flip rows so the first row is the bottom of the image, as GL expects.
    pub flip_vertically: bool,
}

impl TextureParams {
    pub fn new(wrap: WrapMode, internal_format: PixelFormat, source_format: PixelFormat) -> Self {
        Self {
            wrap,
            internal_format,
            source_format,
            flip_vertically: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to decode image {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image {} is {width}x{height}, too large for a GL texture", path.display())]
    TooLarge { path: PathBuf, width: u32, height: u32 },

    #[error("failed to create GL texture: {0}")]
    Create(String),
}

/// Tightly packed decoded pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// Decodes `path` and converts it to `format`.
    pub fn decode(path: impl AsRef<Path>, format: PixelFormat, flip_vertically: bool) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let decoded = if flip_vertically { decoded.flipv() } else { decoded };
        let (width, height) = (decoded.width(), decoded.height());

        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(TextureError::TooLarge {
                path: path.to_path_buf(),
                width,
                height,
            });
        }

        let pixels = match format {
            PixelFormat::Rgb => decoded.into_rgb8().into_raw(),
            PixelFormat::Rgba => decoded.into_rgba8().into_raw(),
        };

        log::debug!("decoded {} ({width}x{height}, {format:?})", path.display());

        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }
}

/// A mipmapped 2D texture.
pub struct Texture {
    gl: Rc<glow::Context>,
    texture: glow::Texture,
}

impl Texture {
    /// Decodes the file at `path` and uploads it.
    pub fn from_file(gl: &Rc<glow::Context>, path: impl AsRef<Path>, params: &TextureParams) -> Result<Self, TextureError> {
        let image = TextureImage::decode(path, params.source_format, params.flip_vertically)?;
        Self::upload(gl, &image, params)
    }

    /// Uploads `image` with nearest-neighbor mipmapped filtering and
    /// generates the mip chain.
    ///
    /// `image.format` is the source layout; `params.internal_format` the
    /// storage format.
    pub fn upload(gl: &Rc<glow::Context>, image: &TextureImage, params: &TextureParams) -> Result<Self, TextureError> {
        let wrap = params.wrap.gl_enum() as i32;

        // SAFETY: glow wraps raw GL calls as unsafe. `image.pixels` holds
        // width * height * channels bytes, matching the format/type passed.
        let texture = unsafe {
            let texture = gl.create_texture().map_err(TextureError::Create)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));

            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::NEAREST_MIPMAP_NEAREST as i32,
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);

            // RGB rows are not 4-byte aligned for most widths.
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);

            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                params.internal_format.gl_enum() as i32,
                image.width as i32,
                image.height as i32,
                0,
                image.format.gl_enum(),
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(&image.pixels)),
            );
            gl.generate_mipmap(glow::TEXTURE_2D);

            gl.bind_texture(glow::TEXTURE_2D, None);
            texture
        };

        Ok(Self {
            gl: Rc::clone(gl),
            texture,
        })
    }

    /// Binds this texture to texture unit `unit`.
    pub fn bind(&self, unit: u32) {
        bind_unit(&self.gl, unit, Some(self.texture));
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        // SAFETY: the texture is owned exclusively by `self`.
        unsafe { self.gl.delete_texture(self.texture) };
    }
}

/// Binds `texture` (or nothing) to texture unit `unit`.
pub fn bind_unit(gl: &glow::Context, unit: u32, texture: Option<glow::Texture>) {
    // SAFETY: unit index and optional handle are passed straight through.
    unsafe {
        gl.active_texture(glow::TEXTURE0 + unit);
        gl.bind_texture(glow::TEXTURE_2D, texture);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_png(name: &str, img: &image::RgbaImage) -> PathBuf {
        let path = std::env::temp_dir().join(format!("learngl-{}-{name}.png", std::process::id()));
        img.save(&path).unwrap();
        path
    }

    fn two_rows() -> image::RgbaImage {
        // Top row red, bottom row blue.
        image::RgbaImage::from_fn(3, 2, |_, y| {
            if y == 0 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 255, 128])
            }
        })
    }

    #[test]
    fn decode_rgba_keeps_alpha() {
        let path = temp_png("rgba", &two_rows());
        let img = TextureImage::decode(&path, PixelFormat::Rgba, false).unwrap();

        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(img.pixels.len(), 3 * 2 * 4);
        assert_eq!(&img.pixels[..4], &[255, 0, 0, 255]);
        assert_eq!(&img.pixels[12..16], &[0, 0, 255, 128]);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn decode_rgb_drops_alpha() {
        let path = temp_png("rgb", &two_rows());
        let img = TextureImage::decode(&path, PixelFormat::Rgb, false).unwrap();

        assert_eq!(img.format, PixelFormat::Rgb);
        assert_eq!(img.pixels.len(), 3 * 2 * 3);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn flip_puts_bottom_row_first() {
        let path = temp_png("flip", &two_rows());
        let img = TextureImage::decode(&path, PixelFormat::Rgb, true).unwrap();

        assert_eq!(&img.pixels[..3], &[0, 0, 255]);
        assert_eq!(&img.pixels[9..12], &[255, 0, 0]);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let err = TextureImage::decode("no/such/image.png", PixelFormat::Rgba, true).unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }));
        assert!(err.to_string().contains("image.png"));
    }

    #[test]
    fn params_flip_by_default() {
        let p = TextureParams::new(WrapMode::Repeat, PixelFormat::Rgba, PixelFormat::Rgba);
        assert!(p.flip_vertically);
        assert_eq!(PixelFormat::Rgb.channels(), 3);
    }
}
