//! Texture decoding and upload.
//!
//! Images are decoded fully on the CPU (`image` crate), re-packed into
//! tightly packed byte rows, uploaded with a single `tex_image_2d`, and
//! mipmapped. No CPU-side pixels are retained after upload.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use glow::HasContext;
use image::DynamicImage;

use crate::error::GraphicsError;

/// An uploaded 2D texture. The GL object is deleted on `Drop`.
pub struct Texture {
    gl: Rc<glow::Context>,
    raw: glow::Texture,
}

impl Texture {
    /// Decodes `path` and uploads it as a tightly packed RGB texture with
    /// mipmaps. Rows are uploaded top-to-bottom.
    pub fn from_file_rgb(gl: Rc<glow::Context>, path: impl AsRef<Path>) -> Result<Self, GraphicsError> {
        let image = decode(path.as_ref())?;
        let (width, height, pixels) = pack_rgb(&image);
        upload(gl, width, height, glow::RGB, &pixels, true)
    }

    /// Decodes `path` and uploads it as a tightly packed RGBA texture with
    /// mipmaps. Rows are uploaded top-to-bottom, same as the RGB variant.
    pub fn from_file_rgba(
        gl: Rc<glow::Context>,
        path: impl AsRef<Path>,
    ) -> Result<Self, GraphicsError> {
        let image = decode(path.as_ref())?;
        let (width, height, pixels) = pack_rgba(&image);
        upload(gl, width, height, glow::RGBA, &pixels, false)
    }

    #[inline]
    pub fn raw(&self) -> glow::Texture {
        self.raw
    }

    pub fn bind(&self) {
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.raw));
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.raw);
        }
    }
}

fn decode(path: &Path) -> Result<DynamicImage, GraphicsError> {
    image::open(path).map_err(|source| match source {
        image::ImageError::IoError(source) => GraphicsError::Io {
            path: PathBuf::from(path),
            source,
        },
        source => GraphicsError::Decode {
            path: PathBuf::from(path),
            source,
        },
    })
}

/// Tightly packed RGB rows, top-to-bottom.
fn pack_rgb(image: &DynamicImage) -> (u32, u32, Vec<u8>) {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    (width, height, rgb.into_raw())
}

/// Tightly packed RGBA rows, top-to-bottom.
fn pack_rgba(image: &DynamicImage) -> (u32, u32, Vec<u8>) {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    (width, height, rgba.into_raw())
}

fn upload(
    gl: Rc<glow::Context>,
    width: u32,
    height: u32,
    format: u32,
    pixels: &[u8],
    unpack_tight: bool,
) -> Result<Texture, GraphicsError> {
    unsafe {
        let raw = gl.create_texture().map_err(GraphicsError::Resource)?;
        gl.bind_texture(glow::TEXTURE_2D, Some(raw));

        // 3-byte RGB rows are not 4-byte aligned for odd widths.
        if unpack_tight {
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        }

        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            format as i32,
            width as i32,
            height as i32,
            0,
            format,
            glow::UNSIGNED_BYTE,
            Some(pixels),
        );
        gl.generate_mipmap(glow::TEXTURE_2D);

        if unpack_tight {
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 4);
        }

        Ok(Texture { gl, raw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn checker() -> DynamicImage {
        // 2x2: red, green / blue, translucent white.
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        img.put_pixel(1, 1, Rgba([255, 255, 255, 128]));
        DynamicImage::ImageRgba8(img)
    }

    // ── packing ───────────────────────────────────────────────────────────

    #[test]
    fn rgb_packs_three_bytes_per_pixel_top_down() {
        let (width, height, pixels) = pack_rgb(&checker());
        assert_eq!((width, height), (2, 2));
        assert_eq!(pixels.len(), 2 * 2 * 3);
        // Top row first: red then green.
        assert_eq!(&pixels[0..6], &[255, 0, 0, 0, 255, 0]);
        // Bottom row second: blue then white (alpha dropped).
        assert_eq!(&pixels[6..12], &[0, 0, 255, 255, 255, 255]);
    }

    #[test]
    fn rgba_packs_four_bytes_per_pixel_top_down() {
        let (width, height, pixels) = pack_rgba(&checker());
        assert_eq!((width, height), (2, 2));
        assert_eq!(pixels.len(), 2 * 2 * 4);
        assert_eq!(&pixels[0..4], &[255, 0, 0, 255]);
        // Both variants share the same row direction.
        assert_eq!(&pixels[12..16], &[255, 255, 255, 128]);
    }

    #[test]
    fn rgb_and_rgba_agree_on_row_order() {
        let (_, _, rgb) = pack_rgb(&checker());
        let (_, _, rgba) = pack_rgba(&checker());
        // First pixel of each packing is the same top-left red texel.
        assert_eq!(&rgb[0..3], &rgba[0..3]);
    }

    // ── decode errors ─────────────────────────────────────────────────────

    #[test]
    fn missing_file_is_an_io_error() {
        let err = decode(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, GraphicsError::Io { .. }));
    }
}
