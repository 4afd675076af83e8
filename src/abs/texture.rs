//! GPU-side 2D textures.
//!
//! The module provides the [`Texture`] struct, which owns a GL texture object
//! uploaded from a raw RGB pixel buffer. Sampling is fixed to nearest
//! filtering with repeat wrapping, and rows are tightly packed, so a buffer
//! of exactly `width * height * 3` bytes is always sufficient.

use std::sync::Arc;

use glow::HasContext;

use crate::error::RenderError;

/// Byte length of a tightly packed RGB image, `None` on overflow.
fn rgb_byte_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(3)
}

/// Rejects dimensions and buffers the GL upload could read out of bounds.
fn check_rgb_input(width: u32, height: u32, rgb: &[u8]) -> Result<usize, RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidArgument(format!(
            "texture dimensions must be positive, got {width}x{height}"
        )));
    }
    let needed = rgb_byte_len(width, height).ok_or_else(|| {
        RenderError::InvalidArgument(format!("texture dimensions overflow: {width}x{height}"))
    })?;
    if rgb.len() < needed {
        return Err(RenderError::InvalidArgument(format!(
            "RGB buffer too small: {width}x{height} needs {needed} bytes, got {}",
            rgb.len()
        )));
    }
    Ok(needed)
}

/// A texture stored on the GPU side, deleted when dropped.
pub struct Texture {
    gl: Arc<glow::Context>,
    id: glow::Texture,
    width: u32,
    height: u32,
}

impl Texture {
    /// Uploads a tightly packed, row-major RGB buffer as the base mip level.
    ///
    /// The buffer is validated before any GL call: both dimensions must be
    /// nonzero and `rgb` must hold at least `width * height * 3` bytes,
    /// otherwise [`RenderError::InvalidArgument`] is returned. The pixel data
    /// is copied into GPU memory, so the slice only needs to live for the
    /// duration of this call.
    pub fn from_rgb(
        gl: &Arc<glow::Context>,
        width: u32,
        height: u32,
        rgb: &[u8],
    ) -> Result<Self, RenderError> {
        let needed = check_rgb_input(width, height, rgb)?;
        unsafe {
            let texture = gl.create_texture().map_err(RenderError::Gpu)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            // Rows are tightly packed; the default 4-byte unpack alignment
            // would over-read rows whose byte width is not a multiple of 4.
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGB as i32,
                width as i32,
                height as i32,
                0,
                glow::RGB,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(&rgb[..needed])),
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::NEAREST as i32,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            log::debug!("uploaded {width}x{height} RGB texture");

            Ok(Self {
                gl: Arc::clone(gl),
                id: texture,
                width,
                height,
            })
        }
    }

    /// Returns the width of the texture.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the texture.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_by_two_rgb_needs_exactly_twelve_bytes() {
        assert_eq!(check_rgb_input(2, 2, &[0u8; 12]).unwrap(), 12);
        // Extra bytes beyond the image are allowed, only the image is read.
        assert_eq!(check_rgb_input(2, 2, &[0u8; 16]).unwrap(), 12);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let err = check_rgb_input(2, 2, &[0u8; 11]).unwrap_err();
        assert!(matches!(err, RenderError::InvalidArgument(_)));
        assert!(err.to_string().contains("12 bytes"));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            check_rgb_input(0, 4, &[0u8; 12]),
            Err(RenderError::InvalidArgument(_))
        ));
        assert!(matches!(
            check_rgb_input(4, 0, &[0u8; 12]),
            Err(RenderError::InvalidArgument(_))
        ));
    }

    #[test]
    fn odd_row_widths_stay_tightly_packed() {
        // 3x3 RGB: 27 bytes, not a multiple of the default 4-byte alignment.
        assert_eq!(check_rgb_input(3, 3, &[0u8; 27]).unwrap(), 27);
    }
}
