use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::color::Color;
use crate::error::{CanvasError, Result};

/// Dimensions handed to renderers alongside the drawing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceInfo {
    pub width: u32,
    pub height: u32,
}

/// Fixed-size RGBA8 pixel buffer backing a canvas texture.
///
/// The buffer is allocated once and never resized. Pixels are stored
/// row-major, top row first, which is also the order `wgpu` expects for
/// `write_texture`.
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    /// Allocates a transparent-black surface. Zero dimensions are allowed and
    /// produce an empty buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn info(&self) -> SurfaceInfo {
        SurfaceInfo {
            width: self.width(),
            height: self.height(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.pixels
            .get_pixel_checked(x, y)
            .map(|Rgba(channels)| Color::from_array(*channels))
    }

    /// Overwrites a single pixel. Out-of-bounds coordinates are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(pixel) = self.pixels.get_pixel_mut_checked(x, y) {
            *pixel = Rgba(color.to_array());
        }
    }

    /// Raw RGBA8 bytes, `width * height * 4` long.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width() * 4
    }

    /// Returns true when every pixel equals `color`.
    pub fn is_filled_with(&self, color: Color) -> bool {
        let expected = color.to_array();
        self.pixels.pixels().all(|Rgba(channels)| *channels == expected)
    }

    /// Writes the current pixels to `path` as PNG.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| CanvasError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        self.pixels
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|source| CanvasError::Image {
                path: path.to_path_buf(),
                source,
            })
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }
}
