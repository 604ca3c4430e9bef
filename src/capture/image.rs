//! Raster image type for captured screen regions

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Pixel layout of an image buffer; 8 bits per channel, rows tightly packed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    Rgba8,
    /// Byte order most screen capture APIs hand out
    Bgra8,
    Rgb8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => 4,
            PixelFormat::Rgb8 => 3,
        }
    }
}

/// A captured raster buffer.
///
/// Construction does not validate the buffer; a capture with the wrong byte
/// count is only rejected when something tries to render it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Image {
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            format,
            data,
        }
    }

    /// Wrap an RGBA buffer from the `image` crate
    pub fn from_rgba(rgba: RgbaImage) -> Self {
        let (width, height) = rgba.dimensions();
        Self::new(width, height, PixelFormat::Rgba8, rgba.into_raw())
    }

    /// Decode an encoded image file (PNG, JPEG, ...) into RGBA pixels
    pub fn decode(bytes: &[u8]) -> Result<Self, RenderError> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| RenderError::Decode(e.to_string()))?;
        let rgba = decoded.to_rgba8();
        log::debug!("Decoded image: {}x{} pixels", rgba.width(), rgba.height());
        Ok(Self::from_rgba(rgba))
    }

    /// A `width` x `height` image filled with one RGBA color
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::from_rgba(RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Check that the buffer is non-empty and its length matches the format
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(self.format.bytes_per_pixel()))
            .unwrap_or(usize::MAX);
        if expected != self.data.len() {
            return Err(RenderError::BufferSizeMismatch {
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// Validate and convert to an RGBA buffer
    pub fn to_rgba(&self) -> Result<RgbaImage, RenderError> {
        self.validate()?;
        let rgba = match self.format {
            PixelFormat::Rgba8 => self.data.clone(),
            PixelFormat::Bgra8 => self
                .data
                .chunks_exact(4)
                .flat_map(|px| [px[2], px[1], px[0], px[3]])
                .collect(),
            PixelFormat::Rgb8 => self
                .data
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 255])
                .collect(),
        };
        RgbaImage::from_raw(self.width, self.height, rgba).ok_or(
            RenderError::BufferSizeMismatch {
                expected: self.width as usize * self.height as usize * 4,
                actual: self.data.len(),
            },
        )
    }

    /// RGBA value of one pixel, or `None` when out of range or not renderable
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height || self.validate().is_err() {
            return None;
        }
        let bpp = self.format.bytes_per_pixel();
        let i = (y as usize * self.width as usize + x as usize) * bpp;
        let px = &self.data[i..i + bpp];
        Some(match self.format {
            PixelFormat::Rgba8 => [px[0], px[1], px[2], px[3]],
            PixelFormat::Bgra8 => [px[2], px[1], px[0], px[3]],
            PixelFormat::Rgb8 => [px[0], px[1], px[2], 255],
        })
    }
}
