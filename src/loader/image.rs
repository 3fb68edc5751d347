//! Decoded image type handed to the engine by the image source

use std::io::Cursor;
use std::path::Path;

use anyhow::Context;
use image::{ImageReader, RgbaImage};

/// An image as delivered by the loader
///
/// `width` and `height` are known as soon as the header has been read; the
/// pixel buffer may still be missing (for instance when the pixel data could
/// not be decoded), in which case every transform is a no-op.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Option<RgbaImage>,
}

impl DecodedImage {
    /// Wrap a fully decoded RGBA buffer
    pub fn from_rgba(rgba: RgbaImage) -> Self {
        Self {
            width: rgba.width(),
            height: rgba.height(),
            pixels: Some(rgba),
        }
    }

    /// An image whose dimensions are known but whose pixels are not
    pub fn without_pixels(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: None,
        }
    }

    pub fn pixels(&self) -> Option<&RgbaImage> {
        self.pixels.as_ref()
    }
}

/// Decode an encoded raster (PNG, JPEG, ...) into RGBA
pub fn decode_raster(bytes: &[u8]) -> anyhow::Result<DecodedImage> {
    let decoded = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("Failed to detect image format")?
        .decode()
        .context("Failed to decode image")?;
    let rgba = decoded.to_rgba8();
    log::debug!("Decoded image: {}x{} pixels", rgba.width(), rgba.height());
    Ok(DecodedImage::from_rgba(rgba))
}

pub fn open_raster(path: &Path) -> anyhow::Result<DecodedImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    decode_raster(&bytes)
}
