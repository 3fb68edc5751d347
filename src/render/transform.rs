//! Pixel transforms applied to decoded image buffers
//!
//! Every transform reads the source buffer and returns a new one; the source
//! is never modified. An image without pixel data yields `None`.
//! Per-channel remaps are 8-bit to 8-bit, so they are computed once into a
//! 256-entry lookup table and then applied to every pixel.

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::domain::Rect;
use crate::loader::DecodedImage;

/// Per-channel filter applied to the color channels, alpha is untouched
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    /// Add `brightness * 255` to every channel (brightness in -1..1)
    Brighten(f32),
    /// Scale channels around mid-gray by `(1 + contrast)^2` (contrast in -1..1)
    Contrast(f32),
}

impl Filter {
    fn apply(self, v: f32) -> f32 {
        let out = match self {
            Filter::Brighten(brightness) => v + brightness * 255.0,
            Filter::Contrast(contrast) => {
                let slope = (1.0 + contrast).powi(2);
                ((v / 255.0 - 0.5) * slope + 0.5) * 255.0
            }
        };
        out.clamp(0.0, 255.0)
    }
}

/// Build a lookup table from a remap function, clamping and rounding the result
fn build_lut(f: impl Fn(f32) -> f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        let v = f(i as f32);
        *slot = if v.is_nan() {
            0
        } else {
            v.clamp(0.0, 255.0).round() as u8
        };
    }
    lut
}

fn source(image: &DecodedImage) -> Option<&RgbaImage> {
    let pixels = image.pixels();
    if pixels.is_none() {
        log::debug!(
            "Skipping transform, {}x{} image has no pixel data",
            image.width,
            image.height
        );
    }
    pixels
}

/// Window/level remap
///
/// The red channel is taken as the sample value, mapped from
/// `center ± width / 2` onto `0..=255` (clamped) and written to all three
/// color channels.
pub fn window_level(image: &DecodedImage, width: f32, center: f32) -> Option<DecodedImage> {
    let src = source(image)?;
    let min = center - width / 2.0;
    let max = center + width / 2.0;
    let range = max - min;

    let lut = if range > 0.0 && range.is_finite() {
        build_lut(|v| (v - min) / range * 255.0)
    } else {
        // Zero-width window degenerates to a threshold at the center
        build_lut(|v| if v >= center { 255.0 } else { 0.0 })
    };

    let mut out = src.clone();
    for px in out.pixels_mut() {
        let mapped = lut[px[0] as usize];
        px[0] = mapped;
        px[1] = mapped;
        px[2] = mapped;
    }
    Some(DecodedImage::from_rgba(out))
}

/// Apply filters in order to the color channels
pub fn apply_filters(image: &DecodedImage, filters: &[Filter]) -> Option<DecodedImage> {
    let src = source(image)?;
    let lut = build_lut(|v| filters.iter().fold(v, |acc, filter| filter.apply(acc)));

    let mut out = src.clone();
    for px in out.pixels_mut() {
        for channel in px.0.iter_mut().take(3) {
            *channel = lut[*channel as usize];
        }
    }
    Some(DecodedImage::from_rgba(out))
}

/// Brightness then contrast, both normalized to -1..1
pub fn brightness_contrast(
    image: &DecodedImage,
    brightness: f32,
    contrast: f32,
) -> Option<DecodedImage> {
    apply_filters(
        image,
        &[Filter::Brighten(brightness), Filter::Contrast(contrast)],
    )
}

/// Part of a crop box that lies on a `width` x `height` image shown at `display_scale`
///
/// `None` when the scale is invalid or the clipped box rounds to nothing.
pub fn visible_crop(
    width: u32,
    height: u32,
    crop_box: Rect,
    display_scale: (f32, f32),
) -> Option<Rect> {
    let (scale_x, scale_y) = display_scale;
    if !(scale_x > 0.0 && scale_y > 0.0) {
        log::warn!("Ignoring crop with invalid display scale {display_scale:?}");
        return None;
    }

    let displayed_w = width as f32 * scale_x;
    let displayed_h = height as f32 * scale_y;
    let Some(visible) = crop_box.clamp_to(displayed_w, displayed_h) else {
        log::debug!("Crop box {crop_box:?} does not cover the image");
        return None;
    };
    if visible.width.round() < 1.0 || visible.height.round() < 1.0 {
        return None;
    }
    Some(visible)
}

/// Extract the region under a crop box drawn in display coordinates
///
/// `display_scale` is the per-axis factor between source pixels and display
/// pixels. The box is normalized, clipped to the displayed image and the
/// matching source region is resampled to the box's display size.
pub fn crop(
    image: &DecodedImage,
    crop_box: Rect,
    display_scale: (f32, f32),
) -> Option<DecodedImage> {
    let src = source(image)?;
    let visible = visible_crop(src.width(), src.height(), crop_box, display_scale)?;
    let (scale_x, scale_y) = display_scale;
    let out_w = visible.width.round() as u32;
    let out_h = visible.height.round() as u32;

    let region = visible.unscale(scale_x, scale_y);
    let x = (region.x.floor() as u32).min(src.width() - 1);
    let y = (region.y.floor() as u32).min(src.height() - 1);
    let right = ((region.x + region.width).ceil() as u32).clamp(x + 1, src.width());
    let bottom = ((region.y + region.height).ceil() as u32).clamp(y + 1, src.height());

    let sub = imageops::crop_imm(src, x, y, right - x, bottom - y).to_image();
    let out = if sub.dimensions() == (out_w, out_h) {
        sub
    } else {
        imageops::resize(&sub, out_w, out_h, FilterType::Triangle)
    };
    log::debug!("Cropped {}x{} region at ({x}, {y})", out_w, out_h);
    Some(DecodedImage::from_rgba(out))
}
