//! Image decoding and view derivation.
//!
//! Photos arrive as JPEG/PNG files; every analyzer works on the same pair
//! of views of one decoded image: the 8-bit RGB color view and a
//! single-channel luminance view derived from it exactly once.


use std::path::Path;

use image::{GrayImage, RgbImage};

/// Decoded image data: one color view plus the luminance view derived from it.
///
/// The luminance view is computed once at construction and shared by all
/// analyzers, so repeated (and possibly inconsistent) conversions never occur.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// 8-bit RGB color view
    pub color: RgbImage,

    /// 8-bit single-channel luminance view (Rec.601 weights)
    pub gray: GrayImage,
}

impl DecodedImage {
    /// Build the decoded image pair from an already-decoded color raster.
    pub fn from_rgb(color: RgbImage) -> Self {
        let width = color.width();
        let height = color.height();
        let gray = luminance_view(&color);
        Self {
            width,
            height,
            color,
            gray,
        }
    }
}

/// Decode an image from a file path.
///
/// Any format the `image` crate recognizes is accepted; the result is
/// normalized to 8-bit RGB with the luminance view derived immediately.
pub fn decode_image<P: AsRef<Path>>(path: P) -> Result<DecodedImage, String> {
    let path = path.as_ref();
    let dynamic = image::open(path)
        .map_err(|e| format!("Could not load image {}: {}", path.display(), e))?;

    let color = dynamic.to_rgb8();
    if color.width() == 0 || color.height() == 0 {
        return Err(format!("Image {} has zero dimensions", path.display()));
    }

    Ok(DecodedImage::from_rgb(color))
}

/// Derive the single-channel luminance view from a color raster.
///
/// Uses Rec.601 luma weights (0.299 R + 0.587 G + 0.114 B), the standard
/// photographic grayscale conversion.
pub(crate) fn luminance_view(color: &RgbImage) -> GrayImage {
    let mut gray = GrayImage::new(color.width(), color.height());
    for (src, dst) in color.pixels().zip(gray.pixels_mut()) {
        let [r, g, b] = src.0;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        dst.0 = [luma.round().min(255.0) as u8];
    }
    gray
}
